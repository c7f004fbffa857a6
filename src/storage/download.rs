// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::constants::{
    FAILED_AUDIO_MARKER, FAILED_IMAGE_MARKER, MIN_AUDIO_FILE_SIZE, MIN_DOWNLOAD_SIZE,
    MIN_IMAGE_FILE_SIZE, PARTIAL_SUFFIX,
};
use crate::episode::Episode;
use crate::error::DownloadError;
use crate::http::{ByteStream, HttpClient};
use crate::progress::{MediaKind, ProgressEvent, SharedProgressReporter};

use super::Storage;

/// Outcome of a media download attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The file was fetched and renamed into place
    Downloaded(u64),
    /// An existing file above the size threshold was left untouched
    AlreadyExists(u64),
    /// The URL is a known placeholder/failure marker; nothing was fetched
    SkippedPlaceholder,
    /// The episode carries no URL for this asset
    SkippedMissingUrl,
}

impl Storage {
    /// Download an episode's audio file, if it is not already present.
    ///
    /// Writes to a sibling `.partial` path and renames into place only after
    /// the byte count clears the minimum download size; every failure path
    /// removes the partial file.
    pub async fn download_audio<C: HttpClient>(
        &self,
        client: &C,
        episode: &Episode,
        reporter: &SharedProgressReporter,
    ) -> Result<DownloadOutcome, DownloadError> {
        if episode.audio_url.is_empty() {
            return Ok(DownloadOutcome::SkippedMissingUrl);
        }
        if episode.audio_url.contains(FAILED_AUDIO_MARKER) {
            return Ok(DownloadOutcome::SkippedPlaceholder);
        }

        self.download_media(
            client,
            &episode.audio_url,
            &episode.filename,
            MIN_AUDIO_FILE_SIZE,
            MIN_DOWNLOAD_SIZE,
            MediaKind::Audio,
            &episode.title,
            reporter,
        )
        .await
    }

    /// Download an episode's image file, if any and not already present
    pub async fn download_image<C: HttpClient>(
        &self,
        client: &C,
        episode: &Episode,
        reporter: &SharedProgressReporter,
    ) -> Result<DownloadOutcome, DownloadError> {
        let Some(image_filename) = episode.image_filename.as_deref() else {
            return Ok(DownloadOutcome::SkippedMissingUrl);
        };
        if episode.image.is_empty() {
            return Ok(DownloadOutcome::SkippedMissingUrl);
        }
        if episode.image.contains(FAILED_IMAGE_MARKER) {
            return Ok(DownloadOutcome::SkippedPlaceholder);
        }

        self.download_media(
            client,
            &episode.image,
            image_filename,
            MIN_IMAGE_FILE_SIZE,
            MIN_IMAGE_FILE_SIZE,
            MediaKind::Image,
            &episode.title,
            reporter,
        )
        .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn download_media<C: HttpClient>(
        &self,
        client: &C,
        url: &str,
        filename: &str,
        min_existing: u64,
        min_download: u64,
        kind: MediaKind,
        title: &str,
        reporter: &SharedProgressReporter,
    ) -> Result<DownloadOutcome, DownloadError> {
        let target = self.data_dir().join(filename);

        if let Ok(info) = std::fs::metadata(&target) {
            if info.len() > min_existing {
                return Ok(DownloadOutcome::AlreadyExists(info.len()));
            }
            // Undersized leftover from an earlier failed attempt
            let _ = std::fs::remove_file(&target);
        }

        let response = client
            .get_stream(url)
            .await
            .map_err(|e| DownloadError::HttpFailed {
                url: url.to_string(),
                source: e,
            })?;

        if response.status != 200 {
            return Err(DownloadError::HttpStatus {
                url: url.to_string(),
                status: response.status,
            });
        }

        reporter.report(ProgressEvent::DownloadStarting {
            kind,
            episode_title: title.to_string(),
            content_length: response.content_length,
        });

        let partial = partial_path(&target);

        let bytes = match stream_to_file(
            response.body,
            &partial,
            url,
            response.content_length,
            kind,
            title,
            reporter,
        )
        .await
        {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(e);
            }
        };

        // An HTML error page saved as media is smaller than any real episode
        if bytes < min_download {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(DownloadError::TooSmall {
                path: target,
                bytes,
                minimum: min_download,
            });
        }

        if let Err(e) = tokio::fs::rename(&partial, &target).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(DownloadError::RenameFailed {
                path: target,
                source: e,
            });
        }

        reporter.report(ProgressEvent::DownloadCompleted {
            kind,
            episode_title: title.to_string(),
            bytes_downloaded: bytes,
        });

        Ok(DownloadOutcome::Downloaded(bytes))
    }
}

async fn stream_to_file(
    mut body: ByteStream,
    path: &Path,
    url: &str,
    total_bytes: Option<u64>,
    kind: MediaKind,
    title: &str,
    reporter: &SharedProgressReporter,
) -> Result<u64, DownloadError> {
    let mut file = File::create(path)
        .await
        .map_err(|e| DownloadError::FileCreateFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    let mut bytes_downloaded: u64 = 0;

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| DownloadError::StreamFailed {
            url: url.to_string(),
            source: e,
        })?;

        file.write_all(&chunk)
            .await
            .map_err(|e| DownloadError::FileWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;

        bytes_downloaded += chunk.len() as u64;

        reporter.report(ProgressEvent::DownloadProgress {
            kind,
            episode_title: title.to_string(),
            bytes_downloaded,
            total_bytes,
        });
    }

    file.flush()
        .await
        .map_err(|e| DownloadError::FileWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(bytes_downloaded)
}

fn partial_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.push_str(PARTIAL_SUFFIX);
    target.with_file_name(name)
}
