// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::collector::scrape_episodes_with_limit;
use crate::episode::Episode;
use crate::error::{DownloadError, ScrapeError};
use crate::http::HttpClient;
use crate::progress::{MediaKind, ProgressEvent, SharedProgressReporter};
use crate::storage::{DownloadOutcome, SaveOutcome, Storage};

/// Options for a scrape run
#[derive(Debug, Clone, Default)]
pub struct ScrapeOptions {
    /// Persist metadata only, skip media downloads
    pub lazy: bool,
    /// Maximum listing pages to fetch (0 = all)
    pub max_pages: u32,
}

/// Aggregate result of a scrape run.
///
/// Per-episode and per-asset failures are counted here, never escalated to a
/// process failure.
#[derive(Debug, Clone, Default)]
pub struct ScrapeSummary {
    /// Episodes returned by the collector
    pub total: usize,
    /// Episodes whose assets all saved/downloaded (or were already present)
    pub succeeded: usize,
    /// Episodes whose media downloads were skipped (lazy mode)
    pub skipped: usize,
    /// Episodes with at least one failed save or download
    pub errored: usize,
    /// Details of failures (episode title, error message)
    pub failures: Vec<(String, String)>,
}

/// Run the full scrape pipeline: collect from the API, then save metadata
/// and download media for each episode in turn.
///
/// Listing failures abort with an error; everything after the collector is
/// the soft tier, aggregated into the summary.
pub async fn run_scrape<C: HttpClient>(
    client: &C,
    storage: &Storage,
    options: &ScrapeOptions,
    reporter: SharedProgressReporter,
) -> Result<ScrapeSummary, ScrapeError> {
    let episodes = scrape_episodes_with_limit(client, options.max_pages, &reporter).await?;

    let mut summary = ScrapeSummary {
        total: episodes.len(),
        ..Default::default()
    };

    for (index, episode) in episodes.iter().enumerate() {
        reporter.report(ProgressEvent::EpisodeProcessing {
            index,
            total: episodes.len(),
            episode_title: episode.title.clone(),
        });

        let json_path = storage.data_dir().join(&episode.json_file);
        match storage.save_episode(episode) {
            Ok(SaveOutcome::Saved) => {
                reporter.report(ProgressEvent::MetadataSaved { path: json_path });
            }
            Ok(SaveOutcome::AlreadyExists) => {
                reporter.report(ProgressEvent::MetadataExists { path: json_path });
            }
            Err(e) => {
                summary.errored += 1;
                summary.failures.push((episode.title.clone(), e.to_string()));
                continue;
            }
        }

        if options.lazy {
            summary.skipped += 1;
            continue;
        }

        // Audio and image are independent: one failing does not block the
        // other.
        let audio_ok = report_download(
            storage.download_audio(client, episode, &reporter).await,
            MediaKind::Audio,
            episode,
            &reporter,
            &mut summary,
        );
        let image_ok = report_download(
            storage.download_image(client, episode, &reporter).await,
            MediaKind::Image,
            episode,
            &reporter,
            &mut summary,
        );

        if audio_ok && image_ok {
            summary.succeeded += 1;
        } else {
            summary.errored += 1;
        }
    }

    reporter.report(ProgressEvent::ScrapeCompleted {
        total: summary.total,
        succeeded: summary.succeeded,
        skipped: summary.skipped,
        errored: summary.errored,
    });

    Ok(summary)
}

fn report_download(
    result: Result<DownloadOutcome, DownloadError>,
    kind: MediaKind,
    episode: &Episode,
    reporter: &SharedProgressReporter,
    summary: &mut ScrapeSummary,
) -> bool {
    match result {
        Ok(DownloadOutcome::Downloaded(_)) => true,
        Ok(DownloadOutcome::AlreadyExists(bytes)) => {
            reporter.report(ProgressEvent::DownloadSkipped {
                kind,
                episode_title: episode.title.clone(),
                reason: format!("already present ({bytes} bytes)"),
            });
            true
        }
        Ok(DownloadOutcome::SkippedPlaceholder) => {
            reporter.report(ProgressEvent::DownloadSkipped {
                kind,
                episode_title: episode.title.clone(),
                reason: "placeholder URL".to_string(),
            });
            true
        }
        Ok(DownloadOutcome::SkippedMissingUrl) => {
            reporter.report(ProgressEvent::DownloadSkipped {
                kind,
                episode_title: episode.title.clone(),
                reason: "no URL".to_string(),
            });
            true
        }
        Err(e) => {
            reporter.report(ProgressEvent::DownloadFailed {
                kind,
                episode_title: episode.title.clone(),
                error: e.to_string(),
            });
            summary.failures.push((episode.title.clone(), e.to_string()));
            false
        }
    }
}
