mod chapter;
mod download;

pub use chapter::episode_number;
pub use download::DownloadOutcome;

use std::path::{Path, PathBuf};

use crate::constants::JSON_EXTENSION;
use crate::episode::Episode;
use crate::error::{MetadataError, StorageError};
use crate::progress::{ProgressEvent, SharedProgressReporter};

/// Outcome of a metadata save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new metadata file was written
    Saved,
    /// A non-empty metadata file was already present and left untouched
    AlreadyExists,
}

/// Sole writer of on-disk scraper state: one JSON record plus media files per
/// episode, all siblings in a single flat data directory.
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Write episode metadata as indented JSON.
    ///
    /// Idempotent: a non-empty file at the target path short-circuits,
    /// metadata is never overwritten once present.
    pub fn save_episode(&self, episode: &Episode) -> Result<SaveOutcome, MetadataError> {
        let path = self.data_dir.join(&episode.json_file);

        if let Ok(info) = std::fs::metadata(&path)
            && info.len() > 0
        {
            return Ok(SaveOutcome::AlreadyExists);
        }

        let json = serde_json::to_string_pretty(episode)?;
        std::fs::write(&path, json).map_err(|e| MetadataError::WriteFailed {
            path: path.clone(),
            source: e,
        })?;

        Ok(SaveOutcome::Saved)
    }

    /// Load all persisted episodes, sorted by chapter number.
    ///
    /// Unreadable or malformed metadata files are reported and skipped, never
    /// failing the whole load. Episodes without an extractable number sort
    /// after all numbered ones, in encountered order among themselves.
    pub fn load_episodes(
        &self,
        reporter: &SharedProgressReporter,
    ) -> Result<Vec<Episode>, StorageError> {
        let entries =
            std::fs::read_dir(&self.data_dir).map_err(|e| StorageError::ReadDirectoryFailed {
                path: self.data_dir.clone(),
                source: e,
            })?;

        let mut episodes = Vec::new();

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .to_string_lossy()
                        .ends_with(JSON_EXTENSION)
            })
            .collect();
        paths.sort();

        for path in paths {
            let episode = match read_episode(&path) {
                Ok(episode) => episode,
                Err(e) => {
                    reporter.report(ProgressEvent::MetadataSkipped {
                        path,
                        error: e.to_string(),
                    });
                    continue;
                }
            };
            episodes.push(episode);
        }

        episodes.sort_by_key(|episode| match episode_number(episode) {
            Some(num) => (0u8, num),
            None => (1u8, 0),
        });

        Ok(episodes)
    }
}

/// Read one metadata file, restoring the derived `json_file` name from the
/// on-disk path
fn read_episode(path: &Path) -> Result<Episode, MetadataError> {
    let content = std::fs::read_to_string(path).map_err(|e| MetadataError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut episode: Episode =
        serde_json::from_str(&content).map_err(|e| MetadataError::JsonParseFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    episode.json_file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(episode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoopReporter;
    use tempfile::tempdir;

    fn make_episode(title: &str) -> Episode {
        let stem = crate::collector::safe_filename(title);
        Episode {
            title: title.to_string(),
            filename: format!("{stem}.mp3"),
            json_file: format!("{stem}.json"),
            ..Default::default()
        }
    }

    #[test]
    fn save_writes_indented_json() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path());
        let episode = make_episode("1. Primer");

        assert_eq!(storage.save_episode(&episode).unwrap(), SaveOutcome::Saved);

        let content = std::fs::read_to_string(dir.path().join(&episode.json_file)).unwrap();
        assert!(content.contains("\n  \"title\""));
    }

    #[test]
    fn save_is_idempotent_and_preserves_bytes() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path());
        let episode = make_episode("1. Primer");

        storage.save_episode(&episode).unwrap();
        let path = dir.path().join(&episode.json_file);
        let before = std::fs::read(&path).unwrap();

        // Even a changed record must not overwrite existing metadata
        let mut changed = episode.clone();
        changed.description = "altres dades".to_string();
        assert_eq!(
            storage.save_episode(&changed).unwrap(),
            SaveOutcome::AlreadyExists
        );

        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn save_replaces_empty_existing_file() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path());
        let episode = make_episode("1. Primer");

        std::fs::write(dir.path().join(&episode.json_file), b"").unwrap();
        assert_eq!(storage.save_episode(&episode).unwrap(), SaveOutcome::Saved);
    }

    #[test]
    fn load_round_trips_episodes() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path());
        let episode = make_episode("1. Primer");
        storage.save_episode(&episode).unwrap();

        let loaded = storage.load_episodes(&NoopReporter::shared()).unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title, "1. Primer");
        assert_eq!(loaded[0].json_file, episode.json_file);
    }

    #[test]
    fn load_sorts_by_chapter_number() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path());

        for title in ["3. Tercer", "1. Primer", "2. Segon"] {
            storage.save_episode(&make_episode(title)).unwrap();
        }

        let loaded = storage.load_episodes(&NoopReporter::shared()).unwrap();
        let titles: Vec<&str> = loaded.iter().map(|e| e.title.as_str()).collect();

        assert_eq!(titles, ["1. Primer", "2. Segon", "3. Tercer"]);
    }

    #[test]
    fn unnumbered_episodes_sort_last() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path());

        for title in ["2. Segon", "Especial estiu", "1. Primer"] {
            storage.save_episode(&make_episode(title)).unwrap();
        }

        let loaded = storage.load_episodes(&NoopReporter::shared()).unwrap();
        let titles: Vec<&str> = loaded.iter().map(|e| e.title.as_str()).collect();

        assert_eq!(titles, ["1. Primer", "2. Segon", "Especial estiu"]);
    }

    #[test]
    fn load_skips_malformed_files() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path());
        storage.save_episode(&make_episode("1. Primer")).unwrap();
        std::fs::write(dir.path().join("trencat.json"), b"{not json").unwrap();

        let loaded = storage.load_episodes(&NoopReporter::shared()).unwrap();
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn load_ignores_non_metadata_files() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path());
        storage.save_episode(&make_episode("1. Primer")).unwrap();
        std::fs::write(dir.path().join("1-primer.mp3"), b"audio").unwrap();

        let loaded = storage.load_episodes(&NoopReporter::shared()).unwrap();
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn load_fails_on_missing_directory() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("no-existeix"));

        assert!(storage.load_episodes(&NoopReporter::shared()).is_err());
    }
}
