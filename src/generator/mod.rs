// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Derives the static webapp data set from the stored episode metadata.
//! Everything here is recomputed from disk state on each run; the generator
//! never talks to the network.

mod tags;
mod types;

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::constants::FAILED_AUDIO_MARKER;
use crate::episode::Episode;
use crate::error::GeneratorError;
use crate::progress::{ProgressEvent, SharedProgressReporter};
use crate::storage::Storage;

pub use tags::{TagEntry, TagIndex, TagSystem, categorize, extract_tags};
pub use types::{Config, DateRange, Stats, Theme, WebappData, WebappEpisode};

/// Path prefix under which the webapp serves locally downloaded audio
pub const AUDIO_BASE_URL: &str = "/audio";

const EPISODES_LIST_FILENAME: &str = "episodes-list.json";
const STATS_FILENAME: &str = "stats.json";
const CONFIG_FILENAME: &str = "config.json";

const WEBAPP_TITLE: &str = "En Guàrdia - Història de Catalunya";
const WEBAPP_DESCRIPTION: &str = "Arxiu del programa d'història de Catalunya Ràdio";
const WEBAPP_LANGUAGE: &str = "ca";
const WEBAPP_VERSION: &str = "2.0.0";

pub struct Generator {
    data_dir: PathBuf,
}

impl Generator {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Loads all stored episodes and writes `episodes-list.json`,
    /// `stats.json` and `config.json` into the output directory. In lazy
    /// mode audio URLs point at the remote source instead of local files.
    pub fn generate_webapp_data(
        &self,
        output_dir: &Path,
        lazy: bool,
        reporter: &SharedProgressReporter,
    ) -> Result<(), GeneratorError> {
        let storage = Storage::new(&self.data_dir);
        let episodes = storage.load_episodes(reporter)?;

        let webapp_episodes: Vec<WebappEpisode> = episodes
            .iter()
            .map(|episode| self.build_webapp_episode(episode, lazy))
            .collect();
        let stats = compute_stats(&webapp_episodes);
        let config = build_config(lazy);

        std::fs::create_dir_all(output_dir).map_err(|source| GeneratorError::WriteFailed {
            path: output_dir.to_path_buf(),
            source,
        })?;
        write_json(&output_dir.join(EPISODES_LIST_FILENAME), &webapp_episodes, reporter)?;
        write_json(&output_dir.join(STATS_FILENAME), &stats, reporter)?;
        write_json(&output_dir.join(CONFIG_FILENAME), &config, reporter)?;
        Ok(())
    }

    fn build_webapp_episode(&self, episode: &Episode, lazy: bool) -> WebappEpisode {
        let local_path = self.data_dir.join(&episode.filename);
        let file_size = std::fs::metadata(&local_path).ok().map(|m| m.len());
        let has_remote = !episode.audio_url.is_empty()
            && !episode.audio_url.contains(FAILED_AUDIO_MARKER);

        let (audio_url, available) = if lazy {
            (episode.audio_url.clone(), has_remote)
        } else if file_size.is_some() {
            (
                format!("{AUDIO_BASE_URL}/{}", episode.filename),
                true,
            )
        } else {
            (episode.audio_url.clone(), false)
        };

        let tags = extract_tags(&episode.title, &episode.description);
        let category = categorize(&tags);

        WebappEpisode {
            id: episode_id(episode),
            title: episode.title.clone(),
            description: episode.description.clone(),
            duration: episode.duration.clone(),
            date: episode.date.clone(),
            parsed_date: parse_publish_date(&episode.date),
            link: episode.link.clone(),
            audio_url,
            image: episode.image.clone(),
            filename: episode.filename.clone(),
            json_file: episode.json_file.clone(),
            file_size,
            available,
            tags,
            category: Some(category),
        }
    }
}

/// An episode's webapp id is the stem of its metadata file, matching the
/// audio filename stem for episodes stored by this tool.
pub(crate) fn episode_id(episode: &Episode) -> String {
    let stem = Path::new(&episode.json_file)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned());
    match stem {
        Some(stem) if !stem.is_empty() => stem,
        _ => Path::new(&episode.filename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}

/// Parses the publish date formats the API has been observed to use,
/// falling back to the epoch so unparseable dates sort first instead of
/// breaking generation.
fn parse_publish_date(raw: &str) -> DateTime<Utc> {
    let trimmed = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%d/%m/%Y %H:%M:%S") {
        return dt.and_utc();
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%d/%m/%Y")
        && let Some(dt) = date.and_hms_opt(0, 0, 0)
    {
        return dt.and_utc();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.with_timezone(&Utc);
    }
    DateTime::UNIX_EPOCH
}

/// Parses a duration string in "HH:MM:SS", "MM:SS", "N min" or plain
/// seconds form. Returns None for anything else.
fn parse_duration_seconds(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(minutes) = trimmed.strip_suffix("min") {
        return minutes.trim().parse::<u64>().ok().map(|m| m * 60);
    }
    let parts: Vec<&str> = trimmed.split(':').collect();
    match parts.as_slice() {
        [seconds] => seconds.parse().ok(),
        [minutes, seconds] => {
            let m: u64 = minutes.parse().ok()?;
            let s: u64 = seconds.parse().ok()?;
            Some(m * 60 + s)
        }
        [hours, minutes, seconds] => {
            let h: u64 = hours.parse().ok()?;
            let m: u64 = minutes.parse().ok()?;
            let s: u64 = seconds.parse().ok()?;
            Some(h * 3600 + m * 60 + s)
        }
        _ => None,
    }
}

fn format_total_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    format!("{hours}h {minutes:02}m")
}

fn compute_stats(episodes: &[WebappEpisode]) -> Stats {
    let total_seconds: u64 = episodes
        .iter()
        .filter_map(|e| parse_duration_seconds(&e.duration))
        .sum();

    let mut range: Option<(DateTime<Utc>, String, DateTime<Utc>, String)> = None;
    for episode in episodes {
        if episode.parsed_date == DateTime::UNIX_EPOCH {
            continue;
        }
        range = Some(match range {
            None => (
                episode.parsed_date,
                episode.date.clone(),
                episode.parsed_date,
                episode.date.clone(),
            ),
            Some((min, min_raw, max, max_raw)) => {
                let (min, min_raw) = if episode.parsed_date < min {
                    (episode.parsed_date, episode.date.clone())
                } else {
                    (min, min_raw)
                };
                let (max, max_raw) = if episode.parsed_date > max {
                    (episode.parsed_date, episode.date.clone())
                } else {
                    (max, max_raw)
                };
                (min, min_raw, max, max_raw)
            }
        });
    }
    let date_range = match range {
        Some((_, earliest, _, latest)) => DateRange { earliest, latest },
        None => DateRange::default(),
    };

    let mut categories: Vec<String> = episodes
        .iter()
        .filter_map(|e| e.category.clone())
        .collect();
    categories.sort();
    categories.dedup();

    Stats {
        total_episodes: episodes.len(),
        total_duration: format_total_duration(total_seconds),
        total_seconds,
        date_range,
        categories,
        audio_formats: vec!["mp3".to_string()],
        total_file_size: episodes.iter().filter_map(|e| e.file_size).sum(),
        available_count: episodes.iter().filter(|e| e.available).count(),
        last_updated: Utc::now(),
    }
}

fn build_config(lazy: bool) -> Config {
    let supports_modes = if lazy {
        vec!["streaming".to_string()]
    } else {
        vec![
            "streaming".to_string(),
            "download".to_string(),
            "offline".to_string(),
        ]
    };
    Config {
        title: WEBAPP_TITLE.to_string(),
        description: WEBAPP_DESCRIPTION.to_string(),
        language: WEBAPP_LANGUAGE.to_string(),
        audio_base_url: AUDIO_BASE_URL.to_string(),
        supports_modes,
        version: WEBAPP_VERSION.to_string(),
        build_time: Utc::now(),
        theme: Theme {
            primary_color: "#d32f2f".to_string(),
            secondary_color: "#1976d2".to_string(),
            accent_color: "#ff9800".to_string(),
            background_url: None,
        },
    }
}

fn write_json<T: Serialize>(
    path: &Path,
    value: &T,
    reporter: &SharedProgressReporter,
) -> Result<(), GeneratorError> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).map_err(|source| GeneratorError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })?;
    reporter.report(ProgressEvent::OutputWritten {
        path: path.to_path_buf(),
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoopReporter;
    use tempfile::TempDir;

    fn stored_episode(title: &str, filename: &str, audio_url: &str) -> Episode {
        Episode {
            title: title.to_string(),
            duration: "54:21".to_string(),
            date: "30/06/2024 06:00:00".to_string(),
            filename: filename.to_string(),
            audio_url: audio_url.to_string(),
            ..Episode::default()
        }
    }

    fn write_metadata(dir: &Path, stem: &str, episode: &Episode) {
        std::fs::write(
            dir.join(format!("{stem}.json")),
            serde_json::to_string_pretty(episode).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn parses_api_date_formats() {
        assert_eq!(
            parse_publish_date("30/06/2024 06:00:00")
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            "2024-06-30 06:00"
        );
        assert_eq!(
            parse_publish_date("02/01/2005").format("%Y-%m-%d").to_string(),
            "2005-01-02"
        );
        assert_eq!(
            parse_publish_date("2024-06-30T06:00:00Z")
                .format("%Y-%m-%d")
                .to_string(),
            "2024-06-30"
        );
        assert_eq!(parse_publish_date("ahir"), DateTime::UNIX_EPOCH);
    }

    #[test]
    fn parses_duration_formats() {
        assert_eq!(parse_duration_seconds("01:02:03"), Some(3723));
        assert_eq!(parse_duration_seconds("54:21"), Some(3261));
        assert_eq!(parse_duration_seconds("55 min"), Some(3300));
        assert_eq!(parse_duration_seconds("90"), Some(90));
        assert_eq!(parse_duration_seconds(""), None);
        assert_eq!(parse_duration_seconds("una hora"), None);
    }

    #[test]
    fn formats_total_duration_as_hours_and_minutes() {
        assert_eq!(format_total_duration(3723), "1h 02m");
        assert_eq!(format_total_duration(0), "0h 00m");
    }

    #[test]
    fn local_audio_takes_precedence_when_downloaded() {
        let data_dir = TempDir::new().unwrap();
        let episode = stored_episode(
            "1. El primer",
            "1-el-primer.mp3",
            "https://img.3cat.cat/multimedia/mp3/1.mp3",
        );
        std::fs::write(data_dir.path().join("1-el-primer.mp3"), vec![0u8; 64]).unwrap();

        let generator = Generator::new(data_dir.path());
        let webapp = generator.build_webapp_episode(&episode, false);
        assert_eq!(webapp.audio_url, "/audio/1-el-primer.mp3");
        assert!(webapp.available);
        assert_eq!(webapp.file_size, Some(64));
    }

    #[test]
    fn lazy_mode_keeps_remote_url() {
        let data_dir = TempDir::new().unwrap();
        let episode = stored_episode(
            "1. El primer",
            "1-el-primer.mp3",
            "https://img.3cat.cat/multimedia/mp3/1.mp3",
        );
        std::fs::write(data_dir.path().join("1-el-primer.mp3"), vec![0u8; 64]).unwrap();

        let generator = Generator::new(data_dir.path());
        let webapp = generator.build_webapp_episode(&episode, true);
        assert_eq!(webapp.audio_url, "https://img.3cat.cat/multimedia/mp3/1.mp3");
        assert!(webapp.available);
    }

    #[test]
    fn placeholder_audio_is_unavailable() {
        let data_dir = TempDir::new().unwrap();
        let episode = stored_episode(
            "77. Perdut",
            "77-perdut.mp3",
            "https://example.com/failed-audio-77.mp3",
        );

        let generator = Generator::new(data_dir.path());
        let webapp = generator.build_webapp_episode(&episode, true);
        assert!(!webapp.available);
        let webapp = generator.build_webapp_episode(&episode, false);
        assert!(!webapp.available);
        assert_eq!(webapp.file_size, None);
    }

    #[test]
    fn writes_all_output_files() {
        let data_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        write_metadata(
            data_dir.path(),
            "1-el-primer",
            &stored_episode("1. El primer", "1-el-primer.mp3", "https://x/1.mp3"),
        );
        write_metadata(
            data_dir.path(),
            "2-el-segon",
            &stored_episode("2. El segon", "2-el-segon.mp3", "https://x/2.mp3"),
        );

        let generator = Generator::new(data_dir.path());
        generator
            .generate_webapp_data(output_dir.path(), true, &NoopReporter::shared())
            .unwrap();

        let episodes: Vec<WebappEpisode> = serde_json::from_str(
            &std::fs::read_to_string(output_dir.path().join("episodes-list.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].id, "1-el-primer");

        let stats: Stats = serde_json::from_str(
            &std::fs::read_to_string(output_dir.path().join("stats.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(stats.total_episodes, 2);
        assert_eq!(stats.total_seconds, 3261 * 2);
        assert_eq!(stats.date_range.earliest, "30/06/2024 06:00:00");

        let config: Config = serde_json::from_str(
            &std::fs::read_to_string(output_dir.path().join("config.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(config.language, "ca");
        assert_eq!(config.supports_modes, vec!["streaming".to_string()]);
    }

    #[test]
    fn stats_date_range_spans_episodes() {
        let older = WebappEpisode {
            date: "01/01/2005 06:00:00".to_string(),
            parsed_date: parse_publish_date("01/01/2005 06:00:00"),
            ..sample_webapp()
        };
        let newer = WebappEpisode {
            date: "30/06/2024 06:00:00".to_string(),
            parsed_date: parse_publish_date("30/06/2024 06:00:00"),
            ..sample_webapp()
        };
        let stats = compute_stats(&[newer, older]);
        assert_eq!(stats.date_range.earliest, "01/01/2005 06:00:00");
        assert_eq!(stats.date_range.latest, "30/06/2024 06:00:00");
    }

    fn sample_webapp() -> WebappEpisode {
        WebappEpisode {
            id: String::new(),
            title: String::new(),
            description: String::new(),
            duration: String::new(),
            date: String::new(),
            parsed_date: DateTime::UNIX_EPOCH,
            link: String::new(),
            audio_url: String::new(),
            image: String::new(),
            filename: String::new(),
            json_file: String::new(),
            file_size: None,
            available: false,
            tags: vec![],
            category: None,
        }
    }
}
