use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Webapp-facing episode record, a superset of the stored metadata derived
/// purely from disk state; regenerated from scratch on every run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebappEpisode {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub date: String,
    pub parsed_date: DateTime<Utc>,
    pub link: String,
    pub audio_url: String,
    pub image: String,
    pub filename: String,
    pub json_file: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub file_size: Option<u64>,
    pub available: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub category: Option<String>,
}

/// Statistics about the episode collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_episodes: usize,
    pub total_duration: String,
    pub total_seconds: u64,
    pub date_range: DateRange,
    pub categories: Vec<String>,
    pub audio_formats: Vec<String>,
    pub total_file_size: u64,
    pub available_count: usize,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub earliest: String,
    pub latest: String,
}

/// Webapp configuration snapshot emitted alongside the episode list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub title: String,
    pub description: String,
    pub language: String,
    pub audio_base_url: String,
    pub supports_modes: Vec<String>,
    pub version: String,
    pub build_time: DateTime<Utc>,
    pub theme: Theme,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub background_url: Option<String>,
}

/// The consolidated webapp data set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebappData {
    pub episodes: Vec<WebappEpisode>,
    pub stats: Stats,
    pub config: Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webapp_episode_serializes_camel_case() {
        let episode = WebappEpisode {
            id: "1-primer".to_string(),
            title: "1. Primer".to_string(),
            description: String::new(),
            duration: "54:21".to_string(),
            date: "30/06/2024 06:00:00".to_string(),
            parsed_date: DateTime::UNIX_EPOCH,
            link: String::new(),
            audio_url: "/audio/1-primer.mp3".to_string(),
            image: String::new(),
            filename: "1-primer.mp3".to_string(),
            json_file: "1-primer.json".to_string(),
            file_size: Some(1024),
            available: true,
            tags: vec![],
            category: None,
        };

        let json = serde_json::to_string(&episode).unwrap();
        assert!(json.contains("\"audioUrl\""));
        assert!(json.contains("\"parsedDate\""));
        assert!(json.contains("\"fileSize\""));
        assert!(!json.contains("\"tags\""));
        assert!(!json.contains("\"category\""));
    }
}
