use serde::{Deserialize, Serialize};

/// A scraped episode record, one JSON file per episode on disk.
///
/// All filenames derive deterministically from the cleaned title, so
/// re-running the scraper maps the same title to the same files and the
/// existence checks in storage make the whole pipeline idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Episode {
    pub title: String,
    pub description: String,
    pub duration: String,
    pub date: String,
    pub link: String,
    pub audio_url: String,
    pub image: String,
    /// Audio filename, `<stem>.mp3`
    pub filename: String,
    /// Image filename, `<stem>.jpg` or `<stem>.png`; absent when the listing
    /// carried no image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_filename: Option<String>,
    /// Metadata filename, `<stem>.json`; derived, never persisted inside the
    /// record itself
    #[serde(skip)]
    pub json_file: String,
}

impl Default for Episode {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            duration: String::new(),
            date: String::new(),
            link: String::new(),
            audio_url: String::new(),
            image: String::new(),
            filename: String::new(),
            image_filename: None,
            json_file: String::new(),
        }
    }
}
