use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::TAGS_FILENAME;
use crate::episode::Episode;
use crate::error::GeneratorError;
use crate::progress::{ProgressEvent, SharedProgressReporter};
use crate::storage::Storage;

use super::episode_id;

/// Keyword table mapping lowercase Catalan substrings to tag names. A tag is
/// assigned when either the title or the description contains the keyword.
const TAG_KEYWORDS: &[(&str, &str)] = &[
    ("guerra", "guerres"),
    ("batalla", "guerres"),
    ("setge", "guerres"),
    ("exèrcit", "guerres"),
    ("soldats", "guerres"),
    ("rei ", "monarquia"),
    ("reina", "monarquia"),
    ("corona", "monarquia"),
    ("dinastia", "monarquia"),
    ("comte", "monarquia"),
    ("revolució", "revolucions"),
    ("revolta", "revolucions"),
    ("república", "revolucions"),
    ("església", "religió"),
    ("monestir", "religió"),
    ("bisbe", "religió"),
    ("inquisició", "religió"),
    ("croada", "religió"),
    ("medieval", "edat-mitjana"),
    ("edat mitjana", "edat-mitjana"),
    ("feudal", "edat-mitjana"),
    ("romans", "món-antic"),
    ("roma ", "món-antic"),
    ("grecs", "món-antic"),
    ("ibers", "món-antic"),
    ("imperi romà", "món-antic"),
    ("guerra civil", "segle-xx"),
    ("franquisme", "segle-xx"),
    ("exili", "segle-xx"),
    ("dictadura", "segle-xx"),
    ("segona guerra mundial", "segle-xx"),
    ("catalunya", "catalunya"),
    ("barcelona", "catalunya"),
    ("catalans", "catalunya"),
    ("napoleó", "època-moderna"),
    ("borbó", "època-moderna"),
    ("1714", "època-moderna"),
    ("pirates", "mediterrani"),
    ("mediterrani", "mediterrani"),
    ("navegació", "mediterrani"),
];

const DEFAULT_CATEGORY: &str = "història";

/// Derives tags for an episode from its cleaned title and description.
/// Matching is case-insensitive and each tag appears at most once, in
/// keyword-table order.
pub fn extract_tags(title: &str, description: &str) -> Vec<String> {
    let haystack = format!("{title} {description}").to_lowercase();
    let mut tags: Vec<String> = Vec::new();
    for (keyword, tag) in TAG_KEYWORDS {
        if haystack.contains(keyword) && !tags.iter().any(|t| t == tag) {
            tags.push((*tag).to_string());
        }
    }
    tags
}

/// The episode's category is its first assigned tag, falling back to a
/// catch-all when no keyword matched.
pub fn categorize(tags: &[String]) -> String {
    tags.first()
        .cloned()
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagIndex {
    pub generated_at: DateTime<Utc>,
    pub total_tags: usize,
    pub tags: Vec<TagEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagEntry {
    pub name: String,
    pub count: usize,
    pub episodes: Vec<String>,
}

/// Builds the tag index over all stored episode metadata
pub struct TagSystem {
    data_dir: PathBuf,
}

impl TagSystem {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Writes `tags.json` into the output directory, indexing every stored
    /// episode by its derived tags.
    pub fn generate_tags_file(
        &self,
        output_dir: &Path,
        reporter: &SharedProgressReporter,
    ) -> Result<(), GeneratorError> {
        let storage = Storage::new(&self.data_dir);
        let episodes = storage.load_episodes(reporter)?;
        let index = build_index(&episodes);

        std::fs::create_dir_all(output_dir).map_err(|source| GeneratorError::WriteFailed {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let path = output_dir.join(TAGS_FILENAME);
        let json = serde_json::to_string_pretty(&index)?;
        std::fs::write(&path, json).map_err(|source| GeneratorError::WriteFailed {
            path: path.clone(),
            source,
        })?;

        reporter.report(ProgressEvent::OutputWritten { path });
        Ok(())
    }
}

fn build_index(episodes: &[Episode]) -> TagIndex {
    let mut by_tag: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for episode in episodes {
        let id = episode_id(episode);
        for tag in extract_tags(&episode.title, &episode.description) {
            by_tag.entry(tag).or_default().push(id.clone());
        }
    }

    let mut tags: Vec<TagEntry> = by_tag
        .into_iter()
        .map(|(name, episodes)| TagEntry {
            count: episodes.len(),
            name,
            episodes,
        })
        .collect();
    tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

    TagIndex {
        generated_at: Utc::now(),
        total_tags: tags.len(),
        tags,
    }
}
