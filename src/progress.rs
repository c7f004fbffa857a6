use std::path::PathBuf;
use std::sync::Arc;

/// Which media asset of an episode an event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Image,
}

impl MediaKind {
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Audio => "audio",
            MediaKind::Image => "image",
        }
    }
}

/// Events emitted while scraping and generating, for progress reporting
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// A listing page is being fetched from the API
    FetchingPage { page: u32 },

    /// Pagination metadata from the first listing page
    PaginationInfo {
        current_page: u32,
        total_pages: u32,
        total_items: u32,
    },

    /// A listing page has been processed
    PageProcessed {
        page: u32,
        page_episodes: usize,
        total_episodes: usize,
    },

    /// The per-item audio fallback fetch failed; a placeholder URL was
    /// recorded instead
    AudioFallbackFailed {
        episode_title: String,
        item_id: i64,
        error: String,
    },

    /// An episode is being saved/downloaded
    EpisodeProcessing {
        index: usize,
        total: usize,
        episode_title: String,
    },

    /// Episode metadata was written to disk
    MetadataSaved { path: PathBuf },

    /// Episode metadata already existed on disk and was left untouched
    MetadataExists { path: PathBuf },

    /// A metadata file could not be read or parsed during load and was
    /// skipped
    MetadataSkipped { path: PathBuf, error: String },

    /// A media download is starting
    DownloadStarting {
        kind: MediaKind,
        episode_title: String,
        /// Expected content length in bytes, if known
        content_length: Option<u64>,
    },

    /// Media download progress update
    DownloadProgress {
        kind: MediaKind,
        episode_title: String,
        bytes_downloaded: u64,
        total_bytes: Option<u64>,
    },

    /// A media download completed and was renamed into place
    DownloadCompleted {
        kind: MediaKind,
        episode_title: String,
        bytes_downloaded: u64,
    },

    /// A media download was skipped without a network call
    DownloadSkipped {
        kind: MediaKind,
        episode_title: String,
        reason: String,
    },

    /// A media download failed; remaining assets and episodes continue
    DownloadFailed {
        kind: MediaKind,
        episode_title: String,
        error: String,
    },

    /// The scrape run finished
    ScrapeCompleted {
        total: usize,
        succeeded: usize,
        skipped: usize,
        errored: usize,
    },

    /// A webapp output file was written
    OutputWritten { path: PathBuf },
}

/// Trait for reporting progress events.
///
/// Implementations can display progress bars, log messages, or collect
/// statistics.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event
    fn report(&self, event: ProgressEvent);
}

/// A shared reference to a progress reporter
pub type SharedProgressReporter = Arc<dyn ProgressReporter>;

/// A no-op progress reporter that silently ignores all events.
/// Useful for tests or quiet mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: ProgressEvent) {
        // Intentionally empty
    }
}

impl NoopReporter {
    /// Create a new NoopReporter wrapped in an Arc
    pub fn shared() -> SharedProgressReporter {
        Arc::new(Self)
    }
}
