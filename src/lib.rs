pub mod api;
pub mod collector;
pub mod constants;
pub mod episode;
pub mod error;
pub mod generator;
pub mod http;
pub mod progress;
pub mod scrape;
pub mod storage;

// Re-export main types for convenience
pub use collector::{clean_description, clean_title, safe_filename, scrape_episodes};
pub use episode::Episode;
pub use error::{
    ApiError, DownloadError, GeneratorError, MetadataError, ScrapeError, StorageError,
};
pub use generator::{Generator, TagSystem};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use progress::{
    MediaKind, NoopReporter, ProgressEvent, ProgressReporter, SharedProgressReporter,
};
pub use scrape::{ScrapeOptions, ScrapeSummary, run_scrape};
pub use storage::{SaveOutcome, Storage};
