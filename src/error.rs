use std::path::PathBuf;
use thiserror::Error;

/// Errors from the 3Cat listing and single-item APIs.
///
/// These are the fatal tier: any of them aborts the whole scrape rather than
/// returning partial data.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to fetch {url}: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API returned HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to parse API response from {url}: {source}")]
    ParseFailed {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("API returned status '{status}' for {url}")]
    BadStatus { url: String, status: String },

    #[error("No audio files in API response for item {id}")]
    MissingAudio { id: i64 },
}

/// Errors that can occur while downloading a single media file.
///
/// Always scoped to one asset of one episode; the caller counts and
/// continues with the remaining assets and episodes.
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP request failed for {url}: {source}")]
    HttpFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to create file {path}: {source}")]
    FileCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write to file {path}: {source}")]
    FileWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Stream error while downloading {url}: {source}")]
    StreamFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Downloaded file {path} too small ({bytes} bytes, minimum {minimum})")]
    TooSmall {
        path: PathBuf,
        bytes: u64,
        minimum: u64,
    },

    #[error("Failed to move downloaded file into place at {path}: {source}")]
    RenameFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur reading or writing per-episode metadata JSON
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Failed to read metadata file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write metadata file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse metadata JSON in {path}: {source}")]
    JsonParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize metadata: {0}")]
    JsonSerializeFailed(#[from] serde_json::Error),
}

/// Errors that can occur when scanning the data directory
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),
}

/// Top-level errors for a scrape run
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors that can occur while generating webapp output files
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write output file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
