use std::time::Duration;

// 3Cat endpoints
pub const BASE_URL: &str = "https://www.3cat.cat";
pub const API_BASE_URL: &str = "https://api.3cat.cat";
pub const MEDIA_DOMAIN: &str = "https://img.3cat.cat";
pub const MEDIA_BASE_URL: &str = "https://img.3cat.cat/multimedia";
pub const AUDIOS_ENDPOINT: &str = "/audios";
pub const EPISODE_URL_PATTERN: &str = "/3cat/en-guardia/audio";

// Fixed API query parameters for the En Guàrdia program
pub const PROGRAM_RADIO_ID: &str = "944";
pub const AUDIO_TYPE: &str = "CRTAPROG";
pub const API_VERSION: &str = "2.0";
pub const CACHE_SECONDS: &str = "180";
pub const API_STATUS_OK: &str = "OK";

// Placeholder recorded when audio resolution fails; downstream download
// logic recognizes these markers and skips instead of fetching.
pub const FALLBACK_AUDIO_URL: &str = "https://example.com/failed-audio";
pub const FAILED_AUDIO_MARKER: &str = "failed-audio";
pub const FAILED_IMAGE_MARKER: &str = "failed-image";

// File extensions
pub const MP3_EXTENSION: &str = ".mp3";
pub const JSON_EXTENSION: &str = ".json";
pub const JPG_EXTENSION: &str = ".jpg";
pub const PNG_EXTENSION: &str = ".png";
pub const PARTIAL_SUFFIX: &str = ".partial";

// Size thresholds. An existing file below the "file size" minimum is
// considered an earlier failed attempt and re-downloaded; a fresh download
// below the "download size" minimum is treated as an error page, not media.
pub const MIN_AUDIO_FILE_SIZE: u64 = 1024 * 1024;
pub const MIN_IMAGE_FILE_SIZE: u64 = 1024 * 5;
pub const MIN_DOWNLOAD_SIZE: u64 = 1024 * 100;

pub const MAX_FILENAME_LEN: usize = 120;

// HTTP behaviour
pub const API_TIMEOUT: Duration = Duration::from_secs(30);
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);
pub const PAGE_REQUEST_DELAY: Duration = Duration::from_secs(1);
pub const MAX_REDIRECTS: usize = 10;

// Boilerplate suffixes trimmed from the end of descriptions
pub const TEXT_SUFFIXES: [&str; 2] = ["… Més", "...Més"];

// Filesystem-unsafe characters replaced during filename derivation
pub const PROBLEMATIC_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

// CLI defaults
pub const DEFAULT_DATA_DIR: &str = "capitols";
pub const DEFAULT_OUTPUT_DIR: &str = "data";
pub const TAGS_FILENAME: &str = "tags.json";
