mod filename;
mod scrape;
mod text;
mod urls;

pub use filename::safe_filename;
pub use scrape::{scrape_episodes, scrape_episodes_with_limit};
pub use text::{clean_description, clean_title};
pub use urls::{fallback_audio_url, image_extension, resolve_audio_url, resolve_image_url};
