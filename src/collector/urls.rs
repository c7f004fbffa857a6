use crate::constants::{
    FALLBACK_AUDIO_URL, JPG_EXTENSION, MEDIA_BASE_URL, MEDIA_DOMAIN, MP3_EXTENSION, PNG_EXTENSION,
};

fn is_absolute_url(text: &str) -> bool {
    text.starts_with("http://") || text.starts_with("https://")
}

/// Resolve an image reference from the listing API into a full URL.
///
/// Precedence: already absolute → unchanged; domain-relative (`/...`) →
/// media domain prefix; otherwise media-relative → full media base prefix.
/// Absolute inputs are taken at face value, nested domains included.
pub fn resolve_image_url(text: &str) -> String {
    if is_absolute_url(text) {
        text.to_string()
    } else if text.starts_with('/') {
        format!("{MEDIA_DOMAIN}{text}")
    } else {
        format!("{MEDIA_BASE_URL}/{text}")
    }
}

/// Resolve an audio reference from the API into a full URL
pub fn resolve_audio_url(text: &str) -> String {
    if is_absolute_url(text) {
        text.to_string()
    } else {
        format!("{MEDIA_BASE_URL}/{text}")
    }
}

/// Pick the image file extension from its URL; jpg unless the URL says png
pub fn image_extension(url: &str) -> &'static str {
    if url.to_lowercase().contains(".png") {
        PNG_EXTENSION
    } else {
        JPG_EXTENSION
    }
}

/// Synthesize the placeholder URL recorded when audio resolution fails.
/// Download logic recognizes the marker and skips it without a network call.
pub fn fallback_audio_url(id: i64) -> String {
    format!("{FALLBACK_AUDIO_URL}-{id}{MP3_EXTENSION}")
}
