//! Destination filename derivation from URLs.
//!
//! The destination is the percent-decoded last path segment of the URL,
//! sanitized for the local filesystem. Two distinct URLs sharing a last
//! segment map to the same file and race on it; this is a known limitation
//! of naming by path segment alone, not something this module guards against.

use tracing::debug;
use url::Url;

/// Derives the destination filename for a URL.
///
/// Returns the sanitized, percent-decoded last non-empty path segment, or
/// `"download"` when the URL path has no usable segment (e.g. `http://host/`).
#[must_use]
pub fn filename_from_url(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back());

    let Some(segment) = segment else {
        return "download".to_string();
    };

    let decoded = urlencoding::decode(segment).unwrap_or_else(|e| {
        debug!(segment = %segment, error = %e, "URL decoding failed, using raw segment");
        segment.into()
    });

    let name = sanitize_filename(&decoded);
    if name.is_empty() {
        "download".to_string()
    } else {
        name
    }
}

/// Replaces path separators and control characters so the name stays a
/// single plain file in the output directory.
pub(crate) fn sanitize_filename(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        let mapped = match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        };
        out.push(mapped);
    }
    out.trim_matches(['.', ' ']).to_string()
}
