//! Click-through redirect resolution.
//!
//! Some search providers wrap result URLs in a tracking redirect whose `u`
//! query parameter carries the real destination as a version-tagged,
//! URL-safe base64 payload (`u=a1aHR0cHM6...`). [`resolve`] recovers the
//! destination; anything that is not that exact shape passes through
//! unchanged. Pure function, never fails.

use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use url::Url;

/// Query parameter carrying the encoded destination.
const REDIRECT_PARAM: &str = "u";

/// Version tag prefixed to the base64 payload.
const VERSION_TAG: &str = "a1";

/// Resolve a possibly-wrapped URL to its canonical destination.
///
/// On any decoding problem the input is returned unchanged: a wrapped URL
/// we cannot unwrap is still a usable URL.
pub fn resolve(raw_url: &str) -> String {
    match decode_redirect(raw_url) {
        Some(target) => {
            tracing::trace!(from = raw_url, to = %target, "redirect resolved");
            target
        }
        None => raw_url.to_string(),
    }
}

/// Attempt the full unwrap; `None` means "not the redirect shape".
fn decode_redirect(raw_url: &str) -> Option<String> {
    let parsed = Url::parse(raw_url).ok()?;

    let payload = parsed
        .query_pairs()
        .find(|(key, _)| key == REDIRECT_PARAM)
        .map(|(_, value)| value.into_owned())?;

    let encoded = payload.strip_prefix(VERSION_TAG)?;
    let bytes = decode_base64url(encoded)?;
    let target = String::from_utf8(bytes).ok()?;

    // Only accept a decoded payload that is itself a URL.
    if target.starts_with("http://") || target.starts_with("https://") {
        Some(target)
    } else {
        None
    }
}

/// URL-safe base64 decode, tolerating both padded and unpadded payloads.
fn decode_base64url(encoded: &str) -> Option<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(encoded)
        .ok()
        .or_else(|| URL_SAFE.decode(encoded).ok())
}
