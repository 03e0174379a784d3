//! Path normalization applied before signing.

/// URLs containing this text anywhere are signed without their query string.
pub const REGISTRATION_MARKER: &str = "registration";

/// Returns the path that is actually signed for `url`.
///
/// Registration URLs (any URL containing [`REGISTRATION_MARKER`], not only as a
/// path segment) are cut at the first `?`. When there is nothing to cut the URL
/// is signed as given. Every other URL passes through untouched, query string
/// included. Never fails.
pub fn normalize_path(url: &str) -> &str {
    if !url.contains(REGISTRATION_MARKER) {
        return url;
    }

    url.split_once('?').map_or(url, |(path, _query)| path)
}
