//! Conditional media-query wrapping.
//!
//! A path-like fragment can carry a media condition in its query string:
//! `assets/print.css?media_query=print` wraps the fragment's content in
//! `@media print { ... }`. Callback fragments are never wrapped.

use crate::fragment::Fragment;

/// Query-string parameter carrying the media condition.
pub const MEDIA_QUERY_PARAM: &str = "media_query";

/// Wrap the fragment's (already URL-rewritten) content in a `@media` block
/// when its path carries a media-query marker.
pub fn wrap_media_query(content: &str, fragment: &Fragment) -> String {
    let Some(path) = fragment.as_path() else {
        return content.to_string();
    };
    let Some((_, query)) = path.split_once('?') else {
        return content.to_string();
    };
    let query = query.split('#').next().unwrap_or(query);

    let media = url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == MEDIA_QUERY_PARAM)
        .map(|(_, value)| value.into_owned());

    match media {
        Some(media) if !media.is_empty() => format!("@media {media} {{\n{content}\n}}\n"),
        _ => content.to_string(),
    }
}
