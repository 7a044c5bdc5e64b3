//! CSS `url(...)` rewriting.
//!
//! Relative URIs inside a style fragment are resolved against the
//! fragment's own location: each `../` walks one directory up the
//! fragment's path, and the remaining segment is re-joined and converted to
//! a public URL. Absolute URIs are left untouched. Callback fragments have
//! no location, so their content is never rewritten.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::env::{PathMapper, is_absolute_uri};
use crate::fragment::Fragment;

static CSS_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)url\s*\(\s*['"]*?([^'")]+)['"]*\s*\)"#).unwrap());

/// Rewrite every `url(...)` occurrence in `content` relative to the
/// fragment's location.
pub fn replace_css_url(content: &str, fragment: &Fragment, mapper: &dyn PathMapper) -> String {
    let Some(base) = fragment.as_path() else {
        return content.to_string();
    };

    CSS_URL
        .replace_all(content, |caps: &Captures| {
            let uri = caps.get(1).map_or("", |m| m.as_str()).trim();
            if is_absolute_uri(uri) {
                return caps[0].to_string();
            }
            format!("url(\"{}\")", rebase(uri, base, mapper))
        })
        .into_owned()
}

/// Walk the fragment's path up one level per `../` occurrence (plus one for
/// the fragment's own filename) and re-join the remaining segment.
fn rebase(uri: &str, base: &str, mapper: &dyn PathMapper) -> String {
    let segments: Vec<&str> = uri.split("../").collect();

    let mut dir = base.to_string();
    for _ in &segments {
        dir = parent_of(&dir);
    }
    if dir == "." {
        dir.clear();
    }

    let tail = segments
        .last()
        .copied()
        .unwrap_or_default()
        .trim_start_matches('/');
    let joined = format!("{}/{}", dir.trim_end_matches('/'), tail);

    mapper.path_to_url(&joined)
}

/// Directory component of a path or URL string.
fn parent_of(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) => "/".to_string(),
        Some(index) => trimmed[..index].to_string(),
        None => ".".to_string(),
    }
}
