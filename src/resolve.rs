//! Content resolution: fragment descriptor to raw text.
//!
//! Resolution order for path-like fragments: literal local path, then the
//! URL-to-path mapping, then a remote fetch with a single HTTP-to-HTTPS
//! retry. Callback fragments produce their content directly. A fragment
//! that cannot be resolved is reported as not-found; the caller skips it
//! and continues.

use std::path::PathBuf;

use crate::debug;
use crate::env::CompilerEnv;
use crate::fragment::Fragment;

/// Resolve a fragment into raw text. `None` means not-found; the compile
/// continues without this fragment.
pub fn resolve(fragment: &Fragment, env: &CompilerEnv) -> Option<String> {
    match fragment {
        Fragment::Callback { producer, .. } => Some(producer()),
        Fragment::Path(path) => local_content(path, env).or_else(|| remote_content(path, env)),
    }
}

/// Content that looks like an HTML error page (`^\s*<`). Guards against a
/// mis-resolved URL returning a 404 page as if it were valid CSS/JS.
pub fn is_html_error(content: &str) -> bool {
    content.trim_start().starts_with('<')
}

/// Local resolution: the literal path, then the URL-to-path mapping.
/// Zero-length files report not-found so the remote fallback gets a turn.
fn local_content(path: &str, env: &CompilerEnv) -> Option<String> {
    let mut resolved = PathBuf::from(path);

    if !env.fs.exists(&resolved) {
        resolved = env.mapper.url_to_path(path)?;
        if !env.fs.exists(&resolved) {
            return None;
        }
    }

    let bytes = env.fs.read(&resolved).ok()?;
    if bytes.is_empty() {
        debug!("resolve"; "empty fragment file {}", resolved.display());
        return None;
    }

    Some(String::from_utf8_lossy(&bytes).into_owned())
}

/// Remote resolution. Protocol-relative URLs are normalized to `http://`,
/// domain-relative paths are joined onto the site URL. A non-200 response
/// over plain HTTP is retried once over HTTPS.
fn remote_content(path: &str, env: &CompilerEnv) -> Option<String> {
    if path.is_empty() {
        return None;
    }

    let url = if let Some(rest) = path.strip_prefix("//") {
        format!("http://{rest}")
    } else if path.starts_with('/') {
        format!("{}{}", env.mapper.site_url(), path)
    } else {
        path.to_string()
    };

    let response = match env.http.get(&url) {
        Ok(response) => response,
        Err(err) => {
            debug!("resolve"; "remote fetch of {url} failed: {err}");
            return None;
        }
    };

    if response.status == 200 {
        return Some(response.body);
    }

    if url.starts_with("https://") {
        return None;
    }

    let https_url = url.replacen("http://", "https://", 1);
    match env.http.get(&https_url) {
        Ok(retry) if retry.status == 200 => Some(retry.body),
        Ok(retry) => {
            debug!("resolve"; "remote fetch of {https_url} returned {}", retry.status);
            None
        }
        Err(err) => {
            debug!("resolve"; "https retry of {https_url} failed: {err}");
            None
        }
    }
}
