//! Path/URL mapping between the public site and the local filesystem.

use std::path::{Path, PathBuf};

/// Translates between public URLs and local filesystem paths.
pub trait PathMapper: Send + Sync {
    /// The site's base URL, without a trailing slash.
    fn site_url(&self) -> &str;

    /// Translate a public URL into a local filesystem path, if it maps
    /// inside the site root.
    fn url_to_path(&self, url: &str) -> Option<PathBuf>;

    /// Translate a local filesystem path into a public URL. Absolute URIs
    /// pass through unchanged.
    fn path_to_url(&self, path: &str) -> String;
}

/// Check whether a URI is absolute: it has a scheme, or is
/// protocol-relative (`//host/...`).
pub fn is_absolute_uri(uri: &str) -> bool {
    if uri.starts_with("//") {
        return true;
    }
    match uri.split_once(':') {
        Some((scheme, _)) => {
            scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Prefix-based [`PathMapper`]: URLs under `site_url` map to paths under
/// `root` and back.
pub struct SiteLayout {
    site_url: String,
    root: PathBuf,
}

impl SiteLayout {
    pub fn new(site_url: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        let mut site_url = site_url.into();
        while site_url.ends_with('/') {
            site_url.pop();
        }
        Self {
            site_url,
            root: root.into(),
        }
    }

    /// Protocol-relative form of the site URL (`//host`).
    fn protocol_relative(&self) -> &str {
        self.site_url
            .split_once("//")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.site_url)
    }
}

impl PathMapper for SiteLayout {
    fn site_url(&self) -> &str {
        &self.site_url
    }

    fn url_to_path(&self, url: &str) -> Option<PathBuf> {
        // Query string and fragment never participate in path mapping.
        let url = url.split(['?', '#']).next().unwrap_or(url);

        let relative = if let Some(rest) = url.strip_prefix(&self.site_url) {
            rest
        } else if let Some(rest) = url
            .strip_prefix("//")
            .and_then(|rest| rest.strip_prefix(self.protocol_relative()))
        {
            rest
        } else if url.starts_with('/') && !url.starts_with("//") {
            url
        } else {
            return None;
        };

        Some(self.root.join(relative.trim_start_matches('/')))
    }

    fn path_to_url(&self, path: &str) -> String {
        if is_absolute_uri(path) {
            return path.to_string();
        }

        let relative = Path::new(path)
            .strip_prefix(&self.root)
            .map(|rel| rel.to_string_lossy().into_owned())
            .unwrap_or_else(|_| path.trim_start_matches('/').to_string());

        format!("{}/{}", self.site_url, relative.trim_start_matches('/'))
    }
}
