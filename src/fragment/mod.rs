//! Fragment descriptors and the provider/filter registry.
//!
//! A fragment is one input unit contributing text to a compiled asset:
//! a local file path, a remote URL, or a named zero-argument callback.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::config::{AssetKind, SourceFormat};

/// Zero-argument content producer.
pub type ContentFn = Arc<dyn Fn() -> String + Send + Sync>;

/// One input unit of a compiled asset.
#[derive(Clone)]
pub enum Fragment {
    /// Local filesystem path, or a URL that falls back to a remote fetch
    /// when it cannot be resolved locally.
    Path(String),
    /// Inline content producer. The name stands in for the callback in the
    /// cache-key serialization, so it must be stable across runs.
    Callback { name: String, producer: ContentFn },
}

impl Fragment {
    pub fn path(path: impl Into<String>) -> Self {
        Fragment::Path(path.into())
    }

    pub fn callback(
        name: impl Into<String>,
        producer: impl Fn() -> String + Send + Sync + 'static,
    ) -> Self {
        Fragment::Callback {
            name: name.into(),
            producer: Arc::new(producer),
        }
    }

    pub fn is_callback(&self) -> bool {
        matches!(self, Fragment::Callback { .. })
    }

    /// The path or URL of a path-like fragment.
    pub fn as_path(&self) -> Option<&str> {
        match self {
            Fragment::Path(path) => Some(path.as_str()),
            Fragment::Callback { .. } => None,
        }
    }
}

impl fmt::Debug for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Fragment::Callback { name, .. } => f.debug_tuple("Callback").field(name).finish(),
        }
    }
}

// Cache-key serialization: a path fragment is its path, a callback is its
// stable name. The producer itself never participates in hashing.
impl Serialize for Fragment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Fragment::Path(path) => serializer.serialize_str(path),
            Fragment::Callback { name, .. } => serializer.serialize_str(name),
        }
    }
}

/// Supplies additional fragments for a compiler id, keyed by (id, format).
///
/// Providers registered on the environment are consulted in registration
/// order before every compile; their fragments are appended after the
/// config's own.
pub trait FragmentProvider: Send + Sync {
    fn fragments(&self, id: &str, kind: AssetKind, format: SourceFormat) -> Vec<Fragment>;
}

/// Rewrites the gathered fragment list for a compiler id.
///
/// Filters run in registration order after all providers, each receiving
/// the previous filter's output.
pub trait FragmentFilter: Send + Sync {
    fn filter(&self, id: &str, fragments: Vec<Fragment>) -> Vec<Fragment>;
}
