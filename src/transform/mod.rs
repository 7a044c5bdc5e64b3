//! Per-fragment and whole-payload transforms.
//!
//! Style fragments get URL rewriting and media-query wrapping after
//! resolution; the concatenated payload then goes through the whole-payload
//! transform (LESS compilation, whitespace stripping, JS minification),
//! gated by the dev-mode flag.
//!
//! The LESS compiler and JS minifier are pluggable black boxes: text in,
//! text out, may fail. [`OxcMinifier`] is the bundled default for JS.

mod css_url;
mod format;
mod media;
mod minify;
mod strip;

pub use css_url::replace_css_url;
pub use format::format_content;
pub use media::{MEDIA_QUERY_PARAM, wrap_media_query};
pub use minify::OxcMinifier;
pub use strip::strip_whitespace;

use crate::error::TransformError;

/// LESS-to-CSS compiler black box.
pub trait LessCompiler: Send + Sync {
    fn compile(&self, source: &str) -> Result<String, TransformError>;
}

/// JS minifier black box.
pub trait JsMinifier: Send + Sync {
    fn minify(&self, source: &str) -> Result<String, TransformError>;
}
