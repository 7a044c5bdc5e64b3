//! assetforge - compile-and-cache pipeline for CSS, LESS and JS assets.
//!
//! Heterogeneous fragments (local files, remote URLs, inline callbacks) are
//! resolved, transformed and concatenated into a single payload, which is
//! persisted to a content-addressed cache location and exposed as a stable
//! URL. The cache key combines a configuration hash with a freshness hash of
//! fragment modification times, so edits to source files invalidate the
//! cached artifact while unrelated configurations stay untouched.
//!
//! # Example
//!
//! ```ignore
//! let env = CompilerEnv::new(site, admin, Box::new(mapper));
//! let config = CompilerConfig::new("theme", AssetKind::Style)
//!     .with_format(SourceFormat::Less)
//!     .with_fragment(Fragment::path("assets/less/style.less"));
//! let artifact = Compiler::new(config, &env)?.run()?;
//! println!("serving {}", artifact.url);
//! ```

pub mod cache;
pub mod compiler;
pub mod config;
pub mod env;
pub mod error;
pub mod fragment;
pub mod logger;
pub mod resolve;
pub mod transform;

pub use compiler::{CompiledArtifact, Compiler};
pub use config::{AssetKind, CacheScope, CompilerConfig, SourceFormat};
pub use env::{
    AssetSink, CacheLocation, CompilerEnv, DevMode, DirectFs, Filesystem, HttpClient, HttpError,
    HttpResponse, NullSink, PathMapper, SiteLayout, StaticDevMode, UreqClient,
};
pub use error::{CompilerError, TransformError};
pub use fragment::{Fragment, FragmentFilter, FragmentProvider};
pub use transform::{JsMinifier, LessCompiler, OxcMinifier};
