//! External collaborators the compiler depends on.
//!
//! The core talks to its surroundings through narrow traits: filesystem
//! access, an HTTP client, path/URL mapping, a dev-mode flag provider and an
//! asset registration sink. [`CompilerEnv`] bundles one implementation of
//! each, plus the fragment provider/filter registry and the two cache roots.

mod fs;
mod http;
mod mapping;

pub use fs::{DirectFs, Filesystem};
pub use http::{HttpClient, HttpError, HttpResponse, UreqClient};
pub use mapping::{PathMapper, SiteLayout, is_absolute_uri};

use std::path::PathBuf;

use crate::config::CacheScope;
use crate::fragment::{FragmentFilter, FragmentProvider};
use crate::transform::{JsMinifier, LessCompiler, OxcMinifier};

/// Dev-mode flag provider. Read fresh on every compile, never cached on the
/// config: flipping the flag between requests must take effect immediately.
pub trait DevMode: Send + Sync {
    fn is_dev_mode(&self) -> bool;
}

/// A fixed dev-mode flag.
pub struct StaticDevMode(pub bool);

impl DevMode for StaticDevMode {
    fn is_dev_mode(&self) -> bool {
        self.0
    }
}

/// Registration sink for compiled asset URLs: the page-rendering system the
/// core hands its output to.
pub trait AssetSink: Send + Sync {
    fn enqueue_style(&self, id: &str, url: &str, dependencies: &[String], version: Option<&str>);

    fn enqueue_script(
        &self,
        id: &str,
        url: &str,
        dependencies: &[String],
        version: Option<&str>,
        in_footer: bool,
    );
}

/// Sink that drops every registration.
pub struct NullSink;

impl AssetSink for NullSink {
    fn enqueue_style(&self, _id: &str, _url: &str, _deps: &[String], _version: Option<&str>) {}

    fn enqueue_script(
        &self,
        _id: &str,
        _url: &str,
        _deps: &[String],
        _version: Option<&str>,
        _in_footer: bool,
    ) {
    }
}

/// One cache root: the directory artifacts are written under, and the public
/// URL that directory is served from.
#[derive(Debug, Clone)]
pub struct CacheLocation {
    pub dir: PathBuf,
    pub url: String,
}

impl CacheLocation {
    pub fn new(dir: impl Into<PathBuf>, url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            url: url.into(),
        }
    }
}

/// Everything a [`Compiler`](crate::Compiler) needs from its surroundings.
///
/// Construct with [`CompilerEnv::new`] for production defaults (direct
/// filesystem access, blocking ureq HTTP client, oxc JS minifier, no-op
/// sink), then override individual collaborators through the public fields
/// or the `with_*` methods.
pub struct CompilerEnv {
    pub fs: Box<dyn Filesystem>,
    pub http: Box<dyn HttpClient>,
    pub mapper: Box<dyn PathMapper>,
    pub dev_mode: Box<dyn DevMode>,
    pub sink: Box<dyn AssetSink>,
    /// LESS black box. Compiling a `SourceFormat::Less` config without one
    /// registered is a transform failure.
    pub less: Option<Box<dyn LessCompiler>>,
    pub js_minifier: Box<dyn JsMinifier>,
    pub providers: Vec<Box<dyn FragmentProvider>>,
    pub filters: Vec<Box<dyn FragmentFilter>>,
    site: CacheLocation,
    admin: CacheLocation,
    /// Upgrade artifact URLs from http to https.
    pub ssl: bool,
}

impl CompilerEnv {
    pub fn new(site: CacheLocation, admin: CacheLocation, mapper: Box<dyn PathMapper>) -> Self {
        Self {
            fs: Box::new(DirectFs),
            http: Box::new(UreqClient),
            mapper,
            dev_mode: Box::new(StaticDevMode(false)),
            sink: Box::new(NullSink),
            less: None,
            js_minifier: Box::new(OxcMinifier),
            providers: Vec::new(),
            filters: Vec::new(),
            site,
            admin,
            ssl: false,
        }
    }

    /// Cache root for the given scope.
    pub fn cache_location(&self, scope: CacheScope) -> &CacheLocation {
        match scope {
            CacheScope::Site => &self.site,
            CacheScope::Admin => &self.admin,
        }
    }

    pub fn with_http(mut self, http: Box<dyn HttpClient>) -> Self {
        self.http = http;
        self
    }

    pub fn with_dev_mode(mut self, dev_mode: Box<dyn DevMode>) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    pub fn with_sink(mut self, sink: Box<dyn AssetSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_less(mut self, less: Box<dyn LessCompiler>) -> Self {
        self.less = Some(less);
        self
    }

    pub fn register_provider(&mut self, provider: Box<dyn FragmentProvider>) {
        self.providers.push(provider);
    }

    pub fn register_filter(&mut self, filter: Box<dyn FragmentFilter>) {
        self.filters.push(filter);
    }
}
