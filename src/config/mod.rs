//! Compiler configuration.
//!
//! A [`CompilerConfig`] is immutable once handed to the orchestrator. The
//! identifier doubles as the cache namespace (one directory per id), so two
//! call sites using the same id share one artifact lineage.

use serde::Serialize;

use crate::error::CompilerError;
use crate::fragment::Fragment;

/// Kind of compiled asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Style,
    Script,
}

impl AssetKind {
    /// File extension of the compiled artifact.
    pub fn extension(self) -> &'static str {
        match self {
            AssetKind::Style => "css",
            AssetKind::Script => "js",
        }
    }
}

/// Source format of style fragments. Irrelevant for scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    #[default]
    Css,
    Less,
}

/// Which cache root the artifact lives under.
///
/// Front-end and admin contexts get separate roots so their identifiers
/// never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheScope {
    #[default]
    Site,
    Admin,
}

/// Runtime configuration for one compile.
///
/// `id` and `kind` are required before any compile operation; their absence
/// is a configuration error, not a runtime one. The serialized form of this
/// record (excluding [`CacheScope`], which selects a root but does not alter
/// the output) is the input to the base cache hash, so field order here is
/// part of the cache-key contract.
#[derive(Debug, Clone, Serialize)]
pub struct CompilerConfig {
    /// Cache namespace and directory name.
    pub id: String,
    pub kind: AssetKind,
    pub format: SourceFormat,
    /// Ordered fragment descriptors. Order is preserved through resolution
    /// and concatenation.
    pub fragments: Vec<Fragment>,
    /// Identifiers the output declares as prerequisites.
    pub dependencies: Vec<String>,
    /// Script only: enqueue in the page footer.
    pub in_footer: bool,
    /// Script only: run the JS minifier outside dev mode.
    pub minify_js: bool,
    pub version: Option<String>,
    #[serde(skip)]
    pub scope: CacheScope,
}

impl CompilerConfig {
    /// Create a config with the required fields set and everything else at
    /// its default.
    pub fn new(id: impl Into<String>, kind: AssetKind) -> Self {
        Self {
            id: id.into(),
            kind,
            format: SourceFormat::default(),
            fragments: Vec::new(),
            dependencies: Vec::new(),
            in_footer: false,
            minify_js: false,
            version: None,
            scope: CacheScope::default(),
        }
    }

    pub fn with_format(mut self, format: SourceFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_fragment(mut self, fragment: Fragment) -> Self {
        self.fragments.push(fragment);
        self
    }

    pub fn with_fragments(mut self, fragments: impl IntoIterator<Item = Fragment>) -> Self {
        self.fragments.extend(fragments);
        self
    }

    pub fn with_dependencies(
        mut self,
        dependencies: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_in_footer(mut self, in_footer: bool) -> Self {
        self.in_footer = in_footer;
        self
    }

    pub fn with_minify_js(mut self, minify_js: bool) -> Self {
        self.minify_js = minify_js;
        self
    }

    pub fn with_scope(mut self, scope: CacheScope) -> Self {
        self.scope = scope;
        self
    }

    /// Check the required-field invariant. `kind` is guaranteed by the type
    /// system; the identifier must be a non-empty path-safe name.
    pub fn validate(&self) -> Result<(), CompilerError> {
        if self.id.is_empty() {
            return Err(CompilerError::Config(
                "missing required field `id`".to_string(),
            ));
        }
        if self.id.contains(['/', '\\']) {
            return Err(CompilerError::Config(format!(
                "id `{}` must not contain path separators",
                self.id
            )));
        }
        Ok(())
    }
}
