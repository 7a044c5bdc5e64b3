//! Compiler orchestration: the end-to-end compile sequence.
//!
//! `run()` gathers fragments (config, then registered providers, then
//! filters), computes the cache filename, and only compiles when no
//! artifact exists at the resulting path. The finished URL is handed to the
//! asset registration sink.

use std::path::PathBuf;

use crate::cache;
use crate::config::{AssetKind, CompilerConfig};
use crate::debug;
use crate::env::CompilerEnv;
use crate::error::CompilerError;
use crate::fragment::Fragment;
use crate::resolve;
use crate::transform;

/// Result of a compile: the cached payload's location and public URL.
#[derive(Debug, Clone)]
pub struct CompiledArtifact {
    pub filename: String,
    /// Absolute path of the cached file.
    pub path: PathBuf,
    pub url: String,
    /// False when the artifact was already cached and the transform
    /// pipeline was skipped.
    pub compiled: bool,
}

/// Drives one configuration through resolve, transform, cache and enqueue.
pub struct Compiler<'e> {
    config: CompilerConfig,
    env: &'e CompilerEnv,
    dir: PathBuf,
    url: String,
}

impl<'e> Compiler<'e> {
    /// Validate the config and bind it to its cache location. The
    /// identifier becomes a subdirectory of the scope's cache root.
    pub fn new(config: CompilerConfig, env: &'e CompilerEnv) -> Result<Self, CompilerError> {
        config.validate()?;
        let location = env.cache_location(config.scope);
        let dir = location.dir.join(&config.id);
        let url = format!("{}/{}", location.url.trim_end_matches('/'), config.id);
        Ok(Self {
            config,
            env,
            dir,
            url,
        })
    }

    /// Run the compile: resolve + transform + persist if the artifact is
    /// missing, then enqueue its URL. Concurrent first-time compiles of the
    /// same configuration may both write the same path; content is
    /// identical, so the last writer wins.
    pub fn run(&self) -> Result<CompiledArtifact, CompilerError> {
        let mut config = self.config.clone();
        config.fragments = self.gather_fragments();

        let filename = cache::compute_filename(&config, &self.dir, self.env.fs.as_ref());
        let path = self.dir.join(&filename);

        let mut compiled = false;
        if !self.env.fs.exists(&path) {
            self.env
                .fs
                .mkdir_recursive(&self.dir)
                .map_err(|source| CompilerError::Storage {
                    path: self.dir.clone(),
                    source,
                })?;

            let content = self.combine_fragments(&config)?;
            self.env
                .fs
                .write(&path, content.as_bytes())
                .map_err(|source| CompilerError::Storage {
                    path: path.clone(),
                    source,
                })?;
            compiled = true;
        }

        let url = self.artifact_url(&filename);
        self.enqueue(&url);

        Ok(CompiledArtifact {
            filename,
            path,
            url,
            compiled,
        })
    }

    /// Config fragments, plus provider fragments in registration order,
    /// rewritten by each registered filter in turn.
    fn gather_fragments(&self) -> Vec<Fragment> {
        let mut fragments = self.config.fragments.clone();

        for provider in &self.env.providers {
            fragments.extend(provider.fragments(
                &self.config.id,
                self.config.kind,
                self.config.format,
            ));
        }
        for filter in &self.env.filters {
            fragments = filter.filter(&self.config.id, fragments);
        }

        fragments
    }

    /// Resolve, transform and concatenate all fragments, then apply the
    /// whole-payload transform. Unresolvable, empty and HTML-error
    /// fragments are skipped; the ordering of the rest is preserved.
    fn combine_fragments(&self, config: &CompilerConfig) -> Result<String, CompilerError> {
        let mut content = String::new();

        for fragment in &config.fragments {
            let Some(text) = resolve::resolve(fragment, self.env) else {
                debug!("compiler"; "skipping unresolved fragment {fragment:?}");
                continue;
            };
            if text.is_empty() || resolve::is_html_error(&text) {
                debug!("compiler"; "skipping empty or HTML fragment {fragment:?}");
                continue;
            }

            let text = if config.kind == AssetKind::Style {
                let rewritten =
                    transform::replace_css_url(&text, fragment, self.env.mapper.as_ref());
                transform::wrap_media_query(&rewritten, fragment)
            } else {
                text
            };

            if !content.is_empty() {
                content.push_str("\n\n");
            }
            content.push_str(&text);
        }

        transform::format_content(&content, config, self.env)
    }

    /// Public URL of the cached artifact, upgraded to HTTPS when serving
    /// over SSL.
    fn artifact_url(&self, filename: &str) -> String {
        let url = format!("{}/{}", self.url, filename);
        if self.env.ssl {
            url.replacen("http://", "https://", 1)
        } else {
            url
        }
    }

    fn enqueue(&self, url: &str) {
        match self.config.kind {
            AssetKind::Style => self.env.sink.enqueue_style(
                &self.config.id,
                url,
                &self.config.dependencies,
                self.config.version.as_deref(),
            ),
            AssetKind::Script => self.env.sink.enqueue_script(
                &self.config.id,
                url,
                &self.config.dependencies,
                self.config.version.as_deref(),
                self.config.in_footer,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceFormat;
    use crate::env::{
        AssetSink, CacheLocation, Filesystem, HttpClient, HttpError, HttpResponse, SiteLayout,
        StaticDevMode,
    };
    use crate::fragment::{FragmentFilter, FragmentProvider};
    use std::fs;
    use std::io;
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use std::time::SystemTime;
    use tempfile::TempDir;

    /// Sink that records every enqueue call. Clones share state.
    #[derive(Clone, Default)]
    struct RecordingSink {
        styles: Arc<Mutex<Vec<(String, String, Vec<String>)>>>,
        scripts: Arc<Mutex<Vec<(String, String, bool)>>>,
    }

    impl AssetSink for RecordingSink {
        fn enqueue_style(&self, id: &str, url: &str, deps: &[String], _version: Option<&str>) {
            self.styles
                .lock()
                .unwrap()
                .push((id.to_string(), url.to_string(), deps.to_vec()));
        }

        fn enqueue_script(
            &self,
            id: &str,
            url: &str,
            _deps: &[String],
            _version: Option<&str>,
            in_footer: bool,
        ) {
            self.scripts
                .lock()
                .unwrap()
                .push((id.to_string(), url.to_string(), in_footer));
        }
    }

    /// HTTP client that always fails; local-only tests must not hit it.
    struct NoHttp;

    impl HttpClient for NoHttp {
        fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
            Err(HttpError(format!("unexpected request to {url}")))
        }
    }

    fn test_env(root: &Path, dev_mode: bool) -> CompilerEnv {
        CompilerEnv::new(
            CacheLocation::new(root.join("compiled"), "http://example.com/compiled"),
            CacheLocation::new(root.join("admin"), "http://example.com/admin-compiled"),
            Box::new(SiteLayout::new("http://example.com", root)),
        )
        .with_http(Box::new(NoHttp))
        .with_dev_mode(Box::new(StaticDevMode(dev_mode)))
    }

    fn write_fragment(root: &Path, name: &str, content: &str) -> String {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_run_compiles_persists_and_enqueues_style() {
        let dir = TempDir::new().unwrap();
        let fragment = write_fragment(dir.path(), "a.css", "a {  color: red;  }");
        let env = test_env(dir.path(), false);

        let config = CompilerConfig::new("theme", AssetKind::Style)
            .with_fragment(Fragment::path(fragment))
            .with_dependencies(["base"]);

        let artifact = Compiler::new(config, &env).unwrap().run().unwrap();

        assert!(artifact.compiled);
        assert!(artifact.path.starts_with(dir.path().join("compiled/theme")));
        assert_eq!(
            fs::read_to_string(&artifact.path).unwrap(),
            "a{color:red}"
        );
        assert!(artifact.url.starts_with("http://example.com/compiled/theme/"));
        assert!(artifact.url.ends_with(".css"));
    }

    #[test]
    fn test_second_run_is_served_from_cache() {
        let dir = TempDir::new().unwrap();
        let fragment = write_fragment(dir.path(), "a.css", "a { color: red; }");
        let env = test_env(dir.path(), false);

        let config = CompilerConfig::new("theme", AssetKind::Style)
            .with_fragment(Fragment::path(fragment));

        let first = Compiler::new(config.clone(), &env).unwrap().run().unwrap();
        let second = Compiler::new(config, &env).unwrap().run().unwrap();

        assert!(first.compiled);
        assert!(!second.compiled);
        assert_eq!(first.path, second.path);
    }

    #[test]
    fn test_source_edit_invalidates_and_prunes() {
        let dir = TempDir::new().unwrap();
        let fragment = write_fragment(dir.path(), "a.css", "a { color: red; }");
        let env = test_env(dir.path(), false);

        let config = CompilerConfig::new("theme", AssetKind::Style)
            .with_fragment(Fragment::path(fragment.clone()));

        let first = Compiler::new(config.clone(), &env).unwrap().run().unwrap();

        // Edit the source with a bumped mtime.
        let later = SystemTime::now() + std::time::Duration::from_secs(10);
        fs::write(&fragment, "a { color: blue; }").unwrap();
        let handle = fs::File::options().write(true).open(&fragment).unwrap();
        handle.set_modified(later).unwrap();

        let second = Compiler::new(config, &env).unwrap().run().unwrap();

        assert!(second.compiled);
        assert_ne!(first.filename, second.filename);
        // Same base hash, stale entry actively deleted.
        let base_of = |name: &str| name.split('-').next().unwrap().to_string();
        assert_eq!(base_of(&first.filename), base_of(&second.filename));
        assert!(!first.path.exists());
        assert!(second.path.exists());
    }

    #[test]
    fn test_html_error_fragment_contributes_nothing() {
        let dir = TempDir::new().unwrap();
        let good = write_fragment(dir.path(), "a.css", "a { color: red; }");
        let bad = write_fragment(dir.path(), "404.css", "<html>Not Found</html>");
        let env = test_env(dir.path(), true);

        let config = CompilerConfig::new("theme", AssetKind::Style)
            .with_fragments([Fragment::path(good), Fragment::path(bad)]);

        let artifact = Compiler::new(config, &env).unwrap().run().unwrap();
        assert_eq!(
            fs::read_to_string(&artifact.path).unwrap(),
            "a { color: red; }"
        );
    }

    #[test]
    fn test_fragments_joined_by_blank_line_in_order() {
        let dir = TempDir::new().unwrap();
        let first = write_fragment(dir.path(), "a.css", "a { color: red; }");
        let second = write_fragment(dir.path(), "b.css", "b { color: blue; }");
        let env = test_env(dir.path(), true);

        let config = CompilerConfig::new("theme", AssetKind::Style)
            .with_fragments([Fragment::path(first), Fragment::path(second)]);

        let artifact = Compiler::new(config, &env).unwrap().run().unwrap();
        assert_eq!(
            fs::read_to_string(&artifact.path).unwrap(),
            "a { color: red; }\n\nb { color: blue; }"
        );
    }

    #[test]
    fn test_unresolvable_fragment_skipped_not_fatal() {
        let dir = TempDir::new().unwrap();
        let good = write_fragment(dir.path(), "a.js", "var a = 1;");
        let env = test_env(dir.path(), true);

        let config = CompilerConfig::new("app", AssetKind::Script).with_fragments([
            Fragment::path(dir.path().join("missing.js").to_string_lossy()),
            Fragment::path(good),
        ]);

        let artifact = Compiler::new(config, &env).unwrap().run().unwrap();
        assert_eq!(fs::read_to_string(&artifact.path).unwrap(), "var a = 1;");
    }

    #[test]
    fn test_enqueue_records_style_and_script() {
        let dir = TempDir::new().unwrap();
        let css = write_fragment(dir.path(), "a.css", "a { color: red; }");
        let js = write_fragment(dir.path(), "app.js", "var a = 1;");

        let sink = RecordingSink::default();
        let mut env = test_env(dir.path(), true);
        env.sink = Box::new(sink.clone());

        let style = CompilerConfig::new("theme", AssetKind::Style)
            .with_fragment(Fragment::path(css))
            .with_dependencies(["base"]);
        let script = CompilerConfig::new("app", AssetKind::Script)
            .with_fragment(Fragment::path(js))
            .with_in_footer(true);

        Compiler::new(style, &env).unwrap().run().unwrap();
        Compiler::new(script, &env).unwrap().run().unwrap();

        let styles = sink.styles.lock().unwrap();
        assert_eq!(styles.len(), 1);
        assert_eq!(styles[0].0, "theme");
        assert_eq!(styles[0].2, vec!["base".to_string()]);

        let scripts = sink.scripts.lock().unwrap();
        assert_eq!(scripts.len(), 1);
        assert!(scripts[0].2);
    }

    #[test]
    fn test_providers_and_filters_extend_fragments() {
        let dir = TempDir::new().unwrap();
        let base = write_fragment(dir.path(), "a.css", "a { color: red; }");
        let extra = write_fragment(dir.path(), "b.css", "b { color: blue; }");

        struct ExtraProvider(String);
        impl FragmentProvider for ExtraProvider {
            fn fragments(
                &self,
                id: &str,
                _kind: AssetKind,
                _format: SourceFormat,
            ) -> Vec<Fragment> {
                if id == "theme" {
                    vec![Fragment::path(self.0.clone())]
                } else {
                    vec![]
                }
            }
        }

        struct ReverseFilter;
        impl FragmentFilter for ReverseFilter {
            fn filter(&self, _id: &str, mut fragments: Vec<Fragment>) -> Vec<Fragment> {
                fragments.reverse();
                fragments
            }
        }

        let mut env = test_env(dir.path(), true);
        env.register_provider(Box::new(ExtraProvider(extra)));
        env.register_filter(Box::new(ReverseFilter));

        let config = CompilerConfig::new("theme", AssetKind::Style)
            .with_fragment(Fragment::path(base));

        let artifact = Compiler::new(config, &env).unwrap().run().unwrap();
        assert_eq!(
            fs::read_to_string(&artifact.path).unwrap(),
            "b { color: blue; }\n\na { color: red; }"
        );
    }

    #[test]
    fn test_callback_fragment_contributes_content() {
        let dir = TempDir::new().unwrap();
        let env = test_env(dir.path(), true);

        let config = CompilerConfig::new("theme", AssetKind::Style)
            .with_fragment(Fragment::callback("inline-reset", || {
                "* { margin: 0; }".to_string()
            }));

        let artifact = Compiler::new(config, &env).unwrap().run().unwrap();
        assert!(!artifact.filename.contains('-'));
        assert_eq!(
            fs::read_to_string(&artifact.path).unwrap(),
            "* { margin: 0; }"
        );
    }

    #[test]
    fn test_admin_scope_uses_admin_root() {
        let dir = TempDir::new().unwrap();
        let env = test_env(dir.path(), true);

        let config = CompilerConfig::new("settings", AssetKind::Script)
            .with_scope(crate::config::CacheScope::Admin)
            .with_fragment(Fragment::callback("inline", || "var a = 1;".to_string()));

        let artifact = Compiler::new(config, &env).unwrap().run().unwrap();
        assert!(artifact.path.starts_with(dir.path().join("admin/settings")));
        assert!(
            artifact
                .url
                .starts_with("http://example.com/admin-compiled/settings/")
        );
    }

    #[test]
    fn test_ssl_upgrades_artifact_url() {
        let dir = TempDir::new().unwrap();
        let mut env = test_env(dir.path(), true);
        env.ssl = true;

        let config = CompilerConfig::new("theme", AssetKind::Style)
            .with_fragment(Fragment::callback("inline", || "a {}".to_string()));

        let artifact = Compiler::new(config, &env).unwrap().run().unwrap();
        assert!(artifact.url.starts_with("https://example.com/compiled/theme/"));
    }

    #[test]
    fn test_invalid_config_rejected_before_any_io() {
        let dir = TempDir::new().unwrap();
        let env = test_env(dir.path(), true);
        let config = CompilerConfig::new("", AssetKind::Style);
        assert!(matches!(
            Compiler::new(config, &env),
            Err(CompilerError::Config(_))
        ));
    }

    /// Filesystem wrapper that fails every write.
    struct ReadOnlyFs(crate::env::DirectFs);

    impl Filesystem for ReadOnlyFs {
        fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
            self.0.read(path)
        }
        fn write(&self, _path: &Path, _contents: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
        fn mkdir_recursive(&self, path: &Path) -> io::Result<()> {
            self.0.mkdir_recursive(path)
        }
        fn exists(&self, path: &Path) -> bool {
            self.0.exists(path)
        }
        fn is_dir(&self, path: &Path) -> bool {
            self.0.is_dir(path)
        }
        fn mod_time(&self, path: &Path) -> Option<SystemTime> {
            self.0.mod_time(path)
        }
        fn list_dir(&self, path: &Path) -> io::Result<Vec<std::path::PathBuf>> {
            self.0.list_dir(path)
        }
        fn remove(&self, path: &Path) -> io::Result<()> {
            self.0.remove(path)
        }
    }

    #[test]
    fn test_write_failure_is_fatal_storage_error() {
        let dir = TempDir::new().unwrap();
        let mut env = test_env(dir.path(), true);
        env.fs = Box::new(ReadOnlyFs(crate::env::DirectFs));

        let config = CompilerConfig::new("theme", AssetKind::Style)
            .with_fragment(Fragment::callback("inline", || "a {}".to_string()));

        let err = Compiler::new(config, &env).unwrap().run().unwrap_err();
        assert!(matches!(err, CompilerError::Storage { .. }));
    }
}
