//! Cache key computation and stale-artifact cleanup.
//!
//! Artifacts are named `basehash.ext` or `basehash-freshnesshash.ext`. The
//! base hash identifies a logical configuration; the freshness hash changes
//! whenever tracked source files change. The split lets the engine tell
//! "configuration changed" (new base hash, old entry orphaned) apart from
//! "same configuration, sources edited" (same base hash, new freshness
//! hash, old entry actively deleted).

mod hash;
mod prune;

pub use hash::{base_hash, fingerprint, fragment_mtimes, freshness_hash};
pub use prune::remove_stale;

use std::path::Path;

use crate::config::CompilerConfig;
use crate::env::Filesystem;

/// Compute the artifact filename for a config, pruning stale entries from
/// the cache directory as a side effect.
///
/// Configs with no tracked filesystem fragments (only callbacks or
/// remote-only paths) get the unqualified `basehash.ext` form.
pub fn compute_filename(
    config: &CompilerConfig,
    cache_dir: &Path,
    fs: &dyn Filesystem,
) -> String {
    let base = base_hash(config);
    let ext = config.kind.extension();

    let mtimes = fragment_mtimes(&config.fragments, fs);
    if mtimes.is_empty() {
        return format!("{base}.{ext}");
    }

    let freshness = freshness_hash(&mtimes);
    remove_stale(cache_dir, ext, &base, &freshness, fs);
    format!("{base}-{freshness}.{ext}")
}
