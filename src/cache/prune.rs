//! Stale-artifact cleanup.
//!
//! A cached file is stale when it shares the just-computed base hash but
//! carries a different freshness hash: same configuration, sources edited.
//! Entries for different configurations (different base hash) are left
//! alone; there is no global eviction, size limit, or TTL.

use std::path::Path;

use crate::debug;
use crate::env::Filesystem;

/// Scan the cache directory's immediate entries and delete files made stale
/// by source edits. Removal failures are logged and ignored; the next
/// compile gets another chance.
pub fn remove_stale(
    cache_dir: &Path,
    extension: &str,
    base_hash: &str,
    freshness_hash: &str,
    fs: &dyn Filesystem,
) {
    let Ok(entries) = fs.list_dir(cache_dir) else {
        return;
    };

    for entry in entries {
        if fs.is_dir(&entry) {
            continue;
        }
        if entry.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        let Some(stem) = entry.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        // Unqualified `basehash.ext` entries carry no freshness hash and are
        // never pruned.
        let Some((entry_base, entry_freshness)) = stem.split_once('-') else {
            continue;
        };
        if entry_base != base_hash || entry_freshness == freshness_hash {
            continue;
        }

        debug!("cache"; "removing stale artifact {}", entry.display());
        if let Err(err) = fs.remove(&entry) {
            debug!("cache"; "failed to remove {}: {err}", entry.display());
        }
    }
}
