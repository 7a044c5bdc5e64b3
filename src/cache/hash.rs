//! Cache-key hashing: blake3 fingerprints over stable serializations.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::UNIX_EPOCH;

use crate::config::CompilerConfig;
use crate::env::Filesystem;
use crate::fragment::Fragment;

/// 7-hex-char fingerprint of arbitrary bytes.
pub fn fingerprint<T: AsRef<[u8]> + ?Sized>(data: &T) -> String {
    hex::encode(blake3::hash(data.as_ref()).as_bytes())[..7].to_string()
}

/// Hash of the configuration, excluding anything derived from prior runs.
/// Identifies a logical asset independent of source staleness.
pub fn base_hash(config: &CompilerConfig) -> String {
    let serialized = serde_json::to_string(config).unwrap_or_default();
    fingerprint(&serialized)
}

/// Modification times of fragments that are existing filesystem paths,
/// keyed by fragment index. Callbacks and remote-only fragments contribute
/// nothing. The BTreeMap keeps serialization order deterministic.
pub fn fragment_mtimes(fragments: &[Fragment], fs: &dyn Filesystem) -> BTreeMap<usize, u64> {
    fragments
        .iter()
        .enumerate()
        .filter_map(|(index, fragment)| {
            let path = Path::new(fragment.as_path()?);
            if !fs.exists(path) {
                return None;
            }
            let mtime = fs.mod_time(path)?;
            let seconds = mtime.duration_since(UNIX_EPOCH).ok()?.as_secs();
            Some((index, seconds))
        })
        .collect()
}

/// Hash of the mtime mapping. Changes whenever underlying sources change,
/// even if the configuration does not.
pub fn freshness_hash(mtimes: &BTreeMap<usize, u64>) -> String {
    let serialized = serde_json::to_string(mtimes).unwrap_or_default();
    fingerprint(&serialized)
}
