use crate::fingerprint::Fingerprint;
use crate::types::CallKind;
use std::path::{Path, PathBuf};

pub const FIXTURE_EXTENSION: &str = "fixture";

/// `{dir}/{kind}_{fingerprint}_{sequence}.fixture`. The directory is not checked.
pub fn resolve(kind: CallKind, fingerprint: &Fingerprint, sequence: u64, dir: &Path) -> PathBuf {
    dir.join(format!(
        "{}_{}_{}.{FIXTURE_EXTENSION}",
        kind.as_str(),
        fingerprint,
        sequence
    ))
}
