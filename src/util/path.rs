use std::ffi::OsStr;
use std::path::{Path, PathBuf};

pub trait PathExt {
    fn is_snapshot_file(&self) -> bool;
    fn to_string_lossy_owned(&self) -> String;
}

impl PathExt for Path {
    fn is_snapshot_file(&self) -> bool {
        matches!(
            self.extension().and_then(OsStr::to_str),
            Some("toml" | "json")
        )
    }

    fn to_string_lossy_owned(&self) -> String {
        self.to_string_lossy().into_owned()
    }
}

/// Expands `~`, `$VAR` and `${VAR}`; unresolvable input is returned unchanged.
pub fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Resolves a snapshot argument: existing or absolute paths are taken as is,
/// bare names are looked up in `snapshot_dir`, trying `.toml` then `.json`
/// when the name carries no snapshot extension.
pub fn resolve_snapshot_path(arg: &Path, snapshot_dir: &Path, exists: impl Fn(&Path) -> bool) -> PathBuf {
    if arg.is_absolute() || exists(arg) {
        return arg.to_path_buf();
    }
    let base = snapshot_dir.join(arg);
    let mut candidates = vec![base.clone()];
    if !arg.is_snapshot_file() {
        candidates.push(base.with_extension("toml"));
        candidates.push(base.with_extension("json"));
    }
    candidates
        .into_iter()
        .find(|candidate| exists(candidate))
        .unwrap_or_else(|| arg.to_path_buf())
}
