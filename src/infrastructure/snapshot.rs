//! Snapshot files: serialized accessibility trees on disk.
//!
//! A snapshot is one root [`NodeSpec`] in TOML or JSON; the format follows
//! the file extension.

use std::path::Path;

use tracing::{debug, instrument};

use crate::domain::{AxTree, NodeSpec, TreeBuilder};
use crate::infrastructure::traits::FileSystem;
use crate::infrastructure::{InfraError, InfraResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Toml,
    Json,
}

impl SnapshotFormat {
    pub fn from_path(path: &Path) -> InfraResult<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(InfraError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Parses snapshot text; `path` only labels errors.
pub fn parse_snapshot(content: &str, format: SnapshotFormat, path: &Path) -> InfraResult<NodeSpec> {
    match format {
        SnapshotFormat::Toml => toml::from_str(content).map_err(|e| InfraError::parse(path, e)),
        SnapshotFormat::Json => {
            serde_json::from_str(content).map_err(|e| InfraError::parse(path, e))
        }
    }
}

#[instrument(level = "debug", skip(fs))]
pub fn load_snapshot(fs: &dyn FileSystem, path: &Path) -> InfraResult<NodeSpec> {
    let format = SnapshotFormat::from_path(path)?;
    let content = fs
        .read_to_string(path)
        .map_err(|e| InfraError::io(format!("read snapshot {}", path.display()), e))?;
    let spec = parse_snapshot(&content, format, path)?;
    debug!("loaded {:?} snapshot with root {}", format, spec.role);
    Ok(spec)
}

/// Loads and builds a live tree in one step.
pub fn load_tree(fs: &dyn FileSystem, path: &Path) -> InfraResult<AxTree> {
    let spec = load_snapshot(fs, path)?;
    Ok(TreeBuilder::new().build(&spec)?)
}
