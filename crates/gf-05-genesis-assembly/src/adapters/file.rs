//! # Genesis Files
//!
//! Template loading and the final write. The genesis document is written to
//! a temporary sibling and renamed into place, so a reader never sees a
//! partial file.

use std::fs;
use std::path::Path;

use shared_types::write_atomic;
use tracing::info;

use crate::domain::document::GenesisDocument;
use crate::domain::errors::AssemblyError;

/// Reads a template replacing the built-in one. Missing fields fall back
/// to the built-in values.
pub fn load_template(path: &Path) -> Result<GenesisDocument, AssemblyError> {
    let template_error = |reason: String| AssemblyError::Template {
        path: path.display().to_string(),
        reason,
    };
    let raw = fs::read(path).map_err(|e| template_error(e.to_string()))?;
    let mut template: GenesisDocument =
        serde_json::from_slice(&raw).map_err(|e| template_error(e.to_string()))?;
    // A template supplies the skeleton only; accounts come from the run.
    template.alloc.clear();
    Ok(template)
}

/// Writes `genesis` as pretty JSON.
pub fn write_genesis(path: &Path, genesis: &GenesisDocument) -> Result<(), AssemblyError> {
    let mut json =
        serde_json::to_vec_pretty(genesis).map_err(|e| AssemblyError::Encode(e.to_string()))?;
    json.push(b'\n');
    write_atomic(path, &json).map_err(|e| AssemblyError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    info!(path = %path.display(), bytes = json.len(), "genesis written");
    Ok(())
}

/// Reads a written genesis document back.
pub fn read_genesis(path: &Path) -> Result<GenesisDocument, AssemblyError> {
    let raw = fs::read(path).map_err(|e| AssemblyError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    serde_json::from_slice(&raw).map_err(|e| AssemblyError::Template {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
