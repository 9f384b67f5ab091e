//! # Parameter File I/O
//!
//! Load, save, and the one in-place enrichment of a parameter file: the
//! consensus header returned by the external genesis service.

use std::fs;
use std::path::Path;

use serde_json::Value;
use shared_types::fs::write_atomic;
use tracing::{debug, info};

use crate::domain::errors::ParamError;
use crate::domain::param::GenesisParam;

/// Field of the `Consensus` section that receives the service response.
pub const CONSENSUS_HEADER_FIELD: &str = "Goat";

fn io_error(path: &Path, err: impl std::fmt::Display) -> ParamError {
    ParamError::Io {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

fn shape_error(path: &Path, err: impl std::fmt::Display) -> ParamError {
    ParamError::InvalidShape {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

impl GenesisParam {
    /// Reads and deserializes a parameter file.
    pub fn load(path: &Path) -> Result<Self, ParamError> {
        let raw = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
        let param = serde_json::from_str(&raw).map_err(|e| shape_error(path, e))?;
        debug!(path = %path.display(), "parameter file loaded");
        Ok(param)
    }

    /// Writes the parameter set as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), ParamError> {
        let mut json = serde_json::to_vec_pretty(self).map_err(|e| shape_error(path, e))?;
        json.push(b'\n');
        write_atomic(path, &json).map_err(|e| io_error(path, e))
    }
}

/// Stores `header` under `Consensus.Goat` of the file at `path`.
///
/// Works on the raw JSON so keys the typed shape does not model survive.
pub fn store_consensus_header(path: &Path, header: &Value) -> Result<(), ParamError> {
    let raw = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    let mut doc: Value = serde_json::from_str(&raw).map_err(|e| shape_error(path, e))?;

    let root = doc
        .as_object_mut()
        .ok_or_else(|| shape_error(path, "top level is not an object"))?;
    let consensus = root
        .entry("Consensus")
        .or_insert_with(|| Value::Object(Default::default()));
    let consensus = consensus
        .as_object_mut()
        .ok_or_else(|| shape_error(path, "Consensus is not an object"))?;
    consensus.insert(CONSENSUS_HEADER_FIELD.to_string(), header.clone());

    let mut json = serde_json::to_vec_pretty(&doc).map_err(|e| shape_error(path, e))?;
    json.push(b'\n');
    write_atomic(path, &json).map_err(|e| io_error(path, e))?;

    info!(path = %path.display(), "consensus header stored in parameter file");
    Ok(())
}
