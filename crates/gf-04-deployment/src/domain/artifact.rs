//! # Contract Artifacts
//!
//! Compiled contracts as the contract toolchain emits them:
//! `{contractName, abi, bytecode}`. Two layouts are searched:
//!
//! | Layout | Path |
//! |--------|------|
//! | hardhat | `<root>/<Name>.sol/<Name>.json` |
//! | flat | `<root>/<Name>.json` |
//!
//! `bytecode` may be a hex string or a `{ "object": "0x.." }` object.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use shared_types::{decode_hex, Bytes};
use tracing::debug;

use super::abi::{encode_checked, selector, AbiParam, AbiValue};
use super::errors::{AbiError, ArtifactError};

/// One entry of an artifact ABI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
}

impl AbiItem {
    /// `name(type,..)`.
    #[must_use]
    pub fn signature(&self) -> String {
        let inputs: Vec<String> = self.inputs.iter().map(AbiParam::canonical_type).collect();
        format!("{}({})", self.name, inputs.join(","))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hex(String),
    Object { object: String },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    #[serde(default)]
    contract_name: String,
    abi: Vec<AbiItem>,
    bytecode: RawBytecode,
}

/// A compiled contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub abi: Vec<AbiItem>,
    pub bytecode: Bytes,
}

impl Artifact {
    /// Parses artifact JSON.
    pub fn from_json(name: &str, json: &[u8]) -> Result<Self, ArtifactError> {
        let malformed = |reason: String| ArtifactError::Malformed {
            name: name.to_string(),
            reason,
        };
        let raw: RawArtifact =
            serde_json::from_slice(json).map_err(|e| malformed(e.to_string()))?;
        let hex = match raw.bytecode {
            RawBytecode::Hex(hex) | RawBytecode::Object { object: hex } => hex,
        };
        let bytecode = decode_hex(&hex).map_err(|e| malformed(e.to_string()))?;
        if bytecode.is_empty() {
            return Err(ArtifactError::MissingBytecode(name.to_string()));
        }
        Ok(Self {
            name: if raw.contract_name.is_empty() {
                name.to_string()
            } else {
                raw.contract_name
            },
            abi: raw.abi,
            bytecode: Bytes::from(bytecode),
        })
    }

    /// Finds a function by name and argument count.
    pub fn function(&self, name: &str, arity: usize) -> Result<&AbiItem, AbiError> {
        self.abi
            .iter()
            .find(|item| item.kind == "function" && item.name == name && item.inputs.len() == arity)
            .ok_or_else(|| AbiError::UnknownFunction {
                contract: self.name.clone(),
                function: name.to_string(),
                arity,
            })
    }

    /// Calldata for `name(args..)`.
    pub fn encode_call(&self, name: &str, args: &[AbiValue]) -> Result<Bytes, AbiError> {
        let function = self.function(name, args.len())?;
        let signature = function.signature();
        let mut data = selector(&signature).to_vec();
        data.extend(encode_checked(&signature, &function.inputs, args)?);
        Ok(Bytes::from(data))
    }

    /// Creation code followed by encoded constructor arguments.
    pub fn encode_deploy(&self, args: &[AbiValue]) -> Result<Bytes, AbiError> {
        let inputs = self
            .abi
            .iter()
            .find(|item| item.kind == "constructor")
            .map(|item| item.inputs.as_slice())
            .unwrap_or_default();
        if inputs.len() != args.len() {
            return Err(AbiError::UnknownFunction {
                contract: self.name.clone(),
                function: "constructor".into(),
                arity: args.len(),
            });
        }
        let mut data = self.bytecode.0.clone();
        data.extend(encode_checked(
            &format!("{}.constructor", self.name),
            inputs,
            args,
        )?);
        Ok(Bytes::from(data))
    }
}

/// Loads artifacts by name from disk, with preloaded entries taking priority.
#[derive(Debug, Default)]
pub struct ArtifactStore {
    root: Option<PathBuf>,
    cache: RwLock<HashMap<String, Artifact>>,
}

impl ArtifactStore {
    /// A store reading from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            cache: RwLock::default(),
        }
    }

    /// A store serving only the given artifacts.
    pub fn from_artifacts(artifacts: impl IntoIterator<Item = Artifact>) -> Self {
        let cache = artifacts
            .into_iter()
            .map(|artifact| (artifact.name.clone(), artifact))
            .collect();
        Self {
            root: None,
            cache: RwLock::new(cache),
        }
    }

    fn candidates(root: &Path, name: &str) -> [PathBuf; 2] {
        [
            root.join(format!("{name}.sol")).join(format!("{name}.json")),
            root.join(format!("{name}.json")),
        ]
    }

    /// Returns the artifact called `name`.
    pub fn load(&self, name: &str) -> Result<Artifact, ArtifactError> {
        if let Some(artifact) = self.cache.read().ok().and_then(|c| c.get(name).cloned()) {
            return Ok(artifact);
        }

        let root = self.root.as_deref().ok_or_else(|| ArtifactError::NotFound {
            name: name.to_string(),
            root: "<memory>".into(),
        })?;

        let path = Self::candidates(root, name)
            .into_iter()
            .find(|p| p.is_file())
            .ok_or_else(|| ArtifactError::NotFound {
                name: name.to_string(),
                root: root.display().to_string(),
            })?;

        let json = fs::read(&path).map_err(|e| ArtifactError::Io {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        let artifact = Artifact::from_json(name, &json)?;
        debug!(name, path = %path.display(), "artifact loaded");

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(name.to_string(), artifact.clone());
        }
        Ok(artifact)
    }
}
