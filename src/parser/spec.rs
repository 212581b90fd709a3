//! Specification decoding
//!
//! The specification is a JSON document holding a list of adjacency lists:
//!
//! ```json
//! {"machineSpec": [
//!     {"state": "start", "transitions": ["pending"]},
//!     {"state": "pending", "transitions": ["shipped", "cancelled"]}
//! ]}
//! ```

use crate::state_machine::{MachineSpec, START_STATE, StateTransitions};
use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct SpecDocument {
    #[serde(rename = "machineSpec")]
    machine_spec: Option<Vec<SpecEntry>>,
}

#[derive(Debug, Deserialize)]
struct SpecEntry {
    state: String,
    #[serde(default)]
    transitions: Option<Vec<String>>,
}

/// Decode a specification from JSON text
pub fn parse_spec(json: &str) -> Result<MachineSpec> {
    let document: SpecDocument = serde_json::from_str(json)?;

    let entries = match document.machine_spec {
        Some(entries) if !entries.is_empty() => entries,
        _ => return Err(Error::spec("the specification has no transition table")),
    };

    let spec = MachineSpec::new(
        entries
            .into_iter()
            .map(|entry| StateTransitions::new(&entry.state, entry.transitions.unwrap_or_default()))
            .collect(),
    );

    if !spec.has_start() {
        tracing::warn!(
            "specification has no '{}' anchor, every new order will be flagged",
            START_STATE
        );
    }

    Ok(spec)
}

/// Read and decode a specification file
pub fn load_spec(path: impl AsRef<Path>) -> Result<MachineSpec> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .map_err(|e| Error::spec(format!("cannot read {:?}: {}", path, e)))?;

    let spec = parse_spec(&json).map_err(|e| match e {
        Error::Parser(message) => Error::SpecParse {
            file: path.to_path_buf(),
            message,
        },
        other => other,
    })?;

    tracing::info!(
        "Loaded specification from {:?} ({} anchors)",
        path,
        spec.entries().len()
    );
    Ok(spec)
}
