//! State machine module - Transition table model and structural analysis

pub mod analyzer;
pub mod spec;

// Re-export key types
pub use analyzer::{SpecAnalysis, analyze};
pub use spec::{MachineSpec, StateTransitions};

pub type StateName = String;

/// Anchor whose adjacency list enumerates the valid initial states
pub const START_STATE: &str = "start";

/// Canonical form of a state name: trimmed and lowercased
pub fn normalize(name: &str) -> StateName {
    name.trim().to_lowercase()
}
