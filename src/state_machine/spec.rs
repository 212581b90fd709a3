//! Transition table of an order state machine

use std::collections::HashSet;

use super::{START_STATE, StateName, normalize};

/// One adjacency list: the states reachable from `state`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransitions {
    pub state: StateName,
    pub transitions: Vec<StateName>,
}

impl StateTransitions {
    /// Build an entry, lowercasing the anchor and every reachable state
    pub fn new<S: AsRef<str>>(state: &str, transitions: impl IntoIterator<Item = S>) -> Self {
        Self {
            state: normalize(state),
            transitions: transitions
                .into_iter()
                .map(|t| normalize(t.as_ref()))
                .collect(),
        }
    }
}

/// Immutable state machine specification.
///
/// The table keeps the order it was declared in. Every lookup is a linear
/// scan that stops at the first anchor with a matching name, so a duplicated
/// anchor is only visible through its first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MachineSpec {
    entries: Vec<StateTransitions>,
}

impl MachineSpec {
    pub fn new(entries: Vec<StateTransitions>) -> Self {
        let spec = Self { entries };

        for duplicate in spec.duplicate_anchors() {
            tracing::warn!(
                anchor = %duplicate,
                "duplicate anchor in specification, only the first occurrence is used"
            );
        }

        spec
    }

    /// All adjacency lists, in declaration order
    pub fn entries(&self) -> &[StateTransitions] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First adjacency list declared for `state`
    pub fn anchor(&self, state: &str) -> Option<&StateTransitions> {
        let state = normalize(state);
        self.entries.iter().find(|entry| entry.state == state)
    }

    /// Can `to` be reached from `from` in one step?
    pub fn transition_exists(&self, from: &str, to: &str) -> bool {
        let to = normalize(to);
        self.anchor(from)
            .is_some_and(|entry| entry.transitions.contains(&to))
    }

    /// Is the move `from -> to` allowed?
    ///
    /// For a brand-new order `to` is ignored and `from`, the state the order
    /// was first reported in, has to be one of the start states.
    pub fn is_valid_transition(&self, from: &str, to: &str, is_new: bool) -> bool {
        if is_new {
            return self.transition_exists(START_STATE, from);
        }
        self.transition_exists(from, to)
    }

    /// Is `state` terminal?
    ///
    /// A state is terminal when it has no anchor, an empty adjacency list,
    /// or a list holding only a self-loop. An anchor with a single entry
    /// leading elsewhere is not terminal.
    pub fn is_terminal_state(&self, state: &str) -> bool {
        let Some(entry) = self.anchor(state) else {
            return true;
        };

        match entry.transitions.as_slice() {
            [] => true,
            [only] => *only == entry.state,
            _ => false,
        }
    }

    /// States listed under the `start` anchor
    pub fn start_states(&self) -> &[StateName] {
        self.anchor(START_STATE)
            .map(|entry| entry.transitions.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_start(&self) -> bool {
        self.anchor(START_STATE).is_some()
    }

    /// Anchors declared more than once, each reported once
    pub fn duplicate_anchors(&self) -> Vec<StateName> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for entry in &self.entries {
            if !seen.insert(entry.state.as_str()) && !duplicates.contains(&entry.state) {
                duplicates.push(entry.state.clone());
            }
        }
        duplicates
    }

    /// Every state name mentioned anywhere in the table, except `start`
    pub fn states(&self) -> Vec<StateName> {
        let mut states: Vec<StateName> = Vec::new();
        for entry in &self.entries {
            for name in std::iter::once(&entry.state).chain(entry.transitions.iter()) {
                if name != START_STATE && !states.contains(name) {
                    states.push(name.clone());
                }
            }
        }
        states
    }
}
