//! Per-state report over the final ledger snapshot

use super::record::OrderRecord;
use crate::state_machine::{MachineSpec, StateName};
use serde::Serialize;
use std::collections::BTreeMap;

/// Count and value of the unflagged orders resting in one state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSummary {
    pub state: StateName,
    pub count: usize,
    pub total: f64,
    pub terminal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Sorted by state name
    pub states: Vec<StateSummary>,
    pub flagged: usize,
}

impl Report {
    pub fn state(&self, state: &str) -> Option<&StateSummary> {
        self.states.iter().find(|s| s.state == state)
    }
}

/// Aggregate the latest record of every order.
///
/// Every state seen in the snapshot gets a row, even when all of its orders
/// are flagged. Flagged orders only count toward `flagged`.
pub fn aggregate<'r>(
    records: impl IntoIterator<Item = &'r OrderRecord>,
    spec: &MachineSpec,
) -> Report {
    let mut buckets: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    let mut flagged = 0;

    for record in records {
        let bucket = buckets.entry(record.state.as_str()).or_insert((0, 0.0));
        if record.flagged {
            flagged += 1;
        } else {
            bucket.0 += 1;
            bucket.1 += record.cost;
        }
    }

    let states = buckets
        .into_iter()
        .map(|(state, (count, total))| StateSummary {
            state: state.to_string(),
            count,
            total,
            terminal: spec.is_terminal_state(state),
        })
        .collect();

    Report { states, flagged }
}
