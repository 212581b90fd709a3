//! Order ledger - the latest known record per order identifier
//!
//! Every incoming record is validated against the baseline held for its
//! order: the previous record for that identifier, or the record itself on
//! first sighting. A rejection flags the order, and the flag is carried onto
//! every later record for the same identifier.

use super::record::{FieldIssue, FieldValidator, OrderId, OrderRecord};
use crate::state_machine::{MachineSpec, StateName};
use std::collections::HashMap;
use std::fmt;

/// Why an incoming record was rejected
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    InvalidFields(Vec<FieldIssue>),
    TimestampRegression { baseline: i64, received: i64 },
    CustomerMismatch { baseline: String, received: String },
    NotStartState { state: StateName },
    IllegalTransition { from: StateName, to: StateName },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Rejection::InvalidFields(issues) => {
                let issues: Vec<String> = issues.iter().map(ToString::to_string).collect();
                write!(f, "invalid fields ({})", issues.join("; "))
            }
            Rejection::TimestampRegression { baseline, received } => {
                write!(f, "timestamp {} is earlier than {}", received, baseline)
            }
            Rejection::CustomerMismatch { baseline, received } => {
                write!(f, "customer changed from '{}' to '{}'", baseline, received)
            }
            Rejection::NotStartState { state } => {
                write!(f, "'{}' is not a start state", state)
            }
            Rejection::IllegalTransition { from, to } => {
                write!(f, "no transition from '{}' to '{}'", from, to)
            }
        }
    }
}

/// Result of applying one record to the ledger
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    /// The record was consistent and the order has a clean history
    Accepted { first_sighting: bool },
    /// The record was rejected; the order is now flagged
    Flagged {
        reasons: Vec<Rejection>,
        /// False when the order was already flagged before this record
        newly_flagged: bool,
    },
    /// The record was consistent but inherits an earlier flag
    Carried,
}

impl ApplyOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, ApplyOutcome::Flagged { .. })
    }
}

/// Keyed store of the latest record per order.
///
/// Records must be applied in arrival order: each one is compared with the
/// record before it, so reordering the input changes the result.
pub struct OrderLedger<'a> {
    spec: &'a MachineSpec,
    validator: &'a dyn FieldValidator,
    entries: HashMap<OrderId, OrderRecord>,
}

impl<'a> OrderLedger<'a> {
    pub fn new(spec: &'a MachineSpec, validator: &'a dyn FieldValidator) -> Self {
        Self {
            spec,
            validator,
            entries: HashMap::new(),
        }
    }

    pub fn spec(&self) -> &MachineSpec {
        self.spec
    }

    /// Validate `record` against its baseline and make it the new baseline
    pub fn apply(&mut self, mut record: OrderRecord) -> ApplyOutcome {
        let baseline = self.entries.get(&record.order_id);
        let is_new = baseline.is_none();
        // On first sighting the record is its own baseline
        let baseline = baseline.unwrap_or(&record);
        let was_flagged = !is_new && baseline.flagged;

        let reasons = self.rejections(baseline, &record, is_new);
        let rejected = !reasons.is_empty();

        record.flagged = was_flagged || rejected;

        let outcome = if rejected {
            tracing::warn!(
                order_id = %record.order_id,
                reasons = %join(&reasons),
                "Flagging order {}",
                record.order_id
            );
            ApplyOutcome::Flagged {
                reasons,
                newly_flagged: !was_flagged,
            }
        } else if was_flagged {
            tracing::debug!(order_id = %record.order_id, "record accepted, order stays flagged");
            ApplyOutcome::Carried
        } else {
            tracing::debug!(order_id = %record.order_id, state = %record.state, "record accepted");
            ApplyOutcome::Accepted {
                first_sighting: is_new,
            }
        };

        self.entries.insert(record.order_id.clone(), record);
        outcome
    }

    fn rejections(
        &self,
        baseline: &OrderRecord,
        record: &OrderRecord,
        is_new: bool,
    ) -> Vec<Rejection> {
        let mut reasons = Vec::new();

        let issues = self.validator.check(record);
        if !issues.is_empty() {
            reasons.push(Rejection::InvalidFields(issues));
        }

        if record.timestamp < baseline.timestamp {
            reasons.push(Rejection::TimestampRegression {
                baseline: baseline.timestamp,
                received: record.timestamp,
            });
        }

        if record.customer_id != baseline.customer_id {
            reasons.push(Rejection::CustomerMismatch {
                baseline: baseline.customer_id.clone(),
                received: record.customer_id.clone(),
            });
        }

        if !self
            .spec
            .is_valid_transition(&baseline.state, &record.state, is_new)
        {
            reasons.push(if is_new {
                Rejection::NotStartState {
                    state: record.state.clone(),
                }
            } else {
                Rejection::IllegalTransition {
                    from: baseline.state.clone(),
                    to: record.state.clone(),
                }
            });
        }

        reasons
    }

    /// Latest record for `order_id`
    pub fn get(&self, order_id: &str) -> Option<&OrderRecord> {
        self.entries.get(order_id)
    }

    pub fn is_flagged(&self, order_id: &str) -> bool {
        self.get(order_id).is_some_and(|r| r.flagged)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Final snapshot, one record per order identifier
    pub fn records(&self) -> impl Iterator<Item = &OrderRecord> {
        self.entries.values()
    }
}

fn join(reasons: &[Rejection]) -> String {
    reasons
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
