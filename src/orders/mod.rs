//! Orders module - Record validation, the order ledger and reporting

pub mod audit;
pub mod ledger;
pub mod record;
pub mod report;

// Re-export key types
pub use audit::{AuditSummary, FlagEvent, SkippedRecord, audit, ingest};
pub use ledger::{ApplyOutcome, OrderLedger, Rejection};
pub use record::{CustomerId, FieldIssue, FieldRules, FieldValidator, OrderId, OrderRecord};
pub use report::{Report, StateSummary, aggregate};
