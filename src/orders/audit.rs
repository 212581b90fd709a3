//! Ingestion loop: apply a stream of decoded records to a ledger in order

use super::ledger::{ApplyOutcome, OrderLedger};
use super::record::{OrderId, OrderRecord};
use super::report::{Report, aggregate};
use crate::{Error, Result};

/// A record that could not be decoded and was left out of the ledger
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub line: u64,
    pub message: String,
}

/// Order identifier flagged by a record, in arrival order
#[derive(Debug, Clone, PartialEq)]
pub struct FlagEvent {
    pub order_id: OrderId,
    pub outcome: ApplyOutcome,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditSummary {
    pub records_read: usize,
    pub records_applied: usize,
    pub skipped: Vec<SkippedRecord>,
    pub flags: Vec<FlagEvent>,
}

/// Apply every record in `records` to `ledger`, in order.
///
/// Malformed records are logged, collected in `skipped` and do not stop
/// the run. Any other error aborts it. `on_flag` is called each time a
/// record is rejected.
pub fn ingest<I>(
    ledger: &mut OrderLedger<'_>,
    records: I,
    mut on_flag: impl FnMut(&FlagEvent) -> Result<()>,
) -> Result<AuditSummary>
where
    I: IntoIterator<Item = Result<OrderRecord>>,
{
    let mut summary = AuditSummary::default();

    for record in records {
        summary.records_read += 1;

        let record = match record {
            Ok(record) => record,
            Err(Error::MalformedRecord { line, message }) => {
                tracing::warn!(line, "Skipping malformed record: {}", message);
                summary.skipped.push(SkippedRecord { line, message });
                continue;
            }
            Err(e) => return Err(e),
        };

        let order_id = record.order_id.clone();
        let outcome = ledger.apply(record);
        summary.records_applied += 1;

        if outcome.is_rejected() {
            let event = FlagEvent { order_id, outcome };
            on_flag(&event)?;
            summary.flags.push(event);
        }
    }

    tracing::info!(
        read = summary.records_read,
        applied = summary.records_applied,
        skipped = summary.skipped.len(),
        orders = ledger.len(),
        "Ingestion finished"
    );

    Ok(summary)
}

/// Ingest `records` into `ledger`, then aggregate the final snapshot
pub fn audit<I>(ledger: &mut OrderLedger<'_>, records: I) -> Result<(AuditSummary, Report)>
where
    I: IntoIterator<Item = Result<OrderRecord>>,
{
    let summary = ingest(ledger, records, |_| Ok(()))?;
    let report = aggregate(ledger.records(), ledger.spec());
    Ok((summary, report))
}
