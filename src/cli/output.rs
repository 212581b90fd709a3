//! Output formatting module
//!
//! This module handles formatting the audit report for different output formats.

use crate::{
    Result,
    orders::{ApplyOutcome, AuditSummary, FlagEvent, Report},
};
use serde_json::json;

/// Write the diagnostic line for a flagged order
pub fn write_flag(w: &mut impl std::io::Write, event: &FlagEvent) -> Result<()> {
    writeln!(w, "Flagging order {}", event.order_id)?;
    Ok(())
}

/// Output the report as plain text: one line per state, then the flagged total
pub fn output_table(w: &mut impl std::io::Write, report: &Report, precision: usize) -> Result<()> {
    for row in &report.states {
        let terminal = if row.terminal { " (terminal)" } else { "" };
        writeln!(
            w,
            "{} {} ${:.*}{}",
            row.state, row.count, precision, row.total, terminal
        )?;
    }
    writeln!(w, "flagged {}", report.flagged)?;
    Ok(())
}

/// Output the report and run summary as JSON
pub fn output_json(
    w: &mut impl std::io::Write,
    summary: &AuditSummary,
    report: &Report,
) -> Result<()> {
    let output = json!({
        "summary": {
            "records_read": summary.records_read,
            "records_applied": summary.records_applied,
            "skipped": summary.skipped.len(),
        },
        "states": report.states,
        "flagged": report.flagged,
        "flags": summary.flags.iter().map(|event| {
            let reasons: Vec<String> = match &event.outcome {
                ApplyOutcome::Flagged { reasons, .. } => {
                    reasons.iter().map(ToString::to_string).collect()
                }
                _ => Vec::new(),
            };
            json!({
                "order_id": event.order_id,
                "reasons": reasons,
            })
        }).collect::<Vec<_>>(),
        "skipped": summary.skipped.iter().map(|s| {
            json!({
                "line": s.line,
                "message": s.message,
            })
        }).collect::<Vec<_>>(),
    });

    serde_json::to_writer_pretty(&mut *w, &output)?;
    writeln!(w)?; // Add trailing newline
    Ok(())
}
