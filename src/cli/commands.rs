//! CLI command implementations
//!
//! This module contains the implementation for each CLI command.

use crate::{Config, Result};
use std::path::PathBuf;

/// Run command implementation
pub mod run {
    use super::*;
    use crate::cli::{OutputFormat, output};
    use crate::orders::{
        AuditSummary, FieldRules, FieldValidator, OrderLedger, OrderRecord, Report, aggregate,
        ingest,
    };
    use crate::parser::{OrderReader, load_spec};
    use crate::state_machine::MachineSpec;
    use std::io::Write;

    /// Execute the run command
    pub fn execute(
        spec_path: PathBuf,
        orders_path: PathBuf,
        format: OutputFormat,
        config: &Config,
    ) -> Result<()> {
        tracing::info!("Validating {:?} against {:?}", orders_path, spec_path);

        // Without a transition table nothing can be validated
        let spec = load_spec(&spec_path)?;
        let rules = FieldRules::from_config(&config.validation)?;
        let records = OrderReader::open(&orders_path)?;

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        run(
            &mut out,
            &spec,
            &rules,
            records,
            format,
            config.output.precision,
        )?;
        out.flush()?;

        Ok(())
    }

    /// Ingest `records`, then write the report to `w`
    pub fn run<W, I>(
        w: &mut W,
        spec: &MachineSpec,
        validator: &dyn FieldValidator,
        records: I,
        format: OutputFormat,
        precision: usize,
    ) -> Result<(AuditSummary, Report)>
    where
        W: Write,
        I: IntoIterator<Item = Result<OrderRecord>>,
    {
        let mut ledger = OrderLedger::new(spec, validator);

        let summary = match format {
            OutputFormat::Table => {
                writeln!(w, "Tru State")?;
                ingest(&mut ledger, records, |event| output::write_flag(&mut *w, event))?
            }
            OutputFormat::Json => ingest(&mut ledger, records, |_| Ok(()))?,
        };

        let report = aggregate(ledger.records(), spec);
        tracing::info!(
            states = report.states.len(),
            flagged = report.flagged,
            "Report ready"
        );

        match format {
            OutputFormat::Table => output::output_table(w, &report, precision)?,
            OutputFormat::Json => output::output_json(w, &summary, &report)?,
        }

        Ok((summary, report))
    }
}

/// Spec validate command implementation
pub mod spec_validate {
    use super::*;
    use crate::parser::load_spec;
    use crate::state_machine::{MachineSpec, analyze};
    use std::io::Write;

    /// Execute the spec-validate command
    pub fn execute(spec_path: PathBuf) -> Result<()> {
        tracing::info!("Validating specification: {:?}", spec_path);

        let spec = match load_spec(&spec_path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("❌ Failed to load specification: {}", e);
                return Err(e);
            }
        };

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let error_count = print_report(&mut out, &spec_path, &spec)?;

        if error_count == 0 {
            Ok(())
        } else {
            Err(crate::Error::custom("Specification validation failed"))
        }
    }

    /// Print the validation report and return the number of errors found
    pub fn print_report(
        w: &mut impl Write,
        spec_path: &std::path::Path,
        spec: &MachineSpec,
    ) -> Result<usize> {
        let analysis = analyze(spec);
        let errors = analysis.errors(spec);
        let warnings = analysis.warnings();

        writeln!(w, "📋 Specification Validation Report")?;
        writeln!(w, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(w, "File: {:?}", spec_path)?;
        writeln!(w)?;

        writeln!(w, "Transitions:")?;
        for entry in spec.entries() {
            writeln!(w, "  {} : {:?}", entry.state, entry.transitions)?;
        }
        writeln!(w)?;

        writeln!(w, "Start states: {}", analysis.start_states.join(", "))?;
        writeln!(w, "Terminal states: {}", analysis.terminal_states.join(", "))?;
        writeln!(w, "Cycles: {}", if analysis.has_cycles { "yes" } else { "no" })?;
        writeln!(w)?;

        if !errors.is_empty() {
            writeln!(w, "❌ Errors:")?;
            for error in &errors {
                writeln!(w, "   {}", error)?;
            }
            writeln!(w)?;
        }

        if !warnings.is_empty() {
            writeln!(w, "⚠️  Warnings:")?;
            for warning in &warnings {
                writeln!(w, "   {}", warning)?;
            }
            writeln!(w)?;
        }

        if errors.is_empty() {
            writeln!(w, "✅ Specification is valid!")?;
        } else {
            writeln!(
                w,
                "❌ Specification validation failed with {} error(s)",
                errors.len()
            )?;
        }

        Ok(errors.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::orders::FieldRules;
    use crate::parser::{OrderReader, parse_spec};
    use std::io::Write;
    use std::path::Path;

    const SPEC: &str = r#"{"machineSpec": [
        {"state": "start", "transitions": ["pending"]},
        {"state": "pending", "transitions": ["shipped"]},
        {"state": "shipped", "transitions": ["shipped"]}
    ]}"#;

    const ORDERS: &str = "\
100,O1,C1,pending,x,1,10.0
200,O1,C1,shipped,x,1,10.0
100,O2,C1,shipped,x,1,5.0
200,O3,C1,pending,x,1,3.0
not,a,record
100,O3,C1,shipped,x,1,3.0
";

    #[test]
    fn test_run_table() {
        let spec = parse_spec(SPEC).unwrap();
        let rules = FieldRules::default();
        let mut output = Vec::new();

        let (summary, report) = run::run(
            &mut output,
            &spec,
            &rules,
            OrderReader::new(ORDERS.as_bytes()),
            OutputFormat::Table,
            2,
        )
        .unwrap();

        assert_eq!(summary.records_read, 6);
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(report.flagged, 2);

        let text = String::from_utf8(output).unwrap();
        assert_eq!(
            text,
            "Tru State\n\
             Flagging order O2\n\
             Flagging order O3\n\
             shipped 1 $10.00 (terminal)\n\
             flagged 2\n"
        );
    }

    #[test]
    fn test_run_json() {
        let spec = parse_spec(SPEC).unwrap();
        let rules = FieldRules::default();
        let mut output = Vec::new();

        run::run(
            &mut output,
            &spec,
            &rules,
            OrderReader::new(ORDERS.as_bytes()),
            OutputFormat::Json,
            2,
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["flagged"], 2);
        assert_eq!(value["flags"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["skipped"][0]["line"], 5);
    }

    #[test]
    fn test_run_execute_from_files() {
        let mut spec_file = tempfile::NamedTempFile::new().unwrap();
        spec_file.write_all(SPEC.as_bytes()).unwrap();
        let mut orders_file = tempfile::NamedTempFile::new().unwrap();
        orders_file.write_all(ORDERS.as_bytes()).unwrap();

        let result = run::execute(
            spec_file.path().to_path_buf(),
            orders_file.path().to_path_buf(),
            OutputFormat::Table,
            &Config::default(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_run_aborts_without_spec() {
        let result = run::execute(
            PathBuf::from("/nonexistent/spec.json"),
            PathBuf::from("/nonexistent/orders.csv"),
            OutputFormat::Table,
            &Config::default(),
        );
        assert!(matches!(result, Err(crate::Error::Spec(_))));
    }

    #[test]
    fn test_spec_validate_report() {
        let spec = parse_spec(SPEC).unwrap();
        let mut output = Vec::new();
        let errors =
            spec_validate::print_report(&mut output, Path::new("spec.json"), &spec).unwrap();
        assert_eq!(errors, 0);

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Start states: pending"));
        assert!(text.contains("Terminal states: shipped"));
        assert!(text.contains("pending : [\"shipped\"]"));
    }

    #[test]
    fn test_spec_validate_without_start() {
        let spec = parse_spec(r#"{"machineSpec": [{"state": "a", "transitions": ["b"]}]}"#)
            .unwrap();
        let mut output = Vec::new();
        let errors =
            spec_validate::print_report(&mut output, Path::new("spec.json"), &spec).unwrap();
        assert_eq!(errors, 1);
    }
}
