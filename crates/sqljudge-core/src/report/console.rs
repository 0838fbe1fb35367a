use crate::model::{CaseOutcome, Failure, QueryOutput};
use crate::report::Reporter;
use std::io::{self, Write};

/// Verdict lines go to `out`, failure diagnostics to `err`.
pub struct ConsoleReporter<O: Write, E: Write> {
    out: O,
    err: E,
}

impl<O: Write, E: Write> ConsoleReporter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }

    fn write_outcome(&mut self, outcome: &CaseOutcome) -> io::Result<()> {
        writeln!(self.out, "[{}] {}", outcome.status.label(), outcome.name)?;
        self.out.flush()?;
        if let Some(failure) = &outcome.failure {
            self.err.write_all(render_failure(failure).as_bytes())?;
            self.err.flush()?;
        }
        Ok(())
    }
}

impl<O: Write, E: Write> Reporter for ConsoleReporter<O, E> {
    fn case_finished(&mut self, outcome: &CaseOutcome) {
        if let Err(e) = self.write_outcome(outcome) {
            tracing::warn!(event = "report.write_failed", error = %e, case = %outcome.name);
        }
    }
}

/// Diagnostic block for a failed case, one fact per line.
pub fn render_failure(failure: &Failure) -> String {
    match failure {
        Failure::Execution { message } => format!("Execution failed: {}\n", message),
        Failure::Mismatch {
            expected_columns,
            actual_columns,
            expected_rows,
            actual_rows,
        } => {
            let mut s = String::from("Expected columns/rows did not match.\n");
            s.push_str(&format!("Expected columns: {}\n", literal(expected_columns)));
            s.push_str(&format!("Actual columns: {}\n", literal(actual_columns)));
            s.push_str(&format!("Expected rows: {}\n", literal(expected_rows)));
            s.push_str(&format!("Actual rows: {}\n", literal(actual_rows)));
            s
        }
    }
}

fn literal<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("<unrenderable: {}>", e))
}

/// Tab-separated header line followed by one line per row; null cells are
/// empty.
pub fn write_table<W: Write>(w: &mut W, output: &QueryOutput) -> io::Result<()> {
    writeln!(w, "{}", output.columns.join("\t"))?;
    for row in &output.rows {
        let line = row
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join("\t");
        writeln!(w, "{}", line)?;
    }
    w.flush()
}
