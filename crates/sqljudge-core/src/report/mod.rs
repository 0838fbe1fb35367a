use crate::model::CaseOutcome;

pub mod console;
pub mod json;

/// Receives each case outcome as soon as the case finishes.
pub trait Reporter {
    fn case_finished(&mut self, outcome: &CaseOutcome);
}

/// Discards outcomes; for callers that only need the final summary.
pub struct NullReporter;

impl Reporter for NullReporter {
    fn case_finished(&mut self, _outcome: &CaseOutcome) {}
}
