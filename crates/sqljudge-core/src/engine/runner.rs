use crate::engine::executor::CaseExecutor;
use crate::errors::JudgeError;
use crate::model::{
    CaseOutcome, CaseStatus, ExpectedResult, Failure, QueryOutput, RunSummary, TestCase, TestSuite,
};
use crate::normalize::normalize_rows;
use crate::report::Reporter;
use crate::sort::sort_rows;
use std::sync::Arc;
use std::time::Instant;

pub struct Runner {
    pub executor: Arc<dyn CaseExecutor>,
}

impl Runner {
    pub fn new(executor: Arc<dyn CaseExecutor>) -> Self {
        Self { executor }
    }

    /// Executes only the first case and hands back its raw output. Any
    /// execution failure is returned to the caller.
    pub fn run_single(&self, suite: &TestSuite, query: &str) -> Result<QueryOutput, JudgeError> {
        let case = suite
            .cases
            .first()
            .ok_or_else(|| JudgeError::malformed("missing cases"))?;
        tracing::debug!(event = "case.start", case = case.display_name(), mode = "run");
        let output = self
            .executor
            .execute(&suite.schema_sql, &case.seed_sql, query)?;
        Ok(output)
    }

    /// Grades every case in suite order. Failures never stop the run.
    pub fn run_suite(
        &self,
        suite: &TestSuite,
        query: &str,
        reporter: &mut dyn Reporter,
    ) -> RunSummary {
        let mut summary = RunSummary::default();

        for case in &suite.cases {
            let outcome = self.run_case(&suite.schema_sql, case, query);
            tracing::debug!(
                event = "case.finished",
                case = %outcome.name,
                status = outcome.status.label(),
                duration_ms = outcome.duration_ms,
            );
            reporter.case_finished(&outcome);
            summary.outcomes.push(outcome);
        }

        tracing::info!(
            event = "suite.finished",
            cases = summary.outcomes.len(),
            failed = summary.failed().len(),
            success = summary.success(),
        );
        summary
    }

    pub fn run_case(&self, schema_sql: &str, case: &TestCase, query: &str) -> CaseOutcome {
        let start = Instant::now();

        let failure = match self.executor.execute(schema_sql, &case.seed_sql, query) {
            Ok(actual) => compare(actual, &case.expected, case.order_matters),
            Err(e) => Some(Failure::Execution {
                message: e.to_string(),
            }),
        };

        CaseOutcome {
            name: case.display_name().to_string(),
            status: if failure.is_none() {
                CaseStatus::Pass
            } else {
                CaseStatus::Fail
            },
            duration_ms: start.elapsed().as_millis() as u64,
            failure,
        }
    }
}

/// Compares actual output against the expected result. Both row sets are
/// normalized here, immediately before comparison; when order does not
/// matter both are put through the canonical sort first.
///
/// Returns `None` when columns and rows match exactly.
pub fn compare(
    actual: QueryOutput,
    expected: &ExpectedResult,
    order_matters: bool,
) -> Option<Failure> {
    let mut actual_rows = normalize_rows(actual.rows);
    let mut expected_rows = normalize_rows(&expected.rows);

    if !order_matters {
        actual_rows = sort_rows(actual_rows);
        expected_rows = sort_rows(expected_rows);
    }

    if actual.columns == expected.columns && actual_rows == expected_rows {
        return None;
    }

    Some(Failure::Mismatch {
        expected_columns: expected.columns.clone(),
        actual_columns: actual.columns,
        expected_rows,
        actual_rows,
    })
}
