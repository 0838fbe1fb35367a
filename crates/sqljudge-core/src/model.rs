use crate::normalize::Row;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CASE_NAME: &str = "test_case";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuite {
    pub schema_sql: String,
    pub cases: Vec<TestCase>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub seed_sql: String,
    pub expected: ExpectedResult,
    #[serde(default)]
    pub order_matters: bool,
}

impl TestCase {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_CASE_NAME)
    }
}

/// Expected output as written in the suite. Rows keep their native JSON
/// values and are normalized only when compared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpectedResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

/// Columns and normalized rows produced by one query execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryOutput {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Pass,
    Fail,
}

impl CaseStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CaseStatus::Pass => "PASS",
            CaseStatus::Fail => "FAIL",
        }
    }
}

/// Why a case failed. Both kinds are scoped to the case.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Failure {
    Execution {
        message: String,
    },
    Mismatch {
        expected_columns: Vec<String>,
        actual_columns: Vec<String>,
        expected_rows: Vec<Row>,
        actual_rows: Vec<Row>,
    },
}

impl Failure {
    pub fn summary(&self) -> String {
        match self {
            Failure::Execution { message } => format!("execution failed: {}", message),
            Failure::Mismatch {
                expected_columns,
                actual_columns,
                ..
            } => {
                if expected_columns != actual_columns {
                    "columns did not match".into()
                } else {
                    "rows did not match".into()
                }
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseOutcome {
    pub name: String,
    pub status: CaseStatus,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<Failure>,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.status == CaseStatus::Pass
    }

    pub fn message(&self) -> String {
        self.failure
            .as_ref()
            .map(Failure::summary)
            .unwrap_or_else(|| "ok".into())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub outcomes: Vec<CaseOutcome>,
}

impl RunSummary {
    pub fn success(&self) -> bool {
        self.outcomes.iter().all(CaseOutcome::passed)
    }

    pub fn passed(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.passed())
            .map(|o| o.name.as_str())
            .collect()
    }

    pub fn failed(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| !o.passed())
            .map(|o| o.name.as_str())
            .collect()
    }
}
