use crate::engine::Sandbox;
use crate::errors::Phase;
use crate::model::TestSuite;
use serde::Serialize;
use std::collections::HashSet;

pub mod codes {
    pub const E_SUITE_PARSE: &str = "E_SUITE_PARSE";
    pub const E_SCHEMA_SQL: &str = "E_SCHEMA_SQL";
    pub const E_SEED_SQL: &str = "E_SEED_SQL";
    pub const W_ROW_WIDTH: &str = "W_ROW_WIDTH";
    pub const W_DUPLICATE_NAME: &str = "W_DUPLICATE_NAME";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warn,
}

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub code: &'static str,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case: Option<String>,
}

impl Diagnostic {
    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Error,
            message: message.into(),
            case: None,
        }
    }

    pub fn warn(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Warn,
            message: message.into(),
            case: None,
        }
    }

    pub fn with_case(mut self, name: &str) -> Self {
        self.case = Some(name.to_string());
        self
    }

    pub fn format_terminal(&self) -> String {
        let tag = match self.severity {
            Severity::Error => "error",
            Severity::Warn => "warn",
        };
        match &self.case {
            Some(case) => format!("{}[{}] {}: {}", tag, self.code, case, self.message),
            None => format!("{}[{}] {}", tag, self.code, self.message),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidateReport {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidateReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

/// Checks that a parsed suite is usable: the schema applies to an empty
/// database, every seed applies on top of it (each in its own sandbox), and
/// expected rows match their column count.
pub fn validate(suite: &TestSuite) -> ValidateReport {
    let mut diags = Vec::new();

    if let Err(e) = apply(&suite.schema_sql, None) {
        diags.push(Diagnostic::error(codes::E_SCHEMA_SQL, e));
        // Seeds cannot be checked without a schema.
        return ValidateReport { diagnostics: diags };
    }

    let mut seen = HashSet::new();
    for case in &suite.cases {
        let name = case.display_name();

        if !seen.insert(name) {
            diags.push(
                Diagnostic::warn(codes::W_DUPLICATE_NAME, "case name is not unique")
                    .with_case(name),
            );
        }

        if let Err(e) = apply(&suite.schema_sql, Some(&case.seed_sql)) {
            diags.push(Diagnostic::error(codes::E_SEED_SQL, e).with_case(name));
        }

        let width = case.expected.columns.len();
        for (i, row) in case.expected.rows.iter().enumerate() {
            if row.len() != width {
                diags.push(
                    Diagnostic::warn(
                        codes::W_ROW_WIDTH,
                        format!(
                            "expected row {} has {} cells but {} columns are declared",
                            i,
                            row.len(),
                            width
                        ),
                    )
                    .with_case(name),
                );
            }
        }
    }

    ValidateReport { diagnostics: diags }
}

fn apply(schema_sql: &str, seed_sql: Option<&str>) -> Result<(), String> {
    let sandbox = Sandbox::open().map_err(|e| e.to_string())?;
    sandbox
        .apply_script(Phase::Schema, schema_sql)
        .map_err(|e| e.to_string())?;
    if let Some(seed) = seed_sql {
        sandbox
            .apply_script(Phase::Seed, seed)
            .map_err(|e| e.to_string())?;
    }
    Ok(())
}
