use crate::errors::JudgeError;
use crate::model::TestSuite;
use std::collections::BTreeSet;
use std::path::Path;

pub const DEFAULT_SOLUTION_FILE: &str = "solution.sql";
pub const DEFAULT_SUITE_FILE: &str = "test_suite.json";

pub fn load_suite(path: &Path) -> Result<TestSuite, JudgeError> {
    let raw = read_text(path)?;
    parse_suite(&raw)
}

/// Parses and validates a suite. Every structural problem is reported here,
/// before any case runs.
pub fn parse_suite(raw: &str) -> Result<TestSuite, JudgeError> {
    let mut ignored_keys = BTreeSet::new();
    let mut de = serde_json::Deserializer::from_str(raw);

    // serde_ignored wrapper to capture unknown fields
    let suite: TestSuite = serde_ignored::deserialize(&mut de, |path| {
        ignored_keys.insert(path.to_string());
    })
    .map_err(|e| JudgeError::malformed(format!("failed to parse JSON: {}", e)))?;
    de.end()
        .map_err(|e| JudgeError::malformed(format!("failed to parse JSON: {}", e)))?;

    if !ignored_keys.is_empty() {
        tracing::warn!(
            event = "suite.unknown_fields",
            fields = ?ignored_keys,
            "ignored unknown test suite fields"
        );
    }

    validate_suite(&suite)?;
    Ok(suite)
}

fn validate_suite(suite: &TestSuite) -> Result<(), JudgeError> {
    if suite.schema_sql.trim().is_empty() {
        return Err(JudgeError::malformed("missing schema_sql"));
    }
    if suite.cases.is_empty() {
        return Err(JudgeError::malformed("missing cases"));
    }
    Ok(())
}

/// Reads the candidate query; surrounding whitespace is not part of it.
pub fn load_solution(path: &Path) -> Result<String, JudgeError> {
    Ok(read_text(path)?.trim().to_string())
}

pub fn read_text(path: &Path) -> Result<String, JudgeError> {
    std::fs::read_to_string(path).map_err(|source| JudgeError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn suite_json(value: serde_json::Value) -> String {
        serde_json::to_string(&value).unwrap()
    }

    fn valid_case() -> serde_json::Value {
        json!({
            "name": "test_case_1",
            "seed_sql": "INSERT INTO t VALUES (1);",
            "expected": { "columns": ["x"], "rows": [[1]] },
            "order_matters": true
        })
    }

    #[test]
    fn test_parse_valid_suite() {
        let raw = suite_json(json!({
            "schema_sql": "CREATE TABLE t(x INTEGER);",
            "cases": [valid_case()]
        }));
        let suite = parse_suite(&raw).unwrap();
        assert_eq!(suite.cases.len(), 1);
        assert!(suite.cases[0].order_matters);
        assert_eq!(suite.cases[0].expected.columns, vec!["x"]);
    }

    #[test]
    fn test_blank_schema_is_malformed() {
        let raw = suite_json(json!({ "schema_sql": "  \n", "cases": [valid_case()] }));
        let err = parse_suite(&raw).unwrap_err();
        assert!(matches!(err, JudgeError::MalformedSuite(_)));
        assert_eq!(err.to_string(), "Invalid test suite: missing schema_sql");
    }

    #[test]
    fn test_missing_or_empty_cases_is_malformed() {
        let raw = suite_json(json!({ "schema_sql": "CREATE TABLE t(x);", "cases": [] }));
        assert_eq!(
            parse_suite(&raw).unwrap_err().to_string(),
            "Invalid test suite: missing cases"
        );

        let raw = suite_json(json!({ "schema_sql": "CREATE TABLE t(x);" }));
        assert!(matches!(
            parse_suite(&raw).unwrap_err(),
            JudgeError::MalformedSuite(_)
        ));

        let raw = suite_json(json!({ "schema_sql": "CREATE TABLE t(x);", "cases": {} }));
        assert!(matches!(
            parse_suite(&raw).unwrap_err(),
            JudgeError::MalformedSuite(_)
        ));
    }

    #[test]
    fn test_mistyped_case_fields_are_malformed() {
        let bad_cases = [
            json!({ "seed_sql": 5, "expected": { "columns": [], "rows": [] } }),
            json!({ "expected": { "columns": [], "rows": [] } }),
            json!({ "seed_sql": "" }),
            json!({ "seed_sql": "", "expected": { "columns": "x", "rows": [] } }),
            json!({ "seed_sql": "", "expected": { "columns": ["x"], "rows": [1, 2] } }),
        ];
        for case in bad_cases {
            let raw = suite_json(json!({ "schema_sql": "CREATE TABLE t(x);", "cases": [case] }));
            assert!(
                matches!(parse_suite(&raw), Err(JudgeError::MalformedSuite(_))),
                "accepted malformed case in {raw}"
            );
        }
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let raw = suite_json(json!({
            "schema_sql": "CREATE TABLE t(x);",
            "dialect": "sqlite",
            "cases": [valid_case()]
        }));
        assert!(parse_suite(&raw).is_ok());
    }

    #[test]
    fn test_trailing_garbage_is_malformed() {
        let raw = format!(
            "{} trailing",
            suite_json(json!({ "schema_sql": "CREATE TABLE t(x);", "cases": [valid_case()] }))
        );
        assert!(parse_suite(&raw).is_err());
    }

    #[test]
    fn test_load_solution_trims_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_SOLUTION_FILE);
        std::fs::write(&path, "\n  SELECT 1;  \n\n").unwrap();
        assert_eq!(load_solution(&path).unwrap(), "SELECT 1;");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_suite(&dir.path().join(DEFAULT_SUITE_FILE)).unwrap_err();
        assert!(matches!(err, JudgeError::Io { .. }));
        assert!(err.is_config_error());
    }
}
