use serde_json::json;
use sqljudge_core::config::parse_suite;
use sqljudge_core::engine::{Runner, SqliteExecutor};
use sqljudge_core::model::{CaseStatus, Failure};
use sqljudge_core::normalize::{Cell, Number};
use sqljudge_core::report::NullReporter;
use std::sync::Arc;

fn runner() -> Runner {
    Runner::new(Arc::new(SqliteExecutor))
}

fn suite(cases: serde_json::Value) -> sqljudge_core::model::TestSuite {
    let raw = serde_json::to_string(&json!({
        "schema_sql": "CREATE TABLE t(x INTEGER);",
        "cases": cases
    }))
    .unwrap();
    parse_suite(&raw).unwrap()
}

#[test]
fn test_exact_ordered_case_passes() {
    let suite = suite(json!([{
        "name": "test_case_ordered",
        "seed_sql": "INSERT INTO t VALUES (1),(2);",
        "expected": { "columns": ["x"], "rows": [[1], [2]] },
        "order_matters": true
    }]));

    let summary = runner().run_suite(&suite, "SELECT x FROM t ORDER BY x", &mut NullReporter);
    assert!(summary.success(), "{:?}", summary);
}

#[test]
fn test_unordered_case_matches_as_multiset() {
    let suite = suite(json!([{
        "name": "test_case_unordered",
        "seed_sql": "INSERT INTO t VALUES (1),(2);",
        "expected": { "columns": ["x"], "rows": [[2], [1]] },
        "order_matters": false
    }]));

    let summary = runner().run_suite(&suite, "SELECT x FROM t", &mut NullReporter);
    assert!(summary.success(), "{:?}", summary);
}

#[test]
fn test_order_matters_rejects_wrong_order() {
    let suite = suite(json!([{
        "name": "test_case_desc",
        "seed_sql": "INSERT INTO t VALUES (1),(2);",
        "expected": { "columns": ["x"], "rows": [[2], [1]] },
        "order_matters": true
    }]));

    let summary = runner().run_suite(&suite, "SELECT x FROM t ORDER BY x", &mut NullReporter);
    assert_eq!(summary.outcomes[0].status, CaseStatus::Fail);
}

#[test]
fn test_nonexistent_column_fails_and_run_continues() {
    let suite = suite(json!([
        {
            "name": "test_case_1",
            "seed_sql": "INSERT INTO t VALUES (1);",
            "expected": { "columns": ["x"], "rows": [[1]] }
        },
        {
            "name": "test_case_2",
            "seed_sql": "INSERT INTO t VALUES (2);",
            "expected": { "columns": ["x"], "rows": [[2]] }
        }
    ]));

    let summary = runner().run_suite(&suite, "SELECT missing_col FROM t", &mut NullReporter);
    assert_eq!(summary.outcomes.len(), 2);
    for outcome in &summary.outcomes {
        assert_eq!(outcome.status, CaseStatus::Fail);
        match &outcome.failure {
            Some(Failure::Execution { message }) => {
                assert!(message.contains("no such column"), "{message}")
            }
            other => panic!("expected execution failure, got {other:?}"),
        }
    }
    assert_eq!(summary.failed(), vec!["test_case_1", "test_case_2"]);
}

#[test]
fn test_wrong_column_name_is_a_mismatch() {
    let suite = suite(json!([{
        "name": "test_case_alias",
        "seed_sql": "INSERT INTO t VALUES (1),(2);",
        "expected": { "columns": ["x"], "rows": [[1], [2]] }
    }]));

    let summary = runner().run_suite(&suite, "SELECT x AS y FROM t", &mut NullReporter);
    match &summary.outcomes[0].failure {
        Some(Failure::Mismatch {
            expected_columns,
            actual_columns,
            expected_rows,
            actual_rows,
        }) => {
            assert_eq!(expected_columns, &vec!["x".to_string()]);
            assert_eq!(actual_columns, &vec!["y".to_string()]);
            assert_eq!(expected_rows, actual_rows);
        }
        other => panic!("expected mismatch, got {other:?}"),
    }
}

#[test]
fn test_cases_do_not_share_database_state() {
    let raw = serde_json::to_string(&json!({
        "schema_sql": "CREATE TABLE k(id INTEGER PRIMARY KEY, v TEXT);",
        "cases": [
            {
                "name": "test_case_a",
                "seed_sql": "INSERT INTO k VALUES (1, 'a');",
                "expected": { "columns": ["id", "v"], "rows": [[1, "a"]] }
            },
            {
                "name": "test_case_b",
                "seed_sql": "INSERT INTO k VALUES (1, 'b');",
                "expected": { "columns": ["id", "v"], "rows": [[1, "b"]] }
            }
        ]
    }))
    .unwrap();
    let suite = parse_suite(&raw).unwrap();

    let summary = runner().run_suite(&suite, "SELECT id, v FROM k", &mut NullReporter);
    assert!(summary.success(), "{:?}", summary);
}

#[test]
fn test_nulls_and_mixed_types_compare_after_normalization() {
    let raw = serde_json::to_string(&json!({
        "schema_sql": "CREATE TABLE p(name TEXT, price REAL, stock INTEGER);",
        "cases": [{
            "name": "test_case_nulls",
            "seed_sql": "INSERT INTO p VALUES ('pen', 1.5, NULL), ('cup', 3, 7), (NULL, NULL, 0);",
            "expected": {
                "columns": ["name", "price", "stock"],
                "rows": [["cup", 3, 7], [null, null, 0], ["pen", 1.5, null]]
            }
        }]
    }))
    .unwrap();
    let suite = parse_suite(&raw).unwrap();

    let summary = runner().run_suite(
        &suite,
        "SELECT name, price, stock FROM p",
        &mut NullReporter,
    );
    assert!(summary.success(), "{:?}", summary);
}

#[test]
fn test_null_and_empty_text_match_as_multiset() {
    let raw = serde_json::to_string(&json!({
        "schema_sql": "CREATE TABLE s(v TEXT);",
        "cases": [{
            "name": "test_case_blank",
            "seed_sql": "INSERT INTO s VALUES (NULL), ('');",
            "expected": { "columns": ["v"], "rows": [[""], [null]] },
            "order_matters": false
        }]
    }))
    .unwrap();
    let suite = parse_suite(&raw).unwrap();

    let summary = runner().run_suite(&suite, "SELECT v FROM s", &mut NullReporter);
    assert!(summary.success(), "{:?}", summary);
}

#[test]
fn test_large_integer_is_not_rounded_to_real() {
    let suite = suite(json!([{
        "name": "test_case_big",
        "seed_sql": "",
        "expected": { "columns": ["x"], "rows": [[9007199254740992.0]] }
    }]));

    let summary = runner().run_suite(&suite, "SELECT 9007199254740993 AS x", &mut NullReporter);
    assert_eq!(summary.outcomes[0].status, CaseStatus::Fail);

    let summary = runner().run_suite(&suite, "SELECT 9007199254740992 AS x", &mut NullReporter);
    assert!(summary.success(), "{:?}", summary);
}

#[test]
fn test_mixed_large_numbers_match_as_multiset() {
    let suite = suite(json!([{
        "name": "test_case_big_set",
        "seed_sql": concat!(
            "INSERT INTO t VALUES (9007199254740993), ",
            "(9007199254740992.0), (9007199254740992);"
        ),
        "expected": {
            "columns": ["x"],
            "rows": [[9007199254740992i64], [9007199254740992.0], [9007199254740993i64]]
        }
    }]));

    let summary = runner().run_suite(&suite, "SELECT x FROM t", &mut NullReporter);
    assert!(summary.success(), "{:?}", summary);
}

#[test]
fn test_run_single_returns_raw_rows_in_engine_order() {
    let suite = suite(json!([{
        "seed_sql": "INSERT INTO t VALUES (3),(1),(2);",
        "expected": { "columns": ["x"], "rows": [] }
    }]));

    let out = runner()
        .run_single(&suite, "SELECT x, NULL AS n FROM t ORDER BY x DESC")
        .unwrap();
    assert_eq!(out.columns, vec!["x", "n"]);
    assert_eq!(
        out.rows,
        vec![
            vec![Cell::Number(Number::Integer(3)), Cell::Null],
            vec![Cell::Number(Number::Integer(2)), Cell::Null],
            vec![Cell::Number(Number::Integer(1)), Cell::Null],
        ]
    );
}
