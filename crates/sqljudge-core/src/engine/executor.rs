use crate::errors::{ExecutionError, Phase};
use crate::model::QueryOutput;
use crate::normalize::{normalize, Row};
use rusqlite::Connection;

/// Runs one case: schema, then seed, then the candidate query, against a
/// database no other case can see.
pub trait CaseExecutor {
    fn execute(
        &self,
        schema_sql: &str,
        seed_sql: &str,
        query_sql: &str,
    ) -> Result<QueryOutput, ExecutionError>;
}

/// A private in-memory SQLite database. Closed when dropped, on every exit
/// path of the call that opened it.
pub struct Sandbox {
    conn: Connection,
}

impl Sandbox {
    pub fn open() -> Result<Self, ExecutionError> {
        let conn = Connection::open_in_memory().map_err(ExecutionError::Open)?;
        tracing::trace!(event = "sandbox.open");
        Ok(Self { conn })
    }

    /// Applies a multi-statement script.
    pub fn apply_script(&self, phase: Phase, sql: &str) -> Result<(), ExecutionError> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| ExecutionError::sql(phase, e))
    }

    /// Runs exactly one statement and collects its declared columns and its
    /// rows in engine order.
    pub fn query(&self, sql: &str) -> Result<QueryOutput, ExecutionError> {
        let err = |e| ExecutionError::sql(Phase::Query, e);

        let mut stmt = self.conn.prepare(sql).map_err(err)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let width = columns.len();

        let mut rows: Vec<Row> = Vec::new();
        let mut cursor = stmt.query([]).map_err(err)?;
        while let Some(row) = cursor.next().map_err(err)? {
            let mut cells = Vec::with_capacity(width);
            for i in 0..width {
                cells.push(normalize(row.get_ref(i).map_err(err)?));
            }
            rows.push(cells);
        }

        Ok(QueryOutput { columns, rows })
    }
}

impl Drop for Sandbox {
    fn drop(&mut self) {
        tracing::trace!(event = "sandbox.release");
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteExecutor;

impl CaseExecutor for SqliteExecutor {
    fn execute(
        &self,
        schema_sql: &str,
        seed_sql: &str,
        query_sql: &str,
    ) -> Result<QueryOutput, ExecutionError> {
        let sandbox = Sandbox::open()?;
        sandbox.apply_script(Phase::Schema, schema_sql)?;
        sandbox.apply_script(Phase::Seed, seed_sql)?;
        sandbox.query(query_sql)
    }
}
