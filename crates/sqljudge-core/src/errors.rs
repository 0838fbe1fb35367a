use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Script or statement being applied when the engine raised an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Schema,
    Seed,
    Query,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Schema => "schema",
            Phase::Seed => "seed",
            Phase::Query => "query",
        };
        f.write_str(s)
    }
}

/// An engine-level failure while materializing or querying a case database.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("failed to open sandbox database: {0}")]
    Open(#[source] rusqlite::Error),
    #[error("{phase} failed: {source}")]
    Sql {
        phase: Phase,
        #[source]
        source: rusqlite::Error,
    },
}

impl ExecutionError {
    pub fn sql(phase: Phase, source: rusqlite::Error) -> Self {
        ExecutionError::Sql { phase, source }
    }

    pub fn phase(&self) -> Option<Phase> {
        match self {
            ExecutionError::Open(_) => None,
            ExecutionError::Sql { phase, .. } => Some(*phase),
        }
    }
}

#[derive(Error, Debug)]
pub enum JudgeError {
    #[error("Invalid test suite: {0}")]
    MalformedSuite(String),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl JudgeError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        JudgeError::MalformedSuite(msg.into())
    }

    /// Configuration problems abort a run before any case executes.
    pub fn is_config_error(&self) -> bool {
        matches!(self, JudgeError::MalformedSuite(_) | JudgeError::Io { .. })
    }
}
