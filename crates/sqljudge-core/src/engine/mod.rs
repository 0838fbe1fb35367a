pub mod executor;
pub mod runner;

pub use executor::{CaseExecutor, Sandbox, SqliteExecutor};
pub use runner::{compare, Runner};
