use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sqljudge",
    version,
    about = "Grades a single SQL statement against a JSON test suite",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Command>,

    #[command(flatten)]
    pub judge: JudgeArgs,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check the suite without grading a solution
    Validate(ValidateArgs),
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// execute the first case and print its result table
    Run,
    /// grade every case and print PASS/FAIL per case
    Test,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(clap::Args, Debug, Clone)]
pub struct WorkspaceArgs {
    /// Directory holding the solution and the test suite
    #[arg(long, default_value = "/workspace", env = "CODEMM_WORKDIR")]
    pub workdir: PathBuf,

    /// Test suite file, relative to --workdir unless absolute
    #[arg(long, default_value = sqljudge_core::config::DEFAULT_SUITE_FILE)]
    pub suite: PathBuf,
}

impl WorkspaceArgs {
    pub fn suite_path(&self) -> PathBuf {
        self.workdir.join(&self.suite)
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct JudgeArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    #[arg(long, value_enum, default_value_t = Mode::Test, env = "CODEMM_SQL_MODE")]
    pub mode: Mode,

    /// Candidate query file, relative to --workdir unless absolute
    #[arg(long, default_value = sqljudge_core::config::DEFAULT_SOLUTION_FILE)]
    pub solution: PathBuf,

    /// Write a JSON run report (test mode only)
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl JudgeArgs {
    pub fn solution_path(&self) -> PathBuf {
        self.workspace.workdir.join(&self.solution)
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}
