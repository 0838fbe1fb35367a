use super::args::*;
use anyhow::Context;
use sqljudge_core::config::{load_solution, parse_suite, read_text};
use sqljudge_core::engine::{Runner, SqliteExecutor};
use sqljudge_core::errors::JudgeError;
use sqljudge_core::fingerprint::Fingerprint;
use sqljudge_core::report::console::{write_table, ConsoleReporter};
use std::sync::Arc;

pub mod validate;

pub mod exit_codes {
    pub const OK: i32 = 0;
    pub const TEST_FAILED: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
}

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Some(Command::Validate(args)) => validate::run(args),
        Some(Command::Version) => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(exit_codes::OK)
        }
        None => cmd_judge(cli.judge),
    }
}

/// Known failures end the run here with a message on stderr; anything else
/// propagates to `main` as a fatal error.
fn cmd_judge(args: JudgeArgs) -> anyhow::Result<i32> {
    match judge(&args) {
        Ok(code) => Ok(code),
        Err(e) => match judge_exit_code(&e) {
            Some(code) => {
                eprintln!("{}", e);
                Ok(code)
            }
            None => Err(e),
        },
    }
}

/// Configuration problems map to CONFIG_ERROR, execution failures to
/// TEST_FAILED. `None` for errors that did not come from the judge.
fn judge_exit_code(e: &anyhow::Error) -> Option<i32> {
    e.downcast_ref::<JudgeError>().map(|je| {
        if je.is_config_error() {
            exit_codes::CONFIG_ERROR
        } else {
            exit_codes::TEST_FAILED
        }
    })
}

fn judge(args: &JudgeArgs) -> anyhow::Result<i32> {
    let suite_path = args.workspace.suite_path();
    let solution_path = args.solution_path();

    let query = load_solution(&solution_path)?;
    let suite_raw = read_text(&suite_path)?;
    let suite = parse_suite(&suite_raw)?;
    let fingerprint = Fingerprint::compute(&suite_raw, &query);

    tracing::info!(
        event = "suite.loaded",
        suite = %suite_path.display(),
        cases = suite.cases.len(),
        mode = ?args.mode,
        suite_sha256 = %fingerprint.suite_sha256,
        solution_sha256 = %fingerprint.solution_sha256,
    );

    let runner = Runner::new(Arc::new(SqliteExecutor));

    match args.mode {
        Mode::Run => {
            let output = runner.run_single(&suite, &query)?;
            let stdout = std::io::stdout();
            write_table(&mut stdout.lock(), &output).context("failed to write result table")?;
            Ok(exit_codes::OK)
        }
        Mode::Test => {
            let mut reporter = ConsoleReporter::new(std::io::stdout(), std::io::stderr());
            let summary = runner.run_suite(&suite, &query, &mut reporter);

            if let Some(out) = &args.report {
                if let Err(e) = sqljudge_core::report::json::write_json(&summary, &fingerprint, out)
                {
                    tracing::warn!(
                        event = "report.write_failed",
                        path = %out.display(),
                        error = %e,
                    );
                }
            }

            Ok(if summary.success() {
                exit_codes::OK
            } else {
                exit_codes::TEST_FAILED
            })
        }
    }
}
