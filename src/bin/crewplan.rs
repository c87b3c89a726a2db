//! Command-line front door (spec §6): reads a planning request as JSON and
//! prints the output document as JSON. Request transport over HTTP, job
//! bookkeeping, and dashboards are external collaborators, not this binary.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use crewplan::{solution::PlanDocument, Config, PlanRequest};

#[derive(Parser)]
#[command(name = "crewplan", about = "Hybrid greedy / CP-SAT task scheduler")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Plans once from a single JSON request read from a file or stdin.
    Plan {
        /// Path to a JSON request; reads stdin when omitted.
        #[arg(long)]
        input: Option<std::path::PathBuf>,
    },
    /// Reads one JSON request per line from stdin and writes one JSON
    /// response per line to stdout, for embedding behind a fire-and-poll
    /// job queue.
    Repl,
}

fn main() -> ExitCode {
    crewplan::telemetry::init_tracing();

    let cli = Cli::parse();
    let base_config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return ExitCode::from(3);
        }
    };

    match cli.command {
        Command::Plan { input } => run_plan(input, &base_config),
        Command::Repl => run_repl(&base_config),
    }
}

fn run_plan(input: Option<std::path::PathBuf>, base_config: &Config) -> ExitCode {
    let raw = match input {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(s) => s,
            Err(err) => {
                eprintln!("failed to read {}: {err}", path.display());
                return ExitCode::from(3);
            }
        },
        None => {
            use std::io::Read;
            let mut buf = String::new();
            if let Err(err) = io::stdin().lock().read_to_string(&mut buf) {
                eprintln!("failed to read stdin: {err}");
                return ExitCode::from(3);
            }
            buf
        }
    };

    match execute(&raw, base_config) {
        Ok(document) => {
            println!("{}", serde_json::to_string_pretty(&document).expect("document serializes"));
            exit_code_for(&document)
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(3)
        }
    }
}

fn run_repl(base_config: &Config) -> ExitCode {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut worst = ExitCode::SUCCESS;

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) if l.trim().is_empty() => continue,
            Ok(l) => l,
            Err(err) => {
                eprintln!("failed to read line: {err}");
                worst = ExitCode::from(3);
                continue;
            }
        };

        match execute(&line, base_config) {
            Ok(document) => {
                let _ = writeln!(out, "{}", serde_json::to_string(&document).expect("document serializes"));
                let code = exit_code_for(&document);
                if code != ExitCode::SUCCESS {
                    worst = code;
                }
            }
            Err(err) => {
                let _ = writeln!(out, "{{\"error\": {:?}}}", err.to_string());
                worst = ExitCode::from(3);
            }
        }
    }

    worst
}

fn execute(raw: &str, base_config: &Config) -> Result<PlanDocument, crewplan::PlanError> {
    let request: PlanRequest =
        serde_json::from_str(raw).map_err(|err| crewplan::PlanError::InvalidInput(err.to_string()))?;
    crewplan::plan_request(request, base_config)
}

/// Exit codes per spec §6: 0 on any solution (including `PARTIAL`), 2 on
/// cap exceeded with no solution.
fn exit_code_for(document: &PlanDocument) -> ExitCode {
    use crewplan::solution::Status;
    match document.status {
        Status::Infeasible => ExitCode::from(2),
        _ => ExitCode::SUCCESS,
    }
}
