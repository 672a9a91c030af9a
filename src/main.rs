/*!
 * forker - Main Entry Point
 *
 * Command line front end for a named supervisor:
 * - dispatch one job, or a batch of jobs from one process
 * - terminate one tracked child or all of them
 * - list tracked children
 */

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use tracing::info;

use task_forker::{
    init_tracing, DispatchReport, JobArgs, JobDescriptor, KillTarget, Supervisor,
    SupervisorConfig,
};

#[derive(Parser)]
#[command(name = "forker", version, about = "Fork jobs up to a concurrency limit")]
struct Cli {
    /// Supervisor name (overrides FORKER_NAME)
    #[arg(long, global = true)]
    name: Option<String>,

    /// Pidfile directory (overrides FORKER_RUNTIME_PATH)
    #[arg(long, global = true)]
    runtime_path: Option<PathBuf>,

    /// Pidfile suffix (overrides FORKER_PIDFILE_EXT)
    #[arg(long, global = true)]
    file_extension: Option<String>,

    /// Concurrent children allowed (overrides FORKER_MAX_PROCESS)
    #[arg(long, global = true)]
    max_process: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Dispatch one job, waiting for a free slot first
    Dispatch {
        /// Registered job kind (built-in: sleep, exec)
        kind: String,
        /// Job arguments as key=value
        #[arg(value_parser = parse_arg)]
        args: Vec<(String, String)>,
    },
    /// Dispatch several copies of a job from this process
    Run {
        /// Number of jobs to dispatch
        #[arg(long, default_value_t = 1)]
        count: usize,
        kind: String,
        #[arg(value_parser = parse_arg)]
        args: Vec<(String, String)>,
    },
    /// SIGKILL a tracked child, or all of them
    Terminate {
        /// 'all' or a pid
        target: Option<String>,
    },
    /// List tracked children
    List {
        /// Print a JSON array instead of the numbered list
        #[arg(long)]
        json: bool,
    },
}

fn parse_arg(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = SupervisorConfig::from_env()?;
    if let Some(name) = cli.name {
        config.name = Some(name);
    }
    if let Some(path) = cli.runtime_path {
        config.runtime_path = path;
    }
    if let Some(ext) = cli.file_extension {
        config.file_extension = ext;
    }
    if let Some(max) = cli.max_process {
        config.max_process = max;
    }

    let supervisor = Supervisor::new(config);

    match cli.command {
        Command::Dispatch { kind, args } => {
            let descriptor = JobDescriptor::new(kind).with_args(args.into_iter().collect());
            let report = supervisor.dispatch(&descriptor)?;
            print_reclaimed(&report);
            println!("{}", report.pid);
        }
        Command::Run { count, kind, args } => {
            let descriptor =
                JobDescriptor::new(kind).with_args(args.into_iter().collect::<JobArgs>());
            for _ in 0..count {
                let report = supervisor.dispatch(&descriptor)?;
                print_reclaimed(&report);
                println!("{}", report.pid);
            }
            info!(count, "Batch dispatched");
        }
        Command::Terminate { target } => {
            let target = target
                .map(|raw| raw.parse::<KillTarget>())
                .transpose()?;
            match supervisor.terminate(target)? {
                None => eprintln!("Nothing to terminate"),
                Some(report) => {
                    for failure in &report.failed {
                        eprintln!("Failed to kill {}: {}", failure.pid, failure.errno);
                    }
                    if !report.is_complete() {
                        return Err(miette::miette!(
                            "{} of {} kills failed",
                            report.failed.len(),
                            report.failed.len() + report.removed().count()
                        ));
                    }
                }
            }
        }
        Command::List { json } => {
            if json {
                let pids = supervisor.pid_list()?.unwrap_or_default();
                println!("{}", serde_json::to_string(&pids).into_diagnostic()?);
            } else if !supervisor.show_pid_list(&mut io::stdout().lock())? {
                eprintln!("No tracked processes");
            }
        }
    }

    Ok(())
}

fn print_reclaimed(report: &DispatchReport) {
    for exit in report.failures() {
        eprintln!("Reclaimed slot from failed child: {}", exit);
    }
}
