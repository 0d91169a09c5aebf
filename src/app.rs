//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - fetches the sheet and aggregates it
//! - prints reports/charts or hands off to the TUI
//! - writes optional exports

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, ExportArgs, SourceArgs, SummaryArgs, TuiArgs};
use crate::dashboard::{ChartTarget, DashboardState};
use crate::data::{SheetClient, resolve_source};
use crate::error::{AppError, EXIT_INPUT};
use crate::io::{DashboardExport, write_daily_csv, write_daily_csv_file, write_json, write_json_file};
use crate::report::TIMESTAMP_FORMAT;

pub mod pipeline;

/// Entry point for the `leads` binary.
pub fn run() -> Result<(), AppError> {
    // `leads` and `leads -p 07/2024` behave like `leads tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Summary(args) => handle_summary(args),
        Command::Months(args) => handle_months(args),
        Command::Export(args) => handle_export(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_summary(args: SummaryArgs) -> Result<(), AppError> {
    init_logging(&args.source, LogTarget::Stderr)?;
    let client = client_from_args(&args.source);
    let state = pipeline::load(&client, args.period.period)?;

    let Some(result) = state.result() else {
        return Ok(());
    };
    println!(
        "{}",
        crate::report::format_report(result, state.selected(), fetched_at(&state).as_deref())
    );

    if !args.no_plot {
        for target in ChartTarget::ALL {
            if let Some(spec) = state.charts().get(target) {
                println!("{}", crate::plot::render_chart(spec, args.width, args.height));
            }
        }
    }
    Ok(())
}

fn handle_months(args: SourceArgs) -> Result<(), AppError> {
    init_logging(&args, LogTarget::Stderr)?;
    let client = client_from_args(&args);
    let state = pipeline::load(&client, Default::default())?;
    print!("{}", crate::report::format_months(state.months()));
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    init_logging(&args.source, LogTarget::Stderr)?;
    if args.json.is_none() && args.csv.is_none() {
        return Err(AppError::new(EXIT_INPUT, "Nothing to export: pass `--json PATH` and/or `--csv PATH`."));
    }

    let client = client_from_args(&args.source);
    let state = pipeline::load(&client, args.period.period)?;
    let Some(result) = state.result() else {
        return Ok(());
    };

    if let Some(path) = &args.json {
        let export = DashboardExport {
            tool: "leads",
            fetched_at: fetched_at(&state),
            period: state.selected(),
            aggregate: result,
        };
        if is_stdout(path) {
            write_json(io::stdout().lock(), &export)?;
            println!();
        } else {
            write_json_file(path, &export)?;
        }
    }
    if let Some(path) = &args.csv {
        if is_stdout(path) {
            write_daily_csv(io::stdout().lock(), result)?;
        } else {
            write_daily_csv_file(path, result)?;
        }
    }
    Ok(())
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    init_logging(&args.source, LogTarget::Silent)?;
    let client = client_from_args(&args.source);
    crate::tui::run(client, args.period.period)
}

fn client_from_args(args: &SourceArgs) -> SheetClient {
    SheetClient::new(resolve_source(args.url.clone(), args.file.as_deref()))
}

fn fetched_at(state: &DashboardState) -> Option<String> {
    state.fetched_at().map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
}

fn is_stdout(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Where logs go when `--log-file` is not given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogTarget {
    Stderr,
    /// The TUI owns the terminal; stray log lines would corrupt the screen.
    Silent,
}

/// Install the global `tracing` subscriber. `RUST_LOG` overrides the
/// default `info` level.
fn init_logging(args: &SourceArgs, fallback: LogTarget) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    let installed = if let Some(path) = &args.log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to open log file '{}': {e}", path.display())))?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
    } else {
        match fallback {
            LogTarget::Stderr => builder.with_writer(io::stderr).try_init(),
            LogTarget::Silent => return Ok(()),
        }
    };

    // A subscriber may already be installed (e.g. in tests); keep it.
    installed.ok();
    Ok(())
}

/// Rewrite argv so `leads` defaults to `leads tui`.
///
/// Rules:
/// - `leads`                      -> `leads tui`
/// - `leads -p 07/2024 ...`       -> `leads tui -p 07/2024 ...`
/// - `leads --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "summary" | "months" | "export" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
