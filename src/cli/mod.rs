//! Command-line parsing for the sales-lead dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the aggregation code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::PeriodFilter;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "leads", version, about = "Sales-lead dashboard for a published spreadsheet")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the summary figures, category tables and text charts.
    Summary(SummaryArgs),
    /// List the periods present in the sheet (most recent first).
    Months(SourceArgs),
    /// Write the aggregate to JSON and/or the daily series to CSV.
    Export(ExportArgs),
    /// Launch the interactive dashboard.
    Tui(TuiArgs),
}

/// Where the sheet is read from and how the run logs.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Published CSV URL (overrides `LEADS_SHEET_URL`).
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Read a local CSV export instead of downloading.
    #[arg(long, value_name = "CSV", conflicts_with = "url")]
    pub file: Option<PathBuf>,

    /// Append logs to this file (the TUI logs nowhere without it).
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Period selection shared by all aggregating commands.
#[derive(Debug, Args, Clone)]
pub struct PeriodArgs {
    /// Restrict to one month (`MM/YYYY`) or `all`.
    #[arg(short = 'p', long, value_name = "MM/YYYY", default_value = "all", value_parser = parse_period)]
    pub period: PeriodFilter,
}

#[derive(Debug, Args, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub period: PeriodArgs,

    /// Skip the text charts.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Line chart height (rows).
    #[arg(long, default_value_t = 12)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub period: PeriodArgs,

    /// Write the aggregate as JSON (`-` for stdout).
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Write the daily sales series as CSV (`-` for stdout).
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub period: PeriodArgs,
}

fn parse_period(s: &str) -> Result<PeriodFilter, String> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Period;

    #[test]
    fn summary_parses_period() {
        let cli = Cli::try_parse_from(["leads", "summary", "-p", "07/2024", "--file", "x.csv"]).unwrap();
        let Command::Summary(args) = cli.command else {
            panic!("expected summary");
        };
        assert_eq!(args.period.period, PeriodFilter::Month(Period { year: 2024, month: 7 }));
        assert_eq!(args.source.file, Some(PathBuf::from("x.csv")));
        assert!(!args.no_plot);
    }

    #[test]
    fn bad_period_is_rejected() {
        assert!(Cli::try_parse_from(["leads", "summary", "-p", "2024-07"]).is_err());
    }

    #[test]
    fn url_and_file_conflict() {
        assert!(Cli::try_parse_from(["leads", "months", "--url", "http://x", "--file", "y.csv"]).is_err());
    }
}
