//! `leads-dashboard` library crate.
//!
//! The binary (`leads`) is a thin wrapper around this library so that:
//!
//! - aggregation is testable without a network or a terminal
//! - the CLI report, the exports and the TUI share one pipeline

pub mod app;
pub mod cli;
pub mod dashboard;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod metrics;
pub mod plot;
pub mod report;
pub mod tui;
