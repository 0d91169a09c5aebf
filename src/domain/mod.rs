//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw and classified rows (`RawRow`, `LeadRecord`)
//! - date keys (`DayStamp`, `Period`, `PeriodFilter`)
//! - aggregation output (`AggregateResult`)
//! - data sources (`DataSource`)

pub mod types;

pub use types::*;
