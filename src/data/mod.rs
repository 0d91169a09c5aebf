//! Data source integration (published Google Sheets CSV export).

pub mod sheet;

pub use sheet::{SheetClient, resolve_source};
