//! Terminal text charts.

pub mod ascii;

pub use ascii::render_chart;
