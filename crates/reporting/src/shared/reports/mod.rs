pub mod catalog;
pub mod render;

pub use catalog::{catalog, report_names, run_report};
