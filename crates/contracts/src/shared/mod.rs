pub mod analytics;
pub mod indicators;
pub mod report;
