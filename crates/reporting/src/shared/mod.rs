pub mod aggregation;
pub mod config;
pub mod format;
pub mod indicators;
pub mod reports;

#[cfg(test)]
pub(crate) mod test_support;
