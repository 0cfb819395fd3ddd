pub mod group_builder;
pub mod items;

pub use group_builder::*;
pub use items::*;

/// `numerator / denominator`, undefined (`None`) for a zero denominator
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// `part / whole * 100`, undefined for a zero whole
pub fn percent(part: f64, whole: f64) -> Option<f64> {
    ratio(part, whole).map(|r| r * 100.0)
}
