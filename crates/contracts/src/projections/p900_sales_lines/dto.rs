use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One order line item of the sales snapshot (P900)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesLine {
    pub row_id: String,

    // Order
    pub order_id: String,
    pub order_date: NaiveDate,
    /// Hour of the order, 0..=23
    pub order_hour: u8,
    pub shift: String,
    pub day_of_week: String,
    pub customer_name: String,
    /// Order type: dine-in / take-away
    pub channel: String,

    // Item
    pub item_id: String,
    pub sku: String,
    pub item_name: String,
    pub category: String,
    pub size: String,

    // Sums
    pub quantity: i64,
    pub unit_price: f64,
    /// Trusted as given, never reconciled with quantity * unit_price
    pub revenue: f64,
    pub unit_cost: f64,
    pub total_cost: f64,
    pub contribution: f64,
    /// Contribution / revenue as a 0..1 fraction. `None` when revenue is zero
    /// or the source percentage was blank.
    pub margin: Option<f64>,
}

/// Counters collected while loading a snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    /// Data rows read from the source, header line excluded
    pub raw_rows: usize,
    /// Re-imported header rows dropped before typing
    pub header_artifacts: usize,
    pub loaded_rows: usize,
}
