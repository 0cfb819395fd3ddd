use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::projections::p900_sales_lines::SalesLine;

// ---------------------------------------------------------------------------
// Grouping dimensions
// ---------------------------------------------------------------------------

/// Attribute of a sales line that can be used as a GROUP BY key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    DayOfWeek,
    Shift,
    Item,
    Category,
    Size,
    Hour,
    Channel,
    Date,
}

impl Dimension {
    /// Column identifier used in report tables
    pub fn id(&self) -> &'static str {
        match self {
            Dimension::DayOfWeek => "day_of_week",
            Dimension::Shift => "shift",
            Dimension::Item => "item_name",
            Dimension::Category => "category",
            Dimension::Size => "size",
            Dimension::Hour => "order_hour",
            Dimension::Channel => "channel",
            Dimension::Date => "order_date",
        }
    }

    /// Display name
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::DayOfWeek => "Day of week",
            Dimension::Shift => "Shift",
            Dimension::Item => "Item",
            Dimension::Category => "Category",
            Dimension::Size => "Size",
            Dimension::Hour => "Hour",
            Dimension::Channel => "Channel",
            Dimension::Date => "Date",
        }
    }

    /// Extract this dimension's value from a line
    pub fn value_of(&self, line: &SalesLine) -> DimensionValue {
        match self {
            Dimension::DayOfWeek => DimensionValue::Text(line.day_of_week.clone()),
            Dimension::Shift => DimensionValue::Text(line.shift.clone()),
            Dimension::Item => DimensionValue::Text(line.item_name.clone()),
            Dimension::Category => DimensionValue::Text(line.category.clone()),
            Dimension::Size => DimensionValue::Text(line.size.clone()),
            Dimension::Hour => DimensionValue::Hour(line.order_hour),
            Dimension::Channel => DimensionValue::Text(line.channel.clone()),
            Dimension::Date => DimensionValue::Date(line.order_date),
        }
    }
}

/// Value of a grouping dimension. Ordered so that group keys sort stably.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DimensionValue {
    Hour(u8),
    Date(NaiveDate),
    Text(String),
}

impl fmt::Display for DimensionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionValue::Hour(h) => write!(f, "{h:02}:00"),
            DimensionValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            DimensionValue::Text(s) => f.write_str(s),
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Metrics of one group produced by the aggregation engine.
///
/// Sums are unrounded. Ratios are `None` whenever their denominator is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAggregate {
    /// (dimension, value) pairs in the order the dimensions were requested
    pub key: Vec<(Dimension, DimensionValue)>,
    /// Distinct order identifiers
    pub orders: u64,
    pub items_sold: i64,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
    pub margin_pct: Option<f64>,
    pub avg_order_value: Option<f64>,
    pub avg_items_per_order: Option<f64>,
}

impl GroupAggregate {
    /// Value of the given dimension in this group's key
    pub fn value(&self, dimension: Dimension) -> Option<&DimensionValue> {
        self.key
            .iter()
            .find(|(d, _)| *d == dimension)
            .map(|(_, v)| v)
    }
}

/// Per-item metrics keyed by (item name, category, size).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAggregate {
    pub item_name: String,
    pub category: String,
    pub size: String,
    pub units_sold: i64,
    pub revenue: f64,
    pub profit: f64,
    /// profit / revenue * 100
    pub margin_pct: Option<f64>,
    /// profit / units_sold
    pub profit_per_unit: Option<f64>,
}
