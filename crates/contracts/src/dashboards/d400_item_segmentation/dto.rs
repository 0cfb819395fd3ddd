use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::analytics::ItemAggregate;

/// Pareto classification of an item by cumulative profit share
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfitSegment {
    CoreProfitDrivers,
    LongTail,
}

impl ProfitSegment {
    pub fn label(&self) -> &'static str {
        match self {
            ProfitSegment::CoreProfitDrivers => "Core Profit Drivers",
            ProfitSegment::LongTail => "Long Tail",
        }
    }
}

impl fmt::Display for ProfitSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Quadrant of the units × margin matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemStrategy {
    Star,
    VolumeDriver,
    HighMarginNiche,
    WeakPerformer,
}

impl ItemStrategy {
    pub const ALL: [ItemStrategy; 4] = [
        ItemStrategy::Star,
        ItemStrategy::VolumeDriver,
        ItemStrategy::HighMarginNiche,
        ItemStrategy::WeakPerformer,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ItemStrategy::Star => "Star",
            ItemStrategy::VolumeDriver => "Volume Driver",
            ItemStrategy::HighMarginNiche => "High Margin Niche",
            ItemStrategy::WeakPerformer => "Weak Performer",
        }
    }
}

impl fmt::Display for ItemStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Item aggregate with its Pareto position and strategy quadrant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentedItem {
    pub item: ItemAggregate,
    /// 1-based position in profit-descending order
    pub rank: usize,
    pub cumulative_profit: f64,
    /// `None` when total profit is not positive
    pub cumulative_pct: Option<f64>,
    /// Item profit as a share of total profit, `None` when total profit is not positive
    pub profit_share_pct: Option<f64>,
    pub profit_segment: Option<ProfitSegment>,
    pub item_strategy: ItemStrategy,
}

/// Dataset-wide figures the segmentation was computed against
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SegmentationSummary {
    pub total_profit: f64,
    /// Simple mean of units sold across items
    pub avg_units: Option<f64>,
    /// Simple mean of item margin % across items with a defined margin
    pub avg_margin_pct: Option<f64>,
}

/// Result of segmenting an item list
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Segmentation {
    pub summary: SegmentationSummary,
    pub items: Vec<SegmentedItem>,
}
