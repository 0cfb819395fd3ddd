//! Coffee-shop KPI reporting: typed sales-line loading, grouped aggregation
//! and item profit segmentation over a CSV snapshot.

pub mod dashboards;
pub mod projections;
pub mod shared;
pub mod system;
