//! Shared data contracts of the coffee-shop KPI reporting workspace.

pub mod dashboards;
pub mod projections;
pub mod shared;
