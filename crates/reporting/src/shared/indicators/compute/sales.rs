use contracts::shared::analytics::GroupAggregate;
use std::collections::HashSet;

use crate::projections::p900_sales_lines::SalesSnapshot;
use crate::shared::aggregation::grand_total;

// ---------------------------------------------------------------------------
// Snapshot-wide aggregate
// ---------------------------------------------------------------------------

fn fetch_agg(snapshot: &SalesSnapshot) -> GroupAggregate {
    grand_total(snapshot.lines())
}

// ---------------------------------------------------------------------------
// Public compute functions
// ---------------------------------------------------------------------------

pub fn compute_sales_revenue(snapshot: &SalesSnapshot) -> Option<f64> {
    Some(fetch_agg(snapshot).revenue)
}

pub fn compute_sales_cost(snapshot: &SalesSnapshot) -> Option<f64> {
    Some(fetch_agg(snapshot).cost)
}

pub fn compute_sales_profit(snapshot: &SalesSnapshot) -> Option<f64> {
    Some(fetch_agg(snapshot).profit)
}

pub fn compute_sales_margin_pct(snapshot: &SalesSnapshot) -> Option<f64> {
    fetch_agg(snapshot).margin_pct
}

pub fn compute_sales_order_count(snapshot: &SalesSnapshot) -> Option<f64> {
    Some(fetch_agg(snapshot).orders as f64)
}

pub fn compute_sales_items_sold(snapshot: &SalesSnapshot) -> Option<f64> {
    Some(fetch_agg(snapshot).items_sold as f64)
}

pub fn compute_sales_avg_order_value(snapshot: &SalesSnapshot) -> Option<f64> {
    fetch_agg(snapshot).avg_order_value
}

pub fn compute_sales_avg_items_per_order(snapshot: &SalesSnapshot) -> Option<f64> {
    fetch_agg(snapshot).avg_items_per_order
}

pub fn compute_sales_customer_count(snapshot: &SalesSnapshot) -> Option<f64> {
    let customers: HashSet<&str> = snapshot
        .lines()
        .iter()
        .map(|l| l.customer_name.trim())
        .filter(|name| !name.is_empty())
        .collect();
    Some(customers.len() as f64)
}

pub fn compute_sales_line_count(snapshot: &SalesSnapshot) -> Option<f64> {
    Some(snapshot.lines().len() as f64)
}
