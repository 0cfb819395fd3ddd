//! Fixtures shared by unit tests.

use chrono::NaiveDate;
use contracts::projections::p900_sales_lines::SalesLine;

/// A sales line with the given money figures; everything else is filler.
/// Total cost is `revenue - contribution`.
pub fn line(
    row_id: &str,
    order_id: &str,
    item_name: &str,
    category: &str,
    quantity: i64,
    revenue: f64,
    contribution: f64,
) -> SalesLine {
    let total_cost = revenue - contribution;
    SalesLine {
        row_id: row_id.to_string(),
        order_id: order_id.to_string(),
        order_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        order_hour: 9,
        shift: "Morning".to_string(),
        day_of_week: "Monday".to_string(),
        customer_name: "Walk-in".to_string(),
        channel: "Dine-in".to_string(),
        item_id: format!("ITM-{item_name}"),
        sku: format!("{item_name}-M"),
        item_name: item_name.to_string(),
        category: category.to_string(),
        size: "M".to_string(),
        quantity,
        unit_price: revenue / quantity as f64,
        revenue,
        unit_cost: total_cost / quantity as f64,
        total_cost,
        contribution,
        margin: if revenue == 0.0 {
            None
        } else {
            Some(contribution / revenue)
        },
    }
}
