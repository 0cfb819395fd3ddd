use contracts::projections::p900_sales_lines::SalesLine;
use contracts::shared::analytics::{Dimension, DimensionValue, GroupAggregate};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use super::{percent, ratio};

/// Running sums of one group. Kept unrounded.
#[derive(Debug, Default)]
struct Accumulator<'a> {
    orders: HashSet<&'a str>,
    items_sold: i64,
    revenue: f64,
    cost: f64,
    profit: f64,
}

impl<'a> Accumulator<'a> {
    fn add(&mut self, line: &'a SalesLine) {
        self.orders.insert(line.order_id.as_str());
        self.items_sold += line.quantity;
        self.revenue += line.revenue;
        self.cost += line.total_cost;
        self.profit += line.contribution;
    }

    fn finish(self, key: Vec<(Dimension, DimensionValue)>) -> GroupAggregate {
        let orders = self.orders.len() as u64;
        GroupAggregate {
            key,
            orders,
            items_sold: self.items_sold,
            revenue: self.revenue,
            cost: self.cost,
            profit: self.profit,
            margin_pct: percent(self.profit, self.revenue),
            avg_order_value: ratio(self.revenue, orders as f64),
            avg_items_per_order: ratio(self.items_sold as f64, orders as f64),
        }
    }
}

/// Groups sales lines by the cross product of the requested dimensions
pub struct GroupBuilder {
    /// Grouping dimensions (in order)
    dimensions: Vec<Dimension>,
}

impl GroupBuilder {
    pub fn new(dimensions: Vec<Dimension>) -> Self {
        Self { dimensions }
    }

    /// Fold lines into one aggregate per distinct key, ordered by key.
    ///
    /// With no dimensions the whole input is a single group, even when empty.
    pub fn build(&self, lines: &[SalesLine]) -> Vec<GroupAggregate> {
        let mut groups: BTreeMap<Vec<DimensionValue>, Accumulator> = BTreeMap::new();

        if self.dimensions.is_empty() {
            groups.insert(Vec::new(), Accumulator::default());
        }

        for line in lines {
            let key: Vec<DimensionValue> =
                self.dimensions.iter().map(|d| d.value_of(line)).collect();
            groups.entry(key).or_default().add(line);
        }

        groups
            .into_iter()
            .map(|(values, acc)| {
                let key = self.dimensions.iter().copied().zip(values).collect();
                acc.finish(key)
            })
            .collect()
    }
}

/// Aggregate lines grouped by `dimensions`
pub fn aggregate(lines: &[SalesLine], dimensions: &[Dimension]) -> Vec<GroupAggregate> {
    GroupBuilder::new(dimensions.to_vec()).build(lines)
}

/// Aggregate of the whole snapshot
pub fn grand_total(lines: &[SalesLine]) -> GroupAggregate {
    // A builder without dimensions always yields exactly one group
    GroupBuilder::new(Vec::new())
        .build(lines)
        .pop()
        .unwrap_or_else(|| Accumulator::default().finish(Vec::new()))
}

/// Stable sort, revenue descending
pub fn sort_by_revenue_desc(groups: &mut [GroupAggregate]) {
    groups.sort_by(|a, b| desc(a.revenue, b.revenue));
}

/// Stable sort, profit descending
pub fn sort_by_profit_desc(groups: &mut [GroupAggregate]) {
    groups.sort_by(|a, b| desc(a.profit, b.profit));
}

fn desc(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}
