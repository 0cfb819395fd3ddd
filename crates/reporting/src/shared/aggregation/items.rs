use contracts::projections::p900_sales_lines::SalesLine;
use contracts::shared::analytics::ItemAggregate;
use std::collections::BTreeMap;

use super::{percent, ratio};

#[derive(Debug, Default)]
struct ItemTotals {
    units_sold: i64,
    revenue: f64,
    profit: f64,
}

/// One aggregate per (item name, category, size), ordered by that key.
///
/// Recomputed from the lines on every call.
pub fn item_aggregates(lines: &[SalesLine]) -> Vec<ItemAggregate> {
    let mut items: BTreeMap<(&str, &str, &str), ItemTotals> = BTreeMap::new();

    for line in lines {
        let key = (
            line.item_name.as_str(),
            line.category.as_str(),
            line.size.as_str(),
        );
        let totals = items.entry(key).or_default();
        totals.units_sold += line.quantity;
        totals.revenue += line.revenue;
        totals.profit += line.contribution;
    }

    items
        .into_iter()
        .map(|((item_name, category, size), t)| ItemAggregate {
            item_name: item_name.to_string(),
            category: category.to_string(),
            size: size.to_string(),
            units_sold: t.units_sold,
            revenue: t.revenue,
            profit: t.profit,
            margin_pct: percent(t.profit, t.revenue),
            profit_per_unit: ratio(t.profit, t.units_sold as f64),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::format::round2;
    use crate::shared::test_support::line;

    #[test]
    fn test_items_keyed_by_name_category_size() {
        let mut lines = vec![
            line("1", "O1", "Latte", "Coffee", 2, 10.0, 6.0),
            line("2", "O2", "Latte", "Coffee", 1, 5.0, 3.0),
            line("3", "O3", "Latte", "Coffee", 1, 6.0, 3.5),
        ];
        lines[2].size = "L".into();

        let items = item_aggregates(&lines);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].size, "L");
        assert_eq!(items[1].size, "M");
        assert_eq!(items[1].units_sold, 3);
        assert_eq!(items[1].revenue, 15.0);
        assert_eq!(items[1].profit, 9.0);
        assert_eq!(items[1].margin_pct.map(round2), Some(60.0));
        assert_eq!(items[1].profit_per_unit, Some(3.0));
    }

    #[test]
    fn test_zero_revenue_item_has_no_margin() {
        let lines = vec![line("1", "O1", "Water", "Drinks", 1, 0.0, -0.5)];
        let items = item_aggregates(&lines);
        assert_eq!(items[0].margin_pct, None);
        assert_eq!(items[0].profit_per_unit, Some(-0.5));
    }
}
