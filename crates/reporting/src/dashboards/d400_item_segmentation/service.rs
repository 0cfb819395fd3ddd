use contracts::dashboards::d400_item_segmentation::{
    ItemStrategy, ProfitSegment, Segmentation, SegmentationSummary, SegmentedItem,
};
use contracts::shared::analytics::ItemAggregate;
use std::cmp::Ordering;

use crate::shared::aggregation::percent;

/// Cumulative profit share (inclusive) up to which items are core profit drivers
pub const CORE_PROFIT_THRESHOLD_PCT: f64 = 80.0;

/// Tolerance for the threshold comparison so that an exact 80% share stays inclusive
const THRESHOLD_EPSILON: f64 = 1e-9;

/// Rank items by profit and classify them by Pareto segment and strategy quadrant
pub fn segment(items: &[ItemAggregate]) -> Segmentation {
    let mut ranked: Vec<&ItemAggregate> = items.iter().collect();
    ranked.sort_by(|a, b| profit_rank_order(a, b));

    let total_profit: f64 = ranked.iter().map(|i| i.profit).sum();
    let summary = SegmentationSummary {
        total_profit,
        avg_units: mean(items.iter().map(|i| i.units_sold as f64)),
        avg_margin_pct: mean(items.iter().filter_map(|i| i.margin_pct)),
    };

    if total_profit <= 0.0 && !items.is_empty() {
        tracing::warn!(
            "Total profit is {}, profit shares are undefined",
            total_profit
        );
    }

    let mut running_profit = 0.0;
    let items = ranked
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            running_profit += item.profit;
            let cumulative_pct = share_of_total(running_profit, total_profit);
            SegmentedItem {
                item: item.clone(),
                rank: idx + 1,
                cumulative_profit: running_profit,
                cumulative_pct,
                profit_share_pct: share_of_total(item.profit, total_profit),
                profit_segment: cumulative_pct.map(profit_segment),
                item_strategy: item_strategy(item, &summary),
            }
        })
        .collect();

    Segmentation { summary, items }
}

/// Profit descending, then item name, category and size ascending
fn profit_rank_order(a: &ItemAggregate, b: &ItemAggregate) -> Ordering {
    b.profit
        .total_cmp(&a.profit)
        .then_with(|| a.item_name.cmp(&b.item_name))
        .then_with(|| a.category.cmp(&b.category))
        .then_with(|| a.size.cmp(&b.size))
}

/// Percentage of total profit; undefined unless total profit is positive
fn share_of_total(value: f64, total_profit: f64) -> Option<f64> {
    if total_profit > 0.0 {
        percent(value, total_profit)
    } else {
        None
    }
}

pub fn profit_segment(cumulative_pct: f64) -> ProfitSegment {
    if cumulative_pct <= CORE_PROFIT_THRESHOLD_PCT + THRESHOLD_EPSILON {
        ProfitSegment::CoreProfitDrivers
    } else {
        ProfitSegment::LongTail
    }
}

/// 2×2 placement against the dataset averages.
///
/// An undefined margin (or average margin) is neither above nor below the
/// average, so such an item can only be a Weak Performer.
pub fn item_strategy(item: &ItemAggregate, summary: &SegmentationSummary) -> ItemStrategy {
    let high_units = summary
        .avg_units
        .is_some_and(|avg| item.units_sold as f64 >= avg);
    let high_margin = match (item.margin_pct, summary.avg_margin_pct) {
        (Some(margin), Some(avg)) => Some(margin >= avg),
        _ => None,
    };

    match (high_units, high_margin) {
        (true, Some(true)) => ItemStrategy::Star,
        (true, Some(false)) => ItemStrategy::VolumeDriver,
        (false, Some(true)) => ItemStrategy::HighMarginNiche,
        _ => ItemStrategy::WeakPerformer,
    }
}

/// Simple (unweighted) arithmetic mean
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::aggregation::ratio;
    use proptest::prelude::*;

    fn item(name: &str, units: i64, revenue: f64, profit: f64) -> ItemAggregate {
        ItemAggregate {
            item_name: name.to_string(),
            category: "Coffee".to_string(),
            size: "M".to_string(),
            units_sold: units,
            revenue,
            profit,
            margin_pct: percent(profit, revenue),
            profit_per_unit: ratio(profit, units as f64),
        }
    }

    fn names(s: &Segmentation) -> Vec<&str> {
        s.items.iter().map(|i| i.item.item_name.as_str()).collect()
    }

    #[test]
    fn test_ranked_by_profit_then_name() {
        let items = vec![
            item("Tea", 1, 10.0, 5.0),
            item("Mocha", 1, 10.0, 7.0),
            item("Americano", 1, 10.0, 5.0),
        ];
        let s = segment(&items);
        assert_eq!(names(&s), vec!["Mocha", "Americano", "Tea"]);
        assert_eq!(s.items[0].rank, 1);
        assert_eq!(s.items[2].rank, 3);
        assert_eq!(s.items[2].cumulative_profit, 17.0);
    }

    #[test]
    fn test_exactly_80_percent_is_core() {
        let items = vec![
            item("Latte", 10, 100.0, 50.0),
            item("Mocha", 10, 100.0, 30.0),
            item("Tea", 10, 100.0, 20.0),
        ];
        let s = segment(&items);

        assert_eq!(s.summary.total_profit, 100.0);
        assert_eq!(s.items[0].cumulative_pct, Some(50.0));
        assert_eq!(s.items[1].cumulative_pct, Some(80.0));
        assert_eq!(s.items[0].profit_segment, Some(ProfitSegment::CoreProfitDrivers));
        assert_eq!(s.items[1].profit_segment, Some(ProfitSegment::CoreProfitDrivers));
        assert_eq!(s.items[2].profit_segment, Some(ProfitSegment::LongTail));
        assert_eq!(s.items[2].profit_share_pct, Some(20.0));
    }

    #[test]
    fn test_non_positive_total_profit_leaves_shares_undefined() {
        let items = vec![item("Latte", 5, 10.0, 2.0), item("Cake", 1, 10.0, -5.0)];
        let s = segment(&items);

        assert_eq!(s.summary.total_profit, -3.0);
        for seg in &s.items {
            assert_eq!(seg.cumulative_pct, None);
            assert_eq!(seg.profit_share_pct, None);
            assert_eq!(seg.profit_segment, None);
        }
        assert_eq!(s.items[1].cumulative_profit, -3.0);
    }

    #[test]
    fn test_strategy_quadrants() {
        let summary = SegmentationSummary {
            total_profit: 100.0,
            avg_units: Some(5.0),
            avg_margin_pct: Some(50.0),
        };

        assert_eq!(item_strategy(&item("A", 8, 100.0, 60.0), &summary), ItemStrategy::Star);
        assert_eq!(
            item_strategy(&item("B", 3, 100.0, 70.0), &summary),
            ItemStrategy::HighMarginNiche
        );
        assert_eq!(
            item_strategy(&item("C", 5, 100.0, 10.0), &summary),
            ItemStrategy::VolumeDriver
        );
        assert_eq!(
            item_strategy(&item("D", 1, 100.0, 10.0), &summary),
            ItemStrategy::WeakPerformer
        );
        // both comparisons are inclusive
        assert_eq!(item_strategy(&item("E", 5, 100.0, 50.0), &summary), ItemStrategy::Star);
    }

    #[test]
    fn test_undefined_margin_is_a_weak_performer() {
        let items = vec![item("Water", 10, 0.0, -1.0), item("Latte", 2, 10.0, 6.0)];
        let s = segment(&items);

        assert_eq!(s.summary.avg_units, Some(6.0));
        assert_eq!(s.summary.avg_margin_pct, Some(60.0));
        // high volume, but an undefined margin is neither above nor below average
        let water = s.items.iter().find(|i| i.item.item_name == "Water").unwrap();
        assert_eq!(water.item.margin_pct, None);
        assert_eq!(water.item_strategy, ItemStrategy::WeakPerformer);
    }

    #[test]
    fn test_high_volume_item_without_margin() {
        let summary = SegmentationSummary {
            total_profit: 100.0,
            avg_units: Some(5.0),
            avg_margin_pct: Some(50.0),
        };
        let mut free_refill = item("Refill", 10, 0.0, -2.0);
        free_refill.margin_pct = None;
        assert_eq!(item_strategy(&free_refill, &summary), ItemStrategy::WeakPerformer);

        // no average margin at all: nothing can be a Star or a Volume Driver
        let no_margins = SegmentationSummary {
            avg_margin_pct: None,
            ..summary
        };
        assert_eq!(
            item_strategy(&item("Latte", 10, 100.0, 60.0), &no_margins),
            ItemStrategy::WeakPerformer
        );
    }

    #[test]
    fn test_averages_are_unweighted() {
        let items = vec![
            item("Latte", 9, 100.0, 60.0),
            item("Tea", 1, 10.0, 2.0),
        ];
        let s = segment(&items);
        assert_eq!(s.summary.avg_units, Some(5.0));
        assert_eq!(s.summary.avg_margin_pct, Some(40.0));
    }

    #[test]
    fn test_empty_input() {
        let s = segment(&[]);
        assert!(s.items.is_empty());
        assert_eq!(s.summary.avg_units, None);
        assert_eq!(s.summary.avg_margin_pct, None);
    }

    proptest! {
        #[test]
        fn core_drivers_stay_within_threshold(
            profits in prop::collection::vec(0.01f64..1_000.0, 1..40)
        ) {
            let items: Vec<ItemAggregate> = profits
                .iter()
                .enumerate()
                .map(|(i, p)| item(&format!("item-{i:02}"), 1, p * 2.0, *p))
                .collect();
            let s = segment(&items);
            let total = s.summary.total_profit;

            let core_profit: f64 = s
                .items
                .iter()
                .filter(|i| i.profit_segment == Some(ProfitSegment::CoreProfitDrivers))
                .map(|i| i.item.profit)
                .sum();
            prop_assert!(core_profit / total <= 0.80 + 1e-6);

            // segments form a prefix: core drivers first, then the long tail
            let first_tail = s
                .items
                .iter()
                .position(|i| i.profit_segment == Some(ProfitSegment::LongTail));
            if let Some(idx) = first_tail {
                prop_assert!(s.items[idx..]
                    .iter()
                    .all(|i| i.profit_segment == Some(ProfitSegment::LongTail)));
                // the first long-tail item is the one that crosses 80%
                prop_assert!(s.items[idx].cumulative_pct.unwrap() > 80.0);
            }
        }
    }
}
