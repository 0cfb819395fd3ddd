use anyhow::bail;
use chrono::Weekday;
use contracts::dashboards::d400_item_segmentation::{ItemStrategy, Segmentation};
use contracts::shared::analytics::{Dimension, DimensionValue, GroupAggregate, ItemAggregate};
use contracts::shared::report::{CellValue, ColumnHeader, MeasureKind, ReportTable};
use once_cell::sync::Lazy;

use crate::dashboards::d400_item_segmentation::segment;
use crate::projections::p900_sales_lines::SalesSnapshot;
use crate::shared::aggregation::{
    aggregate, item_aggregates, percent, sort_by_revenue_desc,
};
use crate::shared::indicators::IndicatorRegistry;

type BuildFn = fn(&ReportDef, &SalesSnapshot) -> ReportTable;

/// A named view over the sales snapshot
pub struct ReportDef {
    pub name: &'static str,
    pub title: &'static str,
    build: BuildFn,
}

impl ReportDef {
    pub fn build(&self, snapshot: &SalesSnapshot) -> ReportTable {
        (self.build)(self, snapshot)
    }
}

const TOP_ITEMS_LIMIT: usize = 10;

static CATALOG: Lazy<Vec<ReportDef>> = Lazy::new(|| {
    vec![
        ReportDef {
            name: "kpi_overview",
            title: "KPI overview",
            build: kpi_overview,
        },
        ReportDef {
            name: "sales_by_day_of_week",
            title: "Sales by day of week",
            build: sales_by_day_of_week,
        },
        ReportDef {
            name: "sales_by_shift",
            title: "Sales by shift",
            build: |def, s| by_dimensions_revenue_desc(def, s, &[Dimension::Shift]),
        },
        ReportDef {
            name: "sales_by_hour",
            title: "Sales by hour of day",
            build: |def, s| by_dimensions(def, s, &[Dimension::Hour]),
        },
        ReportDef {
            name: "sales_by_channel",
            title: "Sales by order type",
            build: |def, s| by_dimensions_revenue_desc(def, s, &[Dimension::Channel]),
        },
        ReportDef {
            name: "sales_by_date",
            title: "Daily sales",
            build: |def, s| by_dimensions(def, s, &[Dimension::Date]),
        },
        ReportDef {
            name: "category_performance",
            title: "Category performance",
            build: |def, s| by_dimensions_revenue_desc(def, s, &[Dimension::Category]),
        },
        ReportDef {
            name: "size_performance",
            title: "Size performance",
            build: |def, s| by_dimensions_revenue_desc(def, s, &[Dimension::Size]),
        },
        ReportDef {
            name: "category_by_shift",
            title: "Category by shift",
            build: |def, s| by_dimensions(def, s, &[Dimension::Category, Dimension::Shift]),
        },
        ReportDef {
            name: "item_performance",
            title: "Item performance",
            build: item_performance,
        },
        ReportDef {
            name: "top_items_by_revenue",
            title: "Top items by revenue",
            build: top_items_by_revenue,
        },
        ReportDef {
            name: "item_pareto",
            title: "Item profit concentration (Pareto)",
            build: item_pareto,
        },
        ReportDef {
            name: "item_strategy",
            title: "Item strategy matrix",
            build: item_strategy,
        },
        ReportDef {
            name: "strategy_summary",
            title: "Strategy quadrant summary",
            build: strategy_summary,
        },
    ]
});

/// Every report, in catalog order
pub fn catalog() -> &'static [ReportDef] {
    &CATALOG
}

pub fn report_names() -> Vec<&'static str> {
    CATALOG.iter().map(|r| r.name).collect()
}

/// Run one named report over the snapshot
pub fn run_report(name: &str, snapshot: &SalesSnapshot) -> anyhow::Result<ReportTable> {
    let Some(def) = CATALOG.iter().find(|r| r.name == name) else {
        bail!(
            "unknown report {:?}; available: {}",
            name,
            report_names().join(", ")
        );
    };

    let table = def.build(snapshot);
    tracing::debug!("Report {} built with {} rows", table.name, table.rows.len());
    Ok(table)
}

// ---------------------------------------------------------------------------
// Grouped sales views
// ---------------------------------------------------------------------------

fn group_columns(dimensions: &[Dimension]) -> Vec<ColumnHeader> {
    let mut columns: Vec<ColumnHeader> = dimensions
        .iter()
        .map(|d| ColumnHeader::grouping(d.id(), d.label()))
        .collect();
    columns.extend([
        ColumnHeader::measure("orders", "Orders", MeasureKind::Count),
        ColumnHeader::measure("items_sold", "Items sold", MeasureKind::Count),
        ColumnHeader::measure("revenue", "Revenue", MeasureKind::Money),
        ColumnHeader::measure("cost", "Cost", MeasureKind::Money),
        ColumnHeader::measure("profit", "Profit", MeasureKind::Money),
        ColumnHeader::measure("margin_pct", "Margin %", MeasureKind::Percent),
        ColumnHeader::measure("avg_order_value", "AOV", MeasureKind::Money),
        ColumnHeader::measure("avg_items_per_order", "Items/order", MeasureKind::Ratio),
    ]);
    columns
}

fn group_row(group: &GroupAggregate) -> Vec<CellValue> {
    let mut row: Vec<CellValue> = group
        .key
        .iter()
        .map(|(_, value)| CellValue::text(value.to_string()))
        .collect();
    row.extend([
        CellValue::Integer(group.orders as i64),
        CellValue::Integer(group.items_sold),
        CellValue::Number(group.revenue),
        CellValue::Number(group.cost),
        CellValue::Number(group.profit),
        CellValue::number(group.margin_pct),
        CellValue::number(group.avg_order_value),
        CellValue::number(group.avg_items_per_order),
    ]);
    row
}

fn group_table(def: &ReportDef, dimensions: &[Dimension], groups: &[GroupAggregate]) -> ReportTable {
    let mut table = ReportTable::new(def.name, def.title, group_columns(dimensions));
    table.rows = groups.iter().map(group_row).collect();
    table
}

/// Groups in key order
fn by_dimensions(def: &ReportDef, snapshot: &SalesSnapshot, dimensions: &[Dimension]) -> ReportTable {
    let groups = aggregate(snapshot.lines(), dimensions);
    group_table(def, dimensions, &groups)
}

fn by_dimensions_revenue_desc(
    def: &ReportDef,
    snapshot: &SalesSnapshot,
    dimensions: &[Dimension],
) -> ReportTable {
    let mut groups = aggregate(snapshot.lines(), dimensions);
    sort_by_revenue_desc(&mut groups);
    group_table(def, dimensions, &groups)
}

/// Monday first; labels that are not weekday names follow in key order
fn sales_by_day_of_week(def: &ReportDef, snapshot: &SalesSnapshot) -> ReportTable {
    let dimensions = [Dimension::DayOfWeek];
    let mut groups = aggregate(snapshot.lines(), &dimensions);
    groups.sort_by_key(|g| {
        let weekday = match g.value(Dimension::DayOfWeek) {
            Some(DimensionValue::Text(label)) => label.trim().parse::<Weekday>().ok(),
            _ => None,
        };
        (weekday.is_none(), weekday.map(|w| w.num_days_from_monday()))
    });
    group_table(def, &dimensions, &groups)
}

fn kpi_overview(def: &ReportDef, snapshot: &SalesSnapshot) -> ReportTable {
    let mut table = ReportTable::new(
        def.name,
        def.title,
        vec![
            ColumnHeader::grouping("indicator_id", "Id"),
            ColumnHeader::grouping("indicator", "Indicator"),
            ColumnHeader::measure("value", "Value", MeasureKind::Ratio),
            ColumnHeader::grouping("definition", "Definition"),
        ],
    );
    let registry = IndicatorRegistry::new();
    table.rows = registry
        .compute_all(snapshot)
        .into_iter()
        .map(|v| {
            let definition = registry
                .catalog()
                .iter()
                .find(|m| m.id == v.id)
                .map(|m| m.description.clone())
                .unwrap_or_default();
            let value = match (v.kind, v.value) {
                (MeasureKind::Count, Some(n)) => CellValue::Integer(n as i64),
                (_, value) => CellValue::number(value),
            };
            vec![
                CellValue::text(v.id.0),
                CellValue::text(v.label),
                value,
                CellValue::text(definition),
            ]
        })
        .collect();
    table
}

// ---------------------------------------------------------------------------
// Item views
// ---------------------------------------------------------------------------

fn item_key_columns() -> Vec<ColumnHeader> {
    vec![
        ColumnHeader::grouping("item_name", "Item"),
        ColumnHeader::grouping("category", "Category"),
        ColumnHeader::grouping("size", "Size"),
    ]
}

fn item_key_cells(item: &ItemAggregate) -> Vec<CellValue> {
    vec![
        CellValue::text(item.item_name.as_str()),
        CellValue::text(item.category.as_str()),
        CellValue::text(item.size.as_str()),
    ]
}

fn item_table(def: &ReportDef, items: &[ItemAggregate]) -> ReportTable {
    let mut columns = item_key_columns();
    columns.extend([
        ColumnHeader::measure("units_sold", "Units", MeasureKind::Count),
        ColumnHeader::measure("revenue", "Revenue", MeasureKind::Money),
        ColumnHeader::measure("profit", "Profit", MeasureKind::Money),
        ColumnHeader::measure("margin_pct", "Margin %", MeasureKind::Percent),
        ColumnHeader::measure("profit_per_unit", "Profit/unit", MeasureKind::Money),
    ]);

    let mut table = ReportTable::new(def.name, def.title, columns);
    table.rows = items
        .iter()
        .map(|item| {
            let mut row = item_key_cells(item);
            row.extend([
                CellValue::Integer(item.units_sold),
                CellValue::Number(item.revenue),
                CellValue::Number(item.profit),
                CellValue::number(item.margin_pct),
                CellValue::number(item.profit_per_unit),
            ]);
            row
        })
        .collect();
    table
}

/// Profit descending; ties keep (item, category, size) order
fn item_performance(def: &ReportDef, snapshot: &SalesSnapshot) -> ReportTable {
    let mut items = item_aggregates(snapshot.lines());
    items.sort_by(|a, b| b.profit.total_cmp(&a.profit));
    item_table(def, &items)
}

fn top_items_by_revenue(def: &ReportDef, snapshot: &SalesSnapshot) -> ReportTable {
    let mut items = item_aggregates(snapshot.lines());
    items.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    items.truncate(TOP_ITEMS_LIMIT);
    item_table(def, &items)
}

fn segmentation(snapshot: &SalesSnapshot) -> Segmentation {
    segment(&item_aggregates(snapshot.lines()))
}

fn item_pareto(def: &ReportDef, snapshot: &SalesSnapshot) -> ReportTable {
    let mut columns = vec![ColumnHeader::measure("rank", "Rank", MeasureKind::Count)];
    columns.extend(item_key_columns());
    columns.extend([
        ColumnHeader::measure("profit", "Profit", MeasureKind::Money),
        ColumnHeader::measure("cumulative_profit", "Cumulative profit", MeasureKind::Money),
        ColumnHeader::measure("profit_share_pct", "Share %", MeasureKind::Percent),
        ColumnHeader::measure("cumulative_pct", "Cumulative %", MeasureKind::Percent),
        ColumnHeader::grouping("profit_segment", "Segment"),
    ]);

    let mut table = ReportTable::new(def.name, def.title, columns);
    table.rows = segmentation(snapshot)
        .items
        .iter()
        .map(|s| {
            let mut row = vec![CellValue::Integer(s.rank as i64)];
            row.extend(item_key_cells(&s.item));
            row.extend([
                CellValue::Number(s.item.profit),
                CellValue::Number(s.cumulative_profit),
                CellValue::number(s.profit_share_pct),
                CellValue::number(s.cumulative_pct),
                s.profit_segment
                    .map(|seg| CellValue::text(seg.label()))
                    .unwrap_or(CellValue::Null),
            ]);
            row
        })
        .collect();
    table
}

fn item_strategy(def: &ReportDef, snapshot: &SalesSnapshot) -> ReportTable {
    let mut columns = vec![ColumnHeader::measure("rank", "Rank", MeasureKind::Count)];
    columns.extend(item_key_columns());
    columns.extend([
        ColumnHeader::measure("units_sold", "Units", MeasureKind::Count),
        ColumnHeader::measure("margin_pct", "Margin %", MeasureKind::Percent),
        ColumnHeader::measure("avg_units", "Avg units", MeasureKind::Ratio),
        ColumnHeader::measure("avg_margin_pct", "Avg margin %", MeasureKind::Percent),
        ColumnHeader::grouping("item_strategy", "Strategy"),
    ]);

    let segmentation = segmentation(snapshot);
    let summary = segmentation.summary;
    let mut table = ReportTable::new(def.name, def.title, columns);
    table.rows = segmentation
        .items
        .iter()
        .map(|s| {
            let mut row = vec![CellValue::Integer(s.rank as i64)];
            row.extend(item_key_cells(&s.item));
            row.extend([
                CellValue::Integer(s.item.units_sold),
                CellValue::number(s.item.margin_pct),
                CellValue::number(summary.avg_units),
                CellValue::number(summary.avg_margin_pct),
                CellValue::text(s.item_strategy.label()),
            ]);
            row
        })
        .collect();
    table
}

fn strategy_summary(def: &ReportDef, snapshot: &SalesSnapshot) -> ReportTable {
    let columns = vec![
        ColumnHeader::grouping("item_strategy", "Strategy"),
        ColumnHeader::measure("items", "Items", MeasureKind::Count),
        ColumnHeader::measure("units_sold", "Units", MeasureKind::Count),
        ColumnHeader::measure("revenue", "Revenue", MeasureKind::Money),
        ColumnHeader::measure("profit", "Profit", MeasureKind::Money),
        ColumnHeader::measure("profit_share_pct", "Share %", MeasureKind::Percent),
    ];

    let segmentation = segmentation(snapshot);
    let total_profit = segmentation.summary.total_profit;
    let mut table = ReportTable::new(def.name, def.title, columns);
    table.rows = ItemStrategy::ALL
        .iter()
        .map(|strategy| {
            let members: Vec<&ItemAggregate> = segmentation
                .items
                .iter()
                .filter(|s| s.item_strategy == *strategy)
                .map(|s| &s.item)
                .collect();
            let profit: f64 = members.iter().map(|i| i.profit).sum();
            let share = if total_profit > 0.0 {
                percent(profit, total_profit)
            } else {
                None
            };
            vec![
                CellValue::text(strategy.label()),
                CellValue::Integer(members.len() as i64),
                CellValue::Integer(members.iter().map(|i| i.units_sold).sum()),
                CellValue::Number(members.iter().map(|i| i.revenue).sum()),
                CellValue::Number(profit),
                CellValue::number(share),
            ]
        })
        .collect();
    table
}
