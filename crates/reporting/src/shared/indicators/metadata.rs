use contracts::shared::indicators::*;
use contracts::shared::report::MeasureKind;

/// Well-known indicator IDs (constants to avoid typos).
pub mod ids {
    use super::*;

    pub fn sales_revenue() -> IndicatorId {
        IndicatorId::new("sales.revenue")
    }
    pub fn sales_cost() -> IndicatorId {
        IndicatorId::new("sales.cost")
    }
    pub fn sales_profit() -> IndicatorId {
        IndicatorId::new("sales.profit")
    }
    pub fn sales_margin_pct() -> IndicatorId {
        IndicatorId::new("sales.margin_pct")
    }
    pub fn sales_order_count() -> IndicatorId {
        IndicatorId::new("sales.order_count")
    }
    pub fn sales_items_sold() -> IndicatorId {
        IndicatorId::new("sales.items_sold")
    }
    pub fn sales_avg_order_value() -> IndicatorId {
        IndicatorId::new("sales.avg_order_value")
    }
    pub fn sales_avg_items_per_order() -> IndicatorId {
        IndicatorId::new("sales.avg_items_per_order")
    }
    pub fn sales_customer_count() -> IndicatorId {
        IndicatorId::new("sales.customer_count")
    }
    pub fn sales_line_count() -> IndicatorId {
        IndicatorId::new("sales.line_count")
    }
}

fn meta(id: IndicatorId, label: &str, kind: MeasureKind, description: &str) -> IndicatorMeta {
    IndicatorMeta {
        id,
        label: label.into(),
        kind,
        description: description.into(),
    }
}

/// Catalogue of KPI indicators, in display order.
pub fn build_catalog() -> Vec<IndicatorMeta> {
    vec![
        meta(
            ids::sales_revenue(),
            "Revenue",
            MeasureKind::Money,
            "Sum of line revenue as exported",
        ),
        meta(
            ids::sales_cost(),
            "Cost",
            MeasureKind::Money,
            "Sum of line total cost",
        ),
        meta(
            ids::sales_profit(),
            "Profit",
            MeasureKind::Money,
            "Sum of line contribution (revenue - total cost)",
        ),
        meta(
            ids::sales_margin_pct(),
            "Margin %",
            MeasureKind::Percent,
            "Profit / Revenue * 100",
        ),
        meta(
            ids::sales_order_count(),
            "Orders",
            MeasureKind::Count,
            "Distinct order identifiers",
        ),
        meta(
            ids::sales_items_sold(),
            "Items sold",
            MeasureKind::Count,
            "Sum of line quantity",
        ),
        meta(
            ids::sales_avg_order_value(),
            "Avg order value",
            MeasureKind::Money,
            "Revenue / Orders",
        ),
        meta(
            ids::sales_avg_items_per_order(),
            "Avg items per order",
            MeasureKind::Ratio,
            "Items sold / Orders",
        ),
        meta(
            ids::sales_customer_count(),
            "Customers",
            MeasureKind::Count,
            "Distinct non-empty customer names",
        ),
        meta(
            ids::sales_line_count(),
            "Order lines",
            MeasureKind::Count,
            "Loaded sales lines",
        ),
    ]
}
