use contracts::shared::indicators::*;
use std::collections::HashMap;

use super::compute::sales;
use super::metadata::{build_catalog, ids};
use crate::projections::p900_sales_lines::SalesSnapshot;

type ComputeFn = fn(&SalesSnapshot) -> Option<f64>;

/// Central registry: maps `IndicatorId` to its compute function.
pub struct IndicatorRegistry {
    catalog: Vec<IndicatorMeta>,
    fns: HashMap<String, ComputeFn>,
}

impl Default for IndicatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorRegistry {
    pub fn new() -> Self {
        let mut fns: HashMap<String, ComputeFn> = HashMap::new();

        fns.insert(ids::sales_revenue().0, sales::compute_sales_revenue);
        fns.insert(ids::sales_cost().0, sales::compute_sales_cost);
        fns.insert(ids::sales_profit().0, sales::compute_sales_profit);
        fns.insert(ids::sales_margin_pct().0, sales::compute_sales_margin_pct);
        fns.insert(ids::sales_order_count().0, sales::compute_sales_order_count);
        fns.insert(ids::sales_items_sold().0, sales::compute_sales_items_sold);
        fns.insert(
            ids::sales_avg_order_value().0,
            sales::compute_sales_avg_order_value,
        );
        fns.insert(
            ids::sales_avg_items_per_order().0,
            sales::compute_sales_avg_items_per_order,
        );
        fns.insert(
            ids::sales_customer_count().0,
            sales::compute_sales_customer_count,
        );
        fns.insert(ids::sales_line_count().0, sales::compute_sales_line_count);

        Self {
            catalog: build_catalog(),
            fns,
        }
    }

    pub fn catalog(&self) -> &[IndicatorMeta] {
        &self.catalog
    }

    /// Compute a batch of indicators. Unknown ids are skipped with a warning.
    pub fn compute(&self, ids: &[IndicatorId], snapshot: &SalesSnapshot) -> Vec<IndicatorValue> {
        let mut results = Vec::with_capacity(ids.len());

        for id in ids {
            let meta = self.catalog.iter().find(|m| m.id == *id);
            match (meta, self.fns.get(&id.0)) {
                (Some(meta), Some(compute_fn)) => results.push(IndicatorValue {
                    id: id.clone(),
                    label: meta.label.clone(),
                    value: compute_fn(snapshot),
                    kind: meta.kind,
                }),
                _ => tracing::warn!("indicator {} not found in registry", id.0),
            }
        }

        results
    }

    /// Compute every catalogued indicator, in catalogue order
    pub fn compute_all(&self, snapshot: &SalesSnapshot) -> Vec<IndicatorValue> {
        let ids: Vec<IndicatorId> = self.catalog.iter().map(|m| m.id.clone()).collect();
        self.compute(&ids, snapshot)
    }
}
