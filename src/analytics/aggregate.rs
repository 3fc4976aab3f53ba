//! Grouping and reduction over order records.
//!
//! All per-dimension series are built on one generic primitive,
//! `group_and_reduce`, which preserves first-seen key order; each call site
//! then applies its own explicit sort (lexical period key, value descending,
//! or none) rather than relying on an implicit order.

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::domain::dates::month_key;
use crate::domain::{AnalyticsConfig, GroupSlice, Material, OrderRecord, PeriodPoint};

/// Per-product attribution of raw-material cost across commodities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialBreakdown {
    pub product: String,
    /// Attributed cost by `Material::index()`.
    pub costs: [f64; 6],
    pub total: f64,
}

/// Group `items` by `key_fn` and fold each group with `fold`.
///
/// - Keys appear in first-seen insertion order.
/// - `key_fn` returning `None` skips the item (used for unparseable dates).
/// - Total over any finite input; an empty slice yields an empty result.
pub fn group_and_reduce<T, K, V>(
    items: &[T],
    key_fn: impl Fn(&T) -> Option<K>,
    init: impl Fn() -> V,
    mut fold: impl FnMut(&mut V, &T),
) -> Vec<(K, V)>
where
    K: Eq + Hash + Clone,
{
    let mut order: Vec<(K, V)> = Vec::new();
    let mut index: HashMap<K, usize> = HashMap::new();

    for item in items {
        let Some(key) = key_fn(item) else { continue };
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            order.push((key, init()));
            order.len() - 1
        });
        fold(&mut order[slot].1, item);
    }

    order
}

/// Total revenue per calendar month, sorted chronologically.
pub fn revenue_by_month(orders: &[OrderRecord]) -> Vec<PeriodPoint> {
    let mut points: Vec<PeriodPoint> = group_and_reduce(
        orders,
        |o| month_key(&o.date),
        || 0.0,
        |sum, o| *sum += o.total_sale,
    )
    .into_iter()
    .map(|(period, value)| PeriodPoint::observed(period, value))
    .collect();

    // `YYYY-MM` keys sort lexically in chronological order.
    points.sort_by(|a, b| a.period.cmp(&b.period));
    points
}

/// Total quantity sold per calendar month, sorted chronologically.
pub fn quantity_by_month(orders: &[OrderRecord]) -> Vec<PeriodPoint> {
    let mut points: Vec<PeriodPoint> = group_and_reduce(
        orders,
        |o| month_key(&o.date),
        || 0.0,
        |sum, o| *sum += f64::from(o.quantity),
    )
    .into_iter()
    .map(|(period, value)| PeriodPoint::observed(period, value))
    .collect();

    points.sort_by(|a, b| a.period.cmp(&b.period));
    points
}

/// Total revenue per region, highest first.
pub fn revenue_by_region(orders: &[OrderRecord]) -> Vec<GroupSlice> {
    let mut slices = sum_by(orders, |o| label_or_unknown(&o.region), |o| o.total_sale);
    slices.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
    slices
}

/// Order count per customer type, in first-seen order.
pub fn orders_by_customer_type(orders: &[OrderRecord]) -> Vec<GroupSlice> {
    sum_by(orders, |o| label_or_unknown(&o.customer_type), |_| 1.0)
}

/// Order count per status, in first-seen order.
pub fn orders_by_status(orders: &[OrderRecord]) -> Vec<GroupSlice> {
    sum_by(orders, |o| label_or_unknown(&o.status), |_| 1.0)
}

/// Top products by revenue, truncated to `config.top_products`.
pub fn top_products_by_revenue(orders: &[OrderRecord], config: &AnalyticsConfig) -> Vec<GroupSlice> {
    let mut slices = sum_by(orders, |o| label_or_unknown(&o.product), |o| o.total_sale);
    slices.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
    slices.truncate(config.top_products);
    slices
}

/// Average delivery time (days) per calendar month, sorted chronologically.
pub fn delivery_time_by_month(orders: &[OrderRecord]) -> Vec<PeriodPoint> {
    let mut points: Vec<PeriodPoint> = group_and_reduce(
        orders,
        |o| month_key(&o.date),
        || (0.0, 0usize),
        |(sum, count), o| {
            *sum += o.delivery_days;
            *count += 1;
        },
    )
    .into_iter()
    .map(|(period, (sum, count))| PeriodPoint::observed(period, mean_of(sum, count)))
    .collect();

    points.sort_by(|a, b| a.period.cmp(&b.period));
    points
}

/// Attribute each order's material cost evenly across the commodities it
/// lists, then report the top products by total attributed cost.
///
/// An order whose material list is empty or matches no known commodity
/// contributes zero to every bucket.
pub fn material_cost_by_product(
    orders: &[OrderRecord],
    config: &AnalyticsConfig,
) -> Vec<MaterialBreakdown> {
    let grouped = group_and_reduce(
        orders,
        |o| Some(label_or_unknown(&o.product)),
        || [0.0f64; 6],
        |costs, o| {
            // The even split is over every listed name, known or not; cost
            // attributed to an unrecognized name is dropped.
            let listed: Vec<&str> = o
                .materials_used
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect();
            if listed.is_empty() {
                return;
            }
            let per_material = o.material_cost / listed.len() as f64;
            for name in listed {
                if let Some(m) = Material::from_name(name) {
                    costs[m.index()] += per_material;
                }
            }
        },
    );

    let mut breakdown: Vec<MaterialBreakdown> = grouped
        .into_iter()
        .map(|(product, costs)| MaterialBreakdown {
            product,
            costs,
            total: costs.iter().sum(),
        })
        .collect();

    breakdown.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));
    breakdown.truncate(config.top_products);
    breakdown
}

/// Dominant commodity of a breakdown row, for narrative output.
pub fn top_material(breakdown: &MaterialBreakdown) -> Option<(Material, f64)> {
    Material::ALL
        .into_iter()
        .map(|m| (m, breakdown.costs[m.index()]))
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
}

fn sum_by(
    orders: &[OrderRecord],
    key_fn: impl Fn(&OrderRecord) -> String,
    value_fn: impl Fn(&OrderRecord) -> f64,
) -> Vec<GroupSlice> {
    group_and_reduce(
        orders,
        |o| Some(key_fn(o)),
        || (0.0, 0usize),
        |(sum, count), o| {
            *sum += value_fn(o);
            *count += 1;
        },
    )
    .into_iter()
    .map(|(key, (value, count))| GroupSlice { key, value, count })
    .collect()
}

fn label_or_unknown(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        "Unknown".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Zero-count-safe mean.
pub(crate) fn mean_of(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::summary::summarize;

    fn order(date: &str, sale: f64) -> OrderRecord {
        OrderRecord {
            order_id: "O".to_string(),
            customer_id: "C1".to_string(),
            customer_name: "Acme".to_string(),
            product: "Blocks".to_string(),
            category: "Concrete".to_string(),
            region: "North".to_string(),
            total_sale: sale,
            quantity: 1,
            shipping_cost: 0.0,
            tax: 0.0,
            delivery_days: 2.0,
            review_score: 4.0,
            material_cost: 0.0,
            materials_used: String::new(),
            return_requested: false,
            customer_type: "New".to_string(),
            date: date.to_string(),
            status: "Delivered".to_string(),
        }
    }

    #[test]
    fn group_and_reduce_preserves_first_seen_order() {
        let items = ["b", "a", "b", "c", "a"];
        let grouped = group_and_reduce(
            &items,
            |s| Some(s.to_string()),
            || 0usize,
            |count, _| *count += 1,
        );
        let keys: Vec<&str> = grouped.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(grouped[0].1, 2);
    }

    #[test]
    fn monthly_revenue_groups_by_calendar_month() {
        let orders = vec![
            order("2023-01-15", 1000.0),
            order("2023-02-15", 1100.0),
            order("2023-03-15", 1210.0),
        ];
        let series = revenue_by_month(&orders);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].period, "2023-01");
        assert!((series[0].value - 1000.0).abs() < 1e-9);
        assert_eq!(series[2].period, "2023-03");
        assert!((series[2].value - 1210.0).abs() < 1e-9);
    }

    #[test]
    fn monthly_revenue_reconciles_with_flat_total() {
        let orders = vec![
            order("2023-01-10", 500.0),
            order("2023-01-20", 700.0),
            order("2023-03-05", 1200.0),
            order("junk-date", 999.0),
        ];
        let grouped: f64 = revenue_by_month(&orders).iter().map(|p| p.value).sum();
        // The junk-date order is skipped from the monthly series but still
        // counted in the flat summary.
        assert!((grouped - 2400.0).abs() < 1e-9);
        let stats = summarize(&orders);
        assert!((stats.total_revenue - 3399.0).abs() < 1e-9);
    }

    #[test]
    fn delivery_time_average_guards_zero_count() {
        assert!(delivery_time_by_month(&[]).is_empty());
        assert_eq!(mean_of(10.0, 0), 0.0);
    }

    #[test]
    fn material_cost_split_evenly_and_unknowns_ignored() {
        let mut o = order("2023-01-15", 1000.0);
        o.material_cost = 300.0;
        o.materials_used = "Cement, Sand, Steel".to_string();
        let mut empty = order("2023-01-16", 500.0);
        empty.material_cost = 400.0;
        empty.materials_used = String::new();

        let cfg = AnalyticsConfig::default();
        let breakdown = material_cost_by_product(&[o, empty], &cfg);
        assert_eq!(breakdown.len(), 1);
        let row = &breakdown[0];
        // The split is over all three listed names; the unknown "Steel"
        // share is dropped, and the empty-list record contributes nothing.
        assert!((row.costs[Material::Cement.index()] - 100.0).abs() < 1e-9);
        assert!((row.costs[Material::Sand.index()] - 100.0).abs() < 1e-9);
        assert!((row.total - 200.0).abs() < 1e-9);
    }

    #[test]
    fn top_products_truncates_after_sorting() {
        let mut orders = Vec::new();
        for (i, sale) in [100.0, 900.0, 300.0, 700.0, 500.0, 200.0].iter().enumerate() {
            let mut o = order("2023-01-15", *sale);
            o.product = format!("P{i}");
            orders.push(o);
        }
        let cfg = AnalyticsConfig::default();
        let top = top_products_by_revenue(&orders, &cfg);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].key, "P1");
        assert!((top[0].value - 900.0).abs() < 1e-9);
    }
}
