//! Single-pass summary statistics over the order dataset.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::analytics::aggregate::mean_of;
use crate::domain::OrderRecord;

/// Headline totals for the dashboard cards.
///
/// Pure function of the current order snapshot; all fields are zero for an
/// empty dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_orders: usize,
    pub total_revenue: f64,
    pub avg_material_cost: f64,
    pub avg_order_value: f64,
    pub distinct_customers: usize,
}

/// Compute the headline totals in one pass.
pub fn summarize(orders: &[OrderRecord]) -> SummaryStats {
    let mut total_revenue = 0.0;
    let mut total_material_cost = 0.0;
    let mut customers: HashSet<&str> = HashSet::new();

    for order in orders {
        total_revenue += order.total_sale;
        total_material_cost += order.material_cost;
        customers.insert(order.customer_id.as_str());
    }

    SummaryStats {
        total_orders: orders.len(),
        total_revenue,
        avg_material_cost: mean_of(total_material_cost, orders.len()),
        avg_order_value: mean_of(total_revenue, orders.len()),
        distinct_customers: customers.len(),
    }
}
