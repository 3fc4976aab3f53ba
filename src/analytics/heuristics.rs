//! Heuristic scorers: churn risk, pricing bands, product profitability,
//! purchase timing and delivery performance.
//!
//! These are deliberately simple screens, not models; each one is a total
//! function that returns an empty result (plus a sufficiency flag where the
//! renderer needs one) rather than failing.

use serde::{Deserialize, Serialize};

use crate::analytics::aggregate::{group_and_reduce, mean_of};
use crate::analytics::trend::local_minima;
use crate::domain::dates::sort_key;
use crate::domain::{AnalyticsConfig, GroupSlice, Material, MaterialPriceRecord, OrderRecord};

/// One of the heuristic warning signs attached to a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChurnFlag {
    DecliningValue,
    LowSatisfaction,
    HasReturns,
}

impl ChurnFlag {
    pub fn display_name(self) -> &'static str {
        match self {
            ChurnFlag::DecliningValue => "Declining order value",
            ChurnFlag::LowSatisfaction => "Low satisfaction ratings",
            ChurnFlag::HasReturns => "Has requested returns",
        }
    }
}

/// A customer with at least one churn warning sign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurnRisk {
    pub customer_id: String,
    pub customer_name: String,
    pub flags: Vec<ChurnFlag>,
    pub last_order_date: String,
}

/// A fixed-width bucket of total-sale values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBand {
    /// Inclusive lower edge; the band spans `[floor, floor + band_width)`.
    pub floor: f64,
    pub avg_profit: f64,
    /// Average profit over the band-midpoint sale proxy.
    pub profit_margin: f64,
    pub order_count: usize,
}

/// Per-product profit aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductProfit {
    pub product: String,
    pub total_profit: f64,
    /// Total profit over total sales, 0 when the product sold for nothing.
    pub profit_margin: f64,
    pub avg_profit: f64,
    pub order_count: usize,
}

/// A "buy here" marker: a commodity at a local price minimum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecommendation {
    pub material: Material,
    pub date: String,
    pub price: f64,
    /// Mean price minus this observation; strictly positive.
    pub saving: f64,
}

/// Purchase-timing output: all local-minimum opportunities plus a
/// per-commodity savings roll-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchasePlan {
    /// Sorted by saving descending.
    pub recommendations: Vec<PurchaseRecommendation>,
    /// Total potential saving per commodity, highest first.
    pub savings_by_material: Vec<(Material, f64)>,
    /// False when there were fewer rows than the configured minimum; the
    /// renderer shows "need more data" instead of an empty table.
    pub sufficient_data: bool,
}

/// Flag customers showing churn warning signs.
///
/// Customers are reported in first-seen order; a customer with no flags is
/// omitted. The declining-value check needs at least two orders, so a
/// single-order customer can only be flagged for satisfaction or returns.
pub fn churn_risk(orders: &[OrderRecord], config: &AnalyticsConfig) -> Vec<ChurnRisk> {
    let by_customer = group_and_reduce(
        orders,
        |o| Some(o.customer_id.clone()),
        Vec::new,
        |group: &mut Vec<OrderRecord>, o| group.push(o.clone()),
    );

    let mut at_risk = Vec::new();
    for (customer_id, mut customer_orders) in by_customer {
        customer_orders.sort_by_key(|o| sort_key(&o.date));

        let mut flags = Vec::new();

        if customer_orders.len() >= 2 {
            let mid = customer_orders.len() / 2;
            let first_avg = mean_of(
                customer_orders[..mid].iter().map(|o| o.total_sale).sum(),
                mid,
            );
            let second_avg = mean_of(
                customer_orders[mid..].iter().map(|o| o.total_sale).sum(),
                customer_orders.len() - mid,
            );
            if second_avg < first_avg * config.declining_value_ratio {
                flags.push(ChurnFlag::DecliningValue);
            }
        }

        let low_reviews = customer_orders
            .iter()
            .filter(|o| o.review_score <= config.low_review_score)
            .count();
        if low_reviews > 0
            && low_reviews as f64 / customer_orders.len() as f64 > config.low_review_share
        {
            flags.push(ChurnFlag::LowSatisfaction);
        }

        if customer_orders.iter().any(|o| o.return_requested) {
            flags.push(ChurnFlag::HasReturns);
        }

        if !flags.is_empty() {
            at_risk.push(ChurnRisk {
                customer_id,
                customer_name: customer_orders[0].customer_name.clone(),
                flags,
                last_order_date: customer_orders[customer_orders.len() - 1].date.clone(),
            });
        }
    }

    at_risk
}

/// Bucket orders into fixed-width total-sale bands and compute per-band
/// profitability, sorted ascending by band floor for display.
pub fn price_band_profitability(
    orders: &[OrderRecord],
    config: &AnalyticsConfig,
) -> Vec<PriceBand> {
    let grouped = group_and_reduce(
        orders,
        |o| Some(((o.total_sale / config.band_width).floor() * config.band_width) as i64),
        || (0.0f64, 0usize),
        |(profit_sum, count), o| {
            *profit_sum += o.profit();
            *count += 1;
        },
    );

    let mut bands: Vec<PriceBand> = grouped
        .into_iter()
        .map(|(floor, (profit_sum, count))| {
            let floor = floor as f64;
            let avg_profit = mean_of(profit_sum, count);
            PriceBand {
                floor,
                avg_profit,
                // Band midpoint as the "typical sale" proxy, not the actual
                // in-band average.
                profit_margin: avg_profit / config.band_midpoint(floor),
                order_count: count,
            }
        })
        .collect();

    bands.sort_by(|a, b| a.floor.partial_cmp(&b.floor).unwrap_or(std::cmp::Ordering::Equal));
    bands
}

/// The band to recommend: highest profit margin, not highest floor.
pub fn best_price_band(bands: &[PriceBand]) -> Option<&PriceBand> {
    bands.iter().max_by(|a, b| {
        a.profit_margin
            .partial_cmp(&b.profit_margin)
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

/// Per-product profit totals, most profitable first.
pub fn product_profitability(orders: &[OrderRecord]) -> Vec<ProductProfit> {
    let grouped = group_and_reduce(
        orders,
        |o| {
            let product = o.product.trim();
            Some(if product.is_empty() {
                "Unknown".to_string()
            } else {
                product.to_string()
            })
        },
        || (0.0f64, 0.0f64, 0usize),
        |(sales, profit, count), o| {
            *sales += o.total_sale;
            *profit += o.profit();
            *count += 1;
        },
    );

    let mut products: Vec<ProductProfit> = grouped
        .into_iter()
        .map(|(product, (total_sales, total_profit, count))| ProductProfit {
            product,
            total_profit,
            profit_margin: if total_sales > 0.0 {
                total_profit / total_sales
            } else {
                0.0
            },
            avg_profit: mean_of(total_profit, count),
            order_count: count,
        })
        .collect();

    products.sort_by(|a, b| {
        b.total_profit
            .partial_cmp(&a.total_profit)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    products
}

/// Scan each commodity's chronologically sorted prices for local minima and
/// rank the resulting purchase opportunities by potential saving.
pub fn purchase_timing(
    prices: &[MaterialPriceRecord],
    config: &AnalyticsConfig,
) -> PurchasePlan {
    if prices.len() < config.min_price_rows {
        return PurchasePlan {
            recommendations: Vec::new(),
            savings_by_material: Vec::new(),
            sufficient_data: false,
        };
    }

    let mut sorted: Vec<&MaterialPriceRecord> = prices.iter().collect();
    sorted.sort_by_key(|r| sort_key(&r.date));

    let mut recommendations = Vec::new();
    for material in Material::ALL {
        let values: Vec<f64> = sorted.iter().map(|r| r.price(material)).collect();
        if values.len() < config.min_commodity_points {
            continue;
        }
        for minimum in local_minima(&values) {
            recommendations.push(PurchaseRecommendation {
                material,
                date: sorted[minimum.index].date.clone(),
                price: minimum.value,
                saving: minimum.saving,
            });
        }
    }

    recommendations.sort_by(|a, b| {
        b.saving
            .partial_cmp(&a.saving)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut savings_by_material: Vec<(Material, f64)> = Material::ALL
        .into_iter()
        .filter_map(|material| {
            let total: f64 = recommendations
                .iter()
                .filter(|r| r.material == material)
                .map(|r| r.saving)
                .sum();
            (total > 0.0).then_some((material, total))
        })
        .collect();
    savings_by_material
        .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    PurchasePlan {
        recommendations,
        savings_by_material,
        sufficient_data: true,
    }
}

/// Average delivery time per region, slowest region first.
pub fn delivery_time_by_region(orders: &[OrderRecord]) -> Vec<GroupSlice> {
    let grouped = group_and_reduce(
        orders,
        |o| {
            let region = o.region.trim();
            Some(if region.is_empty() {
                "Unknown".to_string()
            } else {
                region.to_string()
            })
        },
        || (0.0f64, 0usize),
        |(sum, count), o| {
            *sum += o.delivery_days;
            *count += 1;
        },
    );

    let mut slices: Vec<GroupSlice> = grouped
        .into_iter()
        .map(|(key, (sum, count))| GroupSlice {
            key,
            value: mean_of(sum, count),
            count,
        })
        .collect();

    slices.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
    slices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(customer: &str, date: &str, sale: f64) -> OrderRecord {
        OrderRecord {
            order_id: "O".to_string(),
            customer_id: customer.to_string(),
            customer_name: format!("{customer} Traders"),
            product: "Blocks".to_string(),
            category: "Concrete".to_string(),
            region: "North".to_string(),
            total_sale: sale,
            quantity: 1,
            shipping_cost: 100.0,
            tax: 50.0,
            delivery_days: 3.0,
            review_score: 4.0,
            material_cost: 500.0,
            materials_used: String::new(),
            return_requested: false,
            customer_type: "Returning".to_string(),
            date: date.to_string(),
            status: "Delivered".to_string(),
        }
    }

    fn price_row(date: &str, cement: f64) -> MaterialPriceRecord {
        MaterialPriceRecord {
            date: date.to_string(),
            prices: [cement, 60.0, 75.0, 220.0, 10.0, 440.0],
        }
    }

    #[test]
    fn declining_value_never_fires_for_single_order_customer() {
        // One tiny order; every other flag source is clean.
        let orders = vec![order("C1", "2023-01-15", 100.0)];
        let config = AnalyticsConfig::default();
        let risks = churn_risk(&orders, &config);
        assert!(risks.is_empty());
    }

    #[test]
    fn declining_value_fires_on_a_drop_past_the_ratio() {
        let orders = vec![
            order("C1", "2023-01-15", 10_000.0),
            order("C1", "2023-02-15", 10_000.0),
            order("C1", "2023-03-15", 1000.0),
            order("C1", "2023-04-15", 1000.0),
        ];
        let config = AnalyticsConfig::default();
        let risks = churn_risk(&orders, &config);
        assert_eq!(risks.len(), 1);
        assert_eq!(risks[0].flags, vec![ChurnFlag::DecliningValue]);
        assert_eq!(risks[0].last_order_date, "2023-04-15");
        assert_eq!(risks[0].customer_name, "C1 Traders");
    }

    #[test]
    fn low_satisfaction_requires_share_above_threshold() {
        let mut happy = order("C2", "2023-01-01", 500.0);
        happy.review_score = 5.0;
        let mut unhappy = order("C2", "2023-02-01", 500.0);
        unhappy.review_score = 1.0;

        // 1 of 2 low-scored orders: 50% > 30%.
        let config = AnalyticsConfig::default();
        let risks = churn_risk(&[happy.clone(), unhappy], &config);
        assert_eq!(risks.len(), 1);
        assert!(risks[0].flags.contains(&ChurnFlag::LowSatisfaction));

        // 1 of 4: 25% is under the threshold.
        let mut unhappy = order("C2", "2023-02-01", 500.0);
        unhappy.review_score = 2.0;
        let orders = vec![happy.clone(), happy.clone(), happy, unhappy];
        assert!(churn_risk(&orders, &config).is_empty());
    }

    #[test]
    fn returns_flag_fires_on_any_return() {
        let mut returned = order("C3", "2023-01-01", 500.0);
        returned.return_requested = true;
        let config = AnalyticsConfig::default();
        let risks = churn_risk(&[returned], &config);
        assert_eq!(risks[0].flags, vec![ChurnFlag::HasReturns]);
    }

    #[test]
    fn price_bands_sort_by_floor_but_rank_by_margin() {
        let orders = vec![
            order("C1", "2023-01-01", 2000.0),  // band 0: profit 1350
            order("C1", "2023-01-02", 7000.0),  // band 5000: profit 6350
            order("C1", "2023-01-03", 12_000.0), // band 10000: profit 11350
        ];
        let config = AnalyticsConfig::default();
        let bands = price_band_profitability(&orders, &config);
        assert_eq!(bands.len(), 3);
        assert!((bands[0].floor - 0.0).abs() < 1e-9);
        assert!((bands[1].floor - 5000.0).abs() < 1e-9);
        assert!((bands[2].floor - 10_000.0).abs() < 1e-9);

        // Margin proxy: avg profit / (floor + 2500).
        assert!((bands[1].profit_margin - 6350.0 / 7500.0).abs() < 1e-9);

        let best = best_price_band(&bands).unwrap();
        // 11350/12500 > 6350/7500 > 1350/2500.
        assert!((best.floor - 10_000.0).abs() < 1e-9);
    }

    #[test]
    fn product_profitability_guards_zero_sales() {
        let mut freebie = order("C1", "2023-01-01", 0.0);
        freebie.material_cost = 0.0;
        freebie.shipping_cost = 0.0;
        freebie.tax = 0.0;
        let products = product_profitability(&[freebie]);
        assert_eq!(products[0].profit_margin, 0.0);
    }

    #[test]
    fn purchase_timing_needs_ten_rows() {
        let prices: Vec<MaterialPriceRecord> = (0..5)
            .map(|i| price_row(&format!("2023-0{}-01", i + 1), 300.0))
            .collect();
        let config = AnalyticsConfig::default();
        let plan = purchase_timing(&prices, &config);
        assert!(!plan.sufficient_data);
        assert!(plan.recommendations.is_empty());
    }

    #[test]
    fn purchase_timing_finds_cement_dips() {
        // Cement dips at rows 2 and 6 only; the flat commodities produce
        // nothing.
        let cement = [300.0, 310.0, 280.0, 320.0, 325.0, 330.0, 290.0, 335.0, 340.0, 345.0];
        let prices: Vec<MaterialPriceRecord> = cement
            .iter()
            .enumerate()
            .map(|(i, c)| price_row(&format!("2023-{:02}-01", i + 1), *c))
            .collect();

        let config = AnalyticsConfig::default();
        let plan = purchase_timing(&prices, &config);
        assert!(plan.sufficient_data);
        assert_eq!(plan.recommendations.len(), 2);
        // 280 saves more than 290 against the same mean.
        assert!((plan.recommendations[0].price - 280.0).abs() < 1e-9);
        assert_eq!(plan.recommendations[0].material, Material::Cement);
        assert_eq!(plan.recommendations[0].date, "2023-03-01");
        assert!(plan.recommendations[0].saving > plan.recommendations[1].saving);

        assert_eq!(plan.savings_by_material.len(), 1);
        assert_eq!(plan.savings_by_material[0].0, Material::Cement);
    }

    #[test]
    fn delivery_ranking_puts_slowest_region_first() {
        let mut fast = order("C1", "2023-01-01", 500.0);
        fast.region = "North".to_string();
        fast.delivery_days = 2.0;
        let mut slow = order("C2", "2023-01-01", 500.0);
        slow.region = "South".to_string();
        slow.delivery_days = 9.0;

        let ranking = delivery_time_by_region(&[fast, slow]);
        assert_eq!(ranking[0].key, "South");
        assert!((ranking[0].value - 9.0).abs() < 1e-9);
        assert_eq!(ranking[1].key, "North");
    }
}
