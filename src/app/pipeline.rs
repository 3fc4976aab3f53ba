//! Shared report pipeline used by every front-end command.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> session store -> derived series -> forecasts -> heuristics
//!
//! The commands then focus on presentation (which sections to print) and on
//! optional exports.

use std::path::PathBuf;

use serde::Serialize;

use crate::analytics::aggregate::{
    delivery_time_by_month, material_cost_by_product, orders_by_customer_type, orders_by_status,
    quantity_by_month, revenue_by_month, revenue_by_region, top_products_by_revenue,
    MaterialBreakdown,
};
use crate::analytics::forecast::{project_prices, project_quantity, DemandForecast, PriceForecast};
use crate::analytics::heuristics::{
    best_price_band, churn_risk, delivery_time_by_region, price_band_profitability,
    product_profitability, purchase_timing, ChurnRisk, PriceBand, ProductProfit, PurchasePlan,
};
use crate::analytics::summary::{summarize, SummaryStats};
use crate::analytics::trend::{percent_deltas, price_insights, PriceInsights};
use crate::data::{sample_demand, sample_prices};
use crate::domain::dates::sort_key;
use crate::domain::{
    AnalyticsConfig, GroupSlice, MaterialPriceRecord, PeriodPoint, PriceDelta, PricePoint,
    SeriesSource,
};
use crate::error::AppError;
use crate::io::ingest;
use crate::store::SessionStore;

/// Resolved inputs for one report run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub orders_path: Option<PathBuf>,
    pub prices_path: Option<PathBuf>,
    pub analytics: AnalyticsConfig,
    pub export_forecast: Option<PathBuf>,
    pub export_purchases: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

/// All computed outputs of a single run, serializable as one bundle.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutput {
    pub stats: SummaryStats,
    pub revenue_by_month: Vec<PeriodPoint>,
    pub revenue_by_region: Vec<GroupSlice>,
    pub orders_by_customer_type: Vec<GroupSlice>,
    pub orders_by_status: Vec<GroupSlice>,
    pub top_products: Vec<GroupSlice>,
    pub delivery_by_month: Vec<PeriodPoint>,
    pub delivery_by_region: Vec<GroupSlice>,
    pub material_costs: Vec<MaterialBreakdown>,
    pub demand: DemandForecast,
    pub demand_source: SeriesSource,
    pub price_outlook: PriceForecast,
    pub price_deltas: Vec<PriceDelta>,
    pub price_insights: Option<PriceInsights>,
    pub price_source: SeriesSource,
    pub purchase_plan: PurchasePlan,
    pub churn: Vec<ChurnRisk>,
    pub price_bands: Vec<PriceBand>,
    pub best_band: Option<PriceBand>,
    pub products: Vec<ProductProfit>,
}

/// Load the configured CSV files and compute the full report.
pub fn run_report(config: &RunConfig) -> Result<RunOutput, AppError> {
    let mut store = SessionStore::new();

    if let Some(path) = &config.orders_path {
        let ingested = ingest::load_orders(path)?;
        if ingested.records.is_empty() {
            return Err(AppError::no_data(format!(
                "Orders CSV '{}' contains no data rows.",
                path.display()
            )));
        }
        store.set_orders(ingested.records);
    }
    if let Some(path) = &config.prices_path {
        let ingested = ingest::load_material_prices(path)?;
        if ingested.records.is_empty() {
            return Err(AppError::no_data(format!(
                "Prices CSV '{}' contains no data rows.",
                path.display()
            )));
        }
        store.set_material_prices(ingested.records);
    }

    Ok(compute(&store, &config.analytics))
}

/// Compute every derived series from the current store snapshot.
///
/// Total: an empty store produces zeroed summaries, empty tables, and
/// sample-backed forecast series marked as such.
pub fn compute(store: &SessionStore, config: &AnalyticsConfig) -> RunOutput {
    let orders = store.orders();

    // Demand series: monthly quantity from real orders, or the fixed sample
    // when nothing is loaded.
    let monthly_quantity = quantity_by_month(orders);
    let (demand_series, demand_source) = if monthly_quantity.is_empty() {
        (sample_demand(), SeriesSource::Sample)
    } else {
        (monthly_quantity, SeriesSource::Observed)
    };
    let demand = project_quantity(&demand_series, config);

    // Price series: observed rows in chronological order, or the fixed sample.
    let (price_records, price_source) = if store.material_prices().is_empty() {
        (sample_prices(), SeriesSource::Sample)
    } else {
        (store.material_prices().to_vec(), SeriesSource::Observed)
    };
    let price_series = price_points(&price_records);
    let price_outlook = project_prices(&price_series, config);
    let insights = price_insights(&price_series);

    // Purchase timing only ever runs on uploaded prices; recommending buy
    // windows from placeholder data would be misleading.
    let purchase_plan = purchase_timing(store.material_prices(), config);

    let price_bands = price_band_profitability(orders, config);
    let best_band = best_price_band(&price_bands).cloned();

    RunOutput {
        stats: summarize(orders),
        revenue_by_month: revenue_by_month(orders),
        revenue_by_region: revenue_by_region(orders),
        orders_by_customer_type: orders_by_customer_type(orders),
        orders_by_status: orders_by_status(orders),
        top_products: top_products_by_revenue(orders, config),
        delivery_by_month: delivery_time_by_month(orders),
        delivery_by_region: delivery_time_by_region(orders),
        material_costs: material_cost_by_product(orders, config),
        demand,
        demand_source,
        price_outlook,
        price_deltas: percent_deltas(&price_series),
        price_insights: insights,
        price_source,
        purchase_plan,
        churn: churn_risk(orders, config),
        price_bands,
        best_band,
        products: product_profitability(orders),
    }
}

/// Convert price records to a chronologically sorted series of points.
fn price_points(records: &[MaterialPriceRecord]) -> Vec<PricePoint> {
    let mut points: Vec<PricePoint> = records
        .iter()
        .map(|r| PricePoint {
            date: r.date.clone(),
            prices: r.prices,
            forecast: false,
        })
        .collect();
    points.sort_by_key(|p| sort_key(&p.date));
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::forecast::ForecastStatus;
    use crate::domain::OrderRecord;

    #[test]
    fn empty_store_falls_back_to_sample_series() {
        let store = SessionStore::new();
        let config = AnalyticsConfig::default();
        let output = compute(&store, &config);

        assert_eq!(output.stats.total_orders, 0);
        assert!(output.revenue_by_month.is_empty());
        assert_eq!(output.demand_source, SeriesSource::Sample);
        assert_eq!(output.price_source, SeriesSource::Sample);
        // Twelve sample months project cleanly.
        assert_eq!(output.demand.status, ForecastStatus::Projected);
        assert_eq!(output.price_outlook.status, ForecastStatus::Projected);
        // No purchase recommendations from placeholder prices.
        assert!(!output.purchase_plan.sufficient_data);
    }

    #[test]
    fn loaded_orders_switch_demand_to_observed() {
        let mut store = SessionStore::new();
        store.set_orders(vec![OrderRecord {
            order_id: "O1".to_string(),
            customer_id: "C1".to_string(),
            customer_name: "Acme".to_string(),
            product: "Blocks".to_string(),
            category: "Concrete".to_string(),
            region: "North".to_string(),
            total_sale: 1000.0,
            quantity: 10,
            shipping_cost: 0.0,
            tax: 0.0,
            delivery_days: 3.0,
            review_score: 4.0,
            material_cost: 100.0,
            materials_used: "Cement".to_string(),
            return_requested: false,
            customer_type: "New".to_string(),
            date: "2023-01-15".to_string(),
            status: "Delivered".to_string(),
        }]);

        let config = AnalyticsConfig::default();
        let output = compute(&store, &config);
        assert_eq!(output.demand_source, SeriesSource::Observed);
        // One month of history is below the forecast minimum.
        assert_eq!(output.demand.status, ForecastStatus::TooFewPoints);
        assert_eq!(output.stats.total_orders, 1);
        assert_eq!(output.price_source, SeriesSource::Sample);
    }

    #[test]
    fn price_points_sort_chronologically() {
        let records = vec![
            MaterialPriceRecord {
                date: "2023-03-01".to_string(),
                prices: [3.0; 6],
            },
            MaterialPriceRecord {
                date: "2023-01-01".to_string(),
                prices: [1.0; 6],
            },
        ];
        let points = price_points(&records);
        assert_eq!(points[0].date, "2023-01-01");
        assert_eq!(points[1].date, "2023-03-01");
    }
}
