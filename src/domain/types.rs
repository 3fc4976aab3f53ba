//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - held in-memory as immutable session snapshots
//! - handed to a rendering layer as flat records
//! - exported to JSON/CSV

use serde::{Deserialize, Serialize};

/// One of the six raw-material commodities tracked in the price dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    Cement,
    Sand,
    Gravel,
    FlyAsh,
    Water,
    Admixture,
}

impl Material {
    pub const ALL: [Material; 6] = [
        Material::Cement,
        Material::Sand,
        Material::Gravel,
        Material::FlyAsh,
        Material::Water,
        Material::Admixture,
    ];

    /// Column header / display label for this commodity.
    pub fn display_name(self) -> &'static str {
        match self {
            Material::Cement => "Cement",
            Material::Sand => "Sand",
            Material::Gravel => "Gravel",
            Material::FlyAsh => "Fly Ash",
            Material::Water => "Water",
            Material::Admixture => "Admixture",
        }
    }

    /// Resolve a name from an order's material-usage list.
    ///
    /// Matching is by trimmed display name; anything else (typos, unknown
    /// materials) resolves to `None` and contributes to no bucket.
    pub fn from_name(name: &str) -> Option<Material> {
        Material::ALL
            .into_iter()
            .find(|m| m.display_name() == name.trim())
    }

    /// Index into per-commodity arrays (`[f64; 6]`).
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One parsed sales-order row.
///
/// Numeric fields are coerced at ingest with a zero fallback, so a record is
/// never rejected for a bad number. The order date is kept as the raw string:
/// date-keyed computations parse it lazily and skip the record when it does
/// not parse, while count-style computations still see the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub product: String,
    pub category: String,
    pub region: String,
    pub total_sale: f64,
    pub quantity: u32,
    pub shipping_cost: f64,
    pub tax: f64,
    pub delivery_days: f64,
    pub review_score: f64,
    pub material_cost: f64,
    /// Raw comma-separated list of material names, as uploaded.
    pub materials_used: String,
    pub return_requested: bool,
    pub customer_type: String,
    /// Order date as an ISO-like string (`YYYY-MM-DD` in clean data).
    pub date: String,
    pub status: String,
}

impl OrderRecord {
    /// Profit proxy used by the profitability scorers.
    pub fn profit(&self) -> f64 {
        self.total_sale - self.material_cost - self.shipping_cost - self.tax
    }

    /// Commodities named in `materials_used`, unknown names dropped.
    pub fn materials(&self) -> Vec<Material> {
        self.materials_used
            .split(',')
            .filter_map(Material::from_name)
            .collect()
    }
}

/// One raw-material price observation: a date plus all six commodity prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialPriceRecord {
    pub date: String,
    /// Prices indexed by `Material::index()`.
    pub prices: [f64; 6],
}

impl MaterialPriceRecord {
    pub fn price(&self, material: Material) -> f64 {
        self.prices[material.index()]
    }
}

/// A point in a single-metric period series (monthly revenue, demand, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodPoint {
    /// Calendar-period key, `YYYY-MM`.
    pub period: String,
    pub value: f64,
    /// True for projected points, false for observed history.
    pub forecast: bool,
}

impl PeriodPoint {
    pub fn observed(period: impl Into<String>, value: f64) -> Self {
        Self {
            period: period.into(),
            value,
            forecast: false,
        }
    }
}

/// A grouped aggregate: one slice per distinct key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSlice {
    pub key: String,
    pub value: f64,
    /// Number of records that contributed to `value`.
    pub count: usize,
}

/// A point in the multi-commodity price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Full observation date string (`YYYY-MM-DD` in clean data).
    pub date: String,
    pub prices: [f64; 6],
    pub forecast: bool,
}

impl PricePoint {
    pub fn price(&self, material: Material) -> f64 {
        self.prices[material.index()]
    }
}

/// Month-over-month percentage change per commodity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceDelta {
    pub date: String,
    /// Percent change vs. the previous observation, by `Material::index()`.
    pub deltas: [f64; 6],
}

/// Why a derived series is (or is not) backed by uploaded data.
///
/// The rendering layer uses this to show "need more data" messaging instead
/// of silently plotting placeholder values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesSource {
    /// Computed from uploaded records.
    Observed,
    /// Dataset was empty; fixed placeholder series substituted.
    Sample,
}

/// All analytics policy constants, hoisted out of the algorithms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Trailing window (periods) for the demand growth rate.
    pub forecast_window: usize,
    /// Number of future periods to project.
    pub forecast_horizon: usize,
    /// Minimum historical points before any forecast is attempted.
    pub min_forecast_points: usize,
    /// Trailing window (observations) for the additive price forecast.
    pub price_window: usize,
    /// Minimum total price rows for price forecasting / purchase timing.
    pub min_price_rows: usize,
    /// Minimum per-commodity points for the local-minima scan.
    pub min_commodity_points: usize,
    /// Width of a total-sale band, in currency units.
    pub band_width: f64,
    /// Second-half / first-half ratio below which order value is "declining".
    pub declining_value_ratio: f64,
    /// Share of low-scored orders above which satisfaction is flagged.
    pub low_review_share: f64,
    /// Review score at or below which an order counts as low-scored.
    pub low_review_score: f64,
    /// Truncation for top-product rankings.
    pub top_products: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            forecast_window: 6,
            forecast_horizon: 6,
            min_forecast_points: 3,
            price_window: 12,
            min_price_rows: 10,
            min_commodity_points: 3,
            band_width: 5000.0,
            declining_value_ratio: 0.8,
            low_review_share: 0.3,
            low_review_score: 2.0,
            top_products: 5,
        }
    }
}

impl AnalyticsConfig {
    /// Margin-proxy denominator for a sale band: its floor plus half a width.
    pub fn band_midpoint(&self, band_floor: f64) -> f64 {
        band_floor + self.band_width / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_from_name_matches_display_labels() {
        for m in Material::ALL {
            assert_eq!(Material::from_name(m.display_name()), Some(m));
        }
        assert_eq!(Material::from_name(" Fly Ash "), Some(Material::FlyAsh));
        assert_eq!(Material::from_name("Steel"), None);
    }

    #[test]
    fn materials_list_drops_unknown_names() {
        let order = OrderRecord {
            order_id: "O1".to_string(),
            customer_id: "C1".to_string(),
            customer_name: "Acme".to_string(),
            product: "Blocks".to_string(),
            category: "Concrete".to_string(),
            region: "North".to_string(),
            total_sale: 1000.0,
            quantity: 10,
            shipping_cost: 50.0,
            tax: 20.0,
            delivery_days: 3.0,
            review_score: 4.0,
            material_cost: 300.0,
            materials_used: "Cement, Steel, Sand".to_string(),
            return_requested: false,
            customer_type: "New".to_string(),
            date: "2023-01-15".to_string(),
            status: "Delivered".to_string(),
        };

        assert_eq!(order.materials(), vec![Material::Cement, Material::Sand]);
        assert!((order.profit() - 630.0).abs() < 1e-9);
    }
}
