//! Trailing-window extrapolation of period series.
//!
//! Two deliberately distinct modes are kept, matching the behavior the
//! dashboard has always shown:
//!
//! - **multiplicative** (`project_quantity`): a mean fractional growth rate
//!   over the trailing window, compounded forward. Used for single-metric
//!   quantity series such as monthly demand.
//! - **additive** (`project_prices`): a mean absolute delta per commodity,
//!   added linearly and clamped at zero. Used for the six-commodity price
//!   series.
//!
//! Neither mode ever fails: below the minimum point count, or when the last
//! period key does not parse as a date, the historical series is returned
//! unchanged and the status tells the renderer why.

use serde::{Deserialize, Serialize};

use crate::domain::dates::{advance_date, advance_month_key};
use crate::domain::{AnalyticsConfig, PeriodPoint, PricePoint};

/// Whether projection happened, and why not otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastStatus {
    Projected,
    /// Fewer historical points than the configured minimum.
    TooFewPoints,
    /// The last historical key did not parse as a date.
    UnparseableDate,
}

/// Output of the multiplicative demand forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandForecast {
    /// Historical points followed by projected points (`forecast = true`).
    pub points: Vec<PeriodPoint>,
    /// Mean period-over-period fractional growth, when projection ran.
    pub growth_rate: Option<f64>,
    pub status: ForecastStatus,
}

/// Output of the additive price forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceForecast {
    /// The trailing historical window followed by projected points.
    pub points: Vec<PricePoint>,
    /// Mean absolute monthly delta per commodity, when projection ran.
    pub monthly_deltas: Option<[f64; 6]>,
    pub status: ForecastStatus,
}

/// Project a quantity-style series forward by compounding the mean growth
/// rate of the trailing window.
pub fn project_quantity(series: &[PeriodPoint], config: &AnalyticsConfig) -> DemandForecast {
    if series.len() < config.min_forecast_points {
        return DemandForecast {
            points: series.to_vec(),
            growth_rate: None,
            status: ForecastStatus::TooFewPoints,
        };
    }

    let window_start = series.len().saturating_sub(config.forecast_window);
    let window = &series[window_start..];

    // Mean fractional growth over pairs with a positive base; pairs with a
    // zero/negative base carry no growth information and are excluded from
    // the average.
    let mut growth_sum = 0.0;
    let mut valid_pairs = 0usize;
    for pair in window.windows(2) {
        let (prev, curr) = (pair[0].value, pair[1].value);
        if prev > 0.0 {
            growth_sum += (curr - prev) / prev;
            valid_pairs += 1;
        }
    }
    let rate = if valid_pairs > 0 {
        growth_sum / valid_pairs as f64
    } else {
        0.0
    };

    let last = &window[window.len() - 1];
    if advance_month_key(&last.period, 1).is_none() {
        return DemandForecast {
            points: series.to_vec(),
            growth_rate: None,
            status: ForecastStatus::UnparseableDate,
        };
    }

    let mut points = series.to_vec();
    for i in 1..=config.forecast_horizon {
        let Some(period) = advance_month_key(&last.period, i as u32) else {
            break;
        };
        points.push(PeriodPoint {
            period,
            value: (last.value * (1.0 + rate).powi(i as i32)).round(),
            forecast: true,
        });
    }

    DemandForecast {
        points,
        growth_rate: Some(rate),
        status: ForecastStatus::Projected,
    }
}

/// Project the six-commodity price series forward by adding the mean monthly
/// delta of the trailing window, clamping each projected price at zero.
///
/// The returned series contains only the trailing window plus projections —
/// the shape the price-outlook chart binds to.
pub fn project_prices(series: &[PricePoint], config: &AnalyticsConfig) -> PriceForecast {
    if series.len() < config.min_price_rows {
        return PriceForecast {
            points: series.to_vec(),
            monthly_deltas: None,
            status: ForecastStatus::TooFewPoints,
        };
    }

    let window_start = series.len().saturating_sub(config.price_window);
    let window = &series[window_start..];

    let mut deltas = [0.0f64; 6];
    for pair in window.windows(2) {
        for (slot, (curr, prev)) in deltas
            .iter_mut()
            .zip(pair[1].prices.iter().zip(pair[0].prices.iter()))
        {
            *slot += curr - prev;
        }
    }
    let pairs = (window.len() - 1) as f64;
    for slot in &mut deltas {
        *slot /= pairs;
    }

    let last = &window[window.len() - 1];
    if advance_date(&last.date, 1).is_none() {
        return PriceForecast {
            points: window.to_vec(),
            monthly_deltas: None,
            status: ForecastStatus::UnparseableDate,
        };
    }

    let mut points = window.to_vec();
    for i in 1..=config.forecast_horizon {
        let Some(date) = advance_date(&last.date, i as u32) else {
            break;
        };
        let mut prices = [0.0f64; 6];
        for (idx, price) in prices.iter_mut().enumerate() {
            *price = (last.prices[idx] + deltas[idx] * i as f64).max(0.0);
        }
        points.push(PricePoint {
            date,
            prices,
            forecast: true,
        });
    }

    PriceForecast {
        points,
        monthly_deltas: Some(deltas),
        status: ForecastStatus::Projected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(period: &str, value: f64) -> PeriodPoint {
        PeriodPoint::observed(period, value)
    }

    #[test]
    fn below_minimum_points_returns_input_unchanged() {
        let series = vec![point("2023-01", 100.0), point("2023-02", 110.0)];
        let config = AnalyticsConfig::default();
        let forecast = project_quantity(&series, &config);
        assert_eq!(forecast.status, ForecastStatus::TooFewPoints);
        assert_eq!(forecast.points.len(), series.len());
        assert_eq!(forecast.points, series);
        assert!(forecast.growth_rate.is_none());
    }

    #[test]
    fn ten_percent_growth_compounds_forward() {
        let series = vec![
            point("2023-01", 1000.0),
            point("2023-02", 1100.0),
            point("2023-03", 1210.0),
        ];
        let config = AnalyticsConfig::default();
        let forecast = project_quantity(&series, &config);

        assert_eq!(forecast.status, ForecastStatus::Projected);
        let rate = forecast.growth_rate.unwrap();
        assert!((rate - 0.1).abs() < 1e-9, "expected 10%/month, got {rate}");

        let first_projection = &forecast.points[3];
        assert_eq!(first_projection.period, "2023-04");
        assert!(first_projection.forecast);
        assert!(
            (first_projection.value - 1331.0).abs() < 1.0,
            "expected ~1331, got {}",
            first_projection.value
        );
        assert_eq!(forecast.points.len(), 3 + config.forecast_horizon);
    }

    #[test]
    fn unparseable_last_period_skips_projection() {
        let series = vec![
            point("2023-01", 100.0),
            point("2023-02", 110.0),
            point("not-a-month", 120.0),
        ];
        let config = AnalyticsConfig::default();
        let forecast = project_quantity(&series, &config);
        assert_eq!(forecast.status, ForecastStatus::UnparseableDate);
        assert_eq!(forecast.points.len(), 3);
    }

    #[test]
    fn zero_base_pairs_are_excluded_from_the_rate() {
        let series = vec![
            point("2023-01", 0.0),
            point("2023-02", 100.0),
            point("2023-03", 110.0),
        ];
        let config = AnalyticsConfig::default();
        let forecast = project_quantity(&series, &config);
        // Only the 100 -> 110 pair is valid.
        assert!((forecast.growth_rate.unwrap() - 0.1).abs() < 1e-9);
    }

    fn price_row(date: &str, base: f64) -> PricePoint {
        PricePoint {
            date: date.to_string(),
            prices: [base, base, base, base, base, base],
            forecast: false,
        }
    }

    #[test]
    fn additive_price_forecast_adds_mean_delta() {
        // Twelve months rising by 10 each month.
        let series: Vec<PricePoint> = (0..12)
            .map(|i| price_row(&format!("2023-{:02}-01", i + 1), 100.0 + 10.0 * i as f64))
            .collect();
        let config = AnalyticsConfig::default();
        let forecast = project_prices(&series, &config);

        assert_eq!(forecast.status, ForecastStatus::Projected);
        let deltas = forecast.monthly_deltas.unwrap();
        assert!((deltas[0] - 10.0).abs() < 1e-9);

        // Window (12) + horizon (6).
        assert_eq!(forecast.points.len(), 18);
        let first = &forecast.points[12];
        assert_eq!(first.date, "2024-01-01");
        assert!(first.forecast);
        assert!((first.prices[0] - 220.0).abs() < 1e-9);
    }

    #[test]
    fn projected_prices_clamp_at_zero() {
        // Falling by 50 per month from 100: projections would go negative.
        let series: Vec<PricePoint> = (0..12)
            .map(|i| price_row(&format!("2023-{:02}-01", i + 1), (600.0 - 50.0 * i as f64).max(0.0)))
            .collect();
        let config = AnalyticsConfig::default();
        let forecast = project_prices(&series, &config);
        let last = forecast.points.last().unwrap();
        assert!(last.forecast);
        assert!(last.prices.iter().all(|p| *p >= 0.0));
    }

    #[test]
    fn too_few_price_rows_returns_input_unchanged() {
        let series: Vec<PricePoint> = (0..5)
            .map(|i| price_row(&format!("2023-0{}-01", i + 1), 100.0))
            .collect();
        let config = AnalyticsConfig::default();
        let forecast = project_prices(&series, &config);
        assert_eq!(forecast.status, ForecastStatus::TooFewPoints);
        assert_eq!(forecast.points.len(), 5);
    }
}
