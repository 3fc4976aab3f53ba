//! Deltas, volatility and local minima over the commodity price series.

use serde::{Deserialize, Serialize};

use crate::domain::{Material, PriceDelta, PricePoint};

/// A sampled point strictly lower than both chronological neighbors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalMinimum {
    /// Index into the scanned series; always in `[1, len-2]`.
    pub index: usize,
    pub value: f64,
    /// Series mean minus the minimum value; always strictly positive.
    pub saving: f64,
}

/// Overall direction of the price series, classified from the mean
/// first-to-last percent change across commodities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Upward,
    Downward,
    Stable,
}

/// Narrative-ready facts about the price series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceInsights {
    pub trend: TrendDirection,
    /// Mean first-to-last percent change across commodities.
    pub avg_trend_percent: f64,
    /// Highest-priced commodity at the latest observation.
    pub highest: (Material, f64),
    /// Lowest-priced commodity at the latest observation.
    pub lowest: (Material, f64),
    /// Largest std dev of month-over-month percent changes.
    pub most_volatile: (Material, f64),
    /// Smallest std dev of month-over-month percent changes.
    pub least_volatile: (Material, f64),
}

/// Percent change between the trend classifications.
const TREND_BAND_PERCENT: f64 = 5.0;

/// Month-over-month percent change per commodity.
///
/// `(curr - prev) / prev * 100` when the base is positive, else 0; one output
/// row per consecutive pair, keyed by the later date.
pub fn percent_deltas(series: &[PricePoint]) -> Vec<PriceDelta> {
    series
        .windows(2)
        .map(|pair| {
            let mut deltas = [0.0f64; 6];
            for (idx, slot) in deltas.iter_mut().enumerate() {
                let prev = pair[0].prices[idx];
                let curr = pair[1].prices[idx];
                if prev > 0.0 {
                    *slot = (curr - prev) / prev * 100.0;
                }
            }
            PriceDelta {
                date: pair[1].date.clone(),
                deltas,
            }
        })
        .collect()
}

/// Population standard deviation; 0 for an empty slice.
pub fn std_deviation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values
        .iter()
        .map(|v| (v - mean) * (v - mean))
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}

/// Std dev of percent changes per commodity, most volatile first.
pub fn volatility_ranking(series: &[PricePoint]) -> Vec<(Material, f64)> {
    let mut ranking: Vec<(Material, f64)> = Material::ALL
        .into_iter()
        .map(|material| {
            // Pairs with a non-positive base carry no percent change.
            let changes: Vec<f64> = series
                .windows(2)
                .filter_map(|pair| {
                    let prev = pair[0].price(material);
                    let curr = pair[1].price(material);
                    (prev > 0.0).then(|| (curr - prev) / prev * 100.0)
                })
                .collect();
            (material, std_deviation(&changes))
        })
        .collect();

    ranking.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranking
}

/// Scan a numeric series for strict local minima.
///
/// Returns every index `i` in `[1, len-2]` with `values[i] < values[i-1]`
/// and `values[i] < values[i+1]`, carrying `saving = mean - values[i]`;
/// non-positive savings are dropped and the result is sorted by saving
/// descending.
pub fn local_minima(values: &[f64]) -> Vec<LocalMinimum> {
    if values.len() < 3 {
        return Vec::new();
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;

    let mut minima: Vec<LocalMinimum> = (1..values.len() - 1)
        .filter(|&i| values[i] < values[i - 1] && values[i] < values[i + 1])
        .filter_map(|i| {
            let saving = mean - values[i];
            (saving > 0.0).then_some(LocalMinimum {
                index: i,
                value: values[i],
                saving,
            })
        })
        .collect();

    minima.sort_by(|a, b| b.saving.partial_cmp(&a.saving).unwrap_or(std::cmp::Ordering::Equal));
    minima
}

/// Summarize the price series for narrative output.
///
/// Needs at least two observations; below that there is nothing to say and
/// the caller reports "insufficient data".
pub fn price_insights(series: &[PricePoint]) -> Option<PriceInsights> {
    if series.len() < 2 {
        return None;
    }
    let first = &series[0];
    let last = &series[series.len() - 1];

    let mut trend_sum = 0.0;
    let mut trend_count = 0usize;
    for material in Material::ALL {
        let start = first.price(material);
        if start > 0.0 {
            trend_sum += (last.price(material) - start) / start * 100.0;
            trend_count += 1;
        }
    }
    let avg_trend_percent = if trend_count > 0 {
        trend_sum / trend_count as f64
    } else {
        0.0
    };

    let trend = if avg_trend_percent > TREND_BAND_PERCENT {
        TrendDirection::Upward
    } else if avg_trend_percent < -TREND_BAND_PERCENT {
        TrendDirection::Downward
    } else {
        TrendDirection::Stable
    };

    let mut latest: Vec<(Material, f64)> = Material::ALL
        .into_iter()
        .map(|m| (m, last.price(m)))
        .collect();
    latest.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let highest = latest[0];
    let lowest = latest[latest.len() - 1];

    let ranking = volatility_ranking(series);
    let most_volatile = ranking[0];
    let least_volatile = ranking[ranking.len() - 1];

    Some(PriceInsights {
        trend,
        avg_trend_percent,
        highest,
        lowest,
        most_volatile,
        least_volatile,
    })
}
