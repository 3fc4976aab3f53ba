//! Table and narrative formatting for terminal output.
//!
//! Everything here consumes raw numbers from the analytics layer and produces
//! strings; no computation happens in this module.

use crate::analytics::aggregate::{top_material, MaterialBreakdown};
use crate::analytics::forecast::{DemandForecast, ForecastStatus, PriceForecast};
use crate::analytics::heuristics::{ChurnRisk, PriceBand, ProductProfit, PurchasePlan};
use crate::analytics::summary::SummaryStats;
use crate::analytics::trend::{PriceInsights, TrendDirection};
use crate::domain::{GroupSlice, PeriodPoint, SeriesSource};

/// Format an amount as rupees with Indian digit grouping.
///
/// The last three integer digits group together, then pairs:
/// `1234567.5` renders as `₹12,34,567.50`.
pub fn fmt_money(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let cents = (value.abs() * 100.0).round() as u64;
    let units = (cents / 100).to_string();
    let frac = cents % 100;

    let grouped = if units.len() <= 3 {
        units
    } else {
        let (head, tail) = units.split_at(units.len() - 3);
        let mut parts: Vec<&str> = Vec::new();
        let mut i = head.len();
        while i > 2 {
            parts.push(&head[i - 2..i]);
            i -= 2;
        }
        parts.push(&head[..i]);
        parts.reverse();
        format!("{},{tail}", parts.join(","))
    };

    format!("{sign}₹{grouped}.{frac:02}")
}

fn source_note(source: SeriesSource) -> &'static str {
    match source {
        SeriesSource::Observed => "",
        SeriesSource::Sample => " (sample data; load a CSV for real analysis)",
    }
}

/// Headline summary cards.
pub fn format_summary(stats: &SummaryStats) -> String {
    let mut out = String::new();
    out.push_str("=== sitemix - Construction Sales Insights ===\n");
    out.push_str(&format!("Orders:             {}\n", stats.total_orders));
    out.push_str(&format!("Revenue:            {}\n", fmt_money(stats.total_revenue)));
    out.push_str(&format!("Avg order value:    {}\n", fmt_money(stats.avg_order_value)));
    out.push_str(&format!("Avg material cost:  {}\n", fmt_money(stats.avg_material_cost)));
    out.push_str(&format!("Customers:          {}\n", stats.distinct_customers));
    out
}

/// A two-column period/value table.
pub fn format_series_table(title: &str, points: &[PeriodPoint]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{title}:\n"));
    out.push_str(&format!("{:<10} {:>14}\n", "period", "value"));
    out.push_str(&format!("{:-<10} {:-<14}\n", "", ""));
    for p in points {
        let marker = if p.forecast { " *" } else { "" };
        out.push_str(&format!("{:<10} {:>14.2}{marker}\n", p.period, p.value));
    }
    if points.iter().any(|p| p.forecast) {
        out.push_str("(* projected)\n");
    }
    out
}

/// A key/value/count table for grouped slices.
pub fn format_group_table(title: &str, slices: &[GroupSlice]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{title}:\n"));
    out.push_str(&format!("{:<24} {:>14} {:>8}\n", "key", "value", "orders"));
    out.push_str(&format!("{:-<24} {:-<14} {:-<8}\n", "", "", ""));
    for s in slices {
        out.push_str(&format!("{:<24} {:>14.2} {:>8}\n", s.key, s.value, s.count));
    }
    out
}

/// Demand forecast table plus the growth narrative.
pub fn format_demand_outlook(forecast: &DemandForecast, source: SeriesSource) -> String {
    let mut out = String::new();
    out.push_str(&format_series_table(
        &format!("Monthly demand outlook{}", source_note(source)),
        &forecast.points,
    ));

    match forecast.status {
        ForecastStatus::Projected => {
            let rate = forecast.growth_rate.unwrap_or(0.0) * 100.0;
            let direction = if rate >= 0.0 { "growth" } else { "decline" };
            out.push_str(&format!(
                "Average monthly {direction}: {:.1}%; projection compounds this forward.\n",
                rate.abs()
            ));
        }
        ForecastStatus::TooFewPoints => {
            out.push_str("Not enough history to project demand; showing observed months only.\n");
        }
        ForecastStatus::UnparseableDate => {
            out.push_str("Latest period has no usable date; showing observed months only.\n");
        }
    }
    out
}

/// Price outlook table plus narrative insight lines.
pub fn format_price_outlook(
    forecast: &PriceForecast,
    insights: Option<&PriceInsights>,
    source: SeriesSource,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("Commodity price outlook{}:\n", source_note(source)));
    out.push_str(&format!(
        "{:<12} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9}\n",
        "date", "cement", "sand", "gravel", "fly ash", "water", "admix"
    ));
    out.push_str(&format!(
        "{:-<12} {:-<9} {:-<9} {:-<9} {:-<9} {:-<9} {:-<9}\n",
        "", "", "", "", "", "", ""
    ));
    for p in &forecast.points {
        let marker = if p.forecast { " *" } else { "" };
        out.push_str(&format!(
            "{:<12} {:>9.2} {:>9.2} {:>9.2} {:>9.2} {:>9.2} {:>9.2}{marker}\n",
            p.date, p.prices[0], p.prices[1], p.prices[2], p.prices[3], p.prices[4], p.prices[5]
        ));
    }
    if forecast.points.iter().any(|p| p.forecast) {
        out.push_str("(* projected)\n");
    }
    if forecast.status == ForecastStatus::TooFewPoints {
        out.push_str("Not enough price history to project; showing observed rows only.\n");
    }

    if let Some(ins) = insights {
        let trend_line = match ins.trend {
            TrendDirection::Upward => format!(
                "Prices are broadly rising ({:+.1}% across commodities); consider locking in rates.",
                ins.avg_trend_percent
            ),
            TrendDirection::Downward => format!(
                "Prices are broadly falling ({:+.1}% across commodities); spot buying is favorable.",
                ins.avg_trend_percent
            ),
            TrendDirection::Stable => format!(
                "Prices are broadly stable ({:+.1}% across commodities).",
                ins.avg_trend_percent
            ),
        };
        out.push('\n');
        out.push_str(&format!("- {trend_line}\n"));
        out.push_str(&format!(
            "- Highest priced: {} at {}; lowest: {} at {}.\n",
            ins.highest.0.display_name(),
            fmt_money(ins.highest.1),
            ins.lowest.0.display_name(),
            fmt_money(ins.lowest.1)
        ));
        out.push_str(&format!(
            "- Most volatile: {} (std dev {:.1}% of monthly moves); steadiest: {}.\n",
            ins.most_volatile.0.display_name(),
            ins.most_volatile.1,
            ins.least_volatile.0.display_name()
        ));
    }
    out
}

/// Purchase-timing recommendations with the per-commodity savings roll-up.
pub fn format_purchase_plan(plan: &PurchasePlan) -> String {
    let mut out = String::new();
    out.push_str("Purchase timing (local price dips):\n");

    if !plan.sufficient_data {
        out.push_str("Need more price history to recommend purchase windows.\n");
        return out;
    }
    if plan.recommendations.is_empty() {
        out.push_str("No below-average price dips in the current history.\n");
        return out;
    }

    out.push_str(&format!(
        "{:<12} {:<12} {:>12} {:>12}\n",
        "material", "date", "price", "saving"
    ));
    out.push_str(&format!("{:-<12} {:-<12} {:-<12} {:-<12}\n", "", "", "", ""));
    for rec in &plan.recommendations {
        out.push_str(&format!(
            "{:<12} {:<12} {:>12} {:>12}\n",
            rec.material.display_name(),
            rec.date,
            fmt_money(rec.price),
            fmt_money(rec.saving)
        ));
    }

    out.push_str("\nPotential savings by material:\n");
    for (material, total) in &plan.savings_by_material {
        out.push_str(&format!(
            "- {}: {} per unit across flagged windows\n",
            material.display_name(),
            fmt_money(*total)
        ));
    }
    out
}

/// Customers carrying churn warning signs.
pub fn format_churn_table(risks: &[ChurnRisk]) -> String {
    let mut out = String::new();
    out.push_str("Customers at churn risk:\n");
    if risks.is_empty() {
        out.push_str("None flagged.\n");
        return out;
    }
    out.push_str(&format!(
        "{:<10} {:<24} {:<12} {}\n",
        "id", "customer", "last order", "warning signs"
    ));
    out.push_str(&format!("{:-<10} {:-<24} {:-<12} {:-<32}\n", "", "", "", ""));
    for r in risks {
        let flags: Vec<&str> = r.flags.iter().map(|f| f.display_name()).collect();
        out.push_str(&format!(
            "{:<10} {:<24} {:<12} {}\n",
            r.customer_id,
            r.customer_name,
            r.last_order_date,
            flags.join("; ")
        ));
    }
    out
}

/// Price-band profitability table with the recommended band called out.
pub fn format_price_bands(bands: &[PriceBand], best: Option<&PriceBand>) -> String {
    let mut out = String::new();
    out.push_str("Profitability by price band:\n");
    out.push_str(&format!(
        "{:<20} {:>14} {:>10} {:>8}\n",
        "band", "avg profit", "margin", "orders"
    ));
    out.push_str(&format!("{:-<20} {:-<14} {:-<10} {:-<8}\n", "", "", "", ""));
    for band in bands {
        let chosen = match best {
            Some(b) if (b.floor - band.floor).abs() < f64::EPSILON => "*",
            _ => " ",
        };
        out.push_str(&format!(
            "{chosen}{:<19} {:>14} {:>9.1}% {:>8}\n",
            band_label(band.floor),
            fmt_money(band.avg_profit),
            band.profit_margin * 100.0,
            band.order_count
        ));
    }
    if let Some(b) = best {
        out.push_str(&format!(
            "Best margin sits in the {} band.\n",
            band_label(b.floor)
        ));
    }
    out
}

fn band_label(floor: f64) -> String {
    format!("{}+", fmt_money(floor))
}

/// Per-product profit ranking.
pub fn format_product_profit(products: &[ProductProfit]) -> String {
    let mut out = String::new();
    out.push_str("Profit by product:\n");
    out.push_str(&format!(
        "{:<24} {:>14} {:>10} {:>14} {:>8}\n",
        "product", "total profit", "margin", "avg profit", "orders"
    ));
    out.push_str(&format!(
        "{:-<24} {:-<14} {:-<10} {:-<14} {:-<8}\n",
        "", "", "", "", ""
    ));
    for p in products {
        out.push_str(&format!(
            "{:<24} {:>14} {:>9.1}% {:>14} {:>8}\n",
            p.product,
            fmt_money(p.total_profit),
            p.profit_margin * 100.0,
            fmt_money(p.avg_profit),
            p.order_count
        ));
    }
    out
}

/// Material cost attribution for the top products.
pub fn format_material_costs(breakdown: &[MaterialBreakdown]) -> String {
    let mut out = String::new();
    out.push_str("Material cost by product (top products):\n");
    out.push_str(&format!(
        "{:<24} {:>12} {}\n",
        "product", "total cost", "dominant material"
    ));
    out.push_str(&format!("{:-<24} {:-<12} {:-<20}\n", "", "", ""));
    for row in breakdown {
        let dominant = top_material(row)
            .filter(|(_, cost)| *cost > 0.0)
            .map(|(m, _)| m.display_name())
            .unwrap_or("-");
        out.push_str(&format!(
            "{:<24} {:>12} {}\n",
            row.product,
            fmt_money(row.total),
            dominant
        ));
    }
    out
}

/// Average delivery time per region, slowest first.
pub fn format_delivery_table(slices: &[GroupSlice]) -> String {
    let mut out = String::new();
    out.push_str("Delivery time by region (slowest first):\n");
    out.push_str(&format!("{:<24} {:>10} {:>8}\n", "region", "avg days", "orders"));
    out.push_str(&format!("{:-<24} {:-<10} {:-<8}\n", "", "", ""));
    for s in slices {
        out.push_str(&format!("{:<24} {:>10.1} {:>8}\n", s.key, s.value, s.count));
    }
    out
}
