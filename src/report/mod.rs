//! Reporting utilities: formatted terminal tables and narrative insights.
//!
//! We keep formatting code in one place so:
//! - the analytics code stays clean and testable on raw numbers
//! - output changes are localized (important for future snapshot tests)

pub mod format;

pub use format::{
    fmt_money, format_churn_table, format_delivery_table, format_demand_outlook,
    format_group_table, format_material_costs, format_price_bands, format_price_outlook,
    format_product_profit, format_purchase_plan, format_series_table, format_summary,
};
