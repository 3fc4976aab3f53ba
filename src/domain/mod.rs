//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input record schemas (`OrderRecord`, `MaterialPriceRecord`)
//! - the tracked commodity set (`Material`)
//! - derived-series shapes (`PeriodPoint`, `GroupSlice`, `PricePoint`)
//! - the analytics policy knobs (`AnalyticsConfig`)

pub mod dates;
pub mod types;

pub use types::*;
