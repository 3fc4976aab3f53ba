//! The analytics transformation layer.
//!
//! Every function in this tree is a pure, total function of its inputs:
//! empty input produces an empty or default result, bad per-record dates are
//! skipped, and zero-count averages are guarded. Nothing here performs I/O,
//! formats currency, or returns an error.
//!
//! Responsibilities:
//!
//! - grouping/reduction over order records (`aggregate`)
//! - single-pass summary totals (`summary`)
//! - trailing-window forecasts, multiplicative and additive (`forecast`)
//! - deltas, volatility and local minima (`trend`)
//! - churn / pricing / purchase-timing / delivery scorers (`heuristics`)

pub mod aggregate;
pub mod forecast;
pub mod heuristics;
pub mod summary;
pub mod trend;
