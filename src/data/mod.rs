//! Built-in placeholder datasets.

pub mod sample;

pub use sample::{sample_demand, sample_prices};
