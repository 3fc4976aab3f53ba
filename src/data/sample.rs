//! Fixed sample series shown when no dataset has been loaded.
//!
//! These are placeholders, not synthetic randomness: the same values every
//! run, so the charts and tables look sensible before a CSV is ingested and
//! the output stays deterministic. Callers must label anything derived from
//! them as sample-based.

use crate::domain::{MaterialPriceRecord, PeriodPoint};

/// Monthly demand placeholder: twelve months of steadily growing volume.
pub fn sample_demand() -> Vec<PeriodPoint> {
    const VALUES: [f64; 12] = [
        1200.0, 1250.0, 1300.0, 1280.0, 1350.0, 1400.0, 1450.0, 1500.0, 1550.0, 1600.0, 1650.0,
        1700.0,
    ];
    VALUES
        .iter()
        .enumerate()
        .map(|(i, v)| PeriodPoint::observed(format!("2023-{:02}", i + 1), *v))
        .collect()
}

/// Commodity price placeholder: twelve monthly rows with mild drift.
///
/// Columns follow `Material::index()` order: cement, sand, gravel, fly ash,
/// water, admixture.
pub fn sample_prices() -> Vec<MaterialPriceRecord> {
    const SAND: [f64; 12] = [60.0, 62.0, 65.0, 63.0, 64.0, 66.0, 68.0, 67.0, 69.0, 70.0, 72.0, 74.0];
    const GRAVEL: [f64; 12] =
        [75.0, 78.0, 80.0, 82.0, 79.0, 81.0, 83.0, 85.0, 87.0, 89.0, 91.0, 93.0];
    const WATER: [f64; 12] = [10.0, 11.0, 12.0, 11.0, 12.0, 13.0, 12.0, 13.0, 14.0, 13.0, 14.0, 15.0];

    (0..12)
        .map(|i| MaterialPriceRecord {
            date: format!("2023-{:02}-01", i + 1),
            prices: [
                290.0 + 5.0 * i as f64,
                SAND[i],
                GRAVEL[i],
                220.0 + 5.0 * i as f64,
                WATER[i],
                440.0 + 5.0 * i as f64,
            ],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Material;

    #[test]
    fn sample_series_are_stable_and_well_formed() {
        let demand = sample_demand();
        assert_eq!(demand.len(), 12);
        assert_eq!(demand[0].period, "2023-01");
        assert_eq!(demand[11].period, "2023-12");
        assert!(demand.iter().all(|p| !p.forecast && p.value > 0.0));

        let prices = sample_prices();
        assert_eq!(prices.len(), 12);
        assert_eq!(prices[0].date, "2023-01-01");
        assert!((prices[11].price(Material::Cement) - 345.0).abs() < 1e-9);
        assert!((prices[0].price(Material::Admixture) - 440.0).abs() < 1e-9);
        assert!(prices.iter().all(|r| r.prices.iter().all(|p| *p > 0.0)));
    }
}
