//! Export derived results to CSV and JSON.
//!
//! The CSV exports are meant to be easy to consume in spreadsheets or
//! downstream scripts; the JSON export carries a full serializable bundle.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::analytics::forecast::DemandForecast;
use crate::analytics::heuristics::PurchasePlan;
use crate::error::AppError;

/// Write the demand forecast series to a CSV file.
pub fn write_forecast_csv(path: &Path, forecast: &DemandForecast) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::input(format!("Failed to create forecast CSV '{}': {e}", path.display()))
    })?;

    writeln!(file, "period,quantity,projected")
        .map_err(|e| AppError::input(format!("Failed to write forecast CSV header: {e}")))?;

    for point in &forecast.points {
        writeln!(file, "{},{:.0},{}", point.period, point.value, point.forecast)
            .map_err(|e| AppError::input(format!("Failed to write forecast CSV row: {e}")))?;
    }

    Ok(())
}

/// Write the purchase recommendations to a CSV file.
pub fn write_purchase_plan_csv(path: &Path, plan: &PurchasePlan) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::input(format!("Failed to create purchase CSV '{}': {e}", path.display()))
    })?;

    writeln!(file, "material,date,price,saving")
        .map_err(|e| AppError::input(format!("Failed to write purchase CSV header: {e}")))?;

    for rec in &plan.recommendations {
        writeln!(
            file,
            "{},{},{:.2},{:.2}",
            rec.material.display_name(),
            rec.date,
            rec.price,
            rec.saving
        )
        .map_err(|e| AppError::input(format!("Failed to write purchase CSV row: {e}")))?;
    }

    Ok(())
}

/// Write any serializable bundle as pretty-printed JSON.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::input(format!("Failed to create JSON export '{}': {e}", path.display()))
    })?;
    serde_json::to_writer_pretty(file, value)
        .map_err(|e| AppError::internal(format!("Failed to serialize JSON export: {e}")))?;
    Ok(())
}
