//! CSV ingest and normalization.
//!
//! Turns heterogeneous order-book and commodity-price CSV exports into the
//! domain records the analytics run on.
//!
//! Design goals:
//! - **Lenient values**: a malformed cell becomes a zero/empty default; an
//!   order row is never rejected for a bad number.
//! - **Row-level reporting**: rows the CSV reader itself cannot parse are
//!   skipped but counted, so the caller can say what happened.
//! - **Deterministic behavior**: records come out in file order.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{Material, MaterialPriceRecord, OrderRecord};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: records in file order plus read diagnostics.
#[derive(Debug, Clone)]
pub struct Ingested<T> {
    pub records: Vec<T>,
    pub rows_read: usize,
    pub row_errors: Vec<RowError>,
}

/// Load the order book from a CSV file.
pub fn load_orders(path: &Path) -> Result<Ingested<OrderRecord>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open orders CSV '{}': {e}", path.display())))?;
    read_orders(file)
}

/// Load the commodity price history from a CSV file.
pub fn load_material_prices(path: &Path) -> Result<Ingested<MaterialPriceRecord>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open prices CSV '{}': {e}", path.display())))?;
    read_material_prices(file)
}

/// Parse order rows from any reader.
pub fn read_orders(input: impl Read) -> Result<Ingested<OrderRecord>, AppError> {
    let (header_map, rows, row_errors, rows_read) = read_rows(input)?;

    let records = rows
        .iter()
        .map(|record| OrderRecord {
            order_id: get_text(record, &header_map, "orderid"),
            customer_id: get_text(record, &header_map, "customerid"),
            customer_name: get_text(record, &header_map, "customername"),
            product: get_text(record, &header_map, "product"),
            category: get_text(record, &header_map, "category"),
            region: get_text(record, &header_map, "region"),
            total_sale: get_f64(record, &header_map, "totalsale").max(0.0),
            quantity: get_f64(record, &header_map, "quantity").max(0.0) as u32,
            shipping_cost: get_f64(record, &header_map, "shippingcost"),
            tax: get_f64(record, &header_map, "tax"),
            delivery_days: get_f64(record, &header_map, "deliverydays"),
            review_score: get_f64(record, &header_map, "reviewscore"),
            material_cost: get_f64(record, &header_map, "materialcost"),
            materials_used: get_text(record, &header_map, "materialsused"),
            return_requested: get_bool(record, &header_map, "returnrequested"),
            customer_type: get_text(record, &header_map, "customertype"),
            date: get_text(record, &header_map, "date"),
            status: get_text(record, &header_map, "status"),
        })
        .collect();

    Ok(Ingested {
        records,
        rows_read,
        row_errors,
    })
}

/// Parse commodity price rows from any reader.
///
/// Requires a `date` column; each commodity column is optional and a missing
/// or malformed price becomes 0.
pub fn read_material_prices(input: impl Read) -> Result<Ingested<MaterialPriceRecord>, AppError> {
    let (header_map, rows, row_errors, rows_read) = read_rows(input)?;

    if !header_map.contains_key("date") {
        return Err(AppError::input("Prices CSV is missing required column: `date`"));
    }

    let records = rows
        .iter()
        .map(|record| {
            let mut prices = [0.0f64; 6];
            for material in Material::ALL {
                let column = normalize_header_name(material.display_name());
                prices[material.index()] = get_f64(record, &header_map, &column);
            }
            MaterialPriceRecord {
                date: get_text(record, &header_map, "date"),
                prices,
            }
        })
        .collect();

    Ok(Ingested {
        records,
        rows_read,
        row_errors,
    })
}

type RawRows = (HashMap<String, usize>, Vec<StringRecord>, Vec<RowError>, usize);

fn read_rows(input: impl Read) -> Result<RawRows, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header row and CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;
        match result {
            Ok(record) => rows.push(record),
            Err(e) => row_errors.push(RowError {
                line,
                message: format!("CSV parse error: {e}"),
            }),
        }
    }

    Ok((header_map, rows, row_errors, rows_read))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel exports sometimes carry a BOM on the first header; spreadsheet
    // templates disagree on spacing ("Total Sale" vs "TotalSale" vs
    // "total_sale"). Normalizing to bare lowercase alphanumerics accepts all
    // of them.
    name.trim()
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase()
}

fn get_text(record: &StringRecord, header_map: &HashMap<String, usize>, name: &str) -> String {
    header_map
        .get(name)
        .and_then(|idx| record.get(*idx))
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

fn get_f64(record: &StringRecord, header_map: &HashMap<String, usize>, name: &str) -> f64 {
    header_map
        .get(name)
        .and_then(|idx| record.get(*idx))
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn get_bool(record: &StringRecord, header_map: &HashMap<String, usize>, name: &str) -> bool {
    let value = header_map
        .get(name)
        .and_then(|idx| record.get(*idx))
        .map(str::trim)
        .unwrap_or_default();
    value.eq_ignore_ascii_case("yes") || value.eq_ignore_ascii_case("true") || value == "1"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_rows_coerce_bad_numbers_to_zero() {
        let csv = "\
OrderID,CustomerID,CustomerName,Product,TotalSale,Quantity,ReturnRequested,Date
O1,C1,Acme,Blocks,1000,5,Yes,2023-01-15
O2,C2,Build Co,Pipes,not-a-number,,no,2023-02-01
";
        let ingested = read_orders(csv.as_bytes()).unwrap();
        assert_eq!(ingested.rows_read, 2);
        assert!(ingested.row_errors.is_empty());
        assert_eq!(ingested.records.len(), 2);

        let first = &ingested.records[0];
        assert!((first.total_sale - 1000.0).abs() < 1e-9);
        assert_eq!(first.quantity, 5);
        assert!(first.return_requested);

        // Bad cells never reject the row.
        let second = &ingested.records[1];
        assert_eq!(second.total_sale, 0.0);
        assert_eq!(second.quantity, 0);
        assert!(!second.return_requested);
        // Columns absent from the file default to empty/zero.
        assert_eq!(second.region, "");
        assert_eq!(second.material_cost, 0.0);
    }

    #[test]
    fn header_matching_survives_bom_and_spacing() {
        let csv = "\u{feff}Order ID,total_sale,Date\nO1,2500,2023-03-01\n";
        let ingested = read_orders(csv.as_bytes()).unwrap();
        assert_eq!(ingested.records[0].order_id, "O1");
        assert!((ingested.records[0].total_sale - 2500.0).abs() < 1e-9);
    }

    #[test]
    fn price_rows_map_commodity_columns_by_name() {
        let csv = "\
Date,Cement,Sand,Gravel,Fly Ash,Water,Admixture
2023-01-01,290,60,75,220,10,440
2023-02-01,295,62,78,,11,445
";
        let ingested = read_material_prices(csv.as_bytes()).unwrap();
        assert_eq!(ingested.records.len(), 2);
        assert!((ingested.records[0].price(Material::FlyAsh) - 220.0).abs() < 1e-9);
        // Blank cell coerces to zero rather than failing the row.
        assert_eq!(ingested.records[1].price(Material::FlyAsh), 0.0);
    }

    #[test]
    fn prices_without_date_column_are_an_input_error() {
        let csv = "Cement,Sand\n290,60\n";
        let err = read_material_prices(csv.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
