//! Dataset input and output: CSV ingest, CSV/JSON export.

pub mod export;
pub mod ingest;
