// ============================================================
// CSV DOMAIN LAYER
// ============================================================
// Core types for shipping-address CSVs
// No I/O, no async

pub mod address;
mod csv_row;

pub use address::{build_address_string, build_address_strings, SHIP_TO_FIELDS};
pub use csv_row::{CsvField, CsvRow, CsvTable, VerifiedCsv, VERIFIED_ADDRESS_COLUMN};

/// Name the verified CSV is delivered under
pub const OUTPUT_FILE_NAME: &str = "verified_addresses.csv";
