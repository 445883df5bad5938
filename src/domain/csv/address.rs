// ============================================================
// SHIP-TO ADDRESS
// ============================================================
// Builds the single-line address sent for verification

use super::CsvRow;

pub const ADDRESS_1: &str = "Ship To - Address 1";
pub const ADDRESS_2: &str = "Ship To - Address 2";
pub const ADDRESS_3: &str = "Ship To - Address 3";
pub const CITY: &str = "Ship To - City";
pub const STATE: &str = "Ship To - State";
pub const POSTAL_CODE: &str = "Ship To - Postal Code";
pub const COUNTRY: &str = "Ship To - Country";

/// Address columns in the order they are joined
pub const SHIP_TO_FIELDS: [&str; 7] = [
    ADDRESS_1,
    ADDRESS_2,
    ADDRESS_3,
    CITY,
    STATE,
    POSTAL_CODE,
    COUNTRY,
];

const SEPARATOR: &str = ", ";

/// Join the present, non-empty ship-to fields of a row.
///
/// Values are used verbatim: no trimming, escaping or normalization.
/// A row without any address field yields an empty string.
pub fn build_address_string(row: &CsvRow) -> String {
    SHIP_TO_FIELDS
        .iter()
        .filter_map(|name| row.get(name))
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

pub fn build_address_strings(rows: &[CsvRow]) -> Vec<String> {
    rows.iter().map(build_address_string).collect()
}
