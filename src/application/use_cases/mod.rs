pub mod address_verification;
pub mod csv_verification;
