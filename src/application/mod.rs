pub mod use_cases;

pub use use_cases::address_verification::AddressVerificationUseCase;
pub use use_cases::csv_verification::CsvVerificationUseCase;
