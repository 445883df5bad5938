pub mod error;
pub mod llm_config;

// Shipping-address CSV types
pub mod csv;
