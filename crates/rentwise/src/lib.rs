pub mod apartments;
pub mod config;
pub mod error;
pub mod import;
pub mod telemetry;
