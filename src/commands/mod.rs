pub mod config;
pub mod labeled;
pub mod sweep;
