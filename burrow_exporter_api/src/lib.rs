pub mod app_config;
pub mod error;
pub mod exposition;
pub mod startup;
