pub mod burrow;
pub mod collector;
pub mod config_store;
