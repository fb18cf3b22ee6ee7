mod client;
mod models;
mod response;

pub use client::*;
pub use models::*;
pub use response::*;
