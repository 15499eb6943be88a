mod client;
mod reshape;
pub mod types;

pub use client::WeatherClient;
pub use reshape::{classify_upstream_failure, reshape};
pub use types::*;
