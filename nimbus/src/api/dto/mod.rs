//! Request/response DTOs for the HTTP API.
//!
//! Weather payloads reuse [`crate::weather::WeatherReport`] directly; saved
//! lookups are serialized from [`crate::models::SavedLookup`].

pub mod history;
pub mod weather;

pub use history::*;
pub use weather::*;
