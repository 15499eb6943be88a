//! Weather lookup backend: a proxy over a third-party forecast provider and a
//! small store of saved forecast snapshots with notes.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod weather;
