pub(crate) mod health;
pub mod history;
pub mod weather;

pub use health::{health_check, root};
