mod history;

pub use history::{ForecastSlice, HistoryService};
