use std::sync::Arc;

use crate::db::DatabaseBackend;
use crate::services::HistoryService;
use crate::weather::WeatherClient;

#[derive(Clone)]
pub struct AppState {
    /// Store handle opened at startup; shared by every request.
    pub db: Arc<dyn DatabaseBackend>,
    pub weather: WeatherClient,
    pub history: HistoryService,
}

impl AppState {
    pub fn new(db: Arc<dyn DatabaseBackend>, weather: WeatherClient) -> Self {
        let history = HistoryService::new(db.clone());

        Self {
            db,
            weather,
            history,
        }
    }
}
