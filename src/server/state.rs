use crate::location::GeocodeProvider;
use std::sync::Arc;

pub struct AppState {
    pub provider: Arc<dyn GeocodeProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn GeocodeProvider>) -> Self {
        Self { provider }
    }
}
