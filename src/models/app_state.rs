use std::sync::{Arc, Mutex};

use crate::api::Provider;
use super::scan::ScanState;

#[derive(Clone)]
pub struct AppState {
    /// Provider collaborator shared by every scan.
    pub provider: Arc<dyn Provider>,
    /// Snapshot of the last scan, shared between the scan task and the
    /// page handlers.
    pub scan: Arc<Mutex<ScanState>>,
    pub custom_css: Option<String>,
}

impl AppState {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            scan: Arc::new(Mutex::new(ScanState::default())),
            custom_css: None,
        }
    }
}
