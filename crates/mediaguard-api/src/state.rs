//! Application state shared by all handlers.

use mediaguard_core::Config;
use mediaguard_services::{EventDispatcher, Storage};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub dispatcher: EventDispatcher,
}
