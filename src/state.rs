//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::EnvironmentConfig;
use crate::repositories::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: EnvironmentConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: EnvironmentConfig) -> Self {
        Self { store, config }
    }
}
