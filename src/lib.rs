pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod grading;
pub mod metrics;
pub mod models;
pub mod services;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::PronoStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PronoStore>,
    pub config: AppConfig,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}
