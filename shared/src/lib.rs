pub mod admin_service;
pub mod format;
pub mod http;
pub mod metrics_defs;
