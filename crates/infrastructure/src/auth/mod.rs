//! Authentication adapters.

mod refresh_service;

pub use refresh_service::HttpRefreshService;
