pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{HttpTokenReissuer, LoggingNavigator, MemoryStorage, RecordingNavigator};
pub use api::StorefrontApi;
pub use config::cli::FileStorage;
pub use config::toml_config::StorefrontConfig;
pub use core::route_guard::{GuardDecision, RouteGuard};
pub use core::session::SessionManager;
pub use utils::error::{Result, StorefrontError};
