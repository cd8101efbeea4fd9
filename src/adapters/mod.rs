// Adapters layer: concrete implementations of the domain ports.
// The on-disk storage used by the CLI lives in `config::cli`.

pub mod http_reissuer;
pub mod memory_storage;
pub mod navigation;

pub use http_reissuer::HttpTokenReissuer;
pub use memory_storage::MemoryStorage;
pub use navigation::{LoggingNavigator, RecordingNavigator};
