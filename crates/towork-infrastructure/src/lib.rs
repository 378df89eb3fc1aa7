//! File system side of the towork client: paths, configuration and the
//! session scopes.

pub mod config_service;
pub mod paths;
pub mod storage;

pub use config_service::ConfigService;
pub use paths::ToworkPaths;
pub use storage::FileKeyValueStore;
