pub mod app_config;
pub mod config;
pub mod directory;
pub mod location;
pub mod merchants;
pub mod query_args;

pub use app_config::{AppConfig, Environment};
pub use config::{
    load_app_config, load_app_config_from_env, validate_debounce_ms, DEFAULT_DEBOUNCE_MS,
};
pub use directory::{load_directory, load_profile, DirectoryEntry, DirectoryFile};
pub use location::{Coordinates, UserLocationProfile};
pub use merchants::MerchantSummary;
pub use query_args::{build_query_args, is_blank, GeoLocation, GeoPoint, SearchQueryArgs};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read {path}: {source}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    FileParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("validation error: {0}")]
    Validation(String),
}
