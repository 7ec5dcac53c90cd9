mod error;
mod federate_config;

cfg_if! {
    if #[cfg(feature = "toml_config")] {
        mod config_file;
    }
}

pub use error::ConfigError;
pub use federate_config::FederateConfig;
