use serde::Deserialize;

use crate::error::{BannerError, BannerResult};

/// Banner engine configuration. Loaded from environment variables with the
/// prefix `BANNERLINE__`.
#[derive(Debug, Clone, Deserialize)]
pub struct BannerConfig {
    /// Fixed key the dismissal record is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Length of the temporary suppression window after a dismissal.
    #[serde(default = "default_dismiss_window_hours")]
    pub dismiss_window_hours: u32,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Path of the JSON state file used by the file-backed store.
    #[serde(default = "default_store_path")]
    pub path: String,
}

// Default functions
fn default_storage_key() -> String {
    "bannerline.promo.state".to_string()
}
fn default_dismiss_window_hours() -> u32 {
    24
}
fn default_store_path() -> String {
    "bannerline-state.json".to_string()
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            dismiss_window_hours: default_dismiss_window_hours(),
            store: StoreConfig::default(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl BannerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("BANNERLINE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Reject values the engine cannot operate with.
    pub fn validate(&self) -> BannerResult<()> {
        if self.storage_key.trim().is_empty() {
            return Err(BannerError::Config(
                "storage_key must not be empty".to_string(),
            ));
        }
        if self.dismiss_window_hours == 0 {
            return Err(BannerError::Config(
                "dismiss_window_hours must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The suppression window as a duration.
    pub fn dismiss_window(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.dismiss_window_hours))
    }
}
