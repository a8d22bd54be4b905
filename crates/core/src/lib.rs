pub mod config;
pub mod error;
pub mod types;

pub use config::BannerConfig;
pub use error::{BannerError, BannerResult};
pub use types::{BannerPhase, Campaign, DismissalRecord};
