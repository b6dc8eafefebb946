pub mod app_config;
pub mod config;
pub mod items;

pub use app_config::{HarvestConfig, DEFAULT_API_BASE_URL, DEFAULT_CITY_UUID};
pub use config::{category_slug, load_harvest_config, load_harvest_config_from_env};
pub use items::{
    Assets, ItemMetadata, NormalizedItem, PartialProductRecord, PriceData, Stock, ABSENT,
    NOT_SPECIFIED, UNKNOWN_VENDOR_CODE,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
