//! Ads SDK bootstrap and env-backed startup configuration.

use std::env;

use thiserror::Error;
use tracing::info;

const APP_ID_KEY: &str = "ADMOB_APP_ID";
const BANNER_AD_UNIT_ID_KEY: &str = "BANNER_AD_UNIT_ID";

/// Errors produced while validating SDK startup configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BootstrapError {
    /// Required application identifier is missing or blank.
    #[error("ADMOB_APP_ID is missing; the ads SDK cannot start")]
    MissingAppId,
}

/// Startup configuration for the ads SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MobileAdsConfig {
    /// Application identifier registered with the ad network.
    pub app_id: String,
    /// Default ad unit identifier for banner slots, when configured.
    pub banner_ad_unit_id: Option<String>,
}

impl MobileAdsConfig {
    /// Parse configuration from environment variables.
    ///
    /// A missing or blank `ADMOB_APP_ID` is a hard startup failure; callers
    /// must abort before any display component is created.
    pub fn from_env() -> Result<Self, BootstrapError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(mut lookup: F) -> Result<Self, BootstrapError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let app_id = lookup(APP_ID_KEY)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .ok_or(BootstrapError::MissingAppId)?;
        let banner_ad_unit_id = lookup(BANNER_AD_UNIT_ID_KEY)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        Ok(Self {
            app_id,
            banner_ad_unit_id,
        })
    }
}

/// Handle proving the ads SDK was started.
///
/// Display components and coordinators must only be created after one exists.
#[derive(Debug, Clone)]
pub struct MobileAds {
    config: MobileAdsConfig,
}

impl MobileAds {
    /// Start the ads SDK once at process startup with validated configuration.
    pub fn start(config: MobileAdsConfig) -> Self {
        info!(app_id = %config.app_id, "mobile ads SDK started");
        Self { config }
    }

    pub fn config(&self) -> &MobileAdsConfig {
        &self.config
    }
}
