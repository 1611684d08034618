use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable {0} must be set")]
    Missing(&'static str),

    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

pub fn required(key: &'static str) -> Result<String, ConfigError> {
    var(key).ok_or_else(|| {
        warn!("Environment variable {key} not found");
        ConfigError::Missing(key)
    })
}

pub fn optional(key: &'static str, default: &str) -> String {
    var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

pub fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = optional(key, default);
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value,
        reason: e.to_string(),
    })
}

/// `API_ENDPOINT` without the trailing slash API Gateway stage URLs carry.
pub fn api_endpoint() -> Result<String, ConfigError> {
    required("API_ENDPOINT").map(|endpoint| endpoint.trim_end_matches('/').to_string())
}

/// Base URL images are served from; defaults to the bucket's virtual-hosted URL.
pub fn image_base_url(bucket_name: &str) -> String {
    let default = format!("https://{bucket_name}.s3.amazonaws.com");
    optional("IMAGE_BASE_URL", &default)
        .trim_end_matches('/')
        .to_string()
}
