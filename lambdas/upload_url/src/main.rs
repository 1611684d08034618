use std::time::Duration;

use analogies_core::config::{self, ConfigError};
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client as S3Client;
use lambda_http::{run, service_fn, tracing, Error};
mod http_handler;
use http_handler::{function_handler, UploadSigner};

// SigV4 presigned URLs cannot outlive seven days.
const MAX_TTL_SECS: u64 = 7 * 24 * 60 * 60;

fn upload_ttl() -> Result<Duration, ConfigError> {
    checked_ttl(config::try_load("UPLOAD_URL_TTL_SECS", "3600")?)
}

fn checked_ttl(secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 || secs > MAX_TTL_SECS {
        return Err(ConfigError::Invalid {
            key: "UPLOAD_URL_TTL_SECS",
            value: secs.to_string(),
            reason: format!("must be between 1 and {MAX_TTL_SECS}"),
        });
    }
    Ok(Duration::from_secs(secs))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::subscriber::fmt().json().init();
    let shared_config = aws_config::load_defaults(BehaviorVersion::v2025_01_17()).await;
    let signer = UploadSigner {
        s3: S3Client::new(&shared_config),
        bucket: config::required("BUCKET_NAME")?,
        ttl: upload_ttl()?,
    };
    run(service_fn(|event| function_handler(event, &signer))).await
}
