use std::time::Duration;

use analogies_core::{object_key, response, HandlerError};
use aws_sdk_s3::{presigning::PresigningConfig, Client as S3Client};
use lambda_http::{
    http::{Method, StatusCode},
    tracing, Body, Error, Request, Response,
};
use serde::{Deserialize, Serialize};

const ALLOWED_METHODS: &str = "OPTIONS,POST";

pub(crate) struct UploadSigner {
    pub s3: S3Client,
    pub bucket: String,
    pub ttl: Duration,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadUrlRequest {
    object_name: Option<String>,
}

#[derive(Serialize)]
struct UploadUrlResponse {
    url: String,
}

pub(crate) async fn function_handler(
    event: Request,
    signer: &UploadSigner,
) -> Result<Response<Body>, Error> {
    let resp = match *event.method() {
        Method::OPTIONS => response::empty(StatusCode::OK),
        Method::POST => match issue_upload_url(&event, signer).await {
            Ok(url) => response::json(StatusCode::OK, &UploadUrlResponse { url }),
            Err(err) => {
                tracing::warn!("Rejected upload URL request: {}", err);
                err.into_json_response()
            }
        },
        ref other => HandlerError::MethodNotAllowed(other.to_string()).into_json_response(),
    }?;
    Ok(response::with_cors(resp, ALLOWED_METHODS))
}

async fn issue_upload_url(
    event: &Request,
    signer: &UploadSigner,
) -> Result<String, HandlerError> {
    let request: UploadUrlRequest = serde_json::from_slice(event.body())?;
    let object_name = request
        .object_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or(HandlerError::MissingField("objectName"))?;
    if object_key::is_relocated(&object_name) {
        return Err(HandlerError::BadRequest(format!(
            "object names may not start with {}",
            object_key::RELOCATED_PREFIX
        )));
    }

    let presigning = PresigningConfig::expires_in(signer.ttl)
        .map_err(|e| HandlerError::Internal(e.to_string()))?;
    let presigned = signer
        .s3
        .put_object()
        .bucket(&signer.bucket)
        .key(&object_name)
        .presigned(presigning)
        .await
        .map_err(HandlerError::store)?;
    tracing::info!(
        "Issued upload URL for {}/{} valid for {}s",
        signer.bucket,
        object_name,
        signer.ttl.as_secs()
    );
    Ok(presigned.uri().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
    use lambda_http::http;

    fn signer() -> UploadSigner {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new(
                "AKIDEXAMPLE",
                "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
                None,
                None,
                "test",
            ))
            .build();
        UploadSigner {
            s3: S3Client::from_conf(config),
            bucket: "uploads".to_string(),
            ttl: Duration::from_secs(3600),
        }
    }

    fn request(method: &str, body: &str) -> Request {
        http::Request::builder()
            .method(method)
            .uri("/generate-presigned-url")
            .body(Body::from(body))
            .unwrap()
    }

    fn json_body(resp: &Response<Body>) -> serde_json::Value {
        serde_json::from_slice(resp.body()).unwrap()
    }

    #[tokio::test]
    async fn test_issues_presigned_put_url() {
        let resp = function_handler(request("POST", r#"{"objectName":"photo.jpg"}"#), &signer())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");

        let url = json_body(&resp)["url"].as_str().unwrap().to_string();
        assert!(url.starts_with("https://uploads.s3."));
        assert!(url.contains(".amazonaws.com/photo.jpg?"));
        assert!(url.contains("X-Amz-Expires=3600"));
        assert!(url.contains("X-Amz-Signature="));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let resp = function_handler(request("POST", "objectName=photo.jpg"), &signer())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(&resp)["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid JSON"));
    }

    #[tokio::test]
    async fn test_missing_object_name() {
        for body in [r#"{}"#, r#"{"objectName":"  "}"#] {
            let resp = function_handler(request("POST", body), &signer())
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_relocated_prefix_rejected() {
        let resp = function_handler(request("POST", r#"{"objectName":"uniq-1.jpg"}"#), &signer())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_preflight_and_other_methods() {
        let resp = function_handler(request("OPTIONS", ""), &signer()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["access-control-allow-methods"], "OPTIONS,POST");

        let resp = function_handler(request("GET", ""), &signer()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    }
}
