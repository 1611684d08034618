use analogies_core::{
    response,
    template::{self, SiteUrls},
    HandlerError, VoteTable,
};
use aws_sdk_s3::Client as S3Client;
use lambda_http::{
    http::{Method, StatusCode},
    tracing, Body, Error, Request, Response,
};

const EMPTY_GALLERY: &str = r#"<p class="empty">No images yet. Upload one to get started!</p>"#;

pub(crate) struct MainPage {
    pub s3: S3Client,
    pub votes: VoteTable,
    pub html_bucket: String,
    pub template_key: String,
    pub urls: SiteUrls,
}

impl MainPage {
    async fn render(&self) -> Result<String, HandlerError> {
        let html =
            template::fetch_template(&self.s3, &self.html_bucket, &self.template_key).await?;
        let mut records = self.votes.scan_all().await?;
        records.sort_by(|a, b| a.image_id.cmp(&b.image_id));
        tracing::info!("Rendering main page with {} images", records.len());

        let images = if records.is_empty() {
            EMPTY_GALLERY.to_string()
        } else {
            records
                .iter()
                .map(|record| template::record_snippet(record, &self.urls))
                .collect::<Vec<_>>()
                .join("\n")
        };
        let api_endpoint = self.urls.vote_endpoint_literal();
        Ok(template::render(
            &html,
            &[
                ("images", images.as_str()),
                ("apiEndpoint", api_endpoint.as_str()),
            ],
        ))
    }
}

pub(crate) async fn function_handler(
    event: Request,
    page: &MainPage,
) -> Result<Response<Body>, Error> {
    if event.method() != Method::GET {
        return HandlerError::MethodNotAllowed(event.method().to_string()).into_text_response();
    }
    match page.render().await {
        Ok(html) => response::html(StatusCode::OK, html),
        Err(err) => {
            tracing::error!("Failed to render main page: {}", err);
            err.into_text_response()
        }
    }
}
