use analogies_core::{config, template::SiteUrls, VoteTable};
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_s3::Client as S3Client;
use lambda_http::{run, service_fn, tracing, Error};
mod http_handler;
use http_handler::{function_handler, MainPage};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::subscriber::fmt().json().init();
    let shared_config = aws_config::load_defaults(BehaviorVersion::v2025_01_17()).await;
    let image_bucket = config::required("BUCKET_NAME")?;
    let page = MainPage {
        s3: S3Client::new(&shared_config),
        votes: VoteTable::new(
            DynamoClient::new(&shared_config),
            config::required("TABLE_NAME")?,
        ),
        html_bucket: config::required("HTML_BUCKET_NAME")?,
        template_key: config::optional("MAIN_PAGE_FILE_NAME", "index.html"),
        urls: SiteUrls {
            api_endpoint: config::api_endpoint()?,
            image_base_url: config::image_base_url(&image_bucket),
        },
    };
    run(service_fn(|event| function_handler(event, &page))).await
}
