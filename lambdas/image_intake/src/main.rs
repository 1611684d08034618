use analogies_core::{config, VoteTable};
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_lambda::Client as LambdaClient;
use aws_sdk_s3::Client as S3Client;
use lambda_runtime::{run, service_fn, tracing, Error};
mod event_handler;
use event_handler::{function_handler, Intake};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::subscriber::fmt().json().init();
    let shared_config = aws_config::load_defaults(BehaviorVersion::v2025_01_17()).await;
    let intake = Intake {
        s3: S3Client::new(&shared_config),
        lambda: LambdaClient::new(&shared_config),
        votes: VoteTable::new(
            DynamoClient::new(&shared_config),
            config::required("TABLE_NAME")?,
        ),
        categories_function: config::required("CATEGORIES_FUNCTION_NAME")?,
    };
    run(service_fn(|event| function_handler(event, &intake))).await
}
