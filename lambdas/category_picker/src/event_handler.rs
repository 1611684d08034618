use analogies_core::{categories::PickerResponse, CategoryPair};
use lambda_runtime::{tracing, Error, LambdaEvent};
use serde_json::Value;

pub(crate) async fn function_handler(
    _event: LambdaEvent<Value>,
) -> Result<PickerResponse, Error> {
    let pair = CategoryPair::pick(&mut rand::thread_rng());
    tracing::info!("Picked categories {} and {}", pair.first, pair.second);
    Ok(PickerResponse {
        status_code: 200,
        body: pair.to_string(),
    })
}
