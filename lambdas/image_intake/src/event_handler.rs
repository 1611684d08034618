use analogies_core::{
    categories::PickerResponse, object_key, CategoryPair, HandlerError, VoteRecord, VoteTable,
};
use aws_lambda_events::event::s3::{S3Event, S3EventRecord};
use aws_sdk_lambda::{primitives::Blob, types::InvocationType, Client as LambdaClient};
use aws_sdk_s3::{error::DisplayErrorContext, Client as S3Client};
use lambda_runtime::{tracing, Error, LambdaEvent};
use serde::Serialize;
use uuid::Uuid;

pub(crate) struct Intake {
    pub s3: S3Client,
    pub lambda: LambdaClient,
    pub votes: VoteTable,
    pub categories_function: String,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum IntakeError {
    #[error("No bucket name found in S3 event record")]
    MissingBucket,

    #[error("No object key found in S3 event record")]
    MissingKey,

    #[error("Invoking {function} failed: {reason}")]
    Invoke { function: String, reason: String },

    #[error("Category picker returned an unusable response: {0}")]
    BadCategories(String),

    #[error("No interpretation of key {key:?} could be copied")]
    Relocate { key: String },

    #[error(transparent)]
    Store(#[from] HandlerError),
}

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub(crate) struct IntakeReport {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

enum Outcome {
    Relocated,
    Skipped,
}

impl Intake {
    async fn pick_categories(&self) -> Result<CategoryPair, IntakeError> {
        let invoke_error = |reason: String| IntakeError::Invoke {
            function: self.categories_function.clone(),
            reason,
        };
        let response = self
            .lambda
            .invoke()
            .function_name(&self.categories_function)
            .invocation_type(InvocationType::RequestResponse)
            .payload(Blob::new("{}"))
            .send()
            .await
            .map_err(|e| invoke_error(DisplayErrorContext(&e).to_string()))?;

        if let Some(function_error) = response.function_error() {
            return Err(invoke_error(function_error.to_string()));
        }
        let payload = response
            .payload()
            .ok_or_else(|| IntakeError::BadCategories("empty payload".to_string()))?;
        let picked: PickerResponse = serde_json::from_slice(payload.as_ref())
            .map_err(|e| IntakeError::BadCategories(e.to_string()))?;
        if picked.status_code != 200 {
            return Err(IntakeError::BadCategories(format!(
                "status {}: {}",
                picked.status_code, picked.body
            )));
        }
        picked
            .body
            .parse::<CategoryPair>()
            .map_err(|e| IntakeError::BadCategories(e.to_string()))
    }

    async fn relocate(
        &self,
        bucket: &str,
        raw_key: &str,
        new_key: &str,
    ) -> Result<String, IntakeError> {
        for candidate in object_key::key_candidates(raw_key) {
            let copied = self
                .s3
                .copy_object()
                .bucket(bucket)
                .key(new_key)
                .copy_source(object_key::copy_source(bucket, &candidate))
                .send()
                .await;
            match copied {
                Ok(_) => return Ok(candidate),
                Err(e) => tracing::warn!(
                    "Copying {}/{} to {} failed: {}",
                    bucket,
                    candidate,
                    new_key,
                    DisplayErrorContext(&e)
                ),
            }
        }
        Err(IntakeError::Relocate {
            key: raw_key.to_string(),
        })
    }

    async fn process_record(&self, record: &S3EventRecord) -> Result<Outcome, IntakeError> {
        let bucket = record
            .s3
            .bucket
            .name
            .as_deref()
            .ok_or(IntakeError::MissingBucket)?;
        let raw_key = record
            .s3
            .object
            .key
            .as_deref()
            .ok_or(IntakeError::MissingKey)?;

        // The copy below fires another ObjectCreated event for the new key.
        if object_key::key_candidates(raw_key)
            .iter()
            .any(|key| object_key::is_relocated(key))
        {
            tracing::info!("Skipping {}/{}: already relocated", bucket, raw_key);
            return Ok(Outcome::Skipped);
        }

        let categories = self.pick_categories().await?;
        let new_key = object_key::relocated_key(Uuid::new_v4());
        let source_key = self.relocate(bucket, raw_key, &new_key).await?;

        let vote_record = VoteRecord::new(new_key.clone(), categories);
        if let Err(err) = self.votes.create(&vote_record).await {
            if let Err(e) = self.s3.delete_object().bucket(bucket).key(&new_key).send().await {
                tracing::warn!(
                    "Could not remove orphaned copy {}/{}: {}",
                    bucket,
                    new_key,
                    DisplayErrorContext(&e)
                );
            }
            return Err(err.into());
        }

        if let Err(e) = self
            .s3
            .delete_object()
            .bucket(bucket)
            .key(&source_key)
            .send()
            .await
        {
            tracing::warn!(
                "Relocated {}/{} but could not delete the original: {}",
                bucket,
                source_key,
                DisplayErrorContext(&e)
            );
        }
        tracing::info!("Relocated {}/{} to {}", bucket, source_key, new_key);
        Ok(Outcome::Relocated)
    }
}

pub(crate) async fn function_handler(
    event: LambdaEvent<S3Event>,
    intake: &Intake,
) -> Result<IntakeReport, Error> {
    let payload = event.payload;
    let mut report = IntakeReport::default();
    if payload.records.is_empty() {
        tracing::warn!("No records found in S3 event");
        return Ok(report);
    }
    for record in &payload.records {
        match intake.process_record(record).await {
            Ok(Outcome::Relocated) => report.processed += 1,
            Ok(Outcome::Skipped) => report.skipped += 1,
            Err(err) => {
                tracing::error!("Abandoning upload: {}", err);
                report.failed += 1;
            }
        }
    }
    tracing::info!(
        "Intake finished: {} processed, {} skipped, {} failed",
        report.processed,
        report.skipped,
        report.failed
    );
    Ok(report)
}
