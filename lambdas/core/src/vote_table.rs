//! DynamoDB access for vote records.

use std::collections::HashMap;

use aws_sdk_dynamodb::{
    types::{AttributeValue, ReturnValue},
    Client as DynamoClient,
};
use tracing::{info, warn};

use crate::{
    vote_record::{ID_ATTR, VoteChoice},
    HandlerError, VoteRecord,
};

#[derive(Debug, Clone)]
pub struct VoteTable {
    client: DynamoClient,
    table_name: String,
}

impl VoteTable {
    pub fn new(client: DynamoClient, table_name: impl Into<String>) -> Self {
        VoteTable {
            client,
            table_name: table_name.into(),
        }
    }

    pub async fn create(&self, record: &VoteRecord) -> Result<(), HandlerError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record.to_item()))
            .condition_expression("attribute_not_exists(#id)")
            .expression_attribute_names("#id", ID_ATTR)
            .send()
            .await
            .map_err(HandlerError::store)?;
        info!(
            "Created vote record {} ({} vs {})",
            record.image_id, record.category1, record.category2
        );
        Ok(())
    }

    pub async fn get(&self, image_id: &str) -> Result<Option<VoteRecord>, HandlerError> {
        let response = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ID_ATTR, AttributeValue::S(image_id.to_string()))
            .consistent_read(true)
            .send()
            .await
            .map_err(HandlerError::store)?;

        response.item().map(VoteRecord::from_item).transpose()
    }

    /// Reads every record, following scan pagination to the end. Items that
    /// do not decode as vote records are logged and skipped.
    pub async fn scan_all(&self) -> Result<Vec<VoteRecord>, HandlerError> {
        let mut records = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;
        loop {
            let page = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(HandlerError::store)?;

            for item in page.items() {
                match VoteRecord::from_item(item) {
                    Ok(record) => records.push(record),
                    Err(err) => warn!(
                        "Skipping item {:?} in {}: {}",
                        item.get(ID_ATTR),
                        self.table_name,
                        err
                    ),
                }
            }

            match page.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }
        Ok(records)
    }

    /// Atomically adds one vote to the chosen counter and returns the updated
    /// record.
    pub async fn increment(
        &self,
        image_id: &str,
        choice: VoteChoice,
    ) -> Result<VoteRecord, HandlerError> {
        let response = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(ID_ATTR, AttributeValue::S(image_id.to_string()))
            .update_expression("ADD #votes :one")
            .condition_expression("attribute_exists(#id)")
            .expression_attribute_names("#votes", choice.counter_attr())
            .expression_attribute_names("#id", ID_ATTR)
            .expression_attribute_values(":one", AttributeValue::N("1".to_string()))
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|err| {
                let missing = err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception());
                if missing {
                    HandlerError::NotFound(image_id.to_string())
                } else {
                    HandlerError::store(err)
                }
            })?;

        let attributes = response
            .attributes()
            .ok_or_else(|| HandlerError::Internal("update returned no attributes".to_string()))?;
        VoteRecord::from_item(attributes)
    }
}
