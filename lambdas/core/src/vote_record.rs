//! The per-image row tracking two labels and their tallies.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use serde::Serialize;

use crate::{CategoryPair, HandlerError};

pub const ID_ATTR: &str = "ImageHash";
pub const CATEGORY1_ATTR: &str = "Category1";
pub const CATEGORY2_ATTR: &str = "Category2";
pub const CATEGORY1_VOTES_ATTR: &str = "Category1Votes";
pub const CATEGORY2_VOTES_ATTR: &str = "Category2Votes";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    pub image_id: String,
    pub category1: String,
    pub category2: String,
    pub category1_votes: u64,
    pub category2_votes: u64,
}

impl VoteRecord {
    pub fn new(image_id: impl Into<String>, categories: CategoryPair) -> Self {
        VoteRecord {
            image_id: image_id.into(),
            category1: categories.first,
            category2: categories.second,
            category1_votes: 0,
            category2_votes: 0,
        }
    }

    pub fn votes(&self, choice: VoteChoice) -> u64 {
        match choice {
            VoteChoice::Category1 => self.category1_votes,
            VoteChoice::Category2 => self.category2_votes,
        }
    }

    pub fn label(&self, choice: VoteChoice) -> &str {
        match choice {
            VoteChoice::Category1 => &self.category1,
            VoteChoice::Category2 => &self.category2,
        }
    }

    /// Resolves a voter's selection against this record's labels.
    ///
    /// Accepts either label verbatim or the `Category1Vote`/`Category2Vote`
    /// form buttons post.
    pub fn resolve_choice(&self, selection: &str) -> Option<VoteChoice> {
        let selection = selection.trim();
        if selection == self.category1 || selection == "Category1Vote" {
            Some(VoteChoice::Category1)
        } else if selection == self.category2 || selection == "Category2Vote" {
            Some(VoteChoice::Category2)
        } else {
            None
        }
    }

    pub fn to_item(&self) -> HashMap<String, AttributeValue> {
        HashMap::from([
            (ID_ATTR.to_string(), AttributeValue::S(self.image_id.clone())),
            (
                CATEGORY1_ATTR.to_string(),
                AttributeValue::S(self.category1.clone()),
            ),
            (
                CATEGORY2_ATTR.to_string(),
                AttributeValue::S(self.category2.clone()),
            ),
            (
                CATEGORY1_VOTES_ATTR.to_string(),
                AttributeValue::N(self.category1_votes.to_string()),
            ),
            (
                CATEGORY2_VOTES_ATTR.to_string(),
                AttributeValue::N(self.category2_votes.to_string()),
            ),
        ])
    }

    pub fn from_item(item: &HashMap<String, AttributeValue>) -> Result<Self, HandlerError> {
        Ok(VoteRecord {
            image_id: string_attr(item, ID_ATTR)?,
            category1: string_attr(item, CATEGORY1_ATTR)?,
            category2: string_attr(item, CATEGORY2_ATTR)?,
            category1_votes: counter_attr(item, CATEGORY1_VOTES_ATTR)?,
            category2_votes: counter_attr(item, CATEGORY2_VOTES_ATTR)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteChoice {
    Category1,
    Category2,
}

impl VoteChoice {
    pub fn counter_attr(self) -> &'static str {
        match self {
            VoteChoice::Category1 => CATEGORY1_VOTES_ATTR,
            VoteChoice::Category2 => CATEGORY2_VOTES_ATTR,
        }
    }
}

fn string_attr(item: &HashMap<String, AttributeValue>, name: &str) -> Result<String, HandlerError> {
    match item.get(name) {
        Some(AttributeValue::S(value)) => Ok(value.clone()),
        Some(_) => Err(HandlerError::MalformedRecord(format!("{name} is not a string"))),
        None => Err(HandlerError::MalformedRecord(format!("{name} is missing"))),
    }
}

// Counters are created by the intake handler, but an item written by hand
// may lack them; those read as zero.
fn counter_attr(item: &HashMap<String, AttributeValue>, name: &str) -> Result<u64, HandlerError> {
    match item.get(name) {
        Some(AttributeValue::N(value)) => value.parse().map_err(|_| {
            HandlerError::MalformedRecord(format!("{name} is not a non-negative integer: {value}"))
        }),
        Some(_) => Err(HandlerError::MalformedRecord(format!("{name} is not a number"))),
        None => Ok(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> VoteRecord {
        VoteRecord {
            image_id: "uniq-1".into(),
            category1: "hat".into(),
            category2: "boat".into(),
            category1_votes: 3,
            category2_votes: 5,
        }
    }

    #[test]
    fn test_item_conversion() {
        let item = record().to_item();
        assert_eq!(item[ID_ATTR], AttributeValue::S("uniq-1".into()));
        assert_eq!(item[CATEGORY2_VOTES_ATTR], AttributeValue::N("5".into()));
        assert_eq!(VoteRecord::from_item(&item).unwrap(), record());
    }

    #[test]
    fn test_new_record_starts_at_zero() {
        let pair = CategoryPair {
            first: "wig".into(),
            second: "cat".into(),
        };
        let record = VoteRecord::new("uniq-2", pair);
        assert_eq!(record.category1_votes, 0);
        assert_eq!(record.category2_votes, 0);
        assert_eq!(record.label(VoteChoice::Category2), "cat");
    }

    #[test]
    fn test_missing_counter_reads_as_zero() {
        let mut item = record().to_item();
        item.remove(CATEGORY1_VOTES_ATTR);
        assert_eq!(VoteRecord::from_item(&item).unwrap().category1_votes, 0);
    }

    #[test]
    fn test_malformed_items() {
        let mut item = record().to_item();
        item.remove(CATEGORY1_ATTR);
        assert!(matches!(
            VoteRecord::from_item(&item),
            Err(HandlerError::MalformedRecord(_))
        ));

        let mut item = record().to_item();
        item.insert(CATEGORY2_VOTES_ATTR.into(), AttributeValue::N("-1".into()));
        assert!(VoteRecord::from_item(&item).is_err());
    }

    #[test]
    fn test_resolve_choice() {
        let record = record();
        assert_eq!(record.resolve_choice("hat"), Some(VoteChoice::Category1));
        assert_eq!(record.resolve_choice(" boat "), Some(VoteChoice::Category2));
        assert_eq!(record.resolve_choice("Category2Vote"), Some(VoteChoice::Category2));
        assert_eq!(record.resolve_choice("chair"), None);
        assert_eq!(record.resolve_choice(""), None);
    }
}
