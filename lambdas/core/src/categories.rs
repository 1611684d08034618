//! The fixed label set images are compared against.

use std::{fmt, str::FromStr};

use rand::{seq::index, Rng};
use serde::{Deserialize, Serialize};

pub const CATEGORIES: [&str; 20] = [
    "chair",
    "hat",
    "boat",
    "shoe",
    "wig",
    "hair tie",
    "apple",
    "toothbrush",
    "fork",
    "shirt",
    "belt",
    "table",
    "bat",
    "car",
    "pen",
    "bicycle",
    "ice cube tray",
    "knife",
    "purse",
    "cat",
];

const SEPARATOR: char = '-';

/// Two distinct labels assigned to one image.
///
/// On the wire the pair is `"<first>-<second>"`; no label contains a `-`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPair {
    pub first: String,
    pub second: String,
}

impl CategoryPair {
    pub fn pick<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let (first, second) = pick_two(rng);
        CategoryPair {
            first: first.to_string(),
            second: second.to_string(),
        }
    }
}

pub fn pick_two<R: Rng + ?Sized>(rng: &mut R) -> (&'static str, &'static str) {
    let picked = index::sample(rng, CATEGORIES.len(), 2);
    (CATEGORIES[picked.index(0)], CATEGORIES[picked.index(1)])
}

impl fmt::Display for CategoryPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.first, self.second)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParsePairError {
    #[error("expected \"<first>-<second>\", got {0:?}")]
    Format(String),

    #[error("both categories are {0:?}")]
    Duplicate(String),
}

impl FromStr for CategoryPair {
    type Err = ParsePairError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (first, second) = s
            .split_once(SEPARATOR)
            .filter(|(a, b)| !a.trim().is_empty() && !b.trim().is_empty())
            .ok_or_else(|| ParsePairError::Format(s.to_string()))?;
        if first == second {
            return Err(ParsePairError::Duplicate(first.to_string()));
        }
        Ok(CategoryPair {
            first: first.to_string(),
            second: second.to_string(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PickerResponse {
    pub status_code: u16,
    pub body: String,
}
