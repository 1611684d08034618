//! Shared domain code for the Pointless Analogies handlers.
//!
//! Every Lambda in the workspace is a thin binary over this crate: the vote
//! record and its table, the category label set, S3 key handling, HTML
//! templating and the HTTP response helpers used behind API Gateway.

pub mod categories;
pub mod config;
pub mod error;
pub mod object_key;
pub mod response;
pub mod template;
pub mod vote_record;
pub mod vote_table;

pub use categories::CategoryPair;
pub use error::HandlerError;
pub use vote_record::{VoteChoice, VoteRecord};
pub use vote_table::VoteTable;
