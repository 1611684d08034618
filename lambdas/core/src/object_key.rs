//! S3 object key handling for uploaded images.
//!
//! Keys arrive in S3 event notifications URL-encoded in form style (spaces as
//! `+`), but not every producer encodes the same way, so lookups walk a short
//! list of interpretations of the raw key.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Prefix of keys the intake handler has already relocated.
pub const RELOCATED_PREFIX: &str = "uniq-";

// RFC 3986 unreserved characters plus the path separator.
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

pub fn is_relocated(key: &str) -> bool {
    key.starts_with(RELOCATED_PREFIX)
}

pub fn relocated_key(id: impl std::fmt::Display) -> String {
    format!("{RELOCATED_PREFIX}{id}")
}

/// Interpretations of an event key to try, in order: raw, percent-decoded,
/// then plus-decoded. Duplicates and undecodable variants are dropped.
pub fn key_candidates(raw: &str) -> Vec<String> {
    let mut candidates = vec![raw.to_string()];
    let decoded = [percent_decode(raw), percent_decode(&raw.replace('+', " "))];
    for candidate in decoded.into_iter().flatten() {
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }
    candidates
}

fn percent_decode(key: &str) -> Option<String> {
    percent_decode_str(key)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

pub fn encode_key(key: &str) -> String {
    utf8_percent_encode(key, KEY_ENCODE_SET).to_string()
}

pub fn copy_source(bucket: &str, key: &str) -> String {
    format!("{bucket}/{}", encode_key(key))
}
