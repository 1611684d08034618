//! HTML page templates stored in S3 and the snippets spliced into them.
//!
//! Templates use `{name}` placeholders. Braces that do not name a known
//! placeholder (inline CSS, scripts) pass through untouched.

use aws_sdk_s3::Client as S3Client;

use crate::{object_key::encode_key, HandlerError, VoteRecord};

pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Replaces each `{name}` in `template` with its value in a single pass, so
/// substituted text is never itself expanded.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let known = after.find('}').and_then(|end| {
            let name = &after[..end];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, end))
        });
        match known {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

pub async fn fetch_template(
    client: &S3Client,
    bucket: &str,
    key: &str,
) -> Result<String, HandlerError> {
    let object = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(HandlerError::store)?;
    let bytes = object
        .body
        .collect()
        .await
        .map_err(|e| HandlerError::Store(format!("reading {bucket}/{key}: {e}")))?
        .into_bytes();
    String::from_utf8(bytes.to_vec())
        .map_err(|e| HandlerError::Internal(format!("template {key} is not UTF-8: {e}")))
}

#[derive(Debug, Clone)]
pub struct SiteUrls {
    pub api_endpoint: String,
    pub image_base_url: String,
}

impl SiteUrls {
    pub fn image_url(&self, image_id: &str) -> String {
        format!("{}/{}", self.image_base_url, encode_key(image_id))
    }

    pub fn vote_page_url(&self, image_id: &str) -> String {
        format!("{}/vote?image={}", self.api_endpoint, encode_key(image_id))
    }

    /// The vote endpoint as a quoted JavaScript string literal, the form
    /// page scripts expect for `{apiEndpoint}`.
    pub fn vote_endpoint_literal(&self) -> String {
        format!("\"{}/vote\"", self.api_endpoint)
    }
}

pub fn record_snippet(record: &VoteRecord, urls: &SiteUrls) -> String {
    let category1 = html_escape(&record.category1);
    let category2 = html_escape(&record.category2);
    format!(
        r#"<div class="analogy">
  <a href="{vote_url}"><img src="{image_url}" alt="{category1} or {category2}?"></a>
  <p><span class="category">{category1}</span>: {votes1} &middot; <span class="category">{category2}</span>: {votes2}</p>
</div>"#,
        vote_url = html_escape(&urls.vote_page_url(&record.image_id)),
        image_url = html_escape(&urls.image_url(&record.image_id)),
        votes1 = record.category1_votes,
        votes2 = record.category2_votes,
    )
}
