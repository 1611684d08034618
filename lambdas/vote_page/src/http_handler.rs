use analogies_core::{
    response,
    template::{self, html_escape, SiteUrls},
    HandlerError, VoteChoice, VoteRecord, VoteTable,
};
use aws_sdk_s3::Client as S3Client;
use lambda_http::{
    http::{Method, StatusCode},
    tracing, Body, Error, Request, RequestExt, Response,
};
use serde::{Deserialize, Serialize};

pub(crate) struct VotePage {
    pub s3: S3Client,
    pub votes: VoteTable,
    pub html_bucket: String,
    pub template_key: String,
    pub urls: SiteUrls,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VoteRequest {
    image_id: Option<String>,
    vote_choice: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoteResponse<'a> {
    message: &'static str,
    vote_choice_message: String,
    #[serde(flatten)]
    record: &'a VoteRecord,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl VotePage {
    async fn render(&self, event: &Request) -> Result<String, HandlerError> {
        let image_id = non_empty(
            event
                .query_string_parameters_ref()
                .and_then(|params| params.first("image"))
                .map(str::to_string),
        )
        .ok_or(HandlerError::MissingField("image"))?;
        let record = self
            .votes
            .get(&image_id)
            .await?
            .ok_or_else(|| HandlerError::NotFound(image_id.clone()))?;
        let html =
            template::fetch_template(&self.s3, &self.html_bucket, &self.template_key).await?;

        let api_endpoint = self.urls.vote_endpoint_literal();
        let image_url = html_escape(&self.urls.image_url(&record.image_id));
        let escaped_id = html_escape(&record.image_id);
        let category1 = html_escape(&record.category1);
        let category2 = html_escape(&record.category2);
        let category1_votes = record.category1_votes.to_string();
        let category2_votes = record.category2_votes.to_string();
        Ok(template::render(
            &html,
            &[
                ("apiEndpoint", api_endpoint.as_str()),
                ("imageId", escaped_id.as_str()),
                ("imageUrl", image_url.as_str()),
                ("category1", category1.as_str()),
                ("category2", category2.as_str()),
                ("category1Votes", category1_votes.as_str()),
                ("category2Votes", category2_votes.as_str()),
            ],
        ))
    }

    async fn cast_vote(
        &self,
        event: &Request,
    ) -> Result<(VoteRecord, VoteChoice), HandlerError> {
        let request: VoteRequest = serde_json::from_slice(event.body())?;
        let image_id = non_empty(request.image_id).ok_or(HandlerError::MissingField("imageId"))?;
        let selection =
            non_empty(request.vote_choice).ok_or(HandlerError::MissingField("voteChoice"))?;
        tracing::info!("Received user vote for {} on {}", selection, image_id);

        let record = self
            .votes
            .get(&image_id)
            .await?
            .ok_or_else(|| HandlerError::NotFound(image_id.clone()))?;
        let choice = record
            .resolve_choice(&selection)
            .ok_or(HandlerError::InvalidVote(selection))?;
        let updated = self.votes.increment(&image_id, choice).await?;
        Ok((updated, choice))
    }
}

/// `GET /vote?image=<id>` serves the voting page, `POST /vote` records a vote.
pub(crate) async fn function_handler(
    event: Request,
    page: &VotePage,
) -> Result<Response<Body>, Error> {
    tracing::info!("HTTP Method: {}", event.method());
    match *event.method() {
        Method::GET => match page.render(&event).await {
            Ok(html) => response::html(StatusCode::OK, html),
            Err(err) => {
                tracing::warn!("Failed to render vote page: {}", err);
                err.into_text_response()
            }
        },
        Method::POST => match page.cast_vote(&event).await {
            Ok((record, choice)) => response::json(
                StatusCode::OK,
                &VoteResponse {
                    message: "Vote received successfully!",
                    vote_choice_message: format!("You voted for {}.", record.label(choice)),
                    record: &record,
                },
            ),
            Err(err) => {
                tracing::warn!("Vote rejected: {}", err);
                err.into_json_response()
            }
        },
        ref other => HandlerError::BadRequest(other.to_string()).into_text_response(),
    }
}
