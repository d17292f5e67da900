use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};

use exam_core::model::{ClientSession, ClientSettings, Paper, PaperId, SubmissionDraft, SubmitResult};

use super::ExamApi;
use super::wire::{PaperQuestionsResponse, SubmitRequest, SubmitResponse};
use crate::error::ApiError;

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth_token: None,
        }
    }

    #[must_use]
    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token;
        self
    }

    /// Endpoint from persisted settings, bearer token from the signed-in session.
    #[must_use]
    pub fn from_client(settings: &ClientSettings, session: &ClientSession) -> Self {
        Self::new(settings.api_base_url())
            .with_auth_token(session.auth_token().map(str::to_string))
    }
}

/// `ExamApi` over the backend's REST endpoints.
#[derive(Clone)]
pub struct HttpExamApi {
    client: Client,
    config: ApiConfig,
}

impl HttpExamApi {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn endpoint(&self, paper_id: &PaperId, action: &str) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|err| ApiError::InvalidUrl(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.config.base_url.clone()))?
            .pop_if_empty()
            .extend(["papers", paper_id.as_str(), action]);
        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.auth_token.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

fn check_status(response: Response) -> Result<Response, ApiError> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::Unauthorized),
        StatusCode::NOT_FOUND => Err(ApiError::NotFound),
        status => Err(ApiError::HttpStatus(status)),
    }
}

#[async_trait]
impl ExamApi for HttpExamApi {
    async fn fetch_paper(&self, paper_id: &PaperId) -> Result<Paper, ApiError> {
        let url = self.endpoint(paper_id, "questions")?;
        tracing::debug!(%url, "Fetching paper questions");

        let response = self.authorize(self.client.get(url)).send().await?;
        let body: PaperQuestionsResponse = check_status(response)?
            .json()
            .await
            .map_err(|err| ApiError::InvalidResponse(err.to_string()))?;

        body.into_paper(paper_id.clone())
    }

    async fn submit_answers(&self, draft: &SubmissionDraft) -> Result<SubmitResult, ApiError> {
        let url = self.endpoint(&draft.paper_id, "submit")?;
        tracing::debug!(%url, answered = draft.answers.len(), "Submitting answers");

        let payload = SubmitRequest {
            paper_id: draft.paper_id.as_str(),
            answers: &draft.answers,
        };
        let response = self
            .authorize(self.client.post(url))
            .json(&payload)
            .send()
            .await?;
        let body: SubmitResponse = check_status(response)?
            .json()
            .await
            .map_err(|err| ApiError::InvalidResponse(err.to_string()))?;

        body.into_result()
    }
}
