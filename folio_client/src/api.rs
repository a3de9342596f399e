use std::future::Future;

use folio_models::contact::ContactSubmissionDraft;
use reqwest::header;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

#[cfg_attr(test, mockall::automock)]
pub trait ContactApi: Send + Sync + 'static {
    /// Sends one submission to the contact endpoint and returns the decoded
    /// response regardless of its status code. `Err` means the request
    /// never completed.
    fn submit(
        &self,
        draft: &ContactSubmissionDraft,
    ) -> impl Future<Output = Result<ContactApiResponse, ContactApiError>> + Send;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactApiResponse {
    pub status: u16,
    /// Parsed `Retry-After` header, if present.
    pub retry_after: Option<u64>,
    /// Decoded JSON body; `None` when the body was missing or malformed.
    pub body: Option<ContactResponseBody>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContactResponseBody {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub issues: Vec<FieldIssue>,
    #[serde(default, rename = "retryAfter")]
    pub retry_after: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FieldIssue {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ContactApiError {
    #[error("failed to reach the contact endpoint")]
    Network(#[source] anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct ReqwestContactApi {
    client: reqwest::Client,
    endpoint: Url,
}

impl ReqwestContactApi {
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

impl ContactApi for ReqwestContactApi {
    async fn submit(
        &self,
        draft: &ContactSubmissionDraft,
    ) -> Result<ContactApiResponse, ContactApiError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(draft)
            .send()
            .await
            .map_err(|err| ContactApiError::Network(err.into()))?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok());
        let body = response.json().await.ok();

        Ok(ContactApiResponse {
            status,
            retry_after,
            body,
        })
    }
}

#[cfg(test)]
impl MockContactApi {
    pub fn with_submit(
        mut self,
        draft: ContactSubmissionDraft,
        result: Result<ContactApiResponse, ContactApiError>,
    ) -> Self {
        self.expect_submit()
            .once()
            .with(mockall::predicate::eq(draft))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
