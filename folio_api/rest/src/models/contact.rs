use folio_models::contact::ContactFieldError;
use serde::Serialize;

/// The response body shared by every outcome of `POST /api/contact`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiContactResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<ApiFieldIssue>>,
    #[serde(rename = "retryAfter", skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiFieldIssue {
    pub path: &'static str,
    pub message: String,
}

impl ApiContactResponse {
    pub fn ok() -> Self {
        Self {
            ok: true,
            error: None,
            issues: None,
            retry_after: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
            issues: None,
            retry_after: None,
        }
    }
}

impl From<&ContactFieldError> for ApiFieldIssue {
    fn from(err: &ContactFieldError) -> Self {
        Self {
            path: err.field(),
            message: err.to_string(),
        }
    }
}
