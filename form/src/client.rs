use crate::fields::SubmissionPayload;
use reqwest::{Client, Url};
use serde::Deserialize;

const FALLBACK_SUCCESS_MESSAGE: &str = "Email sent successfully!";
const FALLBACK_ERROR_MESSAGE: &str = "Failed to send message";

/// What the endpoint said about one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResult {
    pub ok: bool,
    pub message: String,
}

#[derive(Deserialize, Default)]
struct ResponseBody {
    message: Option<String>,
    error: Option<String>,
}

#[derive(Clone)]
pub struct ContactApiClient {
    http_client: Client,
    endpoint: Url,
}

impl ContactApiClient {
    /// `base_url` is the site origin; the client posts to `/api/contact` under it.
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        let endpoint = Url::parse(base_url)?.join("/api/contact")?;

        Ok(Self {
            http_client: Client::new(),
            endpoint,
        })
    }

    /// Errors only when no response was received. Any HTTP status, including
    /// 4xx and 5xx, comes back as a [`SubmissionResult`].
    #[tracing::instrument(name = "Posting the contact form", skip(self, payload))]
    pub async fn send(&self, payload: &SubmissionPayload) -> Result<SubmissionResult, reqwest::Error> {
        let response = self
            .http_client
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await?;

        let ok = response.status().is_success();
        let body = response.json::<ResponseBody>().await.unwrap_or_default();

        let message = if ok {
            body.message.unwrap_or_else(|| FALLBACK_SUCCESS_MESSAGE.to_string())
        } else {
            body.error.unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string())
        };

        Ok(SubmissionResult { ok, message })
    }
}
