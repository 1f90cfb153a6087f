use crate::configuration::VerificationSettings;
use crate::domain::token_verifier::{TokenVerifier, VerificationOutcome};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;

/// Client for `siteverify`-style services (reCAPTCHA, hCaptcha, Turnstile).
#[derive(Clone)]
pub struct HttpTokenVerifier {
    http_client: Client,
    verify_url: String,
    secret: Secret<String>,
}

impl HttpTokenVerifier {
    pub fn new(
        verify_url: String,
        secret: Secret<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            verify_url,
            secret,
        })
    }

    pub fn from_settings(settings: &VerificationSettings) -> Result<Self, reqwest::Error> {
        Self::new(
            settings.verify_url.clone(),
            settings.secret.clone(),
            settings.timeout(),
        )
    }
}

#[async_trait]
impl TokenVerifier for HttpTokenVerifier {
    #[tracing::instrument(name = "Calling the verification service", skip(self, token))]
    async fn verify_token(&self, token: &str) -> Result<VerificationOutcome, anyhow::Error> {
        let form = [
            ("secret", self.secret.expose_secret().as_str()),
            ("response", token),
        ];

        let outcome = self
            .http_client
            .post(&self.verify_url)
            .form(&form)
            .send()
            .await?
            .error_for_status()?
            .json::<VerificationOutcome>()
            .await?;

        Ok(outcome)
    }
}
