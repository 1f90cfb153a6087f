use async_trait::async_trait;
use contact_api::configuration::{get_configuration, VerificationSettings};
use contact_api::domain::mail_transport::{DispatchError, MailTransport, OutboundEmail};
use contact_api::startup::Application;
use once_cell::sync::Lazy;
use opentelemetry_sdk::trace::TracerProvider;
use secrecy::Secret;
use std::sync::{Arc, Mutex};
use telemetry::{get_subscriber, init_subscriber};
use wiremock::MockServer;

static TRACING: Lazy<()> = Lazy::new(|| {
    let mut configuration = get_configuration().expect("Failed to read configuration");
    let default_filter = "info".to_string();
    let subscriber_name = "test".to_string();
    configuration.telemetry.dataset_name = format!("test-{}", configuration.telemetry.dataset_name);

    let default_trace_provider = TracerProvider::builder().build();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter,
            std::io::stdout,
            &configuration.telemetry,
            &default_trace_provider,
        );
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter,
            std::io::sink,
            &configuration.telemetry,
            &default_trace_provider,
        );
        init_subscriber(subscriber);
    }
});

#[derive(Clone, Copy, Debug)]
pub enum TransportFailure {
    Authentication,
    Network,
    Delivery,
}

/// Stands in for the SMTP transport and keeps every message it is given.
#[derive(Default)]
pub struct RecordingMailTransport {
    failure: Option<TransportFailure>,
    pub sent: Mutex<Vec<OutboundEmail>>,
}

impl RecordingMailTransport {
    pub fn sent_emails(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingMailTransport {
    async fn verify(&self) -> Result<(), DispatchError> {
        match self.failure {
            Some(TransportFailure::Authentication) => Err(DispatchError::Authentication(
                anyhow::anyhow!("Invalid login: 535-5.7.8 Username and Password not accepted"),
            )),
            Some(TransportFailure::Network) => Err(DispatchError::Transport(anyhow::anyhow!(
                "Network is unreachable (os error 101)"
            ))),
            _ => Ok(()),
        }
    }

    async fn send(&self, email: &OutboundEmail) -> Result<(), DispatchError> {
        if let Some(TransportFailure::Delivery) = self.failure {
            return Err(DispatchError::Delivery(anyhow::anyhow!(
                "552 5.2.2 The recipient's inbox is out of storage space"
            )));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

pub struct TestApp {
    pub address: String,
    pub verification_server: MockServer,
    pub mail_transport: Arc<RecordingMailTransport>,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn post_contact(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/contact", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_contact_raw(&self, body: String) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/contact", &self.address))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

pub async fn spawn_app() -> TestApp {
    spawn(false, None).await
}

pub async fn spawn_app_with_verification() -> TestApp {
    spawn(true, None).await
}

pub async fn spawn_app_with_failing_transport(failure: TransportFailure) -> TestApp {
    spawn(false, Some(failure)).await
}

async fn spawn(verification: bool, failure: Option<TransportFailure>) -> TestApp {
    Lazy::force(&TRACING);

    // Launch a mock server to stand in for the verification service
    let verification_server = MockServer::start().await;

    // Randomise configuration to ensure test isolation
    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        // Use a random OS port
        c.application.application_port = 0;
        c.email_settings.account = "site@example.com".to_string();
        c.email_settings.recipient = "owner@example.com".to_string();
        c.verification = verification.then(|| VerificationSettings {
            verify_url: format!("{}/siteverify", verification_server.uri()),
            secret: Secret::new("test-verification-secret".to_string()),
            timeout_milliseconds: 2000,
        });
        c
    };

    let mail_transport = Arc::new(RecordingMailTransport {
        failure,
        ..Default::default()
    });

    // Launch the application as a background task
    let application =
        Application::build_with_mail_transport(configuration, mail_transport.clone())
            .await
            .expect("Failed to build application.");
    let application_port = application.port();
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address: format!("http://127.0.0.1:{}", application_port),
        verification_server,
        mail_transport,
        api_client: reqwest::Client::new(),
    }
}

pub fn valid_payload() -> serde_json::Value {
    serde_json::json!({
        "name": "Ann",
        "email": "ann@x.com",
        "subject": "Hi",
        "message": "Hello\nWorld"
    })
}
