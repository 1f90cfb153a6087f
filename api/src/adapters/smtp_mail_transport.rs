use crate::configuration::EmailClientSettings;
use crate::domain::mail_transport::{DispatchError, MailTransport, OutboundEmail};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;

/// Reply codes a provider uses to refuse the supplied credentials.
const AUTHENTICATION_FAILURE_CODES: [&str; 3] = ["530", "534", "535"];

pub struct SmtpMailTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailTransport {
    pub fn new(settings: &EmailClientSettings) -> Result<Self, anyhow::Error> {
        let credentials = Credentials::new(
            settings.account.clone(),
            settings.app_password.expose_secret().clone(),
        );

        let builder = if settings.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.smtp_host)
        }
        .with_context(|| format!("Failed to configure the SMTP relay {}", settings.smtp_host))?;

        let mailer = builder
            .port(settings.smtp_port)
            .credentials(credentials)
            .timeout(Some(settings.timeout()))
            .build();

        Ok(Self { mailer })
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    #[tracing::instrument(name = "Verifying the SMTP session", skip(self))]
    async fn verify(&self) -> Result<(), DispatchError> {
        match self.mailer.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(DispatchError::Transport(anyhow!(
                "The SMTP server did not answer the connection probe"
            ))),
            Err(e) => Err(classify(e)),
        }
    }

    #[tracing::instrument(name = "Sending an email over SMTP", skip(self, email))]
    async fn send(&self, email: &OutboundEmail) -> Result<(), DispatchError> {
        let message = build_message(email).map_err(DispatchError::Delivery)?;

        self.mailer.send(message).await.map_err(classify)?;
        Ok(())
    }
}

fn build_message(email: &OutboundEmail) -> Result<Message, anyhow::Error> {
    let from: Mailbox = email.from.parse().context("Invalid sender address")?;
    let to: Mailbox = email.to.parse().context("Invalid recipient address")?;

    let mut builder = Message::builder().from(from).to(to);

    // Visitor addresses only pass a loose shape check, so a reply-to that
    // the mailbox grammar refuses is dropped rather than failing delivery.
    if let Some(reply_to) = email.reply_to.as_deref().and_then(|r| r.parse::<Mailbox>().ok()) {
        builder = builder.reply_to(reply_to);
    }

    builder
        .subject(email.subject.as_str())
        .header(ContentType::TEXT_HTML)
        .body(email.html_body.clone())
        .context("Failed to build the email message")
}

fn classify(e: lettre::transport::smtp::Error) -> DispatchError {
    if is_authentication_failure(&e) {
        DispatchError::Authentication(e.into())
    } else if e.is_timeout() || has_io_source(&e) {
        DispatchError::Transport(e.into())
    } else {
        DispatchError::Delivery(e.into())
    }
}

fn is_authentication_failure(e: &lettre::transport::smtp::Error) -> bool {
    e.status()
        .map(|code| AUTHENTICATION_FAILURE_CODES.contains(&code.to_string().as_str()))
        .unwrap_or(false)
}

fn has_io_source(e: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = e.source();
    while let Some(cause) = current {
        if cause.downcast_ref::<std::io::Error>().is_some() {
            return true;
        }
        current = cause.source();
    }
    false
}
