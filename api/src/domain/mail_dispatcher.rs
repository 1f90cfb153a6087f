use crate::domain::contact_submission::ContactSubmission;
use crate::domain::mail_transport::{DispatchError, MailTransport, OutboundEmail};
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub const SUBJECT_PREFIX: &str = "Contact Form: ";

/// Turns a validated submission into one email for the site owner.
pub struct MailDispatcher {
    transport: Arc<dyn MailTransport>,
    sender: String,
    recipient: String,
}

impl MailDispatcher {
    pub fn new(transport: Arc<dyn MailTransport>, sender: String, recipient: String) -> Self {
        Self {
            transport,
            sender,
            recipient,
        }
    }

    #[tracing::instrument(
        name = "Dispatching a contact email",
        skip(self, submission),
        fields(sender_email = %submission.email)
    )]
    pub async fn dispatch(&self, submission: &ContactSubmission) -> Result<(), DispatchError> {
        self.transport.verify().await?;

        let email = self.compose(submission, Utc::now());

        self.transport.send(&email).await?;
        tracing::info!("Contact email handed to the mail provider");
        Ok(())
    }

    pub fn compose(&self, submission: &ContactSubmission, composed_at: DateTime<Utc>) -> OutboundEmail {
        OutboundEmail {
            from: self.sender.clone(),
            to: self.recipient.clone(),
            reply_to: Some(submission.email.inner().to_string()),
            subject: format!("{}{}", SUBJECT_PREFIX, submission.subject),
            html_body: render_html_body(submission, composed_at),
        }
    }
}

pub fn render_html_body(submission: &ContactSubmission, composed_at: DateTime<Utc>) -> String {
    let name = escape_html(&submission.name);
    let email = escape_html(submission.email.inner());
    let subject = escape_html(&submission.subject);
    let message = with_line_breaks(&escape_html(&submission.message));
    let composed_at = composed_at.format("%Y-%m-%d %H:%M:%S UTC");

    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #333; border-bottom: 2px solid #007bff; padding-bottom: 10px;">New Contact Form Message</h2>
  <div style="background-color: #f8f9fa; padding: 20px; border-radius: 5px; margin: 20px 0;">
    <p style="margin: 10px 0;"><strong>From:</strong> {name}</p>
    <p style="margin: 10px 0;"><strong>Email:</strong> {email}</p>
    <p style="margin: 10px 0;"><strong>Subject:</strong> {subject}</p>
  </div>
  <div style="margin: 20px 0;">
    <h3 style="color: #333;">Message:</h3>
    <div style="background-color: #ffffff; padding: 15px; border-left: 4px solid #007bff; border-radius: 3px;">{message}</div>
  </div>
  <div style="margin-top: 30px; padding-top: 20px; border-top: 1px solid #dee2e6; font-size: 12px; color: #6c757d;">
    <p>This email was sent from your website's contact form.</p>
    <p>Time: {composed_at}</p>
  </div>
</div>"#
    )
}

fn with_line_breaks(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\n', "<br>")
}

fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
