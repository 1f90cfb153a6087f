use crate::adapters::{HttpTokenVerifier, SmtpMailTransport};
use crate::configuration::Settings;
use crate::domain::mail_dispatcher::MailDispatcher;
use crate::domain::mail_transport::MailTransport;
use crate::domain::token_verifier::TokenVerifier;
use crate::routes::{contact, health_check, json_config, ContactPipeline};
use actix_web::dev::{Server, Service};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::web::Data;
use actix_web::{web, App, HttpMessage, HttpServer};
use anyhow::Context;
use std::net::TcpListener;
use std::sync::Arc;
use telemetry::CustomLevelRootSpanBuilder;
use tracing_actix_web::{RequestId, TracingLogger};

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let mail_transport = SmtpMailTransport::new(&configuration.email_settings)?;

        Self::build_with_mail_transport(configuration, Arc::new(mail_transport)).await
    }

    /// Same as [`Application::build`] with the SMTP transport swapped for the
    /// given one. The verification service is still taken from configuration.
    pub async fn build_with_mail_transport(
        configuration: Settings,
        mail_transport: Arc<dyn MailTransport>,
    ) -> Result<Self, anyhow::Error> {
        let listener = TcpListener::bind(format!(
            "{}:{}",
            configuration.application.host_name, configuration.application.application_port
        ))?;
        let port = listener.local_addr()?.port();

        let verifier = match &configuration.verification {
            Some(settings) => {
                let verifier = HttpTokenVerifier::from_settings(settings)
                    .context("Failed to build the verification client")?;
                Some(Arc::new(verifier) as Arc<dyn TokenVerifier>)
            }
            None => {
                tracing::warn!("No verification settings found, submissions are not challenged");
                None
            }
        };

        let dispatcher = MailDispatcher::new(
            mail_transport,
            configuration.email_settings.account.clone(),
            configuration.email_settings.recipient.clone(),
        );
        let pipeline = ContactPipeline::new(dispatcher, verifier);

        let server = run(listener, pipeline)?;

        Ok(Self { server, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

fn run(listener: TcpListener, pipeline: ContactPipeline) -> Result<Server, anyhow::Error> {
    let pipeline = Data::new(pipeline);

    let server = HttpServer::new(move || {
        App::new()
            .wrap_fn(|req, srv| {
                let request_id = req.extensions().get::<RequestId>().copied();
                let res = srv.call(req);
                async move {
                    let mut res = res.await?;
                    if let Some(request_id) = request_id {
                        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                            res.headers_mut()
                                .insert(HeaderName::from_static("x-request-id"), value);
                        }
                    }
                    Ok(res)
                }
            })
            .wrap(TracingLogger::<CustomLevelRootSpanBuilder>::new())
            .route("/health_check", web::get().to(health_check))
            .route("/api/contact", web::post().to(contact))
            .app_data(json_config())
            .app_data(pipeline.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
