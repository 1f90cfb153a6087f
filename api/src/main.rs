use anyhow::Context;
use contact_api::configuration::get_configuration;
use contact_api::startup::Application;
use telemetry::{get_subscriber, init_subscriber, init_tracer};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let configuration = get_configuration().context("Failed to read configuration")?;

    let tracer = init_tracer(&configuration.telemetry)?;
    let subscriber = get_subscriber(
        configuration.telemetry.dataset_name.clone(),
        "info".into(),
        std::io::stdout,
        &configuration.telemetry,
        &tracer,
    );
    init_subscriber(subscriber);

    let application = Application::build(configuration).await?;
    tracing::info!("Listening on port {}", application.port());

    application.run_until_stopped().await?;

    for result in tracer.force_flush() {
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to flush pending spans");
        }
    }
    Ok(())
}
