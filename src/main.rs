use signup_relay::configuration::get_configuration;
use signup_relay::startup::Application;
use signup_relay::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let configuration = get_configuration()?;

    let subscriber = get_subscriber("signup_relay".into(), "info".to_string(), std::io::stdout, &configuration.telemetry)?;
    init_subscriber(subscriber)?;

    let application = Application::build(configuration).await?;
    tracing::info!(
        "Listening on port {}, health check at /health",
        application.port()
    );
    application.run_until_stopped().await?;
    Ok(())
}
