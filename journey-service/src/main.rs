use journey_service::{ServiceConfig, create_app};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// JSON logs by default, human-readable ones with `LOG_FORMAT=pretty`
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "journey_service=debug,journey_flow=debug,tower_http=debug".into());

    match log_format.as_str() {
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true),
                )
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ServiceConfig::from_env();
    info!(
        port = config.port,
        otp_delay_ms = config.journey.otp_delay.as_millis() as u64,
        link_send_delay_ms = config.journey.link_send_delay.as_millis() as u64,
        premium_basis = ?config.journey.premium_basis,
        "Configuration loaded"
    );

    let app = create_app(config.journey);
    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    let addr = listener.local_addr()?;

    info!("Loan journey service listening on http://{}", addr);
    info!("API overview at http://{}/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
