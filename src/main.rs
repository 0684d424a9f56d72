use std::io::stderr;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use payment_router::api::{app, AppState};
use payment_router::engine::BatchDispatcher;
use payment_router::gateway::HttpPaymentGateway;
use payment_router::settings::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    setup_logging(parse_log_level(&config.log_level));

    let gateway = HttpPaymentGateway::new(&config.processor.url, config.processor.connection_pool_size)?;
    info!("Forwarding payments to {}", gateway.endpoint());

    let dispatcher = BatchDispatcher::new(Arc::new(gateway), config.dispatch.clone())?;
    let state = AppState {
        dispatcher: Arc::new(dispatcher)
    };

    let address = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(address).await?;

    info!("Payment router listening on {address}");

    axum::serve(listener, app(state)).await?;

    Ok(())
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'info'", level);
            LevelFilter::INFO
        }
    }
}

fn setup_logging(level: LevelFilter) {
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}
