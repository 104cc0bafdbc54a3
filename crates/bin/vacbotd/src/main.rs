//! # vacbotd — vacbot daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize the `tracing` subscriber
//! - Build the zone registry and admin allow-list
//! - Pick the device adapter: the simulator, or the live device after a
//!   bounded discovery handshake (an unanswered one aborts startup)
//! - Wrap the device in the global one-command-at-a-time lock
//! - Build the axum router, injecting the conversation service
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use tracing_subscriber::EnvFilter;

use vacbot_adapter_http_axum::state::AppState;
use vacbot_adapter_miio::MiioVacuum;
use vacbot_adapter_simulated::SimulatedVacuum;
use vacbot_app::ports::Vacuum;
use vacbot_app::serialized::SerializedVacuum;
use vacbot_app::services::conversation::ConversationService;
use vacbot_domain::access::AccessGuard;
use vacbot_domain::zone_registry::ZoneRegistry;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    let zones = config.zones.build_registry()?;
    if zones.is_empty() {
        tracing::warn!("no zones configured, zone cleaning will offer an empty menu");
    }
    for admin in &config.access.admins {
        tracing::debug!(name = %admin.name, id = %admin.id, "admin allowed");
    }
    let guard = AccessGuard::new(config.access.allow_list()?);

    if config.device.simulation {
        tracing::info!("using simulated vacuum cleaner");
        run(&config, SimulatedVacuum::new(), zones, guard).await
    } else {
        let address = config.device.socket_addr()?;
        let vacuum = MiioVacuum::open(address, &config.device.link)
            .await
            .inspect_err(|err| {
                tracing::error!(%address, error = ?err, "vacuum cleaner unreachable");
            })?;
        run(&config, vacuum, zones, guard).await
    }
}

async fn run<V>(
    config: &Config,
    vacuum: V,
    zones: ZoneRegistry,
    guard: AccessGuard,
) -> Result<(), Box<dyn std::error::Error>>
where
    V: Vacuum + 'static,
{
    let conversation = ConversationService::new(SerializedVacuum::new(vacuum), zones, guard);
    let app = vacbot_adapter_http_axum::router::build(AppState::new(conversation));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "vacbotd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
