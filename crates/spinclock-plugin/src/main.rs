//! Spinclock control-surface plugin entry point.
//!
//! The host launches this binary with registration parameters, and the
//! plugin connects back over a local WebSocket. Every key showing the
//! clock action gets a random colour and is redrawn once per second with
//! the current hour as its numeral and the minute as the numeral's
//! rotation.
//!
//! # Architecture
//!
//! ```text
//! host --(willAppear/willDisappear/keyDown)--> router --> LifecycleHandlers --> InstanceRegistry
//!                                                                                    |
//! host <--(setImage)-- socket writer <-- SocketSink <-- RefreshScheduler (1s) <------+
//! ```
//!
//! The process exits when the host closes the socket.

mod config;
mod error;
mod router;
mod sink;
mod socket;
mod svg;

use std::sync::Arc;

use futures::StreamExt;
use spinclock_core::lifecycle::LifecycleHandlers;
use spinclock_core::palette::RandomColours;
use spinclock_core::registry::InstanceRegistry;
use spinclock_core::scheduler::RefreshScheduler;
use spinclock_core::sink::RenderSink;
use spinclock_core::time::{LocalClock, TimeSource};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::PluginConfig;
use crate::sink::SocketSink;
use crate::svg::FaceTemplate;

/// Application entry point.
///
/// Initializes logging, reads the registration arguments, connects to the
/// host, starts the refresh loop, and routes host events until the host
/// disconnects.
///
/// # Errors
///
/// Returns an error if the arguments are invalid or the host connection
/// cannot be established.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The host owns stdout; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("spinclock-plugin starting");

    let config = PluginConfig::from_args(std::env::args().skip(1))?;
    info!(
        port = config.port,
        plugin_uuid = config.plugin_uuid,
        register_event = config.register_event,
        "configuration loaded"
    );
    if let Some(host) = &config.info {
        info!(
            host_version = host.application.version,
            platform = host.application.platform,
            language = host.application.language.as_deref().unwrap_or("unknown"),
            manifest_uuid = host.plugin.uuid,
            plugin_version = host.plugin.version,
            devices = host.devices.len(),
            "host information"
        );
        for device in &host.devices {
            info!(
                device = device.id,
                name = device.name.as_deref().unwrap_or("unnamed"),
                columns = device.size.map(|s| s.columns),
                rows = device.size.map(|s| s.rows),
                "device attached"
            );
        }
    }

    let template = FaceTemplate::new()?;

    // Fatal on failure: there is no useful mode without the host.
    let host = socket::connect(&config).await?;
    let (writer, reader) = host.split();
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let writer_task = socket::spawn_writer(writer, outbound_rx);

    let registry = Arc::new(InstanceRegistry::new());
    let time: Arc<dyn TimeSource> = Arc::new(LocalClock);
    let render_sink: Arc<dyn RenderSink> = Arc::new(SocketSink::new(template, outbound_tx));

    let handlers = LifecycleHandlers::new(
        Arc::clone(&registry),
        Arc::new(RandomColours),
        Arc::clone(&time),
        Arc::clone(&render_sink),
    );
    let scheduler = RefreshScheduler::new(registry, time, render_sink);

    let cancel = CancellationToken::new();
    let refresh_task = tokio::spawn(scheduler.run(cancel.clone()));

    info!("handlers registered, waiting for host to close");
    let routed = router::route_events(reader, &handlers).await;

    cancel.cancel();
    if let Err(e) = refresh_task.await {
        warn!(error = %e, "refresh loop task failed");
    }
    // Last sender gone: the writer drains and closes.
    drop(handlers);
    if let Err(e) = writer_task.await {
        warn!(error = %e, "socket writer task failed");
    }

    routed?;
    info!("spinclock-plugin shutdown complete");
    Ok(())
}
