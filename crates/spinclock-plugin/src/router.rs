//! Routes host events to the lifecycle handlers.
//!
//! Runs on the read half of the host socket until the host closes the
//! connection, which is how the host tells a plugin to exit.

use futures::{Stream, StreamExt};
use spinclock_core::lifecycle::LifecycleHandlers;
use spinclock_types::HostEvent;
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, info, warn};

use crate::error::PluginError;

/// Apply one decoded host event.
pub fn route(event: HostEvent, handlers: &LifecycleHandlers) {
    match event {
        HostEvent::WillAppear(e) => handlers.appeared(e.context),
        HostEvent::WillDisappear(e) => handlers.disappeared(&e.context),
        HostEvent::KeyDown(e) => handlers.interacted(e.context),
        HostEvent::Unhandled => debug!("ignoring unhandled host event"),
    }
}

/// Consume host frames until the connection ends.
///
/// Malformed frames are logged and skipped. Returns `Ok(())` on a close
/// frame or end of stream.
///
/// # Errors
///
/// Returns [`PluginError::Socket`] if the socket reports a read error.
pub async fn route_events<S>(mut frames: S, handlers: &LifecycleHandlers) -> Result<(), PluginError>
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    while let Some(frame) = frames.next().await {
        let frame = frame.map_err(|e| PluginError::Socket(format!("read failed: {e}")))?;
        match frame {
            Message::Text(text) => match HostEvent::from_json(&text) {
                Ok(event) => route(event, handlers),
                Err(e) => warn!(error = %e, "failed to decode host event, skipping"),
            },
            Message::Close(reason) => {
                info!(reason = ?reason, "host closed the connection");
                return Ok(());
            }
            Message::Binary(_) | Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
        }
    }

    info!("host connection ended");
    Ok(())
}
