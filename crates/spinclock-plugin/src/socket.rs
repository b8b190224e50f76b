//! WebSocket connection to the host application.
//!
//! [`connect`] opens the socket and sends the registration frame. After
//! that the stream is split: the read half feeds the event router and the
//! write half is owned by [`spawn_writer`], which drains the outbound
//! queue filled by the render sink.

use futures::{Sink, SinkExt};
use spinclock_types::Registration;
use tokio::net::TcpStream;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use crate::config::PluginConfig;
use crate::error::PluginError;

/// The connected host socket.
pub type HostSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connect to the host and register.
///
/// # Errors
///
/// Returns [`PluginError::Connect`] if the socket cannot be opened and
/// [`PluginError::Socket`] if the registration frame cannot be sent.
pub async fn connect(config: &PluginConfig) -> Result<HostSocket, PluginError> {
    let url = config.socket_url();
    info!(url = url, "connecting to host");

    let (mut socket, _response) = connect_async(url.as_str())
        .await
        .map_err(|e| PluginError::Connect(format!("failed to connect to {url}: {e}")))?;

    let registration = Registration {
        event: config.register_event.clone(),
        uuid: config.plugin_uuid.clone(),
    };
    socket
        .send(Message::text(serde_json::to_string(&registration)?))
        .await
        .map_err(|e| PluginError::Socket(format!("failed to register: {e}")))?;

    info!(
        register_event = config.register_event,
        plugin_uuid = config.plugin_uuid,
        "registered with host"
    );
    Ok(socket)
}

/// Forward queued frames to the host until the queue closes or a write
/// fails.
///
/// The queue closes once every sender (the render sink and its clones)
/// has been dropped.
pub fn spawn_writer<W>(writer: W, outbound: UnboundedReceiver<String>) -> JoinHandle<()>
where
    W: Sink<Message> + Unpin + Send + 'static,
    W::Error: std::fmt::Display,
{
    tokio::spawn(write_frames(writer, outbound))
}

async fn write_frames<W>(mut writer: W, mut outbound: UnboundedReceiver<String>)
where
    W: Sink<Message> + Unpin,
    W::Error: std::fmt::Display,
{
    let mut written: u64 = 0;
    while let Some(frame) = outbound.recv().await {
        if let Err(e) = writer.send(Message::text(frame)).await {
            warn!(error = %e, "failed to write to host socket, dropping outbound queue");
            return;
        }
        written = written.saturating_add(1);
    }

    if let Err(e) = writer.close().await {
        debug!(error = %e, "host socket close failed");
    }
    debug!(frames = written, "socket writer finished");
}
