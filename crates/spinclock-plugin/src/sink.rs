//! Render sink backed by the host WebSocket.
//!
//! [`SocketSink`] turns each [`RenderCommand`] into a `setImage` frame and
//! queues it on an unbounded channel drained by the socket writer task.
//! Queueing never waits, so neither the scheduler nor a key press handler
//! can be held up by a slow host.

use spinclock_core::sink::{DispatchError, RenderCommand, RenderSink};
use spinclock_types::{ImagePayload, OutboundMessage};
use tokio::sync::mpsc::UnboundedSender;

use crate::svg::{FaceTemplate, svg_data_url};

/// Queues `setImage` frames for the socket writer.
#[derive(Debug)]
pub struct SocketSink {
    template: FaceTemplate,
    outbound: UnboundedSender<String>,
}

impl SocketSink {
    /// Create a sink that renders with `template` and queues on `outbound`.
    pub const fn new(template: FaceTemplate, outbound: UnboundedSender<String>) -> Self {
        Self { template, outbound }
    }

    /// Build the JSON frame for `command` without sending it.
    pub fn encode(&self, command: RenderCommand) -> Result<String, DispatchError> {
        let svg = self
            .template
            .render(&command.face)
            .map_err(|e| DispatchError::Render {
                message: format!("face template: {e}"),
            })?;

        let message = OutboundMessage::SetImage {
            context: command.handle,
            payload: ImagePayload {
                image: svg_data_url(&svg),
                target: command.target,
                state: None,
            },
        };

        message.to_json().map_err(|e| DispatchError::Render {
            message: format!("setImage serialization: {e}"),
        })
    }
}

impl RenderSink for SocketSink {
    fn dispatch(&self, command: RenderCommand) -> Result<(), DispatchError> {
        let frame = self.encode(command)?;
        self.outbound
            .send(frame)
            .map_err(|_err| DispatchError::Closed)
    }
}
