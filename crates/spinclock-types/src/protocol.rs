//! JSON messages exchanged with the host application.
//!
//! The host talks to the plugin over a local WebSocket. Every frame is a
//! JSON object whose `event` field names its kind. We only act on three
//! inbound kinds (`willAppear`, `willDisappear`, `keyDown`); everything
//! else decodes to [`HostEvent::Unhandled`] so the read loop can skip it.

use serde::{Deserialize, Serialize, Serializer};

use crate::ids::InstanceHandle;

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// Fields shared by every per-instance host notification.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InstanceEvent {
    /// Opaque handle of the key the event is about.
    pub context: InstanceHandle,
    /// Action identifier from the plugin manifest.
    #[serde(default)]
    pub action: Option<String>,
    /// Device the key belongs to.
    #[serde(default)]
    pub device: Option<String>,
}

/// An event delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum HostEvent {
    /// A key showing our action became visible.
    WillAppear(InstanceEvent),
    /// A key showing our action is no longer visible.
    WillDisappear(InstanceEvent),
    /// The user pressed a key showing our action.
    KeyDown(InstanceEvent),
    /// Any event kind the plugin does not act on.
    #[serde(other)]
    Unhandled,
}

impl HostEvent {
    /// Decode one text frame from the host.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the frame is not a JSON object
    /// with an `event` field, or a known event lacks its `context`.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// Which surface an image is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    /// Both the physical key and the on-screen preview.
    #[default]
    Both,
    /// The physical key only.
    Hardware,
    /// The on-screen preview only.
    Software,
}

impl Target {
    /// Numeric code used on the wire.
    pub const fn code(self) -> u8 {
        match self {
            Self::Both => 0,
            Self::Hardware => 1,
            Self::Software => 2,
        }
    }
}

impl Serialize for Target {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Payload of a `setImage` message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImagePayload {
    /// Encoded image, as a `data:` URL.
    pub image: String,
    /// Surface the image goes to.
    pub target: Target,
    /// Optional action state index; omitted for single-state actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<u8>,
}

/// A message the plugin sends to the host after registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum OutboundMessage {
    /// Replace the image shown on one key.
    SetImage {
        /// Key to update.
        context: InstanceHandle,
        /// The new image.
        payload: ImagePayload,
    },
}

impl OutboundMessage {
    /// Serialize to the JSON text frame sent over the socket.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// The first frame sent after connecting: tells the host who we are.
///
/// The event name is dynamic (the host passes it on the command line), so
/// this is a plain struct rather than an [`OutboundMessage`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    /// Registration event name supplied by the host.
    pub event: String,
    /// Plugin UUID supplied by the host.
    pub uuid: String,
}
