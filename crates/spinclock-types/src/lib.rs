//! Shared type definitions for the Spinclock control-surface plugin.
//!
//! Everything that crosses a crate boundary lives here: the opaque
//! instance handle the host gives us, the colour assigned to each clock,
//! and the JSON messages exchanged with the host application.
//!
//! # Modules
//!
//! - [`ids`] -- Opaque instance handle wrapper
//! - [`colour`] -- RGB colour with `#rrggbb` formatting
//! - [`protocol`] -- Inbound host events and outbound host messages

pub mod colour;
pub mod ids;
pub mod protocol;

// Re-export all public types at crate root for convenience.
pub use colour::Colour;
pub use ids::InstanceHandle;
pub use protocol::{HostEvent, ImagePayload, InstanceEvent, OutboundMessage, Registration, Target};
