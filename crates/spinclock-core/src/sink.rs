//! The seam between the core and whatever delivers images to the host.
//!
//! The core decides *what* a face shows ([`ClockFace`]); turning that into
//! an encoded image and getting it onto the key is the sink's job. Sinks
//! must not block: the scheduler calls [`RenderSink::dispatch`] once per
//! instance per tick, and lifecycle handlers call it inline.

use spinclock_types::{InstanceHandle, Target};

use crate::face::ClockFace;

/// Errors a sink can report for a single dispatch.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The outbound channel to the host is gone.
    #[error("render sink closed")]
    Closed,

    /// The face could not be turned into a payload.
    #[error("render failed: {message}")]
    Render {
        /// Description of the failure.
        message: String,
    },
}

/// One image update for one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderCommand {
    /// Key to update.
    pub handle: InstanceHandle,
    /// What the key should show.
    pub face: ClockFace,
    /// Which surface to update.
    pub target: Target,
}

/// Accepts render commands for delivery to the host.
pub trait RenderSink: Send + Sync {
    /// Hand off one command. Must return without waiting on the host.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] if this command cannot be delivered.
    /// A failure concerns this command only.
    fn dispatch(&self, command: RenderCommand) -> Result<(), DispatchError>;
}
