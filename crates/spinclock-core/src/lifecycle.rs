//! Glue between host lifecycle notifications and the registry.
//!
//! Three notifications matter: a clock appearing, disappearing, and being
//! pressed. Appearing and pressing both pick a fresh colour; pressing also
//! redraws immediately so the change shows without waiting for the next
//! tick. Disappearing forgets the instance, so a clock that comes back
//! gets a new colour.

use std::sync::Arc;

use spinclock_types::{InstanceHandle, Target};
use tracing::{info, warn};

use crate::face::ClockFace;
use crate::palette::ColourSource;
use crate::registry::InstanceRegistry;
use crate::sink::{RenderCommand, RenderSink};
use crate::time::TimeSource;

/// Handlers for the three lifecycle notifications.
///
/// Cheap to clone; every clone shares the same registry and collaborators.
#[derive(Clone)]
pub struct LifecycleHandlers {
    registry: Arc<InstanceRegistry>,
    colours: Arc<dyn ColourSource>,
    time: Arc<dyn TimeSource>,
    sink: Arc<dyn RenderSink>,
}

impl LifecycleHandlers {
    /// Create handlers over a shared registry.
    pub fn new(
        registry: Arc<InstanceRegistry>,
        colours: Arc<dyn ColourSource>,
        time: Arc<dyn TimeSource>,
        sink: Arc<dyn RenderSink>,
    ) -> Self {
        Self {
            registry,
            colours,
            time,
            sink,
        }
    }

    /// A clock became visible: give it a colour.
    pub fn appeared(&self, handle: InstanceHandle) {
        let colour = self.colours.next_colour();
        info!(handle = %handle, colour = %colour, "clock appearing");
        self.registry.set(handle, colour);
    }

    /// A clock is no longer visible: stop tracking it.
    pub fn disappeared(&self, handle: &InstanceHandle) {
        info!(handle = %handle, "clock disappearing");
        self.registry.remove(handle);
    }

    /// A clock was pressed: recolour it and redraw right away.
    pub fn interacted(&self, handle: InstanceHandle) {
        let colour = self.colours.next_colour();
        info!(handle = %handle, colour = %colour, "clock pressed");
        self.registry.set(handle.clone(), colour);

        // Dispatch after the lock is released. A tick that snapshotted before
        // the set may still draw the previous colour once; the next tick
        // reads this one.
        let command = RenderCommand {
            handle: handle.clone(),
            face: ClockFace::at(colour, self.time.now()),
            target: Target::Both,
        };
        if let Err(e) = self.sink.dispatch(command) {
            warn!(handle = %handle, error = %e, "immediate redraw failed");
        }
    }
}

impl std::fmt::Debug for LifecycleHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleHandlers")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
