//! The once-per-second refresh loop.
//!
//! Each tick reads the time once, snapshots the registry, and dispatches
//! one render command per active clock. Every clock drawn in a tick shows
//! the same instant. A failed dispatch is logged and skipped; the rest of
//! the tick and all later ticks carry on.
//!
//! The loop has no natural end. It stops only when its
//! [`CancellationToken`] fires, which the plugin does when the host
//! closes the connection.

use std::sync::Arc;
use std::time::Duration;

use spinclock_types::Target;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::face::ClockFace;
use crate::registry::InstanceRegistry;
use crate::sink::{RenderCommand, RenderSink};
use crate::time::TimeSource;

/// Interval between refreshes.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Commands the sink accepted.
    pub rendered: usize,
    /// Commands the sink rejected.
    pub failed: usize,
}

/// Periodically re-renders every active clock.
#[derive(Clone)]
pub struct RefreshScheduler {
    registry: Arc<InstanceRegistry>,
    time: Arc<dyn TimeSource>,
    sink: Arc<dyn RenderSink>,
}

impl RefreshScheduler {
    /// Create a scheduler over a shared registry.
    pub fn new(
        registry: Arc<InstanceRegistry>,
        time: Arc<dyn TimeSource>,
        sink: Arc<dyn RenderSink>,
    ) -> Self {
        Self {
            registry,
            time,
            sink,
        }
    }

    /// Run one refresh pass over every active clock.
    pub fn tick(&self) -> TickReport {
        let now = self.time.now();
        let active = self.registry.snapshot();
        let mut report = TickReport::default();

        // Dispatch runs outside the registry lock, so a clock removed or
        // recoloured after the snapshot may be drawn once more from it. The
        // next tick's snapshot no longer holds it.
        for (handle, colour) in active {
            let command = RenderCommand {
                handle: handle.clone(),
                face: ClockFace::at(colour, now),
                target: Target::Both,
            };
            match self.sink.dispatch(command) {
                Ok(()) => report.rendered = report.rendered.saturating_add(1),
                Err(e) => {
                    warn!(handle = %handle, error = %e, "failed to redraw clock");
                    report.failed = report.failed.saturating_add(1);
                }
            }
        }

        report
    }

    /// Tick every [`REFRESH_INTERVAL`] until `cancel` fires.
    ///
    /// The first tick happens immediately. Ticks that fall behind are
    /// delayed rather than bunched up.
    pub async fn run(self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(REFRESH_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            interval_ms = REFRESH_INTERVAL.as_millis(),
            "refresh loop started"
        );

        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = interval.tick() => {
                    let report = self.tick();
                    debug!(
                        rendered = report.rendered,
                        failed = report.failed,
                        "tick complete"
                    );
                }
            }
        }

        info!("refresh loop stopped");
    }
}

impl std::fmt::Debug for RefreshScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshScheduler")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
