//! Instance tracking and refresh scheduling for the Spinclock plugin.
//!
//! Lifecycle notifications from the host mutate a small shared registry of
//! visible clocks; a free-running scheduler reads it once per second and
//! re-renders every clock. The two sides only meet inside the registry's
//! lock.
//!
//! # Modules
//!
//! - [`registry`] -- The guarded handle-to-colour map.
//! - [`face`] -- Hour label and minute rotation for one render.
//! - [`palette`] -- [`ColourSource`] trait and implementations.
//! - [`time`] -- [`TimeSource`] trait and implementations.
//! - [`sink`] -- [`RenderSink`] trait and [`RenderCommand`].
//! - [`lifecycle`] -- Handlers for appear, disappear, and key press.
//! - [`scheduler`] -- The once-per-second refresh loop.
//!
//! [`ColourSource`]: palette::ColourSource
//! [`TimeSource`]: time::TimeSource
//! [`RenderSink`]: sink::RenderSink
//! [`RenderCommand`]: sink::RenderCommand

pub mod face;
pub mod lifecycle;
pub mod palette;
pub mod registry;
pub mod scheduler;
pub mod sink;
pub mod time;
