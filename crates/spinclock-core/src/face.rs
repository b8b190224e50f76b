//! What one clock face shows at a given moment.
//!
//! The hour is drawn as a two-digit numeral; the minute is encoded as the
//! numeral's rotation about the face centre, a full turn per hour. There
//! is no seconds resolution.

use spinclock_types::Colour;

use crate::time::WallTime;

/// Degrees in a full turn.
const FULL_TURN: u16 = 360;

/// Minutes in an hour.
const MINUTES_PER_HOUR: u16 = 60;

/// Rotation for `minute`, truncated to whole degrees.
///
/// Equal to `floor(360 * minute / 60)`: 0 -> 0, 15 -> 90, 59 -> 354.
pub fn rotation_degrees(minute: u8) -> u16 {
    u16::from(minute)
        .saturating_mul(FULL_TURN)
        .checked_div(MINUTES_PER_HOUR)
        .unwrap_or(0)
}

/// Zero-padded two-digit hour label.
pub fn hour_label(hour: u8) -> String {
    format!("{hour:02}")
}

/// Semantic content of one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockFace {
    /// Fill colour of the numeral.
    pub colour: Colour,
    /// Hour of the day, 0 through 23.
    pub hour: u8,
    /// Rotation in whole degrees.
    pub rotation: u16,
}

impl ClockFace {
    /// Face for an instance with `colour` at `time`.
    pub fn at(colour: Colour, time: WallTime) -> Self {
        Self {
            colour,
            hour: time.hour(),
            rotation: rotation_degrees(time.minute()),
        }
    }

    /// The two-digit label drawn on the face.
    pub fn label(&self) -> String {
        hour_label(self.hour)
    }
}
