//! Wall-clock time as seen by the clock faces.
//!
//! Faces only show hour and minute, so [`WallTime`] carries just those two
//! fields. The [`TimeSource`] trait lets tests pin the time; production
//! uses [`LocalClock`], which reads the machine's local time zone.

use chrono::Timelike;

/// Errors that can occur when building a [`WallTime`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeError {
    /// Hour or minute is outside its range.
    #[error("invalid time of day {hour:02}:{minute:02}")]
    OutOfRange {
        /// The rejected hour.
        hour: u8,
        /// The rejected minute.
        minute: u8,
    },
}

/// An hour and minute of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WallTime {
    hour: u8,
    minute: u8,
}

impl WallTime {
    /// Build a time of day, validating `hour < 24` and `minute < 60`.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::OutOfRange`] for out-of-range components.
    pub const fn new(hour: u8, minute: u8) -> Result<Self, TimeError> {
        if hour >= 24 || minute >= 60 {
            return Err(TimeError::OutOfRange { hour, minute });
        }
        Ok(Self { hour, minute })
    }

    /// Hour of the day, 0 through 23.
    pub const fn hour(self) -> u8 {
        self.hour
    }

    /// Minute of the hour, 0 through 59.
    pub const fn minute(self) -> u8 {
        self.minute
    }

    /// Take hour and minute from any `chrono` time value.
    pub fn from_timelike<T: Timelike>(time: &T) -> Self {
        // chrono guarantees hour() < 24 and minute() < 60.
        Self {
            hour: u8::try_from(time.hour()).unwrap_or(0),
            minute: u8::try_from(time.minute()).unwrap_or(0),
        }
    }
}

/// Something that can tell the current time of day.
pub trait TimeSource: Send + Sync {
    /// The current time of day.
    fn now(&self) -> WallTime;
}

/// Reads the system clock in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl TimeSource for LocalClock {
    fn now(&self) -> WallTime {
        WallTime::from_timelike(&chrono::Local::now())
    }
}

/// Always reports the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedTime(pub WallTime);

impl TimeSource for FixedTime {
    fn now(&self) -> WallTime {
        self.0
    }
}
