//! Colour selection for new and pressed clocks.
//!
//! Each appearance or key press picks a fresh colour from a
//! [`ColourSource`]. The source is injected so tests can supply a fixed
//! sequence instead of randomness.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use spinclock_types::Colour;

/// Supplies colours for clock instances.
pub trait ColourSource: Send + Sync {
    /// Pick the next colour. Successive calls are independent.
    fn next_colour(&self) -> Colour;
}

/// Uniformly random colours from the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomColours;

impl ColourSource for RandomColours {
    fn next_colour(&self) -> Colour {
        random_colour(&mut rand::rng())
    }
}

/// Reproducible random colours from a fixed seed.
#[derive(Debug)]
pub struct SeededColours {
    rng: Mutex<SmallRng>,
}

impl SeededColours {
    /// Create a generator seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }
}

impl ColourSource for SeededColours {
    fn next_colour(&self) -> Colour {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        random_colour(&mut *rng)
    }
}

/// Cycles through a fixed list of colours, starting from the first.
#[derive(Debug)]
pub struct FixedSequence {
    colours: Vec<Colour>,
    cursor: AtomicUsize,
}

impl FixedSequence {
    /// Cycle through `colours`. An empty list yields black forever.
    pub const fn new(colours: Vec<Colour>) -> Self {
        Self {
            colours,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl ColourSource for FixedSequence {
    fn next_colour(&self) -> Colour {
        let position = self.cursor.fetch_add(1, Ordering::Relaxed);
        position
            .checked_rem(self.colours.len())
            .and_then(|idx| self.colours.get(idx))
            .copied()
            .unwrap_or(Colour::rgb(0, 0, 0))
    }
}

fn random_colour<R: Rng + ?Sized>(rng: &mut R) -> Colour {
    Colour::rgb(rng.random(), rng.random(), rng.random())
}
