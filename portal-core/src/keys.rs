//! Front panel keys
//!
//! Three buttons and the loopback wire are reported as one bit mask.
//! A key counts as pressed from the first sample that shows it; it is
//! released only after reading released for the debounce delay.

use crate::clock;

/// Open button
pub const OPEN: u8 = 0x01;
/// Stop button
pub const STOP: u8 = 0x02;
/// Close button
pub const CLOSE: u8 = 0x04;
/// Loopback input
pub const LOOPBACK: u8 = 0x08;

/// Every key bit
pub const ALL: u8 = OPEN | STOP | CLOSE | LOOPBACK;

/// Default release delay in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u32 = 10;

const KEY_COUNT: usize = 4;

/// Debounced key mask
#[derive(Debug, Clone)]
pub struct Debouncer {
    debounce_ms: u32,
    /// Latest raw sample
    raw: u8,
    /// Debounced mask
    state: u8,
    /// Per key: when it started reading released
    released_at: [Option<u32>; KEY_COUNT],
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

impl Debouncer {
    /// Create a debouncer with no key pressed
    pub const fn new(debounce_ms: u32) -> Self {
        Self {
            debounce_ms,
            raw: 0,
            state: 0,
            released_at: [None; KEY_COUNT],
        }
    }

    /// Debounced key mask
    pub fn state(&self) -> u8 {
        self.state
    }

    /// Check a single key
    pub fn is_pressed(&self, key: u8) -> bool {
        self.state & key != 0
    }

    /// Record a raw sample taken at `now`
    ///
    /// Returns the new mask if it changed.
    pub fn sample(&mut self, raw: u8, now: u32) -> Option<u8> {
        self.raw = raw & ALL;
        self.update(now)
    }

    /// Re-evaluate pending releases against the latest sample
    ///
    /// Returns the new mask if it changed.
    pub fn update(&mut self, now: u32) -> Option<u8> {
        let before = self.state;

        for (i, released_at) in self.released_at.iter_mut().enumerate() {
            let bit = 1 << i;
            if self.raw & bit != 0 {
                self.state |= bit;
                *released_at = None;
            } else if self.state & bit != 0 {
                match *released_at {
                    None => *released_at = Some(now),
                    Some(since) if clock::reached(now, clock::after(since, self.debounce_ms)) => {
                        self.state &= !bit;
                        *released_at = None;
                    }
                    Some(_) => {}
                }
            }
        }

        (self.state != before).then_some(self.state)
    }
}
