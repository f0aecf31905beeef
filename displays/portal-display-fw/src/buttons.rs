//! Front Panel Buttons
//!
//! Samples the three buttons and the loopback input and reports the raw
//! key mask whenever it changes. Debouncing happens in the panel; this
//! only turns pin levels into bits.

use embassy_time::{Duration, Timer};
use portal_core::keys::{CLOSE, LOOPBACK, OPEN, STOP};
use portal_hal::InputPin;
use portal_hal_stm32f0::ActiveLowInput;

/// Sampling period
const POLL_INTERVAL: Duration = Duration::from_millis(2);

/// Key inputs with their mask bits
pub struct Buttons<'d> {
    keys: [(u8, ActiveLowInput<'d>); 4],
    last: u8,
}

impl<'d> Buttons<'d> {
    /// Create the sampler; the current levels count as already reported
    pub fn new(
        open: ActiveLowInput<'d>,
        stop: ActiveLowInput<'d>,
        close: ActiveLowInput<'d>,
        loopback: ActiveLowInput<'d>,
    ) -> Self {
        let mut buttons = Self {
            keys: [(OPEN, open), (STOP, stop), (CLOSE, close), (LOOPBACK, loopback)],
            last: 0,
        };
        buttons.last = buttons.sample();
        buttons
    }

    /// Current raw mask
    pub fn mask(&self) -> u8 {
        self.last
    }

    /// Poll for a change of the raw mask
    ///
    /// Returns the new mask if any input changed since the last call.
    /// Should be called in a loop; it waits one sampling period.
    pub async fn poll(&mut self) -> Option<u8> {
        Timer::after(POLL_INTERVAL).await;

        let raw = self.sample();
        if raw == self.last {
            return None;
        }
        self.last = raw;
        Some(raw)
    }

    fn sample(&self) -> u8 {
        self.keys
            .iter()
            .filter(|(_, pin)| pin.is_high())
            .fold(0, |mask, (bit, _)| mask | bit)
    }
}
