//! GPIO adapters for STM32F0

use embassy_stm32::gpio::{Input, Output};
use portal_hal::{InputPin, OutputPin};

/// Push-pull output behind [`OutputPin`]
pub struct PushPull<'d> {
    pin: Output<'d>,
}

impl<'d> PushPull<'d> {
    /// Wrap a configured embassy output
    pub fn new(pin: Output<'d>) -> Self {
        Self { pin }
    }
}

impl OutputPin for PushPull<'_> {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}

/// Input whose active level is low (buttons pulled up, shorting to ground)
///
/// [`InputPin::is_high`] reports the logical (pressed) state.
pub struct ActiveLowInput<'d> {
    pin: Input<'d>,
}

impl<'d> ActiveLowInput<'d> {
    /// Wrap a configured embassy input
    pub fn new(pin: Input<'d>) -> Self {
        Self { pin }
    }
}

impl InputPin for ActiveLowInput<'_> {
    fn is_high(&self) -> bool {
        self.pin.is_low()
    }
}
