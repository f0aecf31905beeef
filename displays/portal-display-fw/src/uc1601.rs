//! UC1601s LCD Driver
//!
//! Drives the 128x48 panel through the 9-bit serial word bus. The panel
//! task streams framebuffer columns through [`Controller`]; display output
//! stays disabled until the first page has been drawn.

use embassy_time::Timer;
use portal_display::backend::uc1601::{DISPLAY_OFF, INIT_SEQUENCE};
use portal_display::Controller;
use portal_hal::{OutputPin, WordBus};

/// Settle time around the reset pulse and after the init sequence
const INIT_DELAY_MS: u64 = 10;

/// UC1601s on a word bus with a hardware reset line
pub struct Uc1601<B, RST> {
    bus: B,
    reset: RST,
}

impl<B, RST> Uc1601<B, RST>
where
    B: WordBus,
    RST: OutputPin,
{
    /// Create the driver; the controller stays in reset until [`init`](Self::init)
    pub fn new(bus: B, mut reset: RST) -> Self {
        reset.set_low();
        Self { bus, reset }
    }

    /// Reset and configure the controller
    pub async fn init(&mut self, contrast: u8) -> Result<(), B::Error> {
        Timer::after_millis(INIT_DELAY_MS).await;
        self.reset.set_low();
        self.reset.set_high();
        Timer::after_millis(INIT_DELAY_MS).await;

        for &command in INIT_SEQUENCE.iter() {
            self.bus.write_command(command)?;
        }
        Timer::after_millis(INIT_DELAY_MS).await;

        self.set_contrast(contrast)?;
        self.bus.write_command(DISPLAY_OFF)
    }
}

impl<B, RST> Controller for Uc1601<B, RST>
where
    B: WordBus,
    RST: OutputPin,
{
    type Error = B::Error;

    fn write_command(&mut self, command: u8) -> Result<(), B::Error> {
        self.bus.write_command(command)
    }

    fn write_data(&mut self, data: u8) -> Result<(), B::Error> {
        self.bus.write_data(data)
    }
}
