//! Bit-banged 9-bit serial bus
//!
//! The STM32F042 SPI peripheral cannot clock 9-bit frames on the pins the
//! LCD is wired to, so the bus is driven from GPIO. Bits go out MSB first;
//! bit 8 selects data or command.

use core::convert::Infallible;

use embassy_stm32::gpio::Output;
use embedded_hal::delay::DelayNs;
use portal_hal::word::{Polarity, WordBusConfig, WORD_MASK};
use portal_hal::WordBus;

/// 9-bit word bus on three GPIO lines
pub struct BitBangBus<'d, D: DelayNs> {
    sck: Output<'d>,
    sda: Output<'d>,
    cs: Output<'d>,
    delay: D,
    config: WordBusConfig,
}

impl<'d, D: DelayNs> BitBangBus<'d, D> {
    /// Create the bus; chip select is released and the clock parked idle
    pub fn new(
        sck: Output<'d>,
        sda: Output<'d>,
        cs: Output<'d>,
        delay: D,
        config: WordBusConfig,
    ) -> Self {
        let mut bus = Self {
            sck,
            sda,
            cs,
            delay,
            config,
        };
        bus.cs.set_high();
        bus.clock_idle();
        bus
    }

    fn clock_idle(&mut self) {
        match self.config.polarity {
            Polarity::IdleLow => self.sck.set_low(),
            Polarity::IdleHigh => self.sck.set_high(),
        }
    }

    fn clock_active(&mut self) {
        match self.config.polarity {
            Polarity::IdleLow => self.sck.set_high(),
            Polarity::IdleHigh => self.sck.set_low(),
        }
    }
}

impl<D: DelayNs> WordBus for BitBangBus<'_, D> {
    type Error = Infallible;

    fn write_word(&mut self, word: u16) -> Result<(), Infallible> {
        let word = word & WORD_MASK;
        let half = self.config.half_period_ns;

        self.cs.set_low();
        for bit in (0..9).rev() {
            if word & (1 << bit) != 0 {
                self.sda.set_high();
            } else {
                self.sda.set_low();
            }
            self.delay.delay_ns(half);
            self.clock_active();
            self.delay.delay_ns(half);
            self.clock_idle();
        }
        self.cs.set_high();
        Ok(())
    }
}
