//! 9-bit serial word bus
//!
//! The UC1601s controller is wired in 3-wire serial mode: every transfer
//! is a 9-bit word whose most significant bit selects data (1) or
//! command (0).

/// Data/command selector bit of a 9-bit word
pub const DATA_BIT: u16 = 0x100;

/// Mask of the bits carried on the wire
pub const WORD_MASK: u16 = 0x1FF;

/// Write-only bus transferring 9-bit words
pub trait WordBus {
    /// Error type for bus operations
    type Error;

    /// Write one word; only the low 9 bits are transmitted
    fn write_word(&mut self, word: u16) -> Result<(), Self::Error>;

    /// Write a command byte (selector bit clear)
    fn write_command(&mut self, command: u8) -> Result<(), Self::Error> {
        self.write_word(command as u16)
    }

    /// Write a data byte (selector bit set)
    fn write_data(&mut self, data: u8) -> Result<(), Self::Error> {
        self.write_word(DATA_BIT | data as u16)
    }
}

/// Serial bus configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WordBusConfig {
    /// Half period of the bit clock in nanoseconds
    pub half_period_ns: u32,
    /// Clock polarity
    pub polarity: Polarity,
}

impl Default for WordBusConfig {
    fn default() -> Self {
        Self {
            half_period_ns: 250, // 2 MHz
            polarity: Polarity::IdleLow,
        }
    }
}

/// Clock polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Clock idles low, data sampled on the rising edge
    IdleLow,
    /// Clock idles high, data sampled on the falling edge
    IdleHigh,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        words: [u16; 4],
        len: usize,
    }

    impl WordBus for Recorder {
        type Error = ();

        fn write_word(&mut self, word: u16) -> Result<(), ()> {
            self.words[self.len] = word & WORD_MASK;
            self.len += 1;
            Ok(())
        }
    }

    #[test]
    fn test_command_and_data_words() {
        let mut bus = Recorder {
            words: [0; 4],
            len: 0,
        };
        bus.write_command(0xAF).unwrap();
        bus.write_data(0x3C).unwrap();

        assert_eq!(&bus.words[..bus.len], &[0x0AF, 0x13C]);
    }
}
