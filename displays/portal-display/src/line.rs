//! Line content format
//!
//! A line is described by 19 bytes:
//!
//! ```text
//! [0]      left icon (space for none)
//! [1]      format byte
//! [2..18]  16 glyph codes
//! [18]     right icon (codes >= 0x80 only)
//! ```

use portal_protocol::LINE_CONTENT_LEN;

/// Index of the left icon
pub const LEFT_ICON: usize = 0;

/// Index of the format byte
pub const FORMAT: usize = 1;

/// Range of the glyph codes
pub const TEXT: core::ops::Range<usize> = 2..LINE_CONTENT_LEN - 1;

/// Index of the right icon
pub const RIGHT_ICON: usize = LINE_CONTENT_LEN - 1;

/// Format byte flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Format(pub u8);

impl Format {
    /// Light text on a dark line
    pub const INVERTED: u8 = 0x01;
    /// Left alignment
    pub const ALIGN_LEFT: u8 = 0x02;
    /// Right alignment
    pub const ALIGN_RIGHT: u8 = 0x04;
    /// Centered (both alignment bits)
    pub const ALIGN_CENTER: u8 = 0x06;
    /// Blinking glyphs are in their hidden phase
    pub const BLINKED: u8 = 0x80;

    const ALIGN_MASK: u8 = 0x06;

    /// Line is inverted
    pub fn inverted(self) -> bool {
        self.0 & Self::INVERTED != 0
    }

    /// Blinking glyphs are hidden
    pub fn blinked(self) -> bool {
        self.0 & Self::BLINKED != 0
    }

    /// Same flags with the hidden phase set or cleared
    pub fn with_blinked(self, hidden: bool) -> Self {
        if hidden {
            Format(self.0 | Self::BLINKED)
        } else {
            Format(self.0 & !Self::BLINKED)
        }
    }

    /// Horizontal alignment; no alignment bits means left
    pub fn alignment(self) -> Alignment {
        match self.0 & Self::ALIGN_MASK {
            Self::ALIGN_RIGHT => Alignment::Right,
            Self::ALIGN_CENTER => Alignment::Center,
            _ => Alignment::Left,
        }
    }

    /// Column fill for this line: all rows set when inverted
    pub fn inversion_mask(self) -> u16 {
        if self.inverted() {
            0xFFFF
        } else {
            0
        }
    }
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alignment {
    Left,
    Right,
    Center,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_bits() {
        assert_eq!(Format(0).alignment(), Alignment::Left);
        assert_eq!(Format(0x02).alignment(), Alignment::Left);
        assert_eq!(Format(0x04).alignment(), Alignment::Right);
        assert_eq!(Format(0x06).alignment(), Alignment::Center);
        assert_eq!(Format(0x87).alignment(), Alignment::Center);
    }

    #[test]
    fn test_inversion_and_blink() {
        let format = Format(Format::INVERTED | Format::ALIGN_RIGHT);
        assert_eq!(format.inversion_mask(), 0xFFFF);
        assert!(!format.blinked());
        assert!(format.with_blinked(true).blinked());
        assert_eq!(format.with_blinked(true).with_blinked(false), format);
        assert_eq!(Format(0).inversion_mask(), 0);
    }

    #[test]
    fn test_content_layout() {
        assert_eq!(TEXT.len(), 16);
        assert_eq!(RIGHT_ICON, 18);
    }
}
