//! Paged framebuffer
//!
//! The LCD memory is organised in pages of 8 rows; one byte covers one
//! column of one page. Glyphs are taller than a page and start at arbitrary
//! rows, so writes go through a carry-based bit packer that splits a value
//! at page boundaries.

/// Number of 8-row pages
pub const PAGES: usize = 6;

/// Number of pixel columns
pub const COLUMNS: usize = 128;

/// Number of pixel rows
pub const ROWS: usize = PAGES * 8;

/// Widest value accepted by [`Framebuffer::write_bits`]
pub const MAX_WRITE_WIDTH: u8 = 16;

/// Masked write into a single page byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PageWrite {
    /// Target page
    pub page: usize,
    /// Bits of the page byte being replaced
    pub mask: u8,
    /// New values of the masked bits
    pub bits: u8,
}

/// Remaining part of a column value still to be written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Carry {
    value: u16,
    row: usize,
    remaining: u8,
}

impl Carry {
    /// Start packing the low `width` bits of `value` at absolute `row`
    pub const fn new(value: u16, row: usize, width: u8) -> Self {
        Self {
            value,
            row,
            remaining: width,
        }
    }

    /// Split off the part that lands in the current page
    ///
    /// Returns `None` once every bit has been emitted.
    pub fn step(self) -> Option<(PageWrite, Carry)> {
        if self.remaining == 0 {
            return None;
        }
        let offset = (self.row % 8) as u8;
        let take = (8 - offset).min(self.remaining);
        let low = ((1u16 << take) - 1) as u8;

        let write = PageWrite {
            page: self.row / 8,
            mask: low << offset,
            bits: ((self.value as u8) & low) << offset,
        };
        let rest = Carry {
            value: self.value >> take,
            row: self.row + take as usize,
            remaining: self.remaining - take,
        };
        Some((write, rest))
    }
}

/// Monochrome framebuffer with per-page versions
#[derive(Debug, Clone)]
pub struct Framebuffer {
    pages: [[u8; COLUMNS]; PAGES],
    versions: [u16; PAGES],
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framebuffer {
    /// Create a blank framebuffer; every page starts dirty
    pub const fn new() -> Self {
        Self {
            pages: [[0; COLUMNS]; PAGES],
            versions: [1; PAGES],
        }
    }

    /// Write the low `width` bits of `value` into `column`, starting at `row`
    ///
    /// Bit 0 of `value` lands on `row`, higher bits below it. Bits falling
    /// past the last page are dropped, as are writes with a width outside
    /// `1..=16` or a column beyond the display. Each page touched gets its
    /// version bumped once.
    pub fn write_bits(&mut self, value: u16, row: usize, width: u8, column: usize) {
        if width == 0 || width > MAX_WRITE_WIDTH || column >= COLUMNS {
            return;
        }
        let mut carry = Carry::new(value, row, width);
        while let Some((write, rest)) = carry.step() {
            if write.page >= PAGES {
                break;
            }
            let byte = &mut self.pages[write.page][column];
            *byte &= !write.mask;
            *byte ^= write.bits;
            self.versions[write.page] = self.versions[write.page].wrapping_add(1);
            carry = rest;
        }
    }

    /// Overwrite a whole page byte
    pub fn put_raw(&mut self, byte: u8, page: usize, column: usize) -> bool {
        if page >= PAGES || column >= COLUMNS {
            return false;
        }
        self.pages[page][column] = byte;
        self.versions[page] = self.versions[page].wrapping_add(1);
        true
    }

    /// Blank every page
    pub fn clear(&mut self) {
        for (page, version) in self.pages.iter_mut().zip(self.versions.iter_mut()) {
            page.fill(0);
            *version = version.wrapping_add(1);
        }
    }

    /// Column bytes of one page
    pub fn page(&self, page: usize) -> &[u8; COLUMNS] {
        &self.pages[page]
    }

    /// Version of one page
    pub fn version(&self, page: usize) -> u16 {
        self.versions[page]
    }

    /// Read one pixel
    pub fn pixel(&self, column: usize, row: usize) -> bool {
        if column >= COLUMNS || row >= ROWS {
            return false;
        }
        self.pages[row / 8][column] & (1 << (row % 8)) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_carry_splits_at_page_boundary() {
        let (first, rest) = Carry::new(0b1111, 6, 4).step().unwrap();
        assert_eq!(
            first,
            PageWrite {
                page: 0,
                mask: 0b1100_0000,
                bits: 0b1100_0000
            }
        );
        let (second, rest) = rest.step().unwrap();
        assert_eq!(
            second,
            PageWrite {
                page: 1,
                mask: 0b0000_0011,
                bits: 0b0000_0011
            }
        );
        assert!(rest.step().is_none());
    }

    #[test]
    fn test_write_straddling_pages() {
        let mut fb = Framebuffer::new();
        fb.pages[0][10] = 0b0011_1111;
        fb.pages[1][10] = 0b1111_1100;
        let before = [fb.version(0), fb.version(1), fb.version(2)];

        fb.write_bits(0b0101, 6, 4, 10);

        // Only rows 6-7 of page 0 and rows 0-1 of page 1 change
        assert_eq!(fb.page(0)[10], 0b0111_1111);
        assert_eq!(fb.page(1)[10], 0b1111_1101);
        assert_eq!(fb.version(0), before[0].wrapping_add(1));
        assert_eq!(fb.version(1), before[1].wrapping_add(1));
        assert_eq!(fb.version(2), before[2]);
    }

    #[test]
    fn test_wide_write_bumps_each_page_once() {
        let mut fb = Framebuffer::new();
        fb.write_bits(0xFFFF, 4, 16, 0);
        // Rows 4..20 touch pages 0, 1 and 2
        assert_eq!(fb.version(0), 2);
        assert_eq!(fb.version(1), 2);
        assert_eq!(fb.version(2), 2);
        assert_eq!(fb.version(3), 1);
        assert_eq!(fb.page(1)[0], 0xFF);
        assert_eq!(fb.page(2)[0], 0x0F);
    }

    #[test]
    fn test_bits_past_last_page_dropped() {
        let mut fb = Framebuffer::new();
        fb.write_bits(0xFFFF, ROWS - 2, 16, 127);
        assert_eq!(fb.page(PAGES - 1)[127], 0b1100_0000);
        assert!(fb.pixel(127, ROWS - 1));

        let snapshot = fb.clone();
        fb.write_bits(0xFFFF, ROWS, 8, 0);
        fb.write_bits(0xFFFF, 0, 8, COLUMNS);
        fb.write_bits(0xFFFF, 0, 17, 0);
        assert_eq!(fb.pages, snapshot.pages);
        assert_eq!(fb.versions, snapshot.versions);
    }

    #[test]
    fn test_version_wraps() {
        let mut fb = Framebuffer::new();
        fb.versions[3] = u16::MAX;
        fb.put_raw(0xAA, 3, 5);
        assert_eq!(fb.version(3), 0);
        assert!(!fb.put_raw(0xAA, PAGES, 0));
    }

    #[test]
    fn test_clear() {
        let mut fb = Framebuffer::new();
        fb.write_bits(0x0FFF, 0, 12, 3);
        fb.clear();
        assert!(fb.pages.iter().all(|p| p.iter().all(|&b| b == 0)));
        assert!(fb.versions.iter().all(|&v| v >= 2));
    }

    proptest! {
        #[test]
        fn test_write_matches_pixels(value in any::<u16>(), row in 0usize..ROWS, width in 1u8..=16, column in 0usize..COLUMNS) {
            let mut fb = Framebuffer::new();
            // Fill first so cleared bits are checked too
            for page in 0..PAGES {
                fb.pages[page][column] = 0xA5;
            }
            let before = fb.clone();
            fb.write_bits(value, row, width, column);

            for r in 0..ROWS {
                let expected = if r >= row && r < row + width as usize {
                    value & (1 << (r - row)) != 0
                } else {
                    before.pixel(column, r)
                };
                prop_assert_eq!(fb.pixel(column, r), expected);
            }
        }
    }
}
