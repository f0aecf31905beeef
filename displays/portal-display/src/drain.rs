//! Drain loop
//!
//! Streams dirty framebuffer pages to the controller, one column per call,
//! so rendering and serial traffic can interleave with the transfer. Pages
//! are visited round robin; a page is dirty while its version differs from
//! the version last sent.

use crate::backend::{uc1601, Controller};
use crate::framebuffer::{Framebuffer, COLUMNS, PAGES};

/// Result of one drain step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DrainStatus {
    /// The visited page was clean, nothing was sent
    Skipped,
    /// One column was sent, the page is not finished
    Streaming,
    /// The last column of a page was sent
    PageComplete,
}

/// Persistent page/column cursor and the last-sent version table
#[derive(Debug, Clone)]
pub struct Drain {
    page: usize,
    column: usize,
    sent: [u16; PAGES],
    snapshot: u16,
}

impl Default for Drain {
    fn default() -> Self {
        Self::new()
    }
}

impl Drain {
    /// Create a drain that has sent nothing yet
    pub const fn new() -> Self {
        Self {
            // First step advances to page 0
            page: PAGES - 1,
            column: 0,
            sent: [0; PAGES],
            snapshot: 0,
        }
    }

    /// Send at most one column
    pub fn step<C: Controller>(
        &mut self,
        fb: &Framebuffer,
        ctrl: &mut C,
    ) -> Result<DrainStatus, C::Error> {
        if self.column == 0 {
            self.page = (self.page + 1) % PAGES;
            let version = fb.version(self.page);
            if version == self.sent[self.page] {
                return Ok(DrainStatus::Skipped);
            }
            // Writes landing during the transfer leave the page dirty
            self.snapshot = version;
            ctrl.write_command(uc1601::SET_PAGE | self.page as u8)?;
        }

        let column = self.column;
        ctrl.write_command(uc1601::SET_COLUMN_LSB | (column as u8 & 0x0F))?;
        ctrl.write_command(uc1601::SET_COLUMN_MSB | (column >> 4) as u8)?;
        ctrl.write_data(fb.page(self.page)[column])?;
        self.column += 1;

        if self.column < COLUMNS {
            return Ok(DrainStatus::Streaming);
        }
        ctrl.write_command(uc1601::DISPLAY_ON)?;
        self.sent[self.page] = self.snapshot;
        self.column = 0;
        Ok(DrainStatus::PageComplete)
    }

    /// Step until one page completes
    ///
    /// Returns `false` without sending anything if every page is clean.
    pub fn flush_page<C: Controller>(
        &mut self,
        fb: &Framebuffer,
        ctrl: &mut C,
    ) -> Result<bool, C::Error> {
        let mut skipped = 0;
        loop {
            match self.step(fb, ctrl)? {
                DrainStatus::PageComplete => return Ok(true),
                DrainStatus::Streaming => skipped = 0,
                DrainStatus::Skipped => {
                    skipped += 1;
                    if skipped >= PAGES {
                        return Ok(false);
                    }
                }
            }
        }
    }

    /// True if some page differs from what was last sent
    pub fn is_dirty(&self, fb: &Framebuffer) -> bool {
        (0..PAGES).any(|page| fb.version(page) != self.sent[page])
    }

    /// True while a page transfer is in progress
    pub fn in_page(&self) -> bool {
        self.column != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::tests::{Recorder, Sent};

    /// Flush every dirty page, forgetting what was sent
    fn flush_all(drain: &mut Drain, fb: &Framebuffer, ctrl: &mut Recorder) -> usize {
        let mut pages = 0;
        while drain.flush_page(fb, ctrl).unwrap() {
            pages += 1;
            ctrl.sent.clear();
        }
        pages
    }

    #[test]
    fn test_streams_every_page_initially() {
        let fb = Framebuffer::new();
        let mut drain = Drain::new();
        let mut ctrl = Recorder::default();

        assert_eq!(flush_all(&mut drain, &fb, &mut ctrl), PAGES);
        assert!(!drain.is_dirty(&fb));
    }

    #[test]
    fn test_skips_clean_pages_then_streams() {
        let mut fb = Framebuffer::new();
        let mut drain = Drain::new();
        let mut ctrl = Recorder::default();
        flush_all(&mut drain, &fb, &mut ctrl);

        fb.put_raw(0x5A, 3, 7);
        assert!(drain.is_dirty(&fb));

        // Clean pages cost one step and emit nothing
        let mut skipped = 0;
        loop {
            match drain.step(&fb, &mut ctrl).unwrap() {
                DrainStatus::Skipped => skipped += 1,
                DrainStatus::Streaming => break,
                DrainStatus::PageComplete => panic!("page completed in one step"),
            }
        }
        assert!(skipped > 0);
        assert_eq!(ctrl.sent[0], Sent::Command(0xB3));

        let mut steps = 1;
        while drain.step(&fb, &mut ctrl).unwrap() == DrainStatus::Streaming {
            steps += 1;
        }
        assert_eq!(steps + 1, COLUMNS);

        // Page select, then address + data per column, then display on
        assert_eq!(ctrl.sent.len(), 1 + 3 * COLUMNS + 1);
        assert_eq!(&ctrl.sent[1 + 3 * 7..1 + 3 * 8], &[
            Sent::Command(0x07),
            Sent::Command(0x10),
            Sent::Data(0x5A)
        ]);
        assert_eq!(&ctrl.sent[1 + 3 * 127..1 + 3 * 127 + 2], &[
            Sent::Command(0x0F),
            Sent::Command(0x17)
        ]);
        assert_eq!(ctrl.sent.last(), Some(&Sent::Command(0xAF)));
        assert!(!drain.is_dirty(&fb));
    }

    #[test]
    fn test_all_clean_sends_nothing() {
        let fb = Framebuffer::new();
        let mut drain = Drain::new();
        let mut ctrl = Recorder::default();
        flush_all(&mut drain, &fb, &mut ctrl);
        assert!(!drain.flush_page(&fb, &mut ctrl).unwrap());
        assert!(ctrl.sent.is_empty());
    }

    #[test]
    fn test_write_during_transfer_keeps_page_dirty() {
        let mut fb = Framebuffer::new();
        let mut drain = Drain::new();
        let mut ctrl = Recorder::default();

        // Start on page 0 and send a few columns
        for _ in 0..4 {
            assert_eq!(drain.step(&fb, &mut ctrl).unwrap(), DrainStatus::Streaming);
        }
        fb.put_raw(0xFF, 0, 100);
        while drain.step(&fb, &mut ctrl).unwrap() == DrainStatus::Streaming {}
        ctrl.sent.clear();

        // Remaining pages, then page 0 again
        assert_eq!(flush_all(&mut drain, &fb, &mut ctrl), PAGES);
        assert!(!drain.is_dirty(&fb));
    }
}
