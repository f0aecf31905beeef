//! Blink scheduler
//!
//! Each line may hold one blinking glyph. Its render context is captured
//! when the line is drawn so the glyph alone can be redrawn on every phase
//! change. All lines share one phase.

use crate::layout::LINES;
use crate::line::Format;

/// Default blink period in milliseconds
pub const BLINK_PERIOD_MS: u32 = 1000;

/// Everything needed to redraw one glyph in place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GlyphContext {
    /// Glyph code
    pub code: u8,
    /// Line format, including the hidden phase
    pub format: Format,
    /// First row of the line
    pub row: usize,
    /// Line height in rows
    pub height: u8,
    /// First column of the glyph
    pub column: usize,
}

/// Per-line blink tasks and the shared phase
#[derive(Debug, Clone, Default)]
pub struct Blinker {
    tasks: [Option<GlyphContext>; LINES],
    hidden: bool,
}

impl Blinker {
    /// Create a scheduler without tasks
    pub const fn new() -> Self {
        Self {
            tasks: [None; LINES],
            hidden: false,
        }
    }

    /// Current phase: blinking glyphs are hidden
    pub fn hidden(&self) -> bool {
        self.hidden
    }

    /// Register the blinking glyph of a line, replacing any earlier one
    pub fn install(&mut self, line: usize, context: GlyphContext) {
        if let Some(task) = self.tasks.get_mut(line) {
            *task = Some(context);
        }
    }

    /// Drop the task of a line
    pub fn remove(&mut self, line: usize) {
        if let Some(task) = self.tasks.get_mut(line) {
            *task = None;
        }
    }

    /// Drop every task
    pub fn clear(&mut self) {
        self.tasks = [None; LINES];
    }

    /// True if any line has a blinking glyph
    pub fn is_active(&self) -> bool {
        self.tasks.iter().any(Option::is_some)
    }

    /// Task of one line
    pub fn task(&self, line: usize) -> Option<GlyphContext> {
        self.tasks.get(line).copied().flatten()
    }

    /// Flip the phase and return the contexts to redraw
    pub fn toggle(&mut self) -> [Option<GlyphContext>; LINES] {
        self.hidden = !self.hidden;
        let hidden = self.hidden;
        for context in self.tasks.iter_mut().flatten() {
            context.format = context.format.with_blinked(hidden);
        }
        self.tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(code: u8) -> GlyphContext {
        GlyphContext {
            code,
            format: Format(Format::ALIGN_LEFT),
            row: 12,
            height: 12,
            column: 40,
        }
    }

    #[test]
    fn test_toggle_flips_hidden_flag() {
        let mut blinker = Blinker::new();
        blinker.install(1, context(0x89));
        assert!(blinker.is_active());

        let tasks = blinker.toggle();
        assert!(blinker.hidden());
        assert!(tasks[1].unwrap().format.blinked());
        assert!(tasks[0].is_none());

        let tasks = blinker.toggle();
        assert!(!tasks[1].unwrap().format.blinked());
    }

    #[test]
    fn test_install_replaces_and_remove() {
        let mut blinker = Blinker::new();
        blinker.install(2, context(0x89));
        blinker.install(2, context(0x8A));
        assert_eq!(blinker.task(2).unwrap().code, 0x8A);

        blinker.remove(2);
        assert!(!blinker.is_active());

        // Out of range lines are ignored
        blinker.install(LINES, context(0x89));
        assert!(!blinker.is_active());
    }
}
