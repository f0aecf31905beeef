//! Line layout
//!
//! The display shows [`LINES`] text lines stacked top to bottom. Each line
//! has a blank gap above it (`upper_indent`) and a height in rows.

use crate::framebuffer::ROWS;

/// Number of text lines
pub const LINES: usize = 4;

/// Tallest line in rows
pub const MAX_LINE_HEIGHT: u8 = 16;

/// Layout errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayoutError {
    /// A line height outside `1..=16`
    LineTooTall,
    /// Lines and gaps exceed the display height
    TooTall,
}

/// Geometry of one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineSpec {
    /// Blank rows above the line
    pub upper_indent: u8,
    /// Line height in rows
    pub height: u8,
}

impl LineSpec {
    /// Create a line geometry
    pub const fn new(upper_indent: u8, height: u8) -> Self {
        Self {
            upper_indent,
            height,
        }
    }
}

/// Validated geometry of all lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineLayout {
    lines: [LineSpec; LINES],
}

impl Default for LineLayout {
    fn default() -> Self {
        Self {
            lines: [LineSpec::new(0, 12); LINES],
        }
    }
}

impl LineLayout {
    /// Validate a layout
    pub fn new(lines: [LineSpec; LINES]) -> Result<Self, LayoutError> {
        let mut total = 0usize;
        for line in &lines {
            if line.height == 0 || line.height > MAX_LINE_HEIGHT {
                return Err(LayoutError::LineTooTall);
            }
            total += line.upper_indent as usize + line.height as usize;
        }
        if total > ROWS {
            return Err(LayoutError::TooTall);
        }
        Ok(Self { lines })
    }

    /// Geometry of one line
    pub fn line(&self, line: usize) -> LineSpec {
        self.lines[line]
    }

    /// First row of a line
    pub fn top_row(&self, line: usize) -> usize {
        let above: usize = self.lines[..line]
            .iter()
            .map(|l| l.upper_indent as usize + l.height as usize)
            .sum();
        above + self.lines[line].upper_indent as usize
    }

    /// Height of a line in rows
    pub fn height(&self, line: usize) -> u8 {
        self.lines[line].height
    }
}
