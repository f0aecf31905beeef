//! Line renderer
//!
//! Turns 19-byte line descriptions into framebuffer bits. Each line keeps
//! a cache of the content it shows; writing the same content again is a
//! no-op, so the host can refresh lines freely without causing traffic to
//! the controller.

use portal_protocol::{Language, LINE_CONTENT_LEN};

use crate::blink::{Blinker, GlyphContext};
use crate::framebuffer::{Framebuffer, COLUMNS, PAGES};
use crate::glyph::{self, Glyph};
use crate::layout::{LineLayout, LINES};
use crate::line::{self, Alignment, Format};
use crate::qr;

/// Blank columns kept in front of a right icon
pub const RIGHT_ICON_GAP: usize = 3;

/// Content of a line never written
const BLANK_LINE: [u8; LINE_CONTENT_LEN] = {
    let mut content = [b' '; LINE_CONTENT_LEN];
    content[line::FORMAT] = 0;
    content
};

/// Rendering errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderError {
    /// Line index beyond the layout
    InvalidLine,
    /// More than 19 content bytes
    TextTooLong,
    /// Position outside the display
    InvalidOffset,
}

/// Framebuffer plus everything needed to draw lines into it
#[derive(Debug, Clone)]
pub struct Screen {
    fb: Framebuffer,
    layout: LineLayout,
    language: Language,
    cache: [Option<[u8; LINE_CONTENT_LEN]>; LINES],
    blinker: Blinker,
    qr_shown: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new(LineLayout::default(), Language::default())
    }
}

impl Screen {
    /// Create a blank screen
    pub fn new(layout: LineLayout, language: Language) -> Self {
        Self {
            fb: Framebuffer::new(),
            layout,
            language,
            cache: [None; LINES],
            blinker: Blinker::new(),
            qr_shown: false,
        }
    }

    /// Framebuffer to drain
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }

    /// Line geometry in use
    pub fn layout(&self) -> &LineLayout {
        &self.layout
    }

    /// Glyph set in use
    pub fn language(&self) -> Language {
        self.language
    }

    /// Blink tasks and phase
    pub fn blinker(&self) -> &Blinker {
        &self.blinker
    }

    /// Content currently shown on a line
    pub fn line(&self, line: usize) -> Option<&[u8; LINE_CONTENT_LEN]> {
        self.cache.get(line).and_then(Option::as_ref)
    }

    /// True while a QR code occupies the display
    pub fn qr_shown(&self) -> bool {
        self.qr_shown
    }

    /// Update the leading bytes of a line and redraw it if they changed
    ///
    /// Bytes beyond `text` keep their previous value. Nothing is touched if
    /// the line index or length is out of range.
    pub fn put_line(&mut self, text: &[u8], line: usize) -> Result<(), RenderError> {
        if line >= LINES {
            return Err(RenderError::InvalidLine);
        }
        if text.len() > LINE_CONTENT_LEN {
            return Err(RenderError::TextTooLong);
        }
        if text.is_empty() {
            return Ok(());
        }

        let mut content = self.cache[line].unwrap_or(BLANK_LINE);
        if self.cache[line].is_some() && content[..text.len()] == *text {
            return Ok(());
        }
        content[..text.len()].copy_from_slice(text);

        if self.qr_shown {
            self.fb.clear();
            self.qr_shown = false;
        }
        self.cache[line] = Some(content);
        self.render_line(line, &content, false);
        Ok(())
    }

    /// Select the glyph set and redraw every line shown
    pub fn set_language(&mut self, language: Language) {
        if language == self.language {
            return;
        }
        self.language = language;
        for line in 0..LINES {
            if let Some(content) = self.cache[line] {
                self.render_line(line, &content, false);
            }
        }
    }

    /// Blank the display and forget every line and blink task
    pub fn clear(&mut self) {
        self.fb.clear();
        self.cache = [None; LINES];
        self.blinker.clear();
        self.qr_shown = false;
    }

    /// Flip the blink phase and redraw the blinking glyphs
    pub fn blink_tick(&mut self) {
        let tasks = self.blinker.toggle();
        for context in tasks.into_iter().flatten() {
            self.stuff_char(context, COLUMNS);
        }
    }

    /// Write one page byte directly
    pub fn put_raw(&mut self, byte: u8, page: usize, column: usize) -> Result<(), RenderError> {
        if self.fb.put_raw(byte, page, column) {
            Ok(())
        } else {
            Err(RenderError::InvalidOffset)
        }
    }

    /// Draw a QR code at `offset`, XOR-ed with `contrast`
    ///
    /// Unknown versions fall back to the default one. The code stays until
    /// the next line content arrives.
    pub fn put_qr(&mut self, version: u8, offset: usize, contrast: u8) -> Result<(), RenderError> {
        if offset + qr::QR_COLUMNS > COLUMNS {
            return Err(RenderError::InvalidOffset);
        }
        let table = qr::table(version);
        for (page, row) in table.iter().enumerate().take(PAGES) {
            for (i, &byte) in row.iter().enumerate() {
                self.fb.put_raw(byte ^ contrast, page, offset + i);
            }
        }
        self.cache = [None; LINES];
        self.blinker.clear();
        self.qr_shown = true;
        Ok(())
    }

    /// Draw a complete line
    ///
    /// `internal` redraws leave the blink tasks alone.
    pub fn render_line(&mut self, line: usize, content: &[u8; LINE_CONTENT_LEN], internal: bool) {
        if line >= LINES {
            return;
        }
        let row = self.layout.top_row(line);
        let height = self.layout.height(line);
        let plain = GlyphContext {
            code: 0,
            format: Format(0),
            row,
            height,
            column: 0,
        };

        let mut left_border = 0;
        let mut right_border = COLUMNS;

        // Icons are drawn without the line's inversion
        if content[line::LEFT_ICON] != b' ' {
            let context = GlyphContext {
                code: content[line::LEFT_ICON],
                ..plain
            };
            left_border = self.stuff_char(context, right_border) as usize;
        }

        let right_icon = content[line::RIGHT_ICON];
        if glyph::is_icon(right_icon) {
            let column = COLUMNS - self.glyph(right_icon).drawn_width() as usize;
            right_border = column.saturating_sub(RIGHT_ICON_GAP);
            for gap in right_border..column {
                self.fill_column(row, height, 0, gap);
            }
            let context = GlyphContext {
                code: right_icon,
                column,
                ..plain
            };
            self.stuff_char(context, COLUMNS);
        }

        let format = Format(content[line::FORMAT]).with_blinked(self.blinker.hidden());
        let inversion = format.inversion_mask();
        let text = &content[line::TEXT];

        let slack = right_border
            .saturating_sub(left_border)
            .saturating_sub(self.measure(text));
        // Right and center alignment use the exact slack, without a shift compensation
        let start = match format.alignment() {
            Alignment::Left => left_border,
            Alignment::Right => left_border + slack,
            Alignment::Center => left_border + slack / 2,
        };
        for column in left_border..start {
            self.fill_column(row, height, inversion, column);
        }

        let mut column = start;
        let mut blinking = false;
        for &code in text {
            if column < right_border {
                self.fill_column(row, height, inversion, column);
            }
            column += 1;

            let context = GlyphContext {
                code,
                format,
                row,
                height,
                column,
            };
            let glyph = self.glyph(code);
            if !internal && glyph.width() > 0 && glyph.blinking {
                self.blinker.install(line, context);
                blinking = true;
            }

            // A glyph that does not fit ends the text; padding starts here
            let next = column + self.stuff_char(context, right_border) as usize;
            if next > right_border {
                break;
            }
            column = next;
            if column >= right_border {
                break;
            }
        }
        for column in column..right_border {
            self.fill_column(row, height, inversion, column);
        }

        if !internal && !blinking {
            self.blinker.remove(line);
        }
    }

    /// Draw one glyph; returns its width whether it fit or not
    ///
    /// A glyph that would cross `max_column` is not drawn at all.
    pub fn stuff_char(&mut self, context: GlyphContext, max_column: usize) -> u8 {
        let glyph = self.glyph(context.code);
        let icon = glyph::is_icon(context.code);
        let (first, end) = if icon {
            glyph.borders()
        } else {
            (0, glyph.width())
        };
        let width = end - first;
        if context.column + width as usize > max_column {
            return width;
        }

        let hidden = icon && context.format.blinked() && glyph.width() > 0 && glyph.blinking;
        let inversion = context.format.inversion_mask();
        let shift = context.height.saturating_sub(8) / 2;
        let columns = &glyph.columns[first as usize..end as usize];
        for (i, &bits) in columns.iter().enumerate() {
            let bits = if hidden { 0 } else { bits };
            self.fb.write_bits(
                inversion ^ ((bits as u16) << shift),
                context.row,
                context.height,
                context.column + i,
            );
        }
        width
    }

    /// Columns a text run occupies, trailing spaces excluded
    fn measure(&self, text: &[u8]) -> usize {
        let mut total = 0;
        let mut trailing = 0;
        for &code in text {
            let glyph = self.glyph(code);
            if glyph::is_icon(code) {
                total += glyph.drawn_width() as usize + 1;
                trailing = 0;
            } else if code == b' ' {
                total += glyph.width() as usize;
                trailing += glyph.width() as usize;
            } else {
                total += glyph.width() as usize + 1;
                trailing = 0;
            }
        }
        total - trailing
    }

    fn fill_column(&mut self, row: usize, height: u8, value: u16, column: usize) {
        self.fb.write_bits(value, row, height, column);
    }

    fn glyph(&self, code: u8) -> Glyph {
        glyph::lookup(code, self.language)
    }
}
