//! Glyph tables
//!
//! Codes `0x20..=0x7E` are a 5-column ASCII font (space is 3 columns).
//! Codes `0x01..=0x08` depend on the selected [`Language`]. Codes from
//! `0x80` up are icons of up to 16 columns, padded with blank columns
//! that the renderer trims away unless the icon is marked otherwise.
//! Every other code renders as nothing.
//!
//! Column bytes carry 8 rows, bit 0 on top.

use portal_protocol::Language;

/// First icon code
pub const FIRST_ICON: u8 = 0x80;

/// Widest glyph in columns
pub const MAX_GLYPH_WIDTH: usize = 16;

/// One character or icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Glyph {
    /// Column bitmaps, left to right
    pub columns: &'static [u8],
    /// Toggled by the blink scheduler
    pub blinking: bool,
    /// Blank edge columns are skipped when rendering
    pub trimmable: bool,
}

impl Glyph {
    /// Glyph without columns
    pub const EMPTY: Glyph = Glyph::text(&[]);

    const fn text(columns: &'static [u8]) -> Self {
        Self {
            columns,
            blinking: false,
            trimmable: false,
        }
    }

    const fn icon(columns: &'static [u8]) -> Self {
        Self {
            columns,
            blinking: false,
            trimmable: true,
        }
    }

    const fn blinking_icon(columns: &'static [u8]) -> Self {
        Self {
            columns,
            blinking: true,
            trimmable: true,
        }
    }

    /// Untrimmed width in columns
    pub fn width(&self) -> u8 {
        self.columns.len() as u8
    }

    /// Column range actually drawn, as `(first, end)`
    ///
    /// Leading and trailing blank columns are cut independently. A
    /// trimmable glyph that is blank throughout keeps its full width.
    pub fn borders(&self) -> (u8, u8) {
        let width = self.width();
        if !self.trimmable {
            return (0, width);
        }
        let first = self.columns.iter().position(|&c| c != 0);
        let last = self.columns.iter().rposition(|&c| c != 0);
        match (first, last) {
            (Some(first), Some(last)) => (first as u8, last as u8 + 1),
            _ => (0, width),
        }
    }

    /// Width after trimming
    pub fn drawn_width(&self) -> u8 {
        let (first, end) = self.borders();
        end - first
    }
}

/// True for codes rendered as icons
pub const fn is_icon(code: u8) -> bool {
    code >= FIRST_ICON
}

/// Look up the glyph for `code` in the given language
pub fn lookup(code: u8, language: Language) -> Glyph {
    match code {
        0x01..=0x08 => language_glyph(code, language).map_or(Glyph::EMPTY, Glyph::text),
        b' ' => Glyph::text(SPACE),
        0x21..=0x7E => Glyph::text(&ASCII[(code - 0x20) as usize]),
        FIRST_ICON..=0xFF => icon(code),
        _ => Glyph::EMPTY,
    }
}

fn language_glyph(code: u8, language: Language) -> Option<&'static [u8]> {
    use Language::*;

    let columns = match (code, language) {
        (0x01, _) => UP,
        (0x02, _) => DOWN,
        (0x03, German | Swedish) => A_UMLAUT,
        (0x04, German | Swedish) => O_UMLAUT,
        (0x05, German) => U_UMLAUT,
        (0x06, German) => SHARP_S,
        (0x07, Swedish) => A_RING,
        (0x03, French | Spanish) => E_ACUTE,
        (0x04, French | Italian) => E_GRAVE,
        (0x05, French) => E_CIRCUMFLEX,
        (0x04, Spanish) => INVERTED_QUESTION,
        (0x05, Spanish) => INVERTED_EXCLAMATION,
        (0x06, Spanish) => N_TILDE,
        (0x07, Spanish) => A_ACUTE,
        (0x08, Spanish) => U_ACUTE,
        (0x05, Italian) => U_GRAVE,
        (0x06, Italian) => A_GRAVE,
        _ => return None,
    };
    Some(columns)
}

fn icon(code: u8) -> Glyph {
    match code {
        0x80 => Glyph::icon(ARROW_UP),
        0x81 => Glyph::icon(ARROW_DOWN),
        0x82 => Glyph::icon(ARROW_LEFT),
        0x83 => Glyph::icon(ARROW_RIGHT),
        0x84 => Glyph::icon(GATE_OPEN),
        0x85 => Glyph::icon(GATE_CLOSED),
        0x86 => Glyph::icon(STOP),
        0x87 => Glyph::icon(LOCK),
        0x88 => Glyph::icon(BELL),
        0x89 => Glyph::blinking_icon(WARNING),
        0x8A => Glyph::blinking_icon(CURSOR),
        0x8B => Glyph::icon(CHECK),
        0x8C => Glyph::icon(CROSS),
        // Placeholder keeping a fixed gap
        0x8D => Glyph::text(BLANK),
        _ => Glyph::EMPTY,
    }
}

const SPACE: &[u8] = &[0x00, 0x00, 0x00];

#[rustfmt::skip]
static ASCII: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // '!'
    [0x00, 0x07, 0x00, 0x07, 0x00], // '"'
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // '#'
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // '$'
    [0x23, 0x13, 0x08, 0x64, 0x62], // '%'
    [0x36, 0x49, 0x55, 0x22, 0x50], // '&'
    [0x00, 0x05, 0x03, 0x00, 0x00], // "'"
    [0x00, 0x1C, 0x22, 0x41, 0x00], // '('
    [0x00, 0x41, 0x22, 0x1C, 0x00], // ')'
    [0x14, 0x08, 0x3E, 0x08, 0x14], // '*'
    [0x08, 0x08, 0x3E, 0x08, 0x08], // '+'
    [0x00, 0x50, 0x30, 0x00, 0x00], // ','
    [0x08, 0x08, 0x08, 0x08, 0x08], // '-'
    [0x00, 0x60, 0x60, 0x00, 0x00], // '.'
    [0x20, 0x10, 0x08, 0x04, 0x02], // '/'
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // '0'
    [0x00, 0x42, 0x7F, 0x40, 0x00], // '1'
    [0x42, 0x61, 0x51, 0x49, 0x46], // '2'
    [0x21, 0x41, 0x45, 0x4B, 0x31], // '3'
    [0x18, 0x14, 0x12, 0x7F, 0x10], // '4'
    [0x27, 0x45, 0x45, 0x45, 0x39], // '5'
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // '6'
    [0x01, 0x71, 0x09, 0x05, 0x03], // '7'
    [0x36, 0x49, 0x49, 0x49, 0x36], // '8'
    [0x06, 0x49, 0x49, 0x29, 0x1E], // '9'
    [0x00, 0x36, 0x36, 0x00, 0x00], // ':'
    [0x00, 0x56, 0x36, 0x00, 0x00], // ';'
    [0x08, 0x14, 0x22, 0x41, 0x00], // '<'
    [0x14, 0x14, 0x14, 0x14, 0x14], // '='
    [0x00, 0x41, 0x22, 0x14, 0x08], // '>'
    [0x02, 0x01, 0x51, 0x09, 0x06], // '?'
    [0x32, 0x49, 0x79, 0x41, 0x3E], // '@'
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // 'A'
    [0x7F, 0x49, 0x49, 0x49, 0x36], // 'B'
    [0x3E, 0x41, 0x41, 0x41, 0x22], // 'C'
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // 'D'
    [0x7F, 0x49, 0x49, 0x49, 0x41], // 'E'
    [0x7F, 0x09, 0x09, 0x09, 0x01], // 'F'
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // 'G'
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // 'H'
    [0x00, 0x41, 0x7F, 0x41, 0x00], // 'I'
    [0x20, 0x40, 0x41, 0x3F, 0x01], // 'J'
    [0x7F, 0x08, 0x14, 0x22, 0x41], // 'K'
    [0x7F, 0x40, 0x40, 0x40, 0x40], // 'L'
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // 'M'
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // 'N'
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // 'O'
    [0x7F, 0x09, 0x09, 0x09, 0x06], // 'P'
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // 'Q'
    [0x7F, 0x09, 0x19, 0x29, 0x46], // 'R'
    [0x46, 0x49, 0x49, 0x49, 0x31], // 'S'
    [0x01, 0x01, 0x7F, 0x01, 0x01], // 'T'
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // 'U'
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // 'V'
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // 'W'
    [0x63, 0x14, 0x08, 0x14, 0x63], // 'X'
    [0x07, 0x08, 0x70, 0x08, 0x07], // 'Y'
    [0x61, 0x51, 0x49, 0x45, 0x43], // 'Z'
    [0x00, 0x7F, 0x41, 0x41, 0x00], // '['
    [0x02, 0x04, 0x08, 0x10, 0x20], // '\\'
    [0x00, 0x41, 0x41, 0x7F, 0x00], // ']'
    [0x04, 0x02, 0x01, 0x02, 0x04], // '^'
    [0x40, 0x40, 0x40, 0x40, 0x40], // '_'
    [0x00, 0x01, 0x02, 0x04, 0x00], // '`'
    [0x20, 0x54, 0x54, 0x54, 0x78], // 'a'
    [0x7F, 0x48, 0x44, 0x44, 0x38], // 'b'
    [0x38, 0x44, 0x44, 0x44, 0x20], // 'c'
    [0x38, 0x44, 0x44, 0x48, 0x7F], // 'd'
    [0x38, 0x54, 0x54, 0x54, 0x18], // 'e'
    [0x08, 0x7E, 0x09, 0x01, 0x02], // 'f'
    [0x0C, 0x52, 0x52, 0x52, 0x3E], // 'g'
    [0x7F, 0x08, 0x04, 0x04, 0x78], // 'h'
    [0x00, 0x44, 0x7D, 0x40, 0x00], // 'i'
    [0x20, 0x40, 0x44, 0x3D, 0x00], // 'j'
    [0x7F, 0x10, 0x28, 0x44, 0x00], // 'k'
    [0x00, 0x41, 0x7F, 0x40, 0x00], // 'l'
    [0x7C, 0x04, 0x18, 0x04, 0x78], // 'm'
    [0x7C, 0x08, 0x04, 0x04, 0x78], // 'n'
    [0x38, 0x44, 0x44, 0x44, 0x38], // 'o'
    [0x7C, 0x14, 0x14, 0x14, 0x08], // 'p'
    [0x08, 0x14, 0x14, 0x18, 0x7C], // 'q'
    [0x7C, 0x08, 0x04, 0x04, 0x08], // 'r'
    [0x48, 0x54, 0x54, 0x54, 0x20], // 's'
    [0x04, 0x3F, 0x44, 0x40, 0x20], // 't'
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // 'u'
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // 'v'
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // 'w'
    [0x44, 0x28, 0x10, 0x28, 0x44], // 'x'
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // 'y'
    [0x44, 0x64, 0x54, 0x4C, 0x44], // 'z'
    [0x00, 0x08, 0x36, 0x41, 0x00], // '{'
    [0x00, 0x00, 0x7F, 0x00, 0x00], // '|'
    [0x00, 0x41, 0x36, 0x08, 0x00], // '}'
    [0x10, 0x08, 0x08, 0x10, 0x08], // '~'
];

// Language specific letters: capital shifted down one row, accent on top
const UP: &[u8] = &[0x04, 0x02, 0x7F, 0x02, 0x04];
const DOWN: &[u8] = &[0x10, 0x20, 0x7F, 0x20, 0x10];
const A_UMLAUT: &[u8] = &[0xFC, 0x23, 0x22, 0x23, 0xFC];
const O_UMLAUT: &[u8] = &[0x7C, 0x83, 0x82, 0x83, 0x7C];
const U_UMLAUT: &[u8] = &[0x7E, 0x81, 0x80, 0x81, 0x7E];
const SHARP_S: &[u8] = &[0x7E, 0x01, 0x49, 0x56, 0x20];
const A_RING: &[u8] = &[0xFC, 0x22, 0x23, 0x22, 0xFC];
const A_ACUTE: &[u8] = &[0xFC, 0x22, 0x22, 0x23, 0xFD];
const A_GRAVE: &[u8] = &[0xFD, 0x23, 0x22, 0x22, 0xFC];
const E_ACUTE: &[u8] = &[0xFE, 0x92, 0x92, 0x93, 0x83];
const E_GRAVE: &[u8] = &[0xFF, 0x93, 0x92, 0x92, 0x82];
const E_CIRCUMFLEX: &[u8] = &[0xFE, 0x93, 0x93, 0x93, 0x82];
const U_ACUTE: &[u8] = &[0x7E, 0x80, 0x80, 0x81, 0x7F];
const U_GRAVE: &[u8] = &[0x7F, 0x81, 0x80, 0x80, 0x7E];
const N_TILDE: &[u8] = &[0xFF, 0x09, 0x10, 0x21, 0xFF];
const INVERTED_QUESTION: &[u8] = &[0x30, 0x48, 0x45, 0x40, 0x20];
const INVERTED_EXCLAMATION: &[u8] = &[0x00, 0x00, 0x7D, 0x00, 0x00];

// Icons
const ARROW_UP: &[u8] = &[0x00, 0x10, 0x18, 0xFC, 0xFE, 0xFC, 0x18, 0x10, 0x00];
const ARROW_DOWN: &[u8] = &[0x00, 0x08, 0x18, 0x3F, 0x7F, 0x3F, 0x18, 0x08, 0x00];
const ARROW_LEFT: &[u8] = &[0x00, 0x08, 0x1C, 0x3E, 0x7F, 0x1C, 0x1C, 0x1C, 0x1C, 0x00];
const ARROW_RIGHT: &[u8] = &[0x00, 0x1C, 0x1C, 0x1C, 0x1C, 0x7F, 0x3E, 0x1C, 0x08, 0x00];
const GATE_OPEN: &[u8] = &[0x00, 0xFF, 0x54, 0x28, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x28, 0x54, 0xFF, 0x00];
const GATE_CLOSED: &[u8] = &[0x00, 0xFF, 0x54, 0x7C, 0x54, 0x7C, 0x54, 0x54, 0x7C, 0x54, 0x7C, 0x54, 0xFF, 0x00];
const STOP: &[u8] = &[0x00, 0x3C, 0x7E, 0xFF, 0xFF, 0xFF, 0xFF, 0x7E, 0x3C, 0x00];
const LOCK: &[u8] = &[0x00, 0x78, 0x7E, 0x79, 0x49, 0x79, 0x7E, 0x78, 0x00];
const BELL: &[u8] = &[0x00, 0x20, 0x3C, 0x3E, 0x7F, 0x3E, 0x3C, 0x20, 0x00];
const WARNING: &[u8] = &[0x00, 0x80, 0xE0, 0xF8, 0xFE, 0xA5, 0xFE, 0xF8, 0xE0, 0x80, 0x00];
const CURSOR: &[u8] = &[0xC0, 0xC0, 0xC0, 0xC0, 0xC0, 0xC0, 0x00, 0x00];
const CHECK: &[u8] = &[0x00, 0x30, 0x60, 0xC0, 0x60, 0x30, 0x18, 0x0C, 0x06, 0x00];
const CROSS: &[u8] = &[0x00, 0x63, 0x36, 0x1C, 0x08, 0x1C, 0x36, 0x63, 0x00];
const BLANK: &[u8] = &[0x00; 8];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_lookup() {
        let a = lookup(b'A', Language::English);
        assert_eq!(a.columns, &[0x7E, 0x11, 0x11, 0x11, 0x7E]);
        assert!(!a.blinking);
        assert_eq!(lookup(b' ', Language::English).width(), 3);
        assert_eq!(lookup(b'\\', Language::English).width(), 5);
        assert_eq!(lookup(0x7F, Language::English).width(), 0);
        assert_eq!(lookup(0x00, Language::English).width(), 0);
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(lookup(0x03, Language::German).columns, A_UMLAUT);
        assert_eq!(lookup(0x03, Language::French).columns, E_ACUTE);
        assert_eq!(lookup(0x07, Language::Swedish).columns, A_RING);
        assert_eq!(lookup(0x08, Language::Spanish).columns, U_ACUTE);
        assert_eq!(lookup(0x03, Language::English).width(), 0);
        // Arrows are shared by every language
        assert_eq!(lookup(0x01, Language::Dutch).columns, UP);
        assert_eq!(lookup(0x02, Language::Italian).columns, DOWN);
    }

    #[test]
    fn test_icon_trimming() {
        let stop = lookup(0x86, Language::English);
        assert_eq!(stop.width(), 10);
        assert_eq!(stop.borders(), (1, 9));
        assert_eq!(stop.drawn_width(), 8);

        // Leading and trailing blanks trimmed independently
        let cursor = lookup(0x8A, Language::English);
        assert!(cursor.blinking);
        assert_eq!(cursor.borders(), (0, 6));

        let blank = lookup(0x8D, Language::English);
        assert_eq!(blank.borders(), (0, 8));
    }

    #[test]
    fn test_undefined_icons_empty() {
        for code in 0x8Eu8..=0xFF {
            let glyph = lookup(code, Language::English);
            assert_eq!(glyph.width(), 0);
            assert_eq!(glyph.drawn_width(), 0);
        }
    }

    #[test]
    fn test_glyph_widths_bounded() {
        for code in 0u8..=0xFF {
            assert!(lookup(code, Language::Spanish).columns.len() <= MAX_GLYPH_WIDTH);
        }
    }
}
