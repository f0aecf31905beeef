//! QR code bitmaps
//!
//! Pre-rendered pairing codes for the boot screen, one per QR version.
//! Each table is 6 pages by 45 columns; bit `b` of page `p` is row
//! `8 * p + b`, set for a dark module.

use crate::framebuffer::PAGES;

/// Columns covered by a QR table
pub const QR_COLUMNS: usize = 45;

/// Smallest available QR version
pub const MIN_VERSION: u8 = 3;

/// Largest available QR version
pub const MAX_VERSION: u8 = 7;

/// Version used for unknown version numbers
pub const DEFAULT_VERSION: u8 = 4;

/// Page-major QR bitmap
pub type QrTable = [[u8; QR_COLUMNS]; PAGES];

/// Table for a QR version, falling back to [`DEFAULT_VERSION`]
pub fn table(version: u8) -> &'static QrTable {
    match version {
        3 => &VERSION_3,
        5 => &VERSION_5,
        6 => &VERSION_6,
        7 => &VERSION_7,
        _ => &VERSION_4,
    }
}

/// Module count per side of a QR version
pub const fn modules(version: u8) -> usize {
    17 + 4 * version as usize
}

/// Version 3 (29x29 modules)
#[rustfmt::skip]
static VERSION_3: QrTable = [
    [
        0x7F, 0x41, 0x5D, 0x5D, 0x5D, 0x41, 0x7F, 0x00, 0xC4, 0x1A, 0x61, 0xA4, 0x78, 0x1A, 0x61,
        0xA4, 0x78, 0x81, 0xDF, 0xBB, 0xC3, 0x00, 0x7F, 0x41, 0x5D, 0x5D, 0x5D, 0x41, 0x7F, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ],
    [
        0x03, 0xEB, 0x09, 0x78, 0xC1, 0x73, 0x55, 0x8F, 0x77, 0xAA, 0xFC, 0xB6, 0x0F, 0x4A, 0x3C,
        0xB6, 0x0F, 0x9D, 0x88, 0x89, 0xA7, 0xF3, 0x37, 0x90, 0x04, 0xF2, 0x05, 0xDC, 0x76, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ],
    [
        0xD5, 0x4A, 0x50, 0x59, 0x58, 0x5E, 0xD5, 0x11, 0xF7, 0x32, 0xB4, 0xB6, 0x0F, 0x4A, 0x3C,
        0x36, 0x5F, 0xBD, 0x69, 0x69, 0xF3, 0x1E, 0x5B, 0x15, 0xF8, 0xCB, 0x22, 0x6D, 0xE7, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ],
    [
        0x1F, 0x10, 0x17, 0x17, 0x17, 0x10, 0x1F, 0x00, 0x1D, 0x12, 0x15, 0x16, 0x0F, 0x0A, 0x1C,
        0x18, 0x12, 0x1B, 0x0C, 0x12, 0x19, 0x11, 0x11, 0x0F, 0x17, 0x14, 0x02, 0x19, 0x14, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ],
    [
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ],
    [
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ],
];

/// Version 4 (33x33 modules)
#[rustfmt::skip]
static VERSION_4: QrTable = [
    [
        0x7F, 0x41, 0x5D, 0x5D, 0x5D, 0x41, 0x7F, 0x00, 0x6A, 0xB8, 0xCB, 0xA0, 0x6D, 0x07, 0xCB,
        0x1F, 0xD2, 0x07, 0x74, 0xA0, 0xD2, 0xB7, 0xC9, 0x1D, 0x58, 0x00, 0x7F, 0x41, 0x5D, 0x5D,
        0x5D, 0x41, 0x7F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ],
    [
        0x27, 0xD1, 0x1B, 0xE7, 0x17, 0x08, 0x55, 0xED, 0xBB, 0x11, 0x16, 0xC1, 0x5A, 0x0E, 0x96,
        0x3E, 0xA5, 0x0E, 0x69, 0xC1, 0xA5, 0xAC, 0x39, 0xBB, 0x91, 0x3D, 0x62, 0x75, 0x9C, 0x15,
        0x8A, 0x67, 0x22, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ],
    [
        0xFC, 0x23, 0x61, 0x4F, 0x2A, 0xF4, 0x55, 0x14, 0x59, 0xDD, 0x5E, 0xC1, 0x5A, 0x0E, 0x96,
        0x3E, 0xA5, 0x0E, 0x69, 0xC1, 0xA5, 0xF1, 0x94, 0x3A, 0x35, 0xD9, 0x62, 0x59, 0x11, 0xE6,
        0x88, 0x77, 0x22, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ],
    [
        0xFD, 0x04, 0x75, 0x74, 0x75, 0x05, 0xFD, 0x01, 0xF6, 0xD8, 0xBB, 0xC1, 0x5A, 0x0E, 0x96,
        0x3E, 0xA5, 0x0E, 0x69, 0xC1, 0xA5, 0xF1, 0x96, 0x4C, 0x3F, 0x71, 0x55, 0x91, 0xBF, 0xE9,
        0x8E, 0x3C, 0x1B, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ],
    [
        0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x00, 0x01, 0x00, 0x01, 0x01, 0x00, 0x00, 0x00,
        0x00, 0x01, 0x00, 0x01, 0x01, 0x01, 0x01, 0x00, 0x01, 0x01, 0x00, 0x00, 0x01, 0x00, 0x01,
        0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ],
    [
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ],
];

/// Version 5 (37x37 modules)
#[rustfmt::skip]
static VERSION_5: QrTable = [
    [
        0x7F, 0x41, 0x5D, 0x5D, 0x5D, 0x41, 0x7F, 0x00, 0x58, 0xA5, 0x7D, 0x0F, 0xD2, 0xB1, 0x7D,
        0x1B, 0x64, 0xB1, 0xCB, 0x0F, 0x64, 0xA5, 0x7D, 0x0F, 0xD2, 0xB1, 0x7D, 0x9B, 0x4C, 0x00,
        0x7F, 0x41, 0x5D, 0x5D, 0x5D, 0x41, 0x7F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ],
    [
        0x2B, 0x23, 0xC4, 0x40, 0xB0, 0x35, 0x55, 0x7D, 0xFA, 0x8D, 0x77, 0x0C, 0xA5, 0xF0, 0xFB,
        0x49, 0xC8, 0xF0, 0x96, 0x0C, 0xC8, 0xB5, 0xFB, 0x0C, 0xA5, 0xF0, 0xFB, 0x67, 0xF5, 0x2C,
        0xD8, 0x36, 0x03, 0x35, 0xE4, 0x7A, 0xD4, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ],
    [
        0x6C, 0x6C, 0xD9, 0xEC, 0x50, 0x70, 0x55, 0x21, 0x7B, 0x1C, 0xC5, 0x18, 0xA5, 0xE4, 0x4D,
        0x49, 0x7E, 0xE4, 0x96, 0x18, 0x7E, 0xB5, 0x4D, 0x18, 0xA5, 0xE4, 0x4D, 0xF7, 0xD6, 0xD1,
        0xD9, 0xAB, 0xF5, 0xCB, 0x33, 0x72, 0xDD, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ],
    [
        0xDE, 0x42, 0x52, 0x4A, 0x5E, 0x58, 0xD5, 0x15, 0xF6, 0x3C, 0xE7, 0x5D, 0xA5, 0xA1, 0x20,
        0x49, 0x13, 0xA1, 0x96, 0x5D, 0x13, 0xB5, 0x20, 0x5D, 0xA5, 0xA1, 0x20, 0x86, 0xF5, 0x15,
        0x51, 0x19, 0xF0, 0xCB, 0x1E, 0x86, 0x4D, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ],
    [
        0x1F, 0x10, 0x17, 0x17, 0x17, 0x10, 0x1F, 0x00, 0x18, 0x02, 0x09, 0x0C, 0x05, 0x10, 0x1B,
        0x09, 0x08, 0x10, 0x16, 0x0C, 0x08, 0x15, 0x1B, 0x0C, 0x05, 0x10, 0x1B, 0x03, 0x1D, 0x03,
        0x0B, 0x1D, 0x11, 0x1E, 0x03, 0x03, 0x1E, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ],
    [
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ],
];

/// Version 6 (41x41 modules)
#[rustfmt::skip]
static VERSION_6: QrTable = [
    [
        0x7F, 0x41, 0x5D, 0x5D, 0x5D, 0x41, 0x7F, 0x00, 0x6F, 0x98, 0xEA, 0x9D, 0x5F, 0x34, 0xF9,
        0x82, 0xE1, 0x8B, 0xF9, 0x3D, 0x5E, 0x8B, 0x46, 0x82, 0x5E, 0x34, 0xF9, 0x8D, 0xE5, 0x9B,
        0xD9, 0x32, 0x58, 0x00, 0x7F, 0x41, 0x5D, 0x5D, 0x5D, 0x41, 0x7F, 0x00, 0x00, 0x00, 0x00,
    ],
    [
        0xE5, 0x77, 0xB4, 0x0A, 0x49, 0xEF, 0x55, 0xEE, 0x04, 0xC7, 0xD3, 0x03, 0x97, 0xD3, 0x59,
        0x0C, 0x69, 0x2C, 0x59, 0xF3, 0x96, 0x2C, 0xA6, 0x0C, 0x96, 0x12, 0x9A, 0x16, 0x63, 0xCD,
        0x18, 0xE1, 0x91, 0xDA, 0x52, 0x93, 0x3E, 0x69, 0x23, 0xB9, 0xF1, 0x00, 0x00, 0x00, 0x00,
    ],
    [
        0xAB, 0x91, 0xF7, 0xB8, 0x40, 0xC2, 0x55, 0xF8, 0x4D, 0x3D, 0x73, 0xD1, 0x69, 0x3D, 0xA6,
        0xD1, 0x96, 0xC2, 0xA6, 0x2E, 0x69, 0xC2, 0x59, 0xD1, 0x69, 0x7C, 0x24, 0xDF, 0x90, 0xE3,
        0x66, 0x30, 0x6C, 0xA7, 0xCE, 0x6E, 0xD2, 0x8A, 0xC3, 0xA7, 0xEC, 0x00, 0x00, 0x00, 0x00,
    ],
    [
        0x26, 0x2B, 0x64, 0xFA, 0xC8, 0xFE, 0x55, 0xCA, 0x45, 0x13, 0xA4, 0x0C, 0x96, 0xD3, 0x59,
        0x0C, 0x69, 0x2C, 0x59, 0xF3, 0x96, 0x2C, 0xA6, 0x0C, 0x96, 0xD3, 0x5B, 0x16, 0x62, 0xCD,
        0xDA, 0xE9, 0x99, 0x59, 0xD2, 0x93, 0x3E, 0x67, 0x27, 0x18, 0x71, 0x00, 0x00, 0x00, 0x00,
    ],
    [
        0xFD, 0x05, 0x75, 0x74, 0x74, 0x04, 0xFD, 0x00, 0x9B, 0x78, 0xB4, 0xD1, 0x69, 0x3D, 0xA6,
        0xD1, 0x96, 0xC2, 0xA6, 0x2E, 0x69, 0xC2, 0x59, 0xD1, 0x69, 0x3D, 0xA6, 0xC7, 0x9A, 0xA3,
        0x67, 0xF6, 0x7F, 0xF1, 0x95, 0x51, 0x9F, 0x92, 0xC5, 0xE7, 0xCD, 0x00, 0x00, 0x00, 0x00,
    ],
    [
        0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x01, 0x01,
        0x00, 0x01, 0x00, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x01, 0x00, 0x00, 0x01,
        0x00, 0x01, 0x01, 0x01, 0x00, 0x01, 0x00, 0x01, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00,
    ],
];

/// Version 7 (45x45 modules)
#[rustfmt::skip]
static VERSION_7: QrTable = [
    [
        0x7F, 0x41, 0x5D, 0x5D, 0x5D, 0x41, 0x7F, 0x00, 0x6F, 0x04, 0x49, 0x85, 0x66, 0xA7, 0x73,
        0x19, 0x7B, 0xA7, 0xDD, 0xB9, 0xF3, 0x16, 0x5C, 0x19, 0xF3, 0x26, 0x6E, 0x1A, 0xCF, 0xA5,
        0xF1, 0x1A, 0xCB, 0x01, 0x50, 0x1E, 0xD9, 0x00, 0x7F, 0x41, 0x5D, 0x5D, 0x5D, 0x41, 0x7F,
    ],
    [
        0xC9, 0x39, 0xD4, 0xA8, 0x1F, 0x65, 0x55, 0x02, 0xD0, 0xA5, 0x09, 0x06, 0x35, 0x65, 0xEF,
        0x99, 0xCC, 0x65, 0x32, 0x9B, 0x8B, 0x67, 0x23, 0x99, 0xEF, 0xE6, 0xB3, 0x9E, 0xBC, 0xE3,
        0x0F, 0x9A, 0xB3, 0x9B, 0xC8, 0x9A, 0x32, 0xE4, 0x36, 0x1D, 0x3E, 0x59, 0x33, 0x65, 0xF1,
    ],
    [
        0xCA, 0x2A, 0x31, 0xAF, 0xF3, 0x1D, 0x55, 0x14, 0xFF, 0x56, 0x1C, 0xF5, 0xE7, 0x9A, 0x32,
        0x66, 0x22, 0x9A, 0xEF, 0x25, 0xF0, 0x18, 0x5C, 0x17, 0xF2, 0x19, 0x08, 0x61, 0xCB, 0x1C,
        0xB2, 0x64, 0xC5, 0x66, 0x70, 0x0E, 0xFA, 0x19, 0x5F, 0x13, 0xFA, 0x87, 0x7C, 0x84, 0x30,
    ],
    [
        0xBC, 0xD5, 0xAA, 0x76, 0x0F, 0x45, 0x55, 0x71, 0xDB, 0xF5, 0x78, 0x66, 0xDD, 0x65, 0xEF,
        0x99, 0xCC, 0x65, 0x32, 0xF2, 0x97, 0xA7, 0x0D, 0x59, 0xB3, 0xE6, 0xB3, 0x9E, 0xBC, 0xE6,
        0x08, 0x1D, 0xB7, 0x1E, 0xC8, 0xC2, 0x4D, 0x57, 0xB5, 0xE9, 0xDD, 0xD9, 0x52, 0x75, 0xE1,
    ],
    [
        0xD3, 0x4B, 0x49, 0x5A, 0x5D, 0x43, 0xD5, 0x14, 0xA7, 0x12, 0xC8, 0x99, 0x33, 0x9A, 0x32,
        0x66, 0x22, 0x9A, 0xEF, 0x0E, 0xF9, 0x19, 0x51, 0x16, 0xF8, 0x19, 0x08, 0x61, 0xCB, 0x19,
        0xB3, 0x64, 0xC5, 0x65, 0x70, 0x04, 0xFA, 0x19, 0x53, 0x16, 0xF2, 0xA6, 0x5C, 0x8E, 0x28,
    ],
    [
        0x1F, 0x10, 0x17, 0x17, 0x17, 0x10, 0x1F, 0x00, 0x19, 0x0F, 0x15, 0x06, 0x1D, 0x05, 0x0F,
        0x19, 0x0C, 0x05, 0x12, 0x19, 0x13, 0x1F, 0x0F, 0x01, 0x15, 0x06, 0x13, 0x1E, 0x1C, 0x06,
        0x08, 0x18, 0x11, 0x1E, 0x09, 0x19, 0x0F, 0x11, 0x01, 0x13, 0x17, 0x18, 0x12, 0x01, 0x13,
    ],
];

#[cfg(test)]
mod tests {
    use super::*;

    fn dark(table: &QrTable, x: usize, y: usize) -> bool {
        table[y / 8][x] & (1 << (y % 8)) != 0
    }

    #[test]
    fn test_finder_patterns() {
        for version in MIN_VERSION..=MAX_VERSION {
            let t = table(version);
            let size = modules(version);
            for (x0, y0) in [(0, 0), (size - 7, 0), (0, size - 7)] {
                // Outer ring dark, ring inside it light, 3x3 core dark
                assert!(dark(t, x0, y0));
                assert!(dark(t, x0 + 6, y0 + 6));
                assert!(!dark(t, x0 + 1, y0 + 1));
                assert!(dark(t, x0 + 3, y0 + 3));
            }
        }
    }

    #[test]
    fn test_unknown_version_falls_back() {
        assert!(core::ptr::eq(table(0), table(DEFAULT_VERSION)));
        assert!(core::ptr::eq(table(8), table(DEFAULT_VERSION)));
    }

    #[test]
    fn test_nothing_beyond_symbol() {
        for version in MIN_VERSION..=MAX_VERSION {
            let t = table(version);
            let size = modules(version);
            for x in size..QR_COLUMNS {
                for y in 0..PAGES * 8 {
                    assert!(!dark(t, x, y));
                }
            }
        }
    }
}
