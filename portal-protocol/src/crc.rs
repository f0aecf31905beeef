//! CRC-16/ARC
//!
//! Polynomial 0x8005 reflected (0xA001), initial value 0, no final XOR.
//! The protocol feeds it the ASCII characters of a frame, not the decoded
//! values.

const POLY_REFLECTED: u16 = 0xA001;

/// Running CRC-16/ARC
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Crc16Arc {
    crc: u16,
}

impl Crc16Arc {
    /// Start a new checksum
    pub const fn new() -> Self {
        Self { crc: 0 }
    }

    /// Fold one byte into the checksum
    pub fn update(&mut self, byte: u8) {
        self.crc ^= byte as u16;
        for _ in 0..8 {
            self.crc = if self.crc & 1 != 0 {
                (self.crc >> 1) ^ POLY_REFLECTED
            } else {
                self.crc >> 1
            };
        }
    }

    /// Fold a slice into the checksum
    pub fn update_slice(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.update(byte);
        }
    }

    /// Current checksum value
    pub const fn value(&self) -> u16 {
        self.crc
    }

    /// Checksum of a complete buffer
    pub fn checksum(bytes: &[u8]) -> u16 {
        let mut crc = Self::new();
        crc.update_slice(bytes);
        crc.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_check_value() {
        // Standard check value for CRC-16/ARC
        assert_eq!(Crc16Arc::checksum(b"123456789"), 0xBB3D);
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(Crc16Arc::checksum(&[]), 0);
    }

    #[test]
    fn test_ascii_not_binary() {
        // "0102" as characters differs from the decoded bytes 01 02
        assert_ne!(Crc16Arc::checksum(b"0102"), Crc16Arc::checksum(&[0x01, 0x02]));
    }

    proptest! {
        #[test]
        fn test_incremental_matches_oneshot(data in proptest::collection::vec(any::<u8>(), 0..64)) {
            let mut crc = Crc16Arc::new();
            for &b in &data {
                crc.update(b);
            }
            prop_assert_eq!(crc.value(), Crc16Arc::checksum(&data));
        }

        #[test]
        fn test_split_anywhere(data in proptest::collection::vec(any::<u8>(), 1..64), split in 0usize..64) {
            let split = split % data.len();
            let mut crc = Crc16Arc::new();
            crc.update_slice(&data[..split]);
            crc.update_slice(&data[split..]);
            prop_assert_eq!(crc.value(), Crc16Arc::checksum(&data));
        }
    }
}
