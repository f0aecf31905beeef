//! Wire codec for complete frames.
//!
//! Frame format (every field after STX is ASCII-hex, high nibble first):
//! - STX (1 byte): 0x02
//! - PN (2 chars): packet number, echoed by the response
//! - CMD (2 chars): command id, plus status bits in responses
//! - PAYLOAD (0-40 chars): command specific bytes
//! - CRC (4 chars): CRC-16/ARC over the PN, CMD and PAYLOAD characters
//! - ETX (1 byte): 0x03
//! - NUL (1 byte): 0x00
//!
//! The display side never decodes a whole frame at once; its receiver is
//! the byte-driven state machine in [`crate::rx`]. [`encode`] is shared by
//! the transmitter and by host-side tooling, [`decode`] is the host view
//! of a response.

use heapless::Vec;

use crate::crc::Crc16Arc;

/// Start of frame
pub const STX: u8 = 0x02;

/// End of frame
pub const ETX: u8 = 0x03;

/// Pad byte following ETX
pub const NUL: u8 = 0x00;

/// Largest payload of any command, in decoded bytes
pub const MAX_PAYLOAD_LEN: usize = 20;

/// Framing overhead: STX + PN + CMD + CRC + ETX + NUL
pub const FRAME_OVERHEAD: usize = 1 + 2 + 2 + 4 + 1 + 1;

/// Largest complete frame
pub const MAX_FRAME_LEN: usize = FRAME_OVERHEAD + 2 * MAX_PAYLOAD_LEN;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Errors from frame encoding or decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Buffer too small for encoding
    BufferTooSmall,
    /// Missing delimiters or odd field length
    InvalidFrame,
    /// Character outside `0-9A-F`
    InvalidHex,
    /// Checksum mismatch
    CrcMismatch,
}

/// Decode one upper-case ASCII-hex digit
pub const fn nibble_from_ascii(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Encode the low nibble as an upper-case ASCII-hex digit
pub const fn ascii_from_nibble(nibble: u8) -> u8 {
    HEX_DIGITS[(nibble & 0x0F) as usize]
}

/// Length of an encoded frame carrying `payload_len` bytes
pub const fn encoded_len(payload_len: usize) -> usize {
    FRAME_OVERHEAD + 2 * payload_len
}

/// Sequential writer that checksums the hex fields it emits
struct FrameWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
    crc: Crc16Arc,
}

impl<'a> FrameWriter<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            len: 0,
            crc: Crc16Arc::new(),
        }
    }

    fn raw(&mut self, byte: u8) {
        self.buf[self.len] = byte;
        self.len += 1;
    }

    fn hex_byte(&mut self, byte: u8) {
        for c in [ascii_from_nibble(byte >> 4), ascii_from_nibble(byte)] {
            self.crc.update(c);
            self.raw(c);
        }
    }

    fn hex_crc(&mut self) {
        let crc = self.crc.value();
        for shift in [12u16, 8, 4, 0] {
            self.raw(ascii_from_nibble((crc >> shift) as u8));
        }
    }
}

/// Encode a complete frame into `buf`
///
/// Returns the number of bytes written.
pub fn encode(
    packet_number: u8,
    command: u8,
    payload: &[u8],
    buf: &mut [u8],
) -> Result<usize, FrameError> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(FrameError::PayloadTooLarge);
    }
    if buf.len() < encoded_len(payload.len()) {
        return Err(FrameError::BufferTooSmall);
    }

    let mut w = FrameWriter::new(buf);
    w.raw(STX);
    w.hex_byte(packet_number);
    w.hex_byte(command);
    for &byte in payload {
        w.hex_byte(byte);
    }
    w.hex_crc();
    w.raw(ETX);
    w.raw(NUL);

    Ok(w.len)
}

/// Encode a complete frame into a heapless Vec
pub fn encode_to_vec(
    packet_number: u8,
    command: u8,
    payload: &[u8],
) -> Result<Vec<u8, MAX_FRAME_LEN>, FrameError> {
    let mut buffer = [0u8; MAX_FRAME_LEN];
    let len = encode(packet_number, command, payload, &mut buffer)?;
    Vec::from_slice(&buffer[..len]).map_err(|_| FrameError::BufferTooSmall)
}

/// A frame decoded in one piece
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecodedFrame {
    /// Packet number
    pub packet_number: u8,
    /// Command byte, including status bits for responses
    pub command: u8,
    /// Decoded payload
    pub payload: Vec<u8, MAX_PAYLOAD_LEN>,
    /// CRC as transmitted
    pub crc: u16,
}

fn decode_hex_byte(pair: &[u8]) -> Result<u8, FrameError> {
    let hi = nibble_from_ascii(pair[0]).ok_or(FrameError::InvalidHex)?;
    let lo = nibble_from_ascii(pair[1]).ok_or(FrameError::InvalidHex)?;
    Ok(hi << 4 | lo)
}

/// Decode a complete frame
///
/// Accepts the frame with or without the trailing NUL.
pub fn decode(bytes: &[u8]) -> Result<DecodedFrame, FrameError> {
    let bytes = match bytes.split_last() {
        Some((&NUL, rest)) => rest,
        _ => bytes,
    };
    let (&first, rest) = bytes.split_first().ok_or(FrameError::InvalidFrame)?;
    let (&last, body) = rest.split_last().ok_or(FrameError::InvalidFrame)?;
    if first != STX || last != ETX || body.len() < 8 || body.len() % 2 != 0 {
        return Err(FrameError::InvalidFrame);
    }

    let (fields, crc_chars) = body.split_at(body.len() - 4);
    if fields.len() > 4 + 2 * MAX_PAYLOAD_LEN {
        return Err(FrameError::PayloadTooLarge);
    }

    let mut crc = 0u16;
    for &c in crc_chars {
        crc = crc << 4 | nibble_from_ascii(c).ok_or(FrameError::InvalidHex)? as u16;
    }

    let packet_number = decode_hex_byte(&fields[0..2])?;
    let command = decode_hex_byte(&fields[2..4])?;
    let mut payload = Vec::new();
    for pair in fields[4..].chunks(2) {
        payload
            .push(decode_hex_byte(pair)?)
            .map_err(|_| FrameError::PayloadTooLarge)?;
    }

    if Crc16Arc::checksum(fields) != crc {
        return Err(FrameError::CrcMismatch);
    }

    Ok(DecodedFrame {
        packet_number,
        command,
        payload,
        crc,
    })
}
