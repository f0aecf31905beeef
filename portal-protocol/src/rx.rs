//! Receive state machine
//!
//! One received byte drives one transition:
//!
//! ```text
//! Idle ─STX─► PacketNumber ─2 hex─► CommandId ─2 hex─► Payload ─n bytes─► Crc ─4 hex─► AwaitEtx ─ETX─► Idle
//!                                        └──────── no payload ────────────┘
//! ```
//!
//! The packet number, command and payload characters are folded into the
//! running CRC as received, the CRC characters are not. Any decode,
//! validation or checksum failure arms an error response on the current
//! slot and returns to `Idle`.

use crate::command::{Command, CommandId, Status};
use crate::crc::Crc16Arc;
use crate::frame::{nibble_from_ascii, ETX, STX};
use crate::slot::{AckStatus, SlotRing};

/// Frame rejection reasons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxError {
    /// Character outside `0-9A-F` inside a hex field
    InvalidHex,
    /// Command id 0 or beyond the catalog
    InvalidCommand,
    /// Request payload failed the command's validator
    InvalidPayload,
    /// Transmitted CRC differs from the computed one
    CrcMismatch,
}

/// Result of feeding one byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxEvent {
    /// Byte consumed, frame not finished (or noise outside a frame)
    Pending,
    /// Valid frame terminated by ETX, ready for dispatch
    Complete,
    /// Frame rejected, error response armed
    Rejected(RxError),
    /// Frame abandoned before ETX, no response
    Discarded,
    /// STX refused: every slot still holds a pending response
    Refused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum State {
    Idle,
    PacketNumber,
    CommandId,
    Payload(CommandId),
    Crc,
    AwaitEtx,
}

/// Byte-driven frame receiver
#[derive(Debug, Clone)]
pub struct Receiver {
    state: State,
    crc: Crc16Arc,
    /// Value accumulated from the hex digits of the current field
    acc: u16,
    /// Hex digits accumulated so far
    digits: u8,
}

impl Default for Receiver {
    fn default() -> Self {
        Self::new()
    }
}

impl Receiver {
    /// Create an idle receiver
    pub const fn new() -> Self {
        Self {
            state: State::Idle,
            crc: Crc16Arc::new(),
            acc: 0,
            digits: 0,
        }
    }

    /// True between STX and the end of the frame
    pub fn in_frame(&self) -> bool {
        self.state != State::Idle
    }

    /// Feed one received byte
    pub fn receive(&mut self, byte: u8, ring: &mut SlotRing) -> RxEvent {
        match self.state {
            State::Idle => self.on_idle(byte, ring),
            State::AwaitEtx => match byte {
                ETX => {
                    self.state = State::Idle;
                    RxEvent::Complete
                }
                _ => {
                    ring.rx_slot_mut().clear();
                    self.state = State::Idle;
                    RxEvent::Discarded
                }
            },
            State::Crc => match self.push_digit(byte, 4) {
                Err(error) => self.reject(error, ring),
                Ok(None) => RxEvent::Pending,
                Ok(Some(received)) => {
                    let computed = self.crc.value();
                    let slot = ring.rx_slot_mut();
                    slot.received_crc = received;
                    slot.computed_crc = computed;
                    if received != computed {
                        return self.reject(RxError::CrcMismatch, ring);
                    }
                    self.state = State::AwaitEtx;
                    RxEvent::Pending
                }
            },
            State::PacketNumber | State::CommandId | State::Payload(_) => {
                self.crc.update(byte);
                match self.push_digit(byte, 2) {
                    Err(error) => self.reject(error, ring),
                    Ok(None) => RxEvent::Pending,
                    Ok(Some(value)) => self.on_field(value as u8, ring),
                }
            }
        }
    }

    fn on_idle(&mut self, byte: u8, ring: &mut SlotRing) -> RxEvent {
        if byte != STX {
            return RxEvent::Pending;
        }
        if !ring.begin_frame() {
            self.state = State::Idle;
            return RxEvent::Refused;
        }
        ring.rx_slot_mut().status = Status::NoError;
        self.crc = Crc16Arc::new();
        self.acc = 0;
        self.digits = 0;
        self.state = State::PacketNumber;
        RxEvent::Pending
    }

    /// Accumulate one hex digit; yields the field value after `len` digits
    fn push_digit(&mut self, byte: u8, len: u8) -> Result<Option<u16>, RxError> {
        let nibble = nibble_from_ascii(byte).ok_or(RxError::InvalidHex)?;
        self.acc = self.acc << 4 | nibble as u16;
        self.digits += 1;
        if self.digits < len {
            return Ok(None);
        }
        let value = self.acc;
        self.acc = 0;
        self.digits = 0;
        Ok(Some(value))
    }

    fn on_field(&mut self, value: u8, ring: &mut SlotRing) -> RxEvent {
        let slot = ring.rx_slot_mut();
        match self.state {
            State::PacketNumber => {
                slot.packet_number = value;
                self.state = State::CommandId;
            }
            State::CommandId => {
                slot.raw_command = value;
                let Some(id) = CommandId::from_id(value) else {
                    return self.reject(RxError::InvalidCommand, ring);
                };
                self.state = if id.request_len() == 0 {
                    slot.command = Command::decode(id, &[]);
                    State::Crc
                } else {
                    State::Payload(id)
                };
            }
            State::Payload(id) => {
                if slot.payload.push(value).is_err() {
                    return self.reject(RxError::InvalidPayload, ring);
                }
                if slot.payload.len() == id.request_len() {
                    match Command::decode(id, &slot.payload) {
                        Some(command) => {
                            slot.command = Some(command);
                            self.state = State::Crc;
                        }
                        None => return self.reject(RxError::InvalidPayload, ring),
                    }
                }
            }
            State::Idle | State::Crc | State::AwaitEtx => {}
        }
        RxEvent::Pending
    }

    fn reject(&mut self, error: RxError, ring: &mut SlotRing) -> RxEvent {
        let slot = ring.rx_slot_mut();
        slot.status = Status::Error;
        slot.command = None;
        slot.ack = AckStatus::ToBeSend;
        self.state = State::Idle;
        self.acc = 0;
        self.digits = 0;
        RxEvent::Rejected(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::BuzzerParam;
    use crate::frame::encode_to_vec;

    fn feed(rx: &mut Receiver, ring: &mut SlotRing, bytes: &[u8]) -> RxEvent {
        let mut last = RxEvent::Pending;
        for &b in bytes {
            last = rx.receive(b, ring);
            if last != RxEvent::Pending {
                break;
            }
        }
        last
    }

    #[test]
    fn test_valid_frame_completes() {
        let mut rx = Receiver::new();
        let mut ring = SlotRing::new();
        let frame = encode_to_vec(0x21, 0x07, &[0x00, 0x0A]).unwrap();

        assert_eq!(feed(&mut rx, &mut ring, &frame), RxEvent::Complete);
        let slot = ring.rx_slot();
        assert_eq!(slot.packet_number, 0x21);
        assert_eq!(slot.status, Status::NoError);
        assert_eq!(slot.received_crc, slot.computed_crc);
        assert_eq!(
            slot.command,
            Some(Command::BuzzerParam(BuzzerParam::Frequency(0x0A)))
        );
        // Dispatch arms the response, not the receiver
        assert_eq!(slot.ack, AckStatus::NotReady);
        assert!(!rx.in_frame());
    }

    #[test]
    fn test_noise_before_stx_is_ignored() {
        let mut rx = Receiver::new();
        let mut ring = SlotRing::new();
        assert_eq!(feed(&mut rx, &mut ring, b"\x00\x03ZZ"), RxEvent::Pending);
        assert!(!rx.in_frame());

        let frame = encode_to_vec(0x01, 0x04, &[]).unwrap();
        assert_eq!(feed(&mut rx, &mut ring, &frame), RxEvent::Complete);
        assert_eq!(ring.rx_slot().command, Some(Command::Clear));
    }

    #[test]
    fn test_lowercase_hex_rejected() {
        let mut rx = Receiver::new();
        let mut ring = SlotRing::new();
        assert_eq!(
            feed(&mut rx, &mut ring, b"\x020a"),
            RxEvent::Rejected(RxError::InvalidHex)
        );
        assert_eq!(ring.rx_slot().status, Status::Error);
        assert_eq!(ring.rx_slot().ack, AckStatus::ToBeSend);
    }

    #[test]
    fn test_unknown_command_rejected() {
        for id in [0x00u8, 0x09, 0x3F] {
            let mut rx = Receiver::new();
            let mut ring = SlotRing::new();
            let frame = encode_to_vec(0x05, id, &[]).unwrap();
            assert_eq!(
                feed(&mut rx, &mut ring, &frame),
                RxEvent::Rejected(RxError::InvalidCommand)
            );
            assert_eq!(ring.rx_slot().response_command(), id | 0x80);
        }
    }

    #[test]
    fn test_invalid_payload_rejected() {
        let mut rx = Receiver::new();
        let mut ring = SlotRing::new();
        let frame = encode_to_vec(0x01, 0x03, &[0x02]).unwrap();
        assert_eq!(
            feed(&mut rx, &mut ring, &frame),
            RxEvent::Rejected(RxError::InvalidPayload)
        );
        assert_eq!(ring.rx_slot().command, None);
    }

    #[test]
    fn test_crc_mismatch_rejected() {
        let mut rx = Receiver::new();
        let mut ring = SlotRing::new();
        let mut frame = encode_to_vec(0x01, 0x06, &[]).unwrap();
        frame[5] = if frame[5] == b'0' { b'1' } else { b'0' };
        assert_eq!(
            feed(&mut rx, &mut ring, &frame),
            RxEvent::Rejected(RxError::CrcMismatch)
        );
        let slot = ring.rx_slot();
        assert_ne!(slot.received_crc, slot.computed_crc);
    }

    #[test]
    fn test_missing_etx_discards() {
        let mut rx = Receiver::new();
        let mut ring = SlotRing::new();
        let frame = encode_to_vec(0x01, 0x06, &[]).unwrap();
        assert_eq!(feed(&mut rx, &mut ring, &frame[..9]), RxEvent::Pending);
        assert_eq!(rx.receive(b'X', &mut ring), RxEvent::Discarded);
        assert_eq!(ring.rx_slot().ack, AckStatus::NotReady);
        assert_eq!(ring.rx_slot().command, None);
    }

    #[test]
    fn test_stx_before_etx_discards() {
        let mut rx = Receiver::new();
        let mut ring = SlotRing::new();
        let first = encode_to_vec(0x01, 0x06, &[]).unwrap();
        let second = encode_to_vec(0x02, 0x04, &[]).unwrap();
        feed(&mut rx, &mut ring, &first[..9]);

        // STX in place of ETX is noise, it does not open a frame
        assert_eq!(rx.receive(STX, &mut ring), RxEvent::Discarded);
        assert!(!rx.in_frame());
        assert_eq!(ring.rx_slot().ack, AckStatus::NotReady);
        assert_eq!(ring.rx_slot().command, None);

        assert_eq!(feed(&mut rx, &mut ring, &second), RxEvent::Complete);
        assert_eq!(ring.rx_index(), 0);
        assert_eq!(ring.rx_slot().packet_number, 0x02);
        assert_eq!(ring.rx_slot().command, Some(Command::Clear));
    }

    #[test]
    fn test_stx_inside_field_is_invalid() {
        let mut rx = Receiver::new();
        let mut ring = SlotRing::new();
        assert_eq!(
            feed(&mut rx, &mut ring, b"\x020\x02"),
            RxEvent::Rejected(RxError::InvalidHex)
        );
    }

    #[test]
    fn test_full_ring_refuses_frame() {
        let mut rx = Receiver::new();
        let mut ring = SlotRing::new();
        let frame = encode_to_vec(0x01, 0x00, &[]).unwrap();
        for _ in 0..crate::slot::SLOT_COUNT {
            assert_eq!(
                feed(&mut rx, &mut ring, &frame),
                RxEvent::Rejected(RxError::InvalidCommand)
            );
        }
        assert_eq!(rx.receive(STX, &mut ring), RxEvent::Refused);
        assert!(!rx.in_frame());
    }
}
