//! Transmit state machine
//!
//! Responses are streamed one byte per call, paced by the transport's
//! byte-sent notifications. The frame is formatted into a single reusable
//! buffer right after STX went out.

use crate::frame::{encode, encoded_len, STX};
use crate::slot::{AckStatus, SlotRing};

/// Largest response: two payload bytes
pub const RESPONSE_BUFFER_LEN: usize = encoded_len(2);

/// Byte-at-a-time response transmitter
#[derive(Debug, Clone)]
pub struct Transmitter {
    buffer: [u8; RESPONSE_BUFFER_LEN],
    len: usize,
    cursor: usize,
    transmitting: bool,
}

impl Default for Transmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Transmitter {
    /// Create an idle transmitter
    pub const fn new() -> Self {
        Self {
            buffer: [0; RESPONSE_BUFFER_LEN],
            len: 0,
            cursor: 0,
            transmitting: false,
        }
    }

    /// True while a byte is in flight
    pub fn is_transmitting(&self) -> bool {
        self.transmitting
    }

    /// Start streaming if idle; returns the first byte to send
    pub fn kick(&mut self, ring: &mut SlotRing) -> Option<u8> {
        if self.transmitting {
            return None;
        }
        self.next_byte(ring)
    }

    /// Produce the next byte to send, or go idle
    pub fn next_byte(&mut self, ring: &mut SlotRing) -> Option<u8> {
        let byte = self.advance(ring);
        self.transmitting = byte.is_some();
        byte
    }

    fn advance(&mut self, ring: &mut SlotRing) -> Option<u8> {
        if ring.tx_slot().ack.is_free() {
            if !ring.advance_tx() {
                return None;
            }
            self.cursor = 0;
        }

        let slot = ring.tx_slot_mut();
        match self.cursor {
            0 => {
                slot.ack = AckStatus::Sending;
                self.cursor = 1;
                Some(STX)
            }
            1 => {
                let mut payload = [0u8; 2];
                let payload_len = slot.response_payload(&mut payload);
                match encode(
                    slot.packet_number,
                    slot.response_command(),
                    &payload[..payload_len],
                    &mut self.buffer,
                ) {
                    Ok(len) => {
                        self.len = len;
                        self.cursor = 2;
                        Some(self.buffer[1])
                    }
                    Err(_) => {
                        slot.ack = AckStatus::Sent;
                        self.cursor = 0;
                        None
                    }
                }
            }
            cursor => {
                let byte = self.buffer[cursor];
                if cursor + 1 >= self.len {
                    slot.ack = AckStatus::Sent;
                    self.cursor = 0;
                } else {
                    self.cursor += 1;
                }
                Some(byte)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Reply, Status};
    use crate::frame::{decode, ETX, NUL};

    fn arm(ring: &mut SlotRing, pn: u8, cmd: u8, status: Status, reply: Reply) {
        assert!(ring.begin_frame());
        let slot = ring.rx_slot_mut();
        slot.packet_number = pn;
        slot.raw_command = cmd;
        slot.status = status;
        slot.reply = reply;
        slot.ack = AckStatus::ToBeSend;
    }

    fn drain(tx: &mut Transmitter, ring: &mut SlotRing) -> heapless::Vec<u8, 64> {
        let mut out = heapless::Vec::new();
        let mut byte = tx.kick(ring);
        while let Some(b) = byte {
            out.push(b).unwrap();
            byte = tx.next_byte(ring);
        }
        out
    }

    #[test]
    fn test_idle_without_response() {
        let mut tx = Transmitter::new();
        let mut ring = SlotRing::new();
        assert_eq!(tx.kick(&mut ring), None);
        assert!(!tx.is_transmitting());
    }

    #[test]
    fn test_streams_version_response() {
        let mut tx = Transmitter::new();
        let mut ring = SlotRing::new();
        arm(&mut ring, 0x33, 0x06, Status::NoError, Reply::Version(0x008A));

        let out = drain(&mut tx, &mut ring);
        assert_eq!(out.len(), RESPONSE_BUFFER_LEN);
        assert_eq!(out[0], STX);
        assert_eq!(&out[1..9], b"3346008A");
        assert_eq!(out[out.len() - 2], ETX);
        assert_eq!(out[out.len() - 1], NUL);
        assert_eq!(ring.tx_slot().ack, AckStatus::Sent);
        assert!(!tx.is_transmitting());

        let frame = decode(&out).unwrap();
        assert_eq!(frame.command, 0x46);
        assert_eq!(frame.payload.as_slice(), &[0x00, 0x8A]);
    }

    #[test]
    fn test_error_response_drops_payload() {
        let mut tx = Transmitter::new();
        let mut ring = SlotRing::new();
        arm(&mut ring, 0x01, 0x01, Status::Error, Reply::Keys(0x0F));

        let out = drain(&mut tx, &mut ring);
        assert_eq!(out.len(), encoded_len(0));
        assert_eq!(decode(&out).unwrap().command, 0x81);
    }

    #[test]
    fn test_kick_ignored_while_sending() {
        let mut tx = Transmitter::new();
        let mut ring = SlotRing::new();
        arm(&mut ring, 0x01, 0x04, Status::NoError, Reply::Empty);

        assert_eq!(tx.kick(&mut ring), Some(STX));
        assert_eq!(ring.tx_slot().ack, AckStatus::Sending);
        assert_eq!(tx.kick(&mut ring), None);
        assert!(tx.is_transmitting());
    }

    #[test]
    fn test_queued_responses_in_order() {
        let mut tx = Transmitter::new();
        let mut ring = SlotRing::new();
        arm(&mut ring, 0x01, 0x04, Status::NoError, Reply::Empty);
        assert_eq!(tx.kick(&mut ring), Some(STX));
        // Second request lands while the first response is streaming
        arm(&mut ring, 0x02, 0x03, Status::NoError, Reply::Empty);

        let mut out: heapless::Vec<u8, 64> = heapless::Vec::new();
        out.push(STX).unwrap();
        while let Some(b) = tx.next_byte(&mut ring) {
            out.push(b).unwrap();
        }
        let len = encoded_len(0);
        assert_eq!(out.len(), 2 * len);
        assert_eq!(decode(&out[..len]).unwrap().packet_number, 0x01);
        assert_eq!(decode(&out[len..]).unwrap().packet_number, 0x02);
        assert_eq!(ring.tx_index(), 1);
    }
}
