//! Request slots
//!
//! Received requests live in a ring of three slots. The receiver fills the
//! current slot, the transmitter drains slots in fill order. A slot may be
//! reused once its response went out (or when nothing was armed at all).

use heapless::Vec;

use crate::command::{Command, Reply, Status, ID_MASK};
use crate::frame::MAX_PAYLOAD_LEN;

/// Number of slots in the ring
pub const SLOT_COUNT: usize = 3;

/// Response progress of a slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AckStatus {
    /// No response armed
    #[default]
    NotReady,
    /// Response armed, waiting for the transmitter
    ToBeSend,
    /// Response being streamed
    Sending,
    /// Response completely sent
    Sent,
}

impl AckStatus {
    /// The slot may be refilled
    pub const fn is_free(self) -> bool {
        matches!(self, AckStatus::NotReady | AckStatus::Sent)
    }

    /// The slot holds a response not yet fully sent
    pub const fn is_pending(self) -> bool {
        matches!(self, AckStatus::ToBeSend | AckStatus::Sending)
    }
}

/// One request and its response state
#[derive(Debug, Clone, Default)]
pub struct Slot {
    /// Packet number, echoed by the response
    pub packet_number: u8,
    /// Command byte as received
    pub raw_command: u8,
    /// Validation outcome
    pub status: Status,
    /// Decoded request payload
    pub payload: Vec<u8, MAX_PAYLOAD_LEN>,
    /// CRC carried by the frame
    pub received_crc: u16,
    /// CRC computed over the received characters
    pub computed_crc: u16,
    /// Response progress
    pub ack: AckStatus,
    /// Validated request
    pub command: Option<Command>,
    /// Data for the response payload
    pub reply: Reply,
}

impl Slot {
    /// Reset for a new frame
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Command byte of the response: the received id with the status bits
    pub fn response_command(&self) -> u8 {
        (self.raw_command & ID_MASK) | self.status.bits()
    }

    /// Response payload; empty for rejected requests
    pub fn response_payload(&self, out: &mut [u8; 2]) -> usize {
        match self.status {
            Status::NoError => self.reply.write_payload(out),
            Status::Error => 0,
        }
    }
}

/// Ring of [`SLOT_COUNT`] slots with separate RX and TX cursors
#[derive(Debug, Clone, Default)]
pub struct SlotRing {
    slots: [Slot; SLOT_COUNT],
    rx: usize,
    tx: usize,
}

impl SlotRing {
    /// Create an empty ring
    pub fn new() -> Self {
        Self::default()
    }

    const fn next(index: usize) -> usize {
        (index + 1) % SLOT_COUNT
    }

    /// Slot currently filled by the receiver
    pub fn rx_slot(&self) -> &Slot {
        &self.slots[self.rx]
    }

    /// Mutable slot currently filled by the receiver
    pub fn rx_slot_mut(&mut self) -> &mut Slot {
        &mut self.slots[self.rx]
    }

    /// Move the receiver to a fresh slot for a new frame
    ///
    /// The current slot is kept if it was never armed. Returns `false`
    /// without changes if the slot to rotate into still holds a pending
    /// response.
    pub fn begin_frame(&mut self) -> bool {
        let target = if self.slots[self.rx].ack == AckStatus::NotReady {
            self.rx
        } else {
            Self::next(self.rx)
        };
        if self.slots[target].ack.is_pending() {
            return false;
        }
        self.rx = target;
        self.slots[target].clear();
        true
    }

    /// Slot currently drained by the transmitter
    pub fn tx_slot(&self) -> &Slot {
        &self.slots[self.tx]
    }

    /// Mutable slot currently drained by the transmitter
    pub fn tx_slot_mut(&mut self) -> &mut Slot {
        &mut self.slots[self.tx]
    }

    /// Advance the transmitter to the next armed slot
    ///
    /// Returns `true` if the transmitter slot holds a response to send.
    pub fn advance_tx(&mut self) -> bool {
        if !self.slots[self.tx].ack.is_free() {
            return true;
        }
        let next = Self::next(self.tx);
        if self.slots[next].ack == AckStatus::ToBeSend {
            self.tx = next;
            true
        } else {
            false
        }
    }

    /// Index of the receiver slot
    pub fn rx_index(&self) -> usize {
        self.rx
    }

    /// Index of the transmitter slot
    pub fn tx_index(&self) -> usize {
        self.tx
    }

    /// Response progress of every slot
    pub fn acks(&self) -> [AckStatus; SLOT_COUNT] {
        [self.slots[0].ack, self.slots[1].ack, self.slots[2].ack]
    }
}
