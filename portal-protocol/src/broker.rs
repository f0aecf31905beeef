//! Command broker
//!
//! Ties the receiver, the slot ring and the transmitter together and
//! dispatches validated requests to a [`CommandHandler`].

use crate::command::{BuzzerCtrl, BuzzerParam, Command, Language, Reply, Status};
use crate::rx::{Receiver, RxError, RxEvent};
use crate::slot::{AckStatus, SlotRing};
use crate::tx::Transmitter;

/// Application side of the protocol
///
/// Called once per valid request, after its terminating ETX.
pub trait CommandHandler {
    /// Drive the external LED and return the key mask
    fn read_keys(&mut self, led: bool) -> u8;

    /// Replace the content of one display line
    fn write_line(&mut self, line: u8, content: &[u8; crate::command::LINE_CONTENT_LEN]);

    /// Switch the backlight
    fn set_backlight(&mut self, on: bool);

    /// Clear the display
    fn clear(&mut self);

    /// Select the glyph set
    fn set_language(&mut self, language: Language);

    /// Version word reported by GetVersion
    fn version(&self) -> u16;

    /// Update a buzzer parameter
    fn buzzer_param(&mut self, param: BuzzerParam);

    /// Switch or pulse the buzzer
    fn buzzer_ctrl(&mut self, ctrl: BuzzerCtrl);
}

/// Run a validated request and collect the response data
pub fn dispatch<H: CommandHandler + ?Sized>(handler: &mut H, command: &Command) -> Reply {
    match *command {
        Command::ReadKeys { led } => Reply::Keys(handler.read_keys(led)),
        Command::WriteLine { line, ref content } => {
            handler.write_line(line, content);
            Reply::Empty
        }
        Command::SetBacklight(on) => {
            handler.set_backlight(on);
            Reply::Empty
        }
        Command::Clear => {
            handler.clear();
            Reply::Empty
        }
        Command::SetLanguage(language) => {
            handler.set_language(language);
            Reply::Empty
        }
        Command::GetVersion => Reply::Version(handler.version()),
        Command::BuzzerParam(param) => {
            handler.buzzer_param(param);
            Reply::BuzzerParam(param)
        }
        Command::BuzzerCtrl(ctrl) => {
            handler.buzzer_ctrl(ctrl);
            Reply::Empty
        }
    }
}

/// Summary of a finished request, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Receipt {
    /// Packet number as received
    pub packet_number: u8,
    /// Command byte as received
    pub command: u8,
    /// Response status
    pub status: Status,
    /// Rejection reason, if any
    pub error: Option<RxError>,
}

/// Outcome of feeding one byte to the broker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Received {
    /// First byte of a response to hand to the transport
    pub tx: Option<u8>,
    /// Set when a frame finished (accepted or rejected)
    pub receipt: Option<Receipt>,
    /// A frame was abandoned or refused without response
    pub dropped: bool,
}

/// Protocol endpoint of the display board
#[derive(Debug, Clone, Default)]
pub struct Broker {
    ring: SlotRing,
    rx: Receiver,
    tx: Transmitter,
}

impl Broker {
    /// Create an idle broker
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one received byte
    ///
    /// Valid requests are dispatched to `handler` before their response is
    /// armed. If the transmitter is idle and a response got armed, the first
    /// response byte is returned in [`Received::tx`].
    pub fn receive<H: CommandHandler + ?Sized>(&mut self, byte: u8, handler: &mut H) -> Received {
        let mut received = Received::default();
        match self.rx.receive(byte, &mut self.ring) {
            RxEvent::Pending => return received,
            RxEvent::Discarded | RxEvent::Refused => {
                received.dropped = true;
                return received;
            }
            RxEvent::Complete => {
                let slot = self.ring.rx_slot_mut();
                if let Some(command) = slot.command {
                    slot.reply = dispatch(handler, &command);
                }
                slot.ack = AckStatus::ToBeSend;
                received.receipt = Some(self.receipt(None));
            }
            RxEvent::Rejected(error) => {
                received.receipt = Some(self.receipt(Some(error)));
            }
        }
        received.tx = self.tx.kick(&mut self.ring);
        received
    }

    /// The transport finished sending the previous byte
    ///
    /// Returns the next byte to send, or `None` once every armed response
    /// went out.
    pub fn byte_sent(&mut self) -> Option<u8> {
        self.tx.next_byte(&mut self.ring)
    }

    /// True while a response is being streamed
    pub fn is_transmitting(&self) -> bool {
        self.tx.is_transmitting()
    }

    /// True between STX and the end of a frame
    pub fn in_frame(&self) -> bool {
        self.rx.in_frame()
    }

    /// Response progress of every slot
    pub fn acks(&self) -> [AckStatus; crate::slot::SLOT_COUNT] {
        self.ring.acks()
    }

    fn receipt(&self, error: Option<RxError>) -> Receipt {
        let slot = self.ring.rx_slot();
        Receipt {
            packet_number: slot.packet_number,
            command: slot.raw_command,
            status: slot.status,
            error,
        }
    }
}
