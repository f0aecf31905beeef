//! Display board communication protocol
//!
//! This crate implements the serial protocol between the gate controller
//! (host) and the display board. Every field travels as upper-case
//! ASCII-hex, most significant nibble first:
//!
//! ```text
//! ┌─────┬────────┬─────────┬──────────────┬────────┬─────┬─────┐
//! │ STX │ PN     │ CMD     │ PAYLOAD      │ CRC16  │ ETX │ NUL │
//! │ 02  │ 2 hex  │ 2 hex   │ 0–40 hex     │ 4 hex  │ 03  │ 00  │
//! └─────┴────────┴─────────┴──────────────┴────────┴─────┴─────┘
//! ```
//!
//! The CRC is CRC-16/ARC over the ASCII characters of PN, CMD and PAYLOAD.
//! The response echoes the packet number and the command id with the
//! status bits (`0x40` ok, `0x80` error) set.
//!
//! The [`Broker`] owns a three-slot request ring and is driven one byte
//! at a time: [`Broker::receive`] for each received byte and
//! [`Broker::byte_sent`] whenever the transport finished sending one.

#![no_std]
#![deny(unsafe_code)]

pub mod broker;
pub mod command;
pub mod crc;
pub mod frame;
pub mod rx;
pub mod slot;
pub mod tx;

pub use broker::{Broker, CommandHandler, Received, Receipt};
pub use command::{
    BuzzerCtrl, BuzzerParam, Command, CommandId, Language, Reply, Status, Version,
    LINE_CONTENT_LEN,
};
pub use crc::Crc16Arc;
pub use frame::{FrameError, ETX, MAX_PAYLOAD_LEN, NUL, STX};
pub use rx::RxError;
pub use slot::AckStatus;
