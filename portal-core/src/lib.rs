//! Board-agnostic logic of the display board
//!
//! This crate contains everything that sits between the protocol broker,
//! the renderer and the hardware traits:
//!
//! - [`Panel`]: single owner of all state, driven by [`Event`]s
//! - [`Device`]: command handler over the screen, buzzer and outputs
//! - [`Beeper`]: buzzer state machine (continuous tone, cyclic beeps)
//! - [`Debouncer`]: front panel key mask
//! - Configuration types and the on-device TOML subset parser

#![no_std]
#![deny(unsafe_code)]

pub mod beeper;
pub mod clock;
pub mod config;
pub mod device;
pub mod event;
pub mod keys;
pub mod panel;

pub use beeper::Beeper;
pub use device::Device;
pub use event::{Event, Output};
pub use keys::Debouncer;
pub use panel::Panel;
