//! Portal Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the display board logic is
//! written against. Chip-specific crates implement them, so the protocol
//! broker, renderer and panel logic stay host-testable.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  portal-core / portal-display           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  portal-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  portal-hal-  │
//!             │   stm32f0     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`word::WordBus`] - 9-bit serial words for the LCD controller
//! - [`pwm::PwmOutput`] - Tone output for the buzzer
//! - [`uart::UartConfig`] - Serial link settings

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod pwm;
pub mod uart;
pub mod word;

// Re-export key traits at crate root for convenience
pub use gpio::{InputPin, OutputPin};
pub use pwm::PwmOutput;
pub use uart::UartConfig;
pub use word::WordBus;
