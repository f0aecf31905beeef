//! STM32F0 bindings for the Portal HAL
//!
//! Adapters that put embassy-stm32 peripherals behind the `portal-hal`
//! traits, for the STM32F042 on the display board:
//!
//! - [`gpio`] - backlight, LED and reset outputs, button inputs
//! - [`word`] - bit-banged 9-bit serial bus to the UC1601s
//! - [`pwm`] - buzzer tone on a timer channel
//! - [`uart`] - serial link configuration and error mapping
//!
//! # Features
//!
//! - `stm32f042k6` - STM32F042K6 (display board MCU)
//! - `stm32f042f6` - STM32F042F6 (reduced pin-count variant)
//! - `defmt` - Enable debug formatting support

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod pwm;
pub mod uart;
pub mod word;

pub use gpio::{ActiveLowInput, PushPull};
pub use pwm::PwmTone;
pub use uart::{usart_config, UartBusError};
pub use word::BitBangBus;
