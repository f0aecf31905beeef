//! Configuration
//!
//! Board configuration lives in `panel.toml`, embedded in the firmware
//! image and parsed at boot.

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ParseError};
pub use types::*;
