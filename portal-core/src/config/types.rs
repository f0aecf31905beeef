//! Configuration type definitions
//!
//! These types mirror `panel.toml`. The firmware parses the file on the
//! device with [`super::toml::parse_config`]; with the `serde` feature the
//! same types deserialize from the full TOML grammar, which the build
//! script uses to cross-check the file.

use heapless::Vec;
use portal_display::{LayoutError, LineLayout, LineSpec, LINES};
use portal_protocol::{Language, Version};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::beeper::{DEFAULT_DUTY_PERCENT, DEFAULT_FREQUENCY_HZ};
use crate::keys::DEFAULT_DEBOUNCE_MS;

/// Firmware identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FirmwareConfig {
    /// Major version (5 bits)
    pub major: u8,
    /// Minor version (5 bits)
    pub minor: u8,
    /// Build number (6 bits)
    pub build: u8,
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        let version = Version::default();
        Self {
            major: version.major,
            minor: version.minor,
            build: version.build,
        }
    }
}

impl FirmwareConfig {
    /// Version reported by GetVersion
    pub fn version(&self) -> Version {
        Version {
            major: self.major,
            minor: self.minor,
            build: self.build,
        }
    }
}

/// Host link settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SerialConfig {
    /// Baud rate, 8N1
    pub baudrate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self { baudrate: 115_200 }
    }
}

/// LCD settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DisplayConfig {
    /// Bias potentiometer value
    pub contrast: u8,
    /// Backlight state at power-up
    pub backlight: bool,
    /// Glyph set at power-up
    pub language: Language,
    /// QR code version shown until the first line arrives
    pub boot_qr: Option<u8>,
    /// First column of the boot QR code
    pub qr_offset: u8,
    /// Blink period in ms
    pub blink_ms: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            contrast: 120,
            backlight: true,
            language: Language::English,
            boot_qr: None,
            qr_offset: 41,
            blink_ms: portal_display::blink::BLINK_PERIOD_MS,
        }
    }
}

/// Geometry of one text line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LineConfig {
    /// Blank rows above the line
    pub upper_indent: u8,
    /// Line height in rows
    pub height: u8,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            upper_indent: 0,
            height: 12,
        }
    }
}

/// Buzzer power-up parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BuzzerConfig {
    /// Tone frequency in Hz
    pub frequency_hz: u32,
    /// Duty cycle in percent
    pub duty_percent: u8,
}

impl Default for BuzzerConfig {
    fn default() -> Self {
        Self {
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            duty_percent: DEFAULT_DUTY_PERCENT,
        }
    }
}

/// Front panel key settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KeysConfig {
    /// Release delay in ms
    pub debounce_ms: u32,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

/// Scheduler settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingConfig {
    /// Tick period in ms
    pub tick_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self { tick_ms: 8 }
    }
}

/// Complete board configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PanelConfig {
    pub firmware: FirmwareConfig,
    pub serial: SerialConfig,
    pub display: DisplayConfig,
    /// Line geometry; empty means the default layout
    #[cfg_attr(feature = "serde", serde(rename = "line"))]
    pub lines: Vec<LineConfig, LINES>,
    pub buzzer: BuzzerConfig,
    pub keys: KeysConfig,
    pub timing: TimingConfig,
}

impl PanelConfig {
    /// Validated line layout
    ///
    /// Lines missing from the `[[line]]` list keep the default geometry.
    pub fn layout(&self) -> Result<LineLayout, LayoutError> {
        let fallback = LineConfig::default();
        let specs = core::array::from_fn(|i| {
            let line = self.lines.get(i).unwrap_or(&fallback);
            LineSpec::new(line.upper_indent, line.height)
        });
        LineLayout::new(specs)
    }
}
