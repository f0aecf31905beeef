//! Command catalog
//!
//! Each command id maps to a fixed request and response payload size and
//! a validator for the request payload. Sizes and validation are matched
//! on [`CommandId`]; a decoded request becomes a [`Command`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Status bit: request accepted
pub const STATUS_NO_ERR: u8 = 0x40;

/// Status bit: request rejected
pub const STATUS_ERR: u8 = 0x80;

/// Bits of the command byte carrying the command id
pub const ID_MASK: u8 = 0x3F;

/// Content bytes of one display line: left icon, format, 16 glyphs, right icon
pub const LINE_CONTENT_LEN: usize = 19;

/// Number of addressable display lines
pub const LINE_COUNT: u8 = 4;

/// Frequency step of [`BuzzerParam::Frequency`] in Hz
pub const FREQUENCY_STEP_HZ: u32 = 100;

/// Largest frequency code (20 kHz)
pub const MAX_FREQUENCY_CODE: u8 = 0xC8;

/// Largest duty cycle in percent
pub const MAX_DUTY_PERCENT: u8 = 0x64;

/// Time step of beep on/off durations in milliseconds
pub const BEEP_STEP_MS: u32 = 128;

/// Largest beep cycle count
pub const MAX_BEEP_CYCLES: u8 = 0x3F;

/// Response status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// Request decoded and dispatched
    #[default]
    NoError,
    /// Request rejected (decode, validation or CRC failure)
    Error,
}

impl Status {
    /// Status bits as carried in the command byte
    pub const fn bits(self) -> u8 {
        match self {
            Status::NoError => STATUS_NO_ERR,
            Status::Error => STATUS_ERR,
        }
    }
}

/// Command identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CommandId {
    /// Read the button state, drive the external LED
    ReadKeys = 0x01,
    /// Write one display line
    WriteLine = 0x02,
    /// Switch the backlight
    SetBacklight = 0x03,
    /// Clear the display
    Clear = 0x04,
    /// Select the language glyph set
    SetLanguage = 0x05,
    /// Report the firmware version
    GetVersion = 0x06,
    /// Configure buzzer frequency or duty cycle
    BuzzerParam = 0x07,
    /// Switch or pulse the buzzer
    BuzzerCtrl = 0x08,
}

impl CommandId {
    /// Catalog size (one past the largest id)
    pub const COUNT: u8 = 9;

    /// Look up a bare command id (status bits must be clear)
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0x01 => Some(CommandId::ReadKeys),
            0x02 => Some(CommandId::WriteLine),
            0x03 => Some(CommandId::SetBacklight),
            0x04 => Some(CommandId::Clear),
            0x05 => Some(CommandId::SetLanguage),
            0x06 => Some(CommandId::GetVersion),
            0x07 => Some(CommandId::BuzzerParam),
            0x08 => Some(CommandId::BuzzerCtrl),
            _ => None,
        }
    }

    /// Raw command id
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Request payload length in bytes
    pub const fn request_len(self) -> usize {
        match self {
            CommandId::ReadKeys => 1,
            CommandId::WriteLine => 1 + LINE_CONTENT_LEN,
            CommandId::SetBacklight => 1,
            CommandId::Clear => 0,
            CommandId::SetLanguage => 1,
            CommandId::GetVersion => 0,
            CommandId::BuzzerParam => 2,
            CommandId::BuzzerCtrl => 3,
        }
    }

    /// Response payload length in bytes
    pub const fn response_len(self) -> usize {
        match self {
            CommandId::ReadKeys => 1,
            CommandId::WriteLine => 0,
            CommandId::SetBacklight => 0,
            CommandId::Clear => 0,
            CommandId::SetLanguage => 0,
            CommandId::GetVersion => 2,
            CommandId::BuzzerParam => 2,
            CommandId::BuzzerCtrl => 0,
        }
    }
}

/// Display language, selects the glyphs behind codes 0x03..=0x08
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum Language {
    German = 0,
    Dutch = 1,
    #[default]
    English = 2,
    Italian = 3,
    French = 4,
    Spanish = 5,
    Swedish = 6,
}

impl Language {
    /// Decode the wire value
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Language::German),
            1 => Some(Language::Dutch),
            2 => Some(Language::English),
            3 => Some(Language::Italian),
            4 => Some(Language::French),
            5 => Some(Language::Spanish),
            6 => Some(Language::Swedish),
            _ => None,
        }
    }

    /// Look up a language by its lowercase English name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "german" => Some(Language::German),
            "dutch" => Some(Language::Dutch),
            "english" => Some(Language::English),
            "italian" => Some(Language::Italian),
            "french" => Some(Language::French),
            "spanish" => Some(Language::Spanish),
            "swedish" => Some(Language::Swedish),
            _ => None,
        }
    }
}

/// Buzzer parameter update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BuzzerParam {
    /// Tone frequency in 100 Hz steps (0..=0xC8)
    Frequency(u8),
    /// Duty cycle in percent (0..=100)
    Duty(u8),
}

impl BuzzerParam {
    /// Wire type code
    pub const fn type_code(self) -> u8 {
        match self {
            BuzzerParam::Frequency(_) => 0,
            BuzzerParam::Duty(_) => 1,
        }
    }

    /// Wire value
    pub const fn value(self) -> u8 {
        match self {
            BuzzerParam::Frequency(v) | BuzzerParam::Duty(v) => v,
        }
    }

    fn decode(type_code: u8, value: u8) -> Option<Self> {
        match type_code {
            0 if value <= MAX_FREQUENCY_CODE => Some(BuzzerParam::Frequency(value)),
            1 if value <= MAX_DUTY_PERCENT => Some(BuzzerParam::Duty(value)),
            _ => None,
        }
    }
}

/// Buzzer control action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BuzzerCtrl {
    /// Silence the buzzer and cancel any running beep sequence
    Off,
    /// Sound continuously
    On,
    /// Sound `cycles` times for `on` × 128 ms, pausing `off` × 128 ms
    Beep {
        /// Number of on/off cycles (0..=63)
        cycles: u8,
        /// On time in 128 ms steps
        on: u8,
        /// Off time in 128 ms steps (at least 1)
        off: u8,
    },
}

impl BuzzerCtrl {
    const ACTION_MASK: u8 = 0xC0;
    const ACTION_OFF: u8 = 0x00;
    const ACTION_ON: u8 = 0x40;
    const ACTION_BEEP: u8 = 0x80;

    fn decode(data: &[u8]) -> Option<Self> {
        let cycles = data[0] & MAX_BEEP_CYCLES;
        match data[0] & Self::ACTION_MASK {
            Self::ACTION_OFF => Some(BuzzerCtrl::Off),
            Self::ACTION_ON => Some(BuzzerCtrl::On),
            Self::ACTION_BEEP if data[2] >= 1 => Some(BuzzerCtrl::Beep {
                cycles,
                on: data[1],
                off: data[2],
            }),
            _ => None,
        }
    }

    /// Encode as the three request bytes
    pub const fn encode(self) -> [u8; 3] {
        match self {
            BuzzerCtrl::Off => [Self::ACTION_OFF, 0, 0],
            BuzzerCtrl::On => [Self::ACTION_ON, 0, 0],
            BuzzerCtrl::Beep { cycles, on, off } => {
                [Self::ACTION_BEEP | (cycles & MAX_BEEP_CYCLES), on, off]
            }
        }
    }
}

/// A validated request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Report the key mask; `led` drives the external LED
    ReadKeys { led: bool },
    /// Replace the content of one line
    WriteLine {
        line: u8,
        content: [u8; LINE_CONTENT_LEN],
    },
    /// Switch the backlight
    SetBacklight(bool),
    /// Clear the display
    Clear,
    /// Select the language glyph set
    SetLanguage(Language),
    /// Report the firmware version
    GetVersion,
    /// Update a buzzer parameter
    BuzzerParam(BuzzerParam),
    /// Switch or pulse the buzzer
    BuzzerCtrl(BuzzerCtrl),
}

impl Command {
    /// Validate a request payload of exactly `id.request_len()` bytes
    pub fn decode(id: CommandId, data: &[u8]) -> Option<Self> {
        if data.len() != id.request_len() {
            return None;
        }
        match id {
            CommandId::ReadKeys => match data[0] {
                0 => Some(Command::ReadKeys { led: false }),
                1 => Some(Command::ReadKeys { led: true }),
                _ => None,
            },
            CommandId::WriteLine => {
                let mut content = [0u8; LINE_CONTENT_LEN];
                content.copy_from_slice(&data[1..]);
                Some(Command::WriteLine {
                    line: data[0],
                    content,
                })
            }
            CommandId::SetBacklight => match data[0] {
                0 => Some(Command::SetBacklight(false)),
                1 => Some(Command::SetBacklight(true)),
                _ => None,
            },
            CommandId::Clear => Some(Command::Clear),
            CommandId::SetLanguage => Language::from_code(data[0]).map(Command::SetLanguage),
            CommandId::GetVersion => Some(Command::GetVersion),
            CommandId::BuzzerParam => {
                BuzzerParam::decode(data[0], data[1]).map(Command::BuzzerParam)
            }
            CommandId::BuzzerCtrl => BuzzerCtrl::decode(data).map(Command::BuzzerCtrl),
        }
    }

    /// Catalog entry of this command
    pub const fn id(&self) -> CommandId {
        match self {
            Command::ReadKeys { .. } => CommandId::ReadKeys,
            Command::WriteLine { .. } => CommandId::WriteLine,
            Command::SetBacklight(_) => CommandId::SetBacklight,
            Command::Clear => CommandId::Clear,
            Command::SetLanguage(_) => CommandId::SetLanguage,
            Command::GetVersion => CommandId::GetVersion,
            Command::BuzzerParam(_) => CommandId::BuzzerParam,
            Command::BuzzerCtrl(_) => CommandId::BuzzerCtrl,
        }
    }
}

/// Firmware version word: 5 bits major, 5 bits minor, 6 bits build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub build: u8,
}

impl Default for Version {
    fn default() -> Self {
        Self {
            major: 0,
            minor: 2,
            build: 10,
        }
    }
}

impl Version {
    /// Pack into the 16-bit wire representation
    pub const fn word(&self) -> u16 {
        ((self.major as u16 & 0x1F) << 11)
            | ((self.minor as u16 & 0x1F) << 6)
            | (self.build as u16 & 0x3F)
    }

    /// Unpack the 16-bit wire representation
    pub const fn from_word(word: u16) -> Self {
        Self {
            major: (word >> 11) as u8 & 0x1F,
            minor: (word >> 6) as u8 & 0x1F,
            build: word as u8 & 0x3F,
        }
    }

    /// Check every field fits its bit width
    pub const fn is_valid(&self) -> bool {
        self.major <= 0x1F && self.minor <= 0x1F && self.build <= 0x3F
    }
}

/// Data produced by the dispatcher for the response payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    /// No response payload
    #[default]
    Empty,
    /// Key mask for ReadKeys
    Keys(u8),
    /// Version word for GetVersion
    Version(u16),
    /// Echo of the accepted BuzzerParam request
    BuzzerParam(BuzzerParam),
}

impl Reply {
    /// Write the response payload into `out`, returning its length
    pub fn write_payload(&self, out: &mut [u8; 2]) -> usize {
        match *self {
            Reply::Empty => 0,
            Reply::Keys(mask) => {
                out[0] = mask;
                1
            }
            Reply::Version(word) => {
                *out = word.to_be_bytes();
                2
            }
            Reply::BuzzerParam(param) => {
                *out = [param.type_code(), param.value()];
                2
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids() {
        assert_eq!(CommandId::from_id(0), None);
        assert_eq!(CommandId::from_id(CommandId::COUNT), None);
        for id in 1..CommandId::COUNT {
            let cmd = CommandId::from_id(id).unwrap();
            assert_eq!(cmd.id(), id);
            assert!(cmd.request_len() <= crate::frame::MAX_PAYLOAD_LEN);
            assert!(cmd.response_len() <= 2);
        }
    }

    #[test]
    fn test_zero_payload_commands() {
        assert_eq!(CommandId::Clear.request_len(), 0);
        assert_eq!(CommandId::GetVersion.request_len(), 0);
        assert_eq!(CommandId::WriteLine.request_len(), 20);
    }

    #[test]
    fn test_buzzer_param_limits() {
        assert_eq!(
            Command::decode(CommandId::BuzzerParam, &[0, 0xC8]),
            Some(Command::BuzzerParam(BuzzerParam::Frequency(0xC8)))
        );
        assert_eq!(Command::decode(CommandId::BuzzerParam, &[0, 0xC9]), None);
        assert_eq!(
            Command::decode(CommandId::BuzzerParam, &[1, 100]),
            Some(Command::BuzzerParam(BuzzerParam::Duty(100)))
        );
        assert_eq!(Command::decode(CommandId::BuzzerParam, &[1, 101]), None);
        assert_eq!(Command::decode(CommandId::BuzzerParam, &[2, 0]), None);
    }

    #[test]
    fn test_buzzer_ctrl_actions() {
        assert_eq!(
            Command::decode(CommandId::BuzzerCtrl, &[0x3F, 0, 0]),
            Some(Command::BuzzerCtrl(BuzzerCtrl::Off))
        );
        assert_eq!(
            Command::decode(CommandId::BuzzerCtrl, &[0x40, 0, 0]),
            Some(Command::BuzzerCtrl(BuzzerCtrl::On))
        );
        assert_eq!(
            Command::decode(CommandId::BuzzerCtrl, &[0x83, 0x02, 0x01]),
            Some(Command::BuzzerCtrl(BuzzerCtrl::Beep {
                cycles: 3,
                on: 2,
                off: 1
            }))
        );
        // Beep needs a non-zero off time
        assert_eq!(Command::decode(CommandId::BuzzerCtrl, &[0x83, 0x02, 0x00]), None);
        // Action 3 is unused
        assert_eq!(Command::decode(CommandId::BuzzerCtrl, &[0xC0, 0, 1]), None);

        let beep = BuzzerCtrl::Beep {
            cycles: 5,
            on: 0,
            off: 9,
        };
        assert_eq!(
            Command::decode(CommandId::BuzzerCtrl, &beep.encode()),
            Some(Command::BuzzerCtrl(beep))
        );
    }

    #[test]
    fn test_flag_validators() {
        assert_eq!(
            Command::decode(CommandId::ReadKeys, &[1]),
            Some(Command::ReadKeys { led: true })
        );
        assert_eq!(Command::decode(CommandId::ReadKeys, &[2]), None);
        assert_eq!(Command::decode(CommandId::SetBacklight, &[2]), None);
        assert_eq!(
            Command::decode(CommandId::SetLanguage, &[6]),
            Some(Command::SetLanguage(Language::Swedish))
        );
        assert_eq!(Command::decode(CommandId::SetLanguage, &[7]), None);
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert_eq!(Command::decode(CommandId::SetBacklight, &[]), None);
        assert_eq!(Command::decode(CommandId::Clear, &[0]), None);
    }

    #[test]
    fn test_version_word() {
        let version = Version::default();
        assert_eq!(version.word(), (2 << 6) | 10);
        assert_eq!(Version::from_word(version.word()), version);

        let max = Version {
            major: 31,
            minor: 31,
            build: 63,
        };
        assert_eq!(max.word(), 0xFFFF);
        assert!(!Version {
            major: 32,
            minor: 0,
            build: 0
        }
        .is_valid());
    }

    #[test]
    fn test_reply_payload() {
        let mut out = [0u8; 2];
        assert_eq!(Reply::Empty.write_payload(&mut out), 0);
        assert_eq!(Reply::Keys(0x05).write_payload(&mut out), 1);
        assert_eq!(out[0], 0x05);
        assert_eq!(Reply::Version(0x1234).write_payload(&mut out), 2);
        assert_eq!(out, [0x12, 0x34]);
        assert_eq!(
            Reply::BuzzerParam(BuzzerParam::Duty(0x32)).write_payload(&mut out),
            2
        );
        assert_eq!(out, [0x01, 0x32]);
    }
}
