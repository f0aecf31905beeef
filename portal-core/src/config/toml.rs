//! Simple TOML parser for the panel configuration
//!
//! This is a minimal TOML parser that handles only the subset used by
//! `panel.toml`. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, decimal integer, boolean)
//! - [section] headers
//! - [[line]] array-of-tables headers
//! - Comments (# ...)
//!
//! NOT supported:
//! - Multi-line strings
//! - Inline tables and arrays
//! - Hexadecimal, octal or binary integers
//! - Dotted keys

use portal_protocol::Language;

use super::types::{LineConfig, PanelConfig};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid section header
    InvalidSection,
    /// Invalid value type or out of range
    InvalidValue,
    /// More `[[line]]` tables than display lines
    TooManyItems,
    /// Line geometry does not fit the display
    InvalidLayout,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Firmware,
    Serial,
    Display,
    Line,
    Buzzer,
    Keys,
    Timing,
}

/// Parse TOML configuration into PanelConfig
pub fn parse_config(input: &str) -> Result<PanelConfig, ParseError> {
    let mut config = PanelConfig::default();
    let mut section = Section::Root;

    // Line table being built
    let mut current_line: Option<LineConfig> = None;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Check for section header
        if line.starts_with('[') {
            save_section(&mut config, &mut current_line)?;

            section = parse_section_header(strip_comment(line))?;
            if section == Section::Line {
                current_line = Some(LineConfig::default());
            }
            continue;
        }

        // Parse key = value
        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config, &mut current_line)?;
        }
    }

    // Save final section
    save_section(&mut config, &mut current_line)?;

    config.layout().map_err(|_| ParseError::InvalidLayout)?;
    Ok(config)
}

/// Parse a header line like "[display]" or "[[line]]"
fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    if let Some(inner) = header
        .strip_prefix("[[")
        .and_then(|rest| rest.strip_suffix("]]"))
    {
        return match inner.trim() {
            "line" => Ok(Section::Line),
            _ => Err(ParseError::InvalidSection),
        };
    }

    let inner = header
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or(ParseError::InvalidSection)?;

    match inner.trim() {
        "firmware" => Ok(Section::Firmware),
        "serial" => Ok(Section::Serial),
        "display" => Ok(Section::Display),
        "buzzer" => Ok(Section::Buzzer),
        "keys" => Ok(Section::Keys),
        "timing" => Ok(Section::Timing),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Drop a trailing comment that is not inside a string
fn strip_comment(text: &str) -> &str {
    match text.find('#') {
        Some(hash_pos) if text[..hash_pos].matches('"').count() % 2 == 0 => text[..hash_pos].trim(),
        _ => text,
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(line[eq_pos + 1..].trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        Ok(&value[1..value.len() - 1])
    } else {
        // Allow unquoted strings for simple values
        Ok(value)
    }
}

/// Parse an integer value, allowing `_` separators
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    let mut digits: heapless::String<16> = heapless::String::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a language name
fn parse_language(value: &str) -> Result<Language, ParseError> {
    Language::from_name(parse_string(value)?).ok_or(ParseError::InvalidValue)
}

/// Parse an integer and check it against an inclusive range
fn parse_ranged<T>(value: &str, range: core::ops::RangeInclusive<T>) -> Result<T, ParseError>
where
    T: core::str::FromStr + PartialOrd,
{
    let parsed = parse_int(value)?;
    if range.contains(&parsed) {
        Ok(parsed)
    } else {
        Err(ParseError::InvalidValue)
    }
}

/// Apply a key-value pair to the current section
fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut PanelConfig,
    current_line: &mut Option<LineConfig>,
) -> Result<(), ParseError> {
    match section {
        Section::Firmware => match key {
            "major" => config.firmware.major = parse_ranged(value, 0..=0x1F)?,
            "minor" => config.firmware.minor = parse_ranged(value, 0..=0x1F)?,
            "build" => config.firmware.build = parse_ranged(value, 0..=0x3F)?,
            _ => {}
        },
        Section::Serial => match key {
            "baudrate" | "baud" => config.serial.baudrate = parse_ranged(value, 1..=u32::MAX)?,
            _ => {}
        },
        Section::Display => match key {
            "contrast" => config.display.contrast = parse_int(value)?,
            "backlight" => config.display.backlight = parse_bool(value)?,
            "language" => config.display.language = parse_language(value)?,
            "boot_qr" => config.display.boot_qr = Some(parse_ranged(value, 3..=7)?),
            "qr_offset" => config.display.qr_offset = parse_ranged(value, 0..=83)?,
            "blink_ms" => config.display.blink_ms = parse_ranged(value, 1..=u32::MAX)?,
            _ => {}
        },
        Section::Line => {
            let line = current_line.as_mut().ok_or(ParseError::InvalidSection)?;
            match key {
                "upper_indent" => line.upper_indent = parse_int(value)?,
                "height" => line.height = parse_int(value)?,
                _ => {}
            }
        }
        Section::Buzzer => match key {
            "frequency_hz" => config.buzzer.frequency_hz = parse_ranged(value, 0..=20_000)?,
            "duty_percent" => config.buzzer.duty_percent = parse_ranged(value, 0..=100)?,
            _ => {}
        },
        Section::Keys => match key {
            "debounce_ms" => config.keys.debounce_ms = parse_int(value)?,
            _ => {}
        },
        Section::Timing => match key {
            "tick_ms" => config.timing.tick_ms = parse_ranged(value, 1..=1000)?,
            _ => {}
        },
        Section::Root => {
            // No root-level keys
        }
    }

    Ok(())
}

/// Save the table being built, if any
fn save_section(
    config: &mut PanelConfig,
    current_line: &mut Option<LineConfig>,
) -> Result<(), ParseError> {
    if let Some(line) = current_line.take() {
        config
            .lines
            .push(line)
            .map_err(|_| ParseError::TooManyItems)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_section_header() {
        assert_eq!(parse_section_header("[display]"), Ok(Section::Display));
        assert_eq!(parse_section_header("[ keys ]"), Ok(Section::Keys));
        assert_eq!(parse_section_header("[[line]]"), Ok(Section::Line));
        assert_eq!(
            parse_section_header("[[display]]"),
            Err(ParseError::InvalidSection)
        );
        assert_eq!(
            parse_section_header("[stepper]"),
            Err(ParseError::InvalidSection)
        );
        assert_eq!(parse_section_header("[display"), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(parse_key_value("contrast = 96"), Some(("contrast", "96")));
        assert_eq!(
            parse_key_value("language = \"german\" # boot"),
            Some(("language", "\"german\""))
        );
        assert_eq!(parse_key_value("name = \"a#b\""), Some(("name", "\"a#b\"")));
        assert_eq!(parse_key_value("empty ="), None);
    }

    #[test]
    fn test_parse_values() {
        assert_eq!(parse_int::<u32>("115_200"), Ok(115_200));
        assert_eq!(parse_int::<u8>("256"), Err(ParseError::InvalidValue));
        assert_eq!(parse_bool("true"), Ok(true));
        assert_eq!(parse_bool("yes"), Err(ParseError::InvalidValue));
        assert_eq!(parse_language("\"swedish\""), Ok(Language::Swedish));
        assert_eq!(parse_ranged::<u8>("8", 3..=7), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_parse_minimal_config() {
        let config_str = r#"
# Display board
[firmware]
major = 1
minor = 3
build = 42

[display]
contrast = 96
language = "german"
boot_qr = 5      # shown until the host writes

[[line]]
upper_indent = 0
height = 12

[[line]]
upper_indent = 2
height = 8
"#;

        let config = parse_config(config_str).unwrap();
        assert_eq!(config.firmware.version().word(), (1 << 11) | (3 << 6) | 42);
        assert_eq!(config.display.contrast, 96);
        assert_eq!(config.display.language, Language::German);
        assert_eq!(config.display.boot_qr, Some(5));
        assert_eq!(config.lines.len(), 2);
        assert_eq!(config.lines[1].upper_indent, 2);
        assert_eq!(config.layout().unwrap().top_row(1), 14);

        // Untouched sections keep their defaults
        assert_eq!(config.serial.baudrate, 115_200);
        assert_eq!(config.timing.tick_ms, 8);
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_config(""), Ok(PanelConfig::default()));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(
            parse_config("[display]\nlanguage = \"klingon\""),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[display]\nboot_qr = 9"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(parse_config("[motor]\n"), Err(ParseError::InvalidSection));
        assert_eq!(
            parse_config("[[line]]\nheight = 0"),
            Err(ParseError::InvalidLayout)
        );

        let five_lines = "[[line]]\n[[line]]\n[[line]]\n[[line]]\n[[line]]\n";
        assert_eq!(parse_config(five_lines), Err(ParseError::TooManyItems));
    }
}
