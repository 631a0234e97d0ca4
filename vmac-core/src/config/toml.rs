//! Simple TOML parser for bridge configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! `bridge.toml`. It does NOT support the full TOML language.
//!
//! Supported features:
//! - [link] and [video] section headers
//! - Key = integer pairs, decimal or `0x` hex, `_` separators allowed
//! - Comments (# ...), including after a value
//!
//! NOT supported:
//! - Strings, floats, booleans, arrays, inline tables
//! - Dotted keys or nested sections

use super::{BridgeConfig, LinkConfig, VideoConfig};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Section header other than [link] or [video]
    InvalidSection,
    /// Line is neither a header nor `key = value`
    InvalidLine,
    /// Value is not an integer
    InvalidValue,
    /// Integer does not fit the field
    OutOfRange,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Link,
    Video,
}

/// Parse TOML configuration into a BridgeConfig
///
/// Keys that are absent keep their default value. Unknown keys are ignored
/// so older firmware accepts newer configuration files.
pub fn parse_config(input: &str) -> Result<BridgeConfig, ParseError> {
    let mut config = BridgeConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        match section {
            Section::Root => {}
            Section::Link => apply_link(&mut config.link, key, value)?,
            Section::Video => apply_video(&mut config.video, key, value)?,
        }
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "link" => Ok(Section::Link),
        "video" => Ok(Section::Video),
        _ => Err(ParseError::InvalidSection),
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let (key, value) = (key.trim(), value.trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn apply_link(link: &mut LinkConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "baudrate" => link.baudrate = parse_int(value)?,
        "payload_capacity" => link.payload_capacity = parse_int(value)?,
        "discard_timeout_ms" => link.discard_timeout_ms = parse_int(value)?,
        "poll_interval_ms" => link.poll_interval_ms = parse_int(value)?,
        _ => {}
    }
    Ok(())
}

fn apply_video(video: &mut VideoConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "width" => video.width = parse_int(value)?,
        "height" => video.height = parse_int(value)?,
        "x_offset" => video.x_offset = parse_int(value)?,
        "y_offset" => video.y_offset = parse_int(value)?,
        "foreground" => video.foreground = parse_int(value)?,
        "background" => video.background = parse_int(value)?,
        _ => {}
    }
    Ok(())
}

/// Parse a decimal or `0x` hex integer and narrow it to the field type
fn parse_int<T: TryFrom<i64>>(value: &str) -> Result<T, ParseError> {
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };

    let (radix, digits) = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => (16, hex),
        None => (10, digits),
    };

    if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') {
        return Err(ParseError::InvalidValue);
    }

    let mut magnitude: i64 = 0;
    for c in digits.chars().filter(|&c| c != '_') {
        let digit = c.to_digit(radix).ok_or(ParseError::InvalidValue)?;
        magnitude = magnitude
            .checked_mul(i64::from(radix))
            .and_then(|m| m.checked_add(i64::from(digit)))
            .ok_or(ParseError::OutOfRange)?;
    }

    let signed = if negative { -magnitude } else { magnitude };
    T::try_from(signed).map_err(|_| ParseError::OutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_matches_defaults() {
        let config = parse_config(include_str!("../../../vmac-firmware/bridge.toml")).unwrap();
        assert_eq!(config, BridgeConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let input = r#"
[video]
x_offset = 0
y_offset = 0 # top-left
"#;
        let config = parse_config(input).unwrap();
        assert_eq!(config.video.x_offset, 0);
        assert_eq!(config.video.y_offset, 0);
        assert_eq!(config.video.width, 512);
        assert_eq!(config.link, LinkConfig::default());
    }

    #[test]
    fn test_hex_and_separators() {
        let input = r#"
[link]
baudrate = 1_000_000
[video]
foreground = 0x07E0
background = 0X001f
"#;
        let config = parse_config(input).unwrap();
        assert_eq!(config.link.baudrate, 1_000_000);
        assert_eq!(config.video.foreground, 0x07E0);
        assert_eq!(config.video.background, 0x001F);
    }

    #[test]
    fn test_unknown_section_rejected() {
        assert_eq!(
            parse_config("[audio]\nvolume = 3\n"),
            Err(ParseError::InvalidSection)
        );
    }

    #[test]
    fn test_bad_values_rejected() {
        assert_eq!(
            parse_config("[video]\nwidth = wide\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[video]\nforeground = 0x10000\n"),
            Err(ParseError::OutOfRange)
        );
        assert_eq!(
            parse_config("[link]\nbaudrate = -1\n"),
            Err(ParseError::OutOfRange)
        );
        assert_eq!(parse_config("[link]\nbaudrate\n"), Err(ParseError::InvalidLine));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config = parse_config("[link]\nparity = 0\n").unwrap();
        assert_eq!(config, BridgeConfig::default());
    }
}
