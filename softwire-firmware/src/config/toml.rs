//! Minimal TOML parser for the bus configuration
//!
//! Handles only the subset bus.toml uses:
//! - `[bus]` and `[poll]` section headers
//! - Key = value pairs (string, decimal or `0x` integer, boolean)
//! - Comments (# ...)
//!
//! Keys left out keep their defaults.

use softwire_core::config::MAX_ADDRESS;

use super::{FirmwareConfig, PinConfig};

/// Highest GPIO number on the RP2040
const MAX_GPIO: u8 = 29;

/// Largest poll size in bytes
const MAX_POLL_BYTES: u8 = 4;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown section header
    InvalidSection,
    /// Key not valid in its section
    UnknownKey,
    /// Invalid value type or range
    InvalidValue,
    /// Invalid pin string
    InvalidPin,
    /// SCL and SDA on the same GPIO
    SharedPin,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Bus,
    Poll,
}

/// Parse TOML configuration into FirmwareConfig
pub fn parse_config(input: &str) -> Result<FirmwareConfig, ParseError> {
    let mut config = FirmwareConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config)?;
        }
    }

    if config.scl.pin == config.sda.pin {
        return Err(ParseError::SharedPin);
    }
    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "bus" => Ok(Section::Bus),
        "poll" => Ok(Section::Poll),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut FirmwareConfig,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Bus, "scl_pin") => config.scl = parse_pin(value)?,
        (Section::Bus, "sda_pin") => config.sda = parse_pin(value)?,
        (Section::Bus, "frequency_khz") => config.bus.frequency_khz = parse_u32(value)?,
        (Section::Bus, "address") => {
            let address = parse_u8(value)?;
            if address > MAX_ADDRESS {
                return Err(ParseError::InvalidValue);
            }
            config.bus.address = address;
        }
        (Section::Bus, "verbose") => config.bus.verbose = parse_bool(value)?,
        (Section::Bus, "scan_on_boot") => config.scan_on_boot = parse_bool(value)?,
        (Section::Poll, "register") => config.poll.register = parse_u8(value)?,
        (Section::Poll, "bytes") => {
            let bytes = parse_u8(value)?;
            if bytes > MAX_POLL_BYTES {
                return Err(ParseError::InvalidValue);
            }
            config.poll.bytes = bytes;
        }
        (Section::Poll, "interval_ms") => config.poll.interval_ms = parse_u32(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse a decimal or `0x` hexadecimal integer
fn parse_u32(value: &str) -> Result<u32, ParseError> {
    match value.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    }
    .map_err(|_| ParseError::InvalidValue)
}

fn parse_u8(value: &str) -> Result<u8, ParseError> {
    u8::try_from(parse_u32(value)?).map_err(|_| ParseError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a pin string like "gpio4" or "^gpio4"
fn parse_pin(value: &str) -> Result<PinConfig, ParseError> {
    let value = parse_string(value);
    let (pull_up, s) = match value.strip_prefix('^') {
        Some(rest) => (true, rest),
        None => (false, value),
    };

    let pin: u8 = s
        .strip_prefix("gpio")
        .ok_or(ParseError::InvalidPin)?
        .parse()
        .map_err(|_| ParseError::InvalidPin)?;
    if pin > MAX_GPIO {
        return Err(ParseError::InvalidPin);
    }

    Ok(PinConfig { pin, pull_up })
}
