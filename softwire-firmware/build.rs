//! Build script for softwire-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates bus.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Highest 7-bit I2C address
const MAX_ADDRESS: i64 = 0x7F;

/// Highest GPIO number on the RP2040
const MAX_GPIO: u8 = 29;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // cortex-m-rt and defmt linker scripts
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate bus.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=bus.toml");

    let config_path = Path::new("bus.toml");
    if !config_path.exists() {
        fail(
            "bus.toml not found!",
            &["The firmware compiles its bus configuration from bus.toml.".into()],
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read bus.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in bus.toml",
            &e.to_string().lines().map(String::from).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();
    validate_bus(&config, &mut errors);
    validate_poll(&config, &mut errors);

    if !errors.is_empty() {
        fail("Invalid bus configuration", &errors);
    }

    println!("cargo:warning=bus.toml validated successfully");
}

/// Validate the [bus] section
fn validate_bus(config: &toml::Value, errors: &mut Vec<String>) {
    let bus = match config.get("bus") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[bus] must be a table".into());
            return;
        }
        None => {
            errors.push("Missing [bus] section".into());
            return;
        }
    };

    for key in bus.keys() {
        if ![
            "scl_pin",
            "sda_pin",
            "frequency_khz",
            "address",
            "verbose",
            "scan_on_boot",
        ]
        .contains(&key.as_str())
        {
            errors.push(format!("[bus] unknown key '{}'", key));
        }
    }

    let scl = check_pin(bus.get("scl_pin"), "scl_pin", errors);
    let sda = check_pin(bus.get("sda_pin"), "sda_pin", errors);
    if scl.is_some() && scl == sda {
        errors.push("[bus] scl_pin and sda_pin must differ".into());
    }

    match bus.get("address") {
        Some(toml::Value::Integer(address)) if (0..=MAX_ADDRESS).contains(address) => {}
        Some(_) => errors.push("[bus] address must be a 7-bit integer (0x00-0x7F)".into()),
        None => {}
    }

    match bus.get("frequency_khz") {
        Some(toml::Value::Integer(khz)) if *khz >= 0 && *khz <= u32::MAX as i64 => {}
        Some(_) => errors.push("[bus] frequency_khz must be a non-negative integer".into()),
        None => {}
    }

    for key in ["verbose", "scan_on_boot"] {
        if let Some(value) = bus.get(key) {
            if !value.is_bool() {
                errors.push(format!("[bus] {} must be true or false", key));
            }
        }
    }
}

/// Validate the optional [poll] section
fn validate_poll(config: &toml::Value, errors: &mut Vec<String>) {
    let poll = match config.get("poll") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[poll] must be a table".into());
            return;
        }
        None => return,
    };

    for key in poll.keys() {
        if !["register", "bytes", "interval_ms"].contains(&key.as_str()) {
            errors.push(format!("[poll] unknown key '{}'", key));
        }
    }

    match poll.get("register") {
        Some(toml::Value::Integer(reg)) if (0..=0xFF).contains(reg) => {}
        Some(_) => errors.push("[poll] register must be 0x00-0xFF".into()),
        None => {}
    }

    match poll.get("bytes") {
        Some(toml::Value::Integer(bytes)) if (0..=4).contains(bytes) => {}
        Some(_) => errors.push("[poll] bytes must be 0-4".into()),
        None => {}
    }

    match poll.get("interval_ms") {
        Some(toml::Value::Integer(ms)) if *ms > 0 && *ms <= u32::MAX as i64 => {}
        Some(_) => errors.push("[poll] interval_ms must be a positive integer".into()),
        None => {}
    }
}

/// Check a "gpioNN" / "^gpioNN" pin string, returning the GPIO number
fn check_pin(value: Option<&toml::Value>, key: &str, errors: &mut Vec<String>) -> Option<u8> {
    let s = match value {
        Some(toml::Value::String(s)) => s,
        Some(_) => {
            errors.push(format!("[bus] {} must be a string like \"gpio4\"", key));
            return None;
        }
        None => return None,
    };

    let pin = s
        .trim_start_matches('^')
        .strip_prefix("gpio")
        .and_then(|n| n.parse::<u8>().ok())
        .filter(|&n| n <= MAX_GPIO);

    if pin.is_none() {
        errors.push(format!("[bus] {} '{}' is not gpio0-gpio{}", key, s, MAX_GPIO));
    }
    pin
}

/// Abort the build with a boxed error message
fn fail(title: &str, lines: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        lines
            .iter()
            .map(|line| format!("║  • {:<62} ║", line))
            .collect::<Vec<_>>()
            .join("\n")
    );
}
