//! softwire - bit-banged I2C bus firmware
//!
//! Brings up one software I2C bus on the GPIOs named in bus.toml, scans it
//! once, then polls a register on the configured target and logs the value
//! over defmt.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::{Delay, Duration, Ticker};
use {defmt_rtt as _, panic_probe as _};

use softwire_core::{DefmtSink, SoftI2c};
use softwire_hal_rp2040::pin_bank;

use crate::config::{parse_config, FirmwareConfig};

mod config;

/// Bus configuration compiled into the firmware
/// Edit bus.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../bus.toml");

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("softwire firmware starting...");

    let p = embassy_rp::init(Default::default());

    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            warn!("bus.toml rejected ({}), using defaults", e);
            FirmwareConfig::default()
        }
    };
    info!(
        "Bus: scl=gpio{} sda=gpio{} {} kHz, target {=u8:#x}, stretch budget {} us",
        config.scl.pin,
        config.sda.pin,
        config.bus.frequency_khz,
        config.bus.address,
        config.stretch_budget_us()
    );

    let mut bank = pin_bank!(p);
    let lines = bank
        .take_line(config.scl.pin, config.scl.pull())
        .and_then(|scl| Ok((scl, bank.take_line(config.sda.pin, config.sda.pull())?)));
    let (scl, sda) = match lines {
        Ok(lines) => lines,
        Err(e) => {
            error!("Bus pins unavailable: {}", e);
            return;
        }
    };

    let mut i2c = match SoftI2c::with_sink(scl, sda, Delay, config.bus, DefmtSink) {
        Ok(i2c) => i2c,
        Err(e) => {
            error!("Bus config rejected: {}", e);
            return;
        }
    };
    info!("Bus ready, half period {} us", i2c.delay_us());

    if config.scan_on_boot {
        // A verbose bus reports each responder through the sink as it goes
        let devices = if i2c.is_verbose() {
            i2c.list_devices()
        } else {
            i2c.scan()
        };
        match devices {
            Ok(devices) => info!(
                "Scan found {} device(s): {=[u8]:#x}",
                devices.len(),
                devices.as_slice()
            ),
            Err(e) => warn!("Scan aborted: {}", e),
        }
    }

    let poll = config.poll;
    let mut ticker = Ticker::every(Duration::from_millis(poll.interval_ms as u64));
    loop {
        match i2c.read_data(poll.register, poll.bytes) {
            Ok(value) => info!("reg {=u8:#x} = {=u32:#x}", poll.register, value),
            Err(e) => warn!("Poll of reg {=u8:#x} failed: {}", poll.register, e),
        }
        ticker.next().await;
    }
}
