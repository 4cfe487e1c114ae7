//! Simulated bus for host tests
//!
//! Wires two [`DirectionalPin`]s and a [`DelayNs`] to a model of an I2C
//! target. The model watches the effective (wired-AND) line levels the way
//! real silicon does: START and STOP are SDA edges while SCL is high, data
//! is sampled on SCL rising edges, and the target changes SDA only after
//! SCL falls.
//!
//! One model answers for every address in its responder list and shares a
//! single register file between them.

use core::cell::RefCell;

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use softwire_hal::{DirectionalPin, I2cConfig, PinDirection};

use crate::config::BusConfig;
use crate::diag::DiagnosticSink;
use crate::wire::{Acknowledge, Line, PinDriver, Timing, Wire};
use crate::SoftI2c;

/// Hold SCL low until told otherwise
pub const HOLD_FOREVER: u32 = u32::MAX;

pub type SimWire<'a> = Wire<SimPin<'a>, SimPin<'a>, SimDelay<'a>>;
pub type SimI2c<'a, S> = SoftI2c<SimPin<'a>, SimPin<'a>, SimDelay<'a>, S>;

/// Target protocol phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Ignoring the bus until the next START
    Idle,
    /// Shifting in a byte
    Receive { bits: u8, value: u8 },
    /// Holding (or not) SDA for our acknowledge bit
    AckOut { ack: bool },
    /// Shifting out a byte; `bits` already clocked
    Transmit { bits: u8, value: u8 },
    /// Waiting for the controller's acknowledge bit
    AckIn,
}

/// Register model
enum Registers {
    /// 256 bytes with an auto-incrementing pointer
    Memory([u8; 256]),
    /// One word, written least-significant byte first and read back
    /// most-significant byte first
    Word { value: u32, lanes: u8, read_lane: u8 },
}

struct Bench {
    // Line drivers
    controller_scl_low: bool,
    controller_sda_low: bool,
    target_sda_low: bool,
    clock_hold: u32,

    // Last effective levels
    scl: bool,
    sda: bool,

    // Target state
    phase: Phase,
    byte_index: usize,
    reading: bool,
    responders: Vec<u8, 8>,
    refuse_index: Option<usize>,
    refuse_reads: bool,
    stretch_after: Option<(usize, bool)>,
    pointer: u8,
    registers: Registers,
    last_controller_ack: Acknowledge,

    // What we saw
    sampled: Vec<bool, 64>,
    received: Vec<u8, 64>,
    controller_acks: Vec<Acknowledge, 64>,
    addressed: Vec<u8, 128>,
    waits: u32,
    delay_total_us: u64,
    starts: u32,
    stops: u32,
}

impl Bench {
    fn new() -> Self {
        Self {
            controller_scl_low: false,
            controller_sda_low: false,
            target_sda_low: false,
            clock_hold: 0,
            scl: true,
            sda: true,
            phase: Phase::Idle,
            byte_index: 0,
            reading: false,
            responders: Vec::new(),
            refuse_index: None,
            refuse_reads: false,
            stretch_after: None,
            pointer: 0,
            registers: Registers::Memory([0; 256]),
            last_controller_ack: Acknowledge::Nack,
            sampled: Vec::new(),
            received: Vec::new(),
            controller_acks: Vec::new(),
            addressed: Vec::new(),
            waits: 0,
            delay_total_us: 0,
            starts: 0,
            stops: 0,
        }
    }

    fn scl_level(&self) -> bool {
        !(self.controller_scl_low || self.clock_hold > 0)
    }

    fn sda_level(&self) -> bool {
        !(self.controller_sda_low || self.target_sda_low)
    }

    /// Detect edges since the last change and run the target model
    fn update(&mut self) {
        let scl = self.scl_level();
        let sda = self.sda_level();

        if scl != self.scl {
            self.scl = scl;
            if scl {
                self.on_clock_rise();
            } else {
                self.on_clock_fall();
            }
            self.sda = self.sda_level();
        } else if sda != self.sda {
            self.sda = sda;
            if scl {
                if sda {
                    self.on_stop();
                } else {
                    self.on_start();
                }
            }
        }
    }

    fn on_start(&mut self) {
        self.starts += 1;
        self.phase = Phase::Receive { bits: 0, value: 0 };
        self.byte_index = 0;
        self.target_sda_low = false;
    }

    fn on_stop(&mut self) {
        self.stops += 1;
        self.phase = Phase::Idle;
        self.target_sda_low = false;
    }

    fn on_clock_rise(&mut self) {
        let level = self.sda_level();
        match self.phase {
            Phase::Receive { bits, value } => {
                let _ = self.sampled.push(level);
                self.phase = Phase::Receive {
                    bits: bits + 1,
                    value: (value << 1) | level as u8,
                };
            }
            Phase::Transmit { bits, value } => {
                self.phase = Phase::Transmit {
                    bits: bits + 1,
                    value,
                };
            }
            Phase::AckIn => {
                self.last_controller_ack = Acknowledge::from_bit(level);
                let _ = self.controller_acks.push(self.last_controller_ack);
            }
            Phase::Idle | Phase::AckOut { .. } => {}
        }
    }

    fn on_clock_fall(&mut self) {
        match self.phase {
            Phase::Receive { bits: 8, value } => {
                let ack = self.accept(value);
                self.target_sda_low = ack;
                self.phase = Phase::AckOut { ack };
            }
            Phase::AckOut { ack } => {
                self.target_sda_low = false;
                if ack && self.stretch_after == Some((self.byte_index - 1, self.reading)) {
                    self.stretch_after = None;
                    self.clock_hold = HOLD_FOREVER;
                }
                if !ack {
                    self.phase = Phase::Idle;
                } else if self.reading {
                    self.load_next();
                } else {
                    self.phase = Phase::Receive { bits: 0, value: 0 };
                }
            }
            Phase::Transmit { bits: 8, .. } => {
                self.target_sda_low = false;
                self.phase = Phase::AckIn;
            }
            Phase::Transmit { bits, value } => {
                self.target_sda_low = (value >> (7 - bits)) & 1 == 0;
            }
            Phase::AckIn => {
                if self.last_controller_ack.is_ack() {
                    self.load_next();
                } else {
                    self.target_sda_low = false;
                    self.phase = Phase::Idle;
                }
            }
            Phase::Idle | Phase::Receive { .. } => {}
        }
    }

    /// Handle a complete incoming byte; returns whether to acknowledge it
    fn accept(&mut self, value: u8) -> bool {
        let index = self.byte_index;
        self.byte_index += 1;

        if index == 0 {
            let address = value >> 1;
            self.reading = value & 1 == 1;
            let _ = self.addressed.push(address);
            let selected =
                self.responders.contains(&address) && !(self.reading && self.refuse_reads);
            if selected && self.reading {
                if let Registers::Word { read_lane, .. } = &mut self.registers {
                    *read_lane = 0;
                }
            }
            return selected;
        }

        if self.refuse_index == Some(index) {
            return false;
        }

        let _ = self.received.push(value);
        if index == 1 {
            self.pointer = value;
            return true;
        }

        match &mut self.registers {
            Registers::Memory(memory) => {
                memory[self.pointer as usize] = value;
                self.pointer = self.pointer.wrapping_add(1);
            }
            Registers::Word {
                value: word, lanes, ..
            } => {
                // A write replaces the whole word
                if index == 2 {
                    *word = 0;
                    *lanes = 0;
                }
                if *lanes < 4 {
                    *word |= (value as u32) << (8 * *lanes as u32);
                    *lanes += 1;
                }
            }
        }
        true
    }

    /// Put the next outgoing byte's MSB on SDA
    fn load_next(&mut self) {
        let value = match &mut self.registers {
            Registers::Memory(memory) => {
                let value = memory[self.pointer as usize];
                self.pointer = self.pointer.wrapping_add(1);
                value
            }
            Registers::Word {
                value,
                lanes,
                read_lane,
            } => {
                let byte = if *read_lane < *lanes {
                    (*value >> (8 * (*lanes - 1 - *read_lane) as u32)) as u8
                } else {
                    0xFF
                };
                *read_lane += 1;
                byte
            }
        };

        self.target_sda_low = value & 0x80 == 0;
        self.phase = Phase::Transmit { bits: 0, value };
    }

    fn tick(&mut self, us: u32) {
        self.waits += 1;
        self.delay_total_us += us as u64;

        if self.clock_hold > 0 && self.clock_hold != HOLD_FOREVER && !self.controller_scl_low {
            self.clock_hold -= 1;
            if self.clock_hold == 0 {
                self.update();
            }
        }
    }
}

/// Simulated bus with one target model
pub struct SimBus {
    bench: RefCell<Bench>,
}

impl SimBus {
    /// Bus with nothing attached but the pull-ups
    pub fn new() -> Self {
        Self {
            bench: RefCell::new(Bench::new()),
        }
    }

    /// Bus where every listed 7-bit address acknowledges
    pub fn with_targets(addresses: &[u8]) -> Self {
        let sim = Self::new();
        {
            let mut bench = sim.bench.borrow_mut();
            for &address in addresses {
                let _ = bench.responders.push(address);
            }
        }
        sim
    }

    /// Clock line pin
    pub fn scl(&self) -> SimPin<'_> {
        SimPin {
            bench: &self.bench,
            line: Line::Clock,
        }
    }

    /// Data line pin
    pub fn sda(&self) -> SimPin<'_> {
        SimPin {
            bench: &self.bench,
            line: Line::Data,
        }
    }

    /// Delay provider that advances the simulation
    pub fn delay(&self) -> SimDelay<'_> {
        SimDelay {
            bench: &self.bench,
        }
    }

    /// Unthrottled wire on this bus
    pub fn wire(&self) -> SimWire<'_> {
        Wire::new(
            PinDriver::new(self.scl(), self.sda()),
            Timing::new(self.delay(), I2cConfig::UNTHROTTLED),
        )
    }

    /// Bus handle with a diagnostic sink
    pub fn i2c<S: DiagnosticSink>(&self, config: BusConfig, sink: S) -> SimI2c<'_, S> {
        match SoftI2c::with_sink(self.scl(), self.sda(), self.delay(), config, sink) {
            Ok(i2c) => i2c,
            Err(e) => panic!("sim bus config rejected: {:?}", e),
        }
    }

    /// Issue a START directly on a wire and clear the log
    pub fn begin_receive(&self, wire: &mut SimWire<'_>) {
        wire.release(Line::Data);
        wire.release(Line::Clock);
        wire.assert(Line::Data);
        wire.assert(Line::Clock);
        self.clear_log();
    }

    /// Keep SCL low for `waits` delays once the controller releases it
    pub fn hold_clock(&self, waits: u32) {
        let mut bench = self.bench.borrow_mut();
        bench.clock_hold = waits;
        bench.update();
    }

    /// Let go of a held clock
    pub fn release_clock(&self) {
        let mut bench = self.bench.borrow_mut();
        bench.clock_hold = 0;
        bench.update();
    }

    /// Refuse the n-th byte after the address (1 = register byte)
    pub fn refuse_byte(&self, index: usize) {
        self.bench.borrow_mut().refuse_index = Some(index);
    }

    /// Hold SCL forever once byte `index` of a transfer in the given
    /// direction has been acknowledged (0 = address byte); fires once
    pub fn stretch_after(&self, index: usize, reading: bool) {
        self.bench.borrow_mut().stretch_after = Some((index, reading));
    }

    /// Acknowledge the address only for writes
    pub fn refuse_reads(&self) {
        self.bench.borrow_mut().refuse_reads = true;
    }

    /// Preload the register file
    pub fn set_memory(&self, start: u8, bytes: &[u8]) {
        let mut bench = self.bench.borrow_mut();
        if let Registers::Memory(memory) = &mut bench.registers {
            for (i, &byte) in bytes.iter().enumerate() {
                memory[start.wrapping_add(i as u8) as usize] = byte;
            }
        }
    }

    /// Read the register file
    pub fn memory(&self, register: u8) -> u8 {
        match &self.bench.borrow().registers {
            Registers::Memory(memory) => memory[register as usize],
            Registers::Word { .. } => 0,
        }
    }

    /// Swap the register file for a single word register
    pub fn use_word_register(&self) {
        self.bench.borrow_mut().registers = Registers::Word {
            value: 0,
            lanes: 0,
            read_lane: 0,
        };
    }

    /// Forget everything observed so far
    pub fn clear_log(&self) {
        let mut bench = self.bench.borrow_mut();
        bench.sampled.clear();
        bench.received.clear();
        bench.controller_acks.clear();
        bench.addressed.clear();
        bench.waits = 0;
        bench.delay_total_us = 0;
        bench.starts = 0;
        bench.stops = 0;
    }

    /// Bits the target shifted in while receiving
    pub fn sampled_bits(&self) -> Vec<bool, 64> {
        self.bench.borrow().sampled.clone()
    }

    /// Non-address bytes the target accepted
    pub fn received(&self) -> Vec<u8, 64> {
        self.bench.borrow().received.clone()
    }

    /// Acknowledge bits the controller sent during reads
    pub fn controller_acks(&self) -> Vec<Acknowledge, 64> {
        self.bench.borrow().controller_acks.clone()
    }

    /// 7-bit addresses seen on the bus
    pub fn addressed(&self) -> Vec<u8, 128> {
        self.bench.borrow().addressed.clone()
    }

    /// Number of delay calls
    pub fn waits(&self) -> u32 {
        self.bench.borrow().waits
    }

    /// Sum of all requested delays in microseconds
    pub fn delay_total_us(&self) -> u64 {
        self.bench.borrow().delay_total_us
    }

    /// START conditions seen (including repeated starts)
    pub fn starts(&self) -> u32 {
        self.bench.borrow().starts
    }

    /// STOP conditions seen
    pub fn stops(&self) -> u32 {
        self.bench.borrow().stops
    }

    /// Effective SCL level
    pub fn clock_level(&self) -> bool {
        self.bench.borrow().scl_level()
    }

    /// Whether the controller has let go of SCL
    pub fn clock_released_by_controller(&self) -> bool {
        !self.bench.borrow().controller_scl_low
    }

    /// Whether the controller has let go of both lines
    pub fn lines_released_by_controller(&self) -> bool {
        let bench = self.bench.borrow();
        !bench.controller_scl_low && !bench.controller_sda_low
    }
}

/// One simulated line
pub struct SimPin<'a> {
    bench: &'a RefCell<Bench>,
    line: Line,
}

impl DirectionalPin for SimPin<'_> {
    fn set_direction(&mut self, direction: PinDirection) {
        let mut bench = self.bench.borrow_mut();
        let low = direction == PinDirection::Output;
        match self.line {
            Line::Clock => bench.controller_scl_low = low,
            Line::Data => bench.controller_sda_low = low,
        }
        bench.update();
    }

    fn is_high(&mut self) -> bool {
        let bench = self.bench.borrow();
        match self.line {
            Line::Clock => bench.scl_level(),
            Line::Data => bench.sda_level(),
        }
    }
}

/// Delay that advances simulated time
pub struct SimDelay<'a> {
    bench: &'a RefCell<Bench>,
}

impl DelayNs for SimDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.bench.borrow_mut().tick(ns / 1_000);
    }

    fn delay_us(&mut self, us: u32) {
        self.bench.borrow_mut().tick(us);
    }
}
