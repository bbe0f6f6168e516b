//! Pin-set value types and the opaque core-model boundary.
//!
//! The simulated core is treated as a sealed black box. The harness writes
//! input pins, asks for exactly one evaluation per clock edge and reads
//! output pins and raw register storage back; [`CoreModel`] captures
//! exactly that capability surface. [`ScriptedCore`] is a programmable
//! stand-in used by the test suites and for host-side protocol bring-up.

use std::collections::VecDeque;

/// Input pins driven into the core each clock edge.
///
/// Control lines are active-low: `true` is the electrical high, inactive
/// level. `default()` is the all-low power-on state, before the reset
/// sequencer has parked anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct InputPins {
    /// Raw clock line.
    pub clk: bool,
    /// Phase-A clock enable.
    pub en_phi1: bool,
    /// Phase-B clock enable.
    pub en_phi2: bool,
    /// Power-up request, held high during the warm-up span.
    pub pwr_up: bool,
    /// External reset, held high during the warm-up span.
    pub ext_reset: bool,
    /// Data-transfer acknowledge (active low).
    pub dtack_n: bool,
    /// Valid peripheral address (active low, held idle after reset).
    pub vpa_n: bool,
    /// Bus error (active low, held idle after reset).
    pub berr_n: bool,
    /// Bus request (active low, held idle after reset).
    pub br_n: bool,
    /// Bus-grant acknowledge (active low, held idle after reset).
    pub bgack_n: bool,
    /// Interrupt priority level bit 0 (active low, held idle after reset).
    pub ipl0_n: bool,
    /// Interrupt priority level bit 1 (active low, held idle after reset).
    pub ipl1_n: bool,
    /// Interrupt priority level bit 2 (active low, held idle after reset).
    pub ipl2_n: bool,
    /// Input data bus. During a byte read only the strobe-selected lane
    /// carries defined data; the other lane is unspecified by the bus
    /// contract (this harness happens to drive it low).
    pub data_in: u16,
}

impl InputPins {
    /// Parks every always-idle control line and the acknowledge line at
    /// the inactive level and clears the input data bus.
    pub fn park_idle_lines(&mut self) {
        self.dtack_n = true;
        self.vpa_n = true;
        self.berr_n = true;
        self.br_n = true;
        self.bgack_n = true;
        self.ipl0_n = true;
        self.ipl1_n = true;
        self.ipl2_n = true;
        self.data_in = 0;
    }

    /// Returns true when the acknowledge line and every always-idle
    /// control line sit at the inactive level.
    #[must_use]
    pub const fn idle_lines_parked(&self) -> bool {
        self.dtack_n
            && self.vpa_n
            && self.berr_n
            && self.br_n
            && self.bgack_n
            && self.ipl0_n
            && self.ipl1_n
            && self.ipl2_n
    }
}

/// Output pins read back from the core after each evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct OutputPins {
    /// Address strobe (active low): the address and direction lines are
    /// valid and a bus transaction is requested.
    pub as_n: bool,
    /// Upper data strobe (active low).
    pub uds_n: bool,
    /// Lower data strobe (active low).
    pub lds_n: bool,
    /// Transaction direction: high requests a read, low a write.
    pub rw_n: bool,
    /// Word-addressed address bus (23 significant bits).
    pub addr: u32,
    /// Output data bus.
    pub data_out: u16,
}

impl Default for OutputPins {
    /// Bus-idle levels: no strobes asserted, direction parked at read.
    fn default() -> Self {
        Self {
            as_n: true,
            uds_n: true,
            lds_n: true,
            rw_n: true,
            addr: 0,
            data_out: 0,
        }
    }
}

/// Raw register-file storage as the core holds it internally: 16-bit high
/// and low halves per 32-bit architectural register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterHalves {
    /// Low halves of the data registers D0..D7.
    pub data_low: [u16; 8],
    /// High halves of the data registers D0..D7.
    pub data_high: [u16; 8],
    /// Low halves of the address registers A0..A7.
    pub addr_low: [u16; 8],
    /// High halves of the address registers A0..A7.
    pub addr_high: [u16; 8],
    /// Low half of the program counter.
    pub pc_low: u16,
    /// High half of the program counter.
    pub pc_high: u16,
    /// Status register (condition codes and system byte).
    pub status: u16,
}

/// Capability surface of the opaque simulated core.
///
/// Evaluation updates every output pin from the current input pins and
/// internal state; the harness calls it exactly once per clock edge with
/// no sub-stepping. Register storage is exposed read-only, purely for
/// snapshot reassembly.
pub trait CoreModel {
    /// Read access to the input pin set.
    fn inputs(&self) -> &InputPins;

    /// Mutable access to the input pin set.
    fn inputs_mut(&mut self) -> &mut InputPins;

    /// Settles the model against the current input pins.
    fn evaluate(&mut self);

    /// Current output pin levels.
    fn outputs(&self) -> OutputPins;

    /// Raw register-file storage for snapshot reassembly.
    fn registers(&self) -> RegisterHalves;
}

/// Programmable core model for test suites and protocol bring-up.
///
/// Outputs are scripted as a queue of frames: each evaluation presents the
/// next frame, or keeps presenting the last one once the script runs dry.
/// The model starts out holding bus-idle output levels.
#[derive(Debug, Default)]
pub struct ScriptedCore {
    inputs: InputPins,
    script: VecDeque<OutputPins>,
    current: OutputPins,
    registers: RegisterHalves,
    evaluations: u64,
}

impl ScriptedCore {
    /// Creates a model with an empty script holding bus-idle outputs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one output frame to the script.
    pub fn push_frame(&mut self, frame: OutputPins) {
        self.script.push_back(frame);
    }

    /// Appends `count` copies of one output frame.
    pub fn push_frames(&mut self, frame: OutputPins, count: usize) {
        for _ in 0..count {
            self.script.push_back(frame);
        }
    }

    /// Replaces the raw register storage reported to the harness.
    pub fn set_registers(&mut self, registers: RegisterHalves) {
        self.registers = registers;
    }

    /// Number of evaluations performed so far.
    #[must_use]
    pub const fn evaluations(&self) -> u64 {
        self.evaluations
    }
}

impl CoreModel for ScriptedCore {
    fn inputs(&self) -> &InputPins {
        &self.inputs
    }

    fn inputs_mut(&mut self) -> &mut InputPins {
        &mut self.inputs
    }

    fn evaluate(&mut self) {
        self.evaluations += 1;
        if let Some(frame) = self.script.pop_front() {
            self.current = frame;
        }
    }

    fn outputs(&self) -> OutputPins {
        self.current
    }

    fn registers(&self) -> RegisterHalves {
        self.registers
    }
}
