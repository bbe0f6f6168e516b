//! Instance lifecycle: reset sequencing, per-edge stepping, teardown.

use crate::bus::MemoryBackend;
use crate::dispatch::service_bus;
use crate::model::CoreModel;
use crate::phase::ClockPhases;
use crate::snapshot::RegisterSnapshot;

/// Clock edges run with power-up and external reset asserted before the
/// core is considered live.
pub const WARMUP_EDGES: u64 = 10;

/// Clock edges of the full power-on run that carries the core through its
/// reset exception sequence and first instruction fetch.
pub const BOOT_EDGES: u64 = 242;

/// Edge bound for [`Harness::step_instruction`] before giving up on the
/// program counter changing.
pub const MAX_INSTRUCTION_EDGES: u64 = 10_000;

/// Drives one core model through its clock and bus protocol.
///
/// The harness owns the model and the memory backend and advances exactly
/// one clock edge per [`step`](Self::step) call; there is no internal loop
/// or background activity. Pass `&mut backend` to keep backend ownership
/// on the caller's side. One harness belongs to one thread; two harnesses
/// may run concurrently only when their backends are independent or
/// themselves synchronized.
#[derive(Debug)]
pub struct Harness<C, M> {
    core: C,
    backend: M,
    cycle: u64,
}

impl<C, M> Harness<C, M>
where
    C: CoreModel,
    M: MemoryBackend,
{
    /// Creates a harness and runs the power-up warm-up span.
    ///
    /// The core sees exactly [`WARMUP_EDGES`] clock edges with `pwr_up`
    /// and `ext_reset` asserted and no bus dispatch. Afterwards both reset
    /// lines are released, every always-idle control line and the
    /// acknowledge line are parked inactive and the input data bus is
    /// cleared. The cycle counter starts at 1 and is `WARMUP_EDGES + 1`
    /// after construction.
    pub fn new(core: C, backend: M) -> Self {
        let mut harness = Self {
            core,
            backend,
            cycle: 1,
        };

        {
            let pins = harness.core.inputs_mut();
            pins.pwr_up = true;
            pins.ext_reset = true;
        }

        for _ in 0..WARMUP_EDGES {
            harness.drive_clock();
            harness.core.evaluate();
            harness.cycle += 1;
        }

        let pins = harness.core.inputs_mut();
        pins.pwr_up = false;
        pins.ext_reset = false;
        pins.park_idle_lines();
        log::debug!("core out of reset at cycle {}", harness.cycle);

        harness
    }

    /// Advances exactly one clock edge.
    ///
    /// Drives the clock and enable phases for the current counter value,
    /// evaluates the core once, services the bus, then increments the
    /// counter by one.
    pub fn step(&mut self) {
        let phases = self.drive_clock();
        self.core.evaluate();
        service_bus(&mut self.core, &mut self.backend, self.cycle, phases.phi1);
        self.cycle += 1;
    }

    /// Current cycle-counter value (the value the next step runs at).
    #[must_use]
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Copies the core's register file, program counter and flags into
    /// the fixed external layout.
    ///
    /// Pure read, callable at any time, including mid-transaction; the
    /// value reflects the core's state as of the most recent completed
    /// step, so repeated calls between steps are identical.
    #[must_use]
    pub fn snapshot(&self) -> RegisterSnapshot {
        RegisterSnapshot::from_halves(&self.core.registers())
    }

    /// Read access to the core model.
    #[must_use]
    pub const fn core(&self) -> &C {
        &self.core
    }

    /// Mutable access to the core model.
    pub fn core_mut(&mut self) -> &mut C {
        &mut self.core
    }

    /// Read access to the memory backend.
    #[must_use]
    pub const fn backend(&self) -> &M {
        &self.backend
    }

    /// Mutable access to the memory backend.
    pub fn backend_mut(&mut self) -> &mut M {
        &mut self.backend
    }

    /// Runs the fixed [`BOOT_EDGES`] power-on span.
    pub fn boot(&mut self) {
        for _ in 0..BOOT_EDGES {
            self.step();
        }
    }

    /// Steps until the program counter changes, bounded by
    /// [`MAX_INSTRUCTION_EDGES`].
    ///
    /// Returns the number of edges stepped, or `None` when the bound is
    /// hit without the program counter moving.
    pub fn step_instruction(&mut self) -> Option<u64> {
        let start_pc = self.snapshot().pc;
        for edges in 1..=MAX_INSTRUCTION_EDGES {
            self.step();
            if self.snapshot().pc != start_pc {
                return Some(edges);
            }
        }
        None
    }

    /// Repeats [`step_instruction`](Self::step_instruction) until the
    /// program counter reaches `pc`.
    ///
    /// Returns the total number of edges stepped, or `None` when any leg
    /// hits the instruction bound.
    pub fn run_until(&mut self, pc: u32) -> Option<u64> {
        let mut total = 0;
        loop {
            total += self.step_instruction()?;
            if self.snapshot().pc == pc {
                return Some(total);
            }
        }
    }

    /// Tears the harness down, releasing the core model and handing the
    /// backend back untouched.
    #[must_use]
    pub fn into_parts(self) -> (C, M) {
        (self.core, self.backend)
    }

    fn drive_clock(&mut self) -> ClockPhases {
        let phases = ClockPhases::at(self.cycle);
        let pins = self.core.inputs_mut();
        pins.clk = phases.clk;
        pins.en_phi1 = phases.phi1;
        pins.en_phi2 = phases.phi2;
        phases
    }
}
