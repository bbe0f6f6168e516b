//! Clock-phase and bus-transaction harness for pin-level M68000 core models.
//!
//! The crate drives an opaque, cycle-accurate core model through the
//! two-phase enable clocking and asynchronous bus protocol of the classic
//! M68000 interface: address strobe, upper/lower data strobes, read/write
//! direction and data-transfer acknowledge. Each [`Harness::step`] call
//! advances exactly one clock edge, decodes any pending bus transaction
//! from the core's output pins and services it against a caller-supplied
//! [`MemoryBackend`].
//!
//! The core itself is sealed behind [`CoreModel`]: the harness only writes
//! input pins, triggers one evaluation per edge and reads output pins and
//! raw register storage back.

/// Clock-enable phase tables and per-cycle phase levels.
pub mod phase;
pub use phase::{ClockPhases, PHI1_TABLE, PHI2_TABLE};

/// Pin-set value types and the opaque core-model boundary.
pub mod model;
pub use model::{CoreModel, InputPins, OutputPins, RegisterHalves, ScriptedCore};

/// Memory-backend boundary and the flat vector backend.
pub mod bus;
pub use bus::{CodeAddress, MemoryBackend, StackAddress, VecBackend};

/// Bus-transaction dispatch for one clock edge.
pub mod dispatch;
pub use dispatch::service_bus;

/// Instance lifecycle: reset sequencing, stepping, teardown.
pub mod harness;
pub use harness::{Harness, BOOT_EDGES, MAX_INSTRUCTION_EDGES, WARMUP_EDGES};

/// Register snapshot layout and byte codec.
pub mod snapshot;
pub use snapshot::{RegisterSnapshot, SnapshotLayoutError, SNAPSHOT_BYTES};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
