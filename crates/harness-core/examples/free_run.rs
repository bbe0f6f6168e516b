//! Drives a scripted core model through a read and a write transaction
//! against a small flat memory image, then prints the bus results and the
//! register snapshot.

use harness_core::{
    CodeAddress, CoreModel, Harness, MemoryBackend, OutputPins, RegisterHalves, ScriptedCore,
    StackAddress, VecBackend,
};
use log as _;
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

fn main() {
    let mut core = ScriptedCore::new();

    // One word read of the first opcode, then a word write of 0x1234 to
    // byte address 0x0200. Each transaction holds its strobes long enough
    // to span a phase-A window.
    let fetch = OutputPins {
        as_n: false,
        uds_n: false,
        lds_n: false,
        rw_n: true,
        addr: 0x0004,
        data_out: 0,
    };
    let store = OutputPins {
        as_n: false,
        uds_n: false,
        lds_n: false,
        rw_n: false,
        addr: 0x0100,
        data_out: 0x1234,
    };
    let idle = OutputPins::default();

    core.push_frames(idle, 2);
    core.push_frames(fetch, 2);
    core.push_frames(idle, 4);
    core.push_frames(store, 4);
    core.push_frames(idle, 2);

    let mut halves = RegisterHalves::default();
    halves.pc_low = 0x0008;
    halves.status = 0x2700;
    core.set_registers(halves);

    let backend = VecBackend::with_boot_image(
        &[0x4E, 0x71, 0x4E, 0x71],
        CodeAddress(8),
        StackAddress(0x0400),
        0x0400,
    );

    let mut harness = Harness::new(core, backend);

    // Through the first phase-A window: the fetch is on the bus.
    for _ in 0..4 {
        harness.step();
    }
    let fetched = harness.core().inputs().data_in;

    // Through the second transaction and back to idle.
    for _ in 0..10 {
        harness.step();
    }
    let cycle = harness.cycle();
    let stored = harness.backend_mut().read_word(cycle, 0x0200);
    let snapshot = harness.snapshot();

    println!("cycle counter : {}", harness.cycle());
    println!("fetched word  : {fetched:#06x}");
    println!("stored word   : {stored:#06x}");
    println!("pc            : {:#010x}", snapshot.pc);
    println!("status flags  : {:#06x}", snapshot.flags);
}
