//! Register-snapshot layout and codec integration coverage.

use harness_core::{
    Harness, RegisterHalves, RegisterSnapshot, ScriptedCore, SnapshotLayoutError, VecBackend,
    SNAPSHOT_BYTES,
};
use log as _;
use proptest::prelude::*;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

fn populated_halves() -> RegisterHalves {
    let mut halves = RegisterHalves::default();
    for i in 0..8 {
        halves.data_low[i] = 0x1000 + i as u16;
        halves.data_high[i] = 0x0100 + i as u16;
        halves.addr_low[i] = 0x2000 + i as u16;
        halves.addr_high[i] = 0x0200 + i as u16;
    }
    halves.pc_low = 0x0044;
    halves.pc_high = 0x0001;
    halves.status = 0x2704;
    halves
}

#[test]
fn snapshot_reflects_the_core_register_halves() {
    let mut core = ScriptedCore::new();
    core.set_registers(populated_halves());
    let harness = Harness::new(core, VecBackend::new(16));

    let snapshot = harness.snapshot();
    assert_eq!(snapshot.data[0], 0x0100_1000);
    assert_eq!(snapshot.data[7], 0x0107_1007);
    assert_eq!(snapshot.addr[0], 0x0200_2000);
    assert_eq!(snapshot.addr[7], 0x0207_2007);
    assert_eq!(snapshot.pc, 0x0001_0044);
    assert_eq!(snapshot.flags, 0x2704);
}

#[test]
fn snapshot_is_idempotent_between_steps() {
    let mut core = ScriptedCore::new();
    core.set_registers(populated_halves());
    let mut harness = Harness::new(core, VecBackend::new(16));

    assert_eq!(harness.snapshot(), harness.snapshot());
    harness.step();
    assert_eq!(harness.snapshot(), harness.snapshot());
}

#[test]
fn byte_encoding_keeps_the_contract_field_order() {
    let snapshot = RegisterSnapshot::from_halves(&populated_halves());
    let bytes = snapshot.to_bytes();

    assert_eq!(&bytes[0..4], &[0x01, 0x00, 0x10, 0x00]);
    assert_eq!(&bytes[28..32], &[0x01, 0x07, 0x10, 0x07]);
    assert_eq!(&bytes[32..36], &[0x02, 0x00, 0x20, 0x00]);
    assert_eq!(&bytes[64..68], &[0x00, 0x01, 0x00, 0x44]);
    assert_eq!(&bytes[68..72], &[0x00, 0x00, 0x27, 0x04]);
}

#[test]
fn wrong_length_buffers_are_rejected_with_both_lengths_reported() {
    let error = RegisterSnapshot::from_bytes(&[0; 16]).unwrap_err();
    assert_eq!(
        error,
        SnapshotLayoutError::Length {
            expected: SNAPSHOT_BYTES,
            actual: 16,
        }
    );
    assert_eq!(
        error.to_string(),
        "snapshot buffer is 16 bytes, canonical layout is 72"
    );
}

proptest! {
    #[test]
    fn canonical_codec_round_trips(words in prop::collection::vec(any::<u32>(), 18)) {
        let mut snapshot = RegisterSnapshot::default();
        snapshot.data.copy_from_slice(&words[0..8]);
        snapshot.addr.copy_from_slice(&words[8..16]);
        snapshot.pc = words[16];
        snapshot.flags = words[17];

        let decoded = RegisterSnapshot::from_bytes(&snapshot.to_bytes());
        prop_assert_eq!(decoded, Ok(snapshot));
    }
}
