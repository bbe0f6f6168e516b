//! Register snapshot layout and byte codec.
//!
//! The snapshot layout is a cross-boundary contract: eight data registers,
//! eight address registers, the program counter and the flags word, 32
//! bits each, in that order. External consumers read it byte-for-byte
//! through the canonical big-endian codec.

use thiserror::Error;

use crate::model::RegisterHalves;

/// Length in bytes of the canonical snapshot encoding.
pub const SNAPSHOT_BYTES: usize = 72;

/// Fixed-layout copy of the core's architectural register state.
///
/// Field order and widths are part of the external contract and must not
/// be reordered.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterSnapshot {
    /// Data registers D0..D7.
    pub data: [u32; 8],
    /// Address registers A0..A7.
    pub addr: [u32; 8],
    /// Program counter.
    pub pc: u32,
    /// Status flags word.
    pub flags: u32,
}

/// Error raised when decoding a snapshot from a byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SnapshotLayoutError {
    /// Buffer length does not match the canonical encoding length.
    #[error("snapshot buffer is {actual} bytes, canonical layout is {expected}")]
    Length {
        /// Expected canonical length.
        expected: usize,
        /// Length of the rejected buffer.
        actual: usize,
    },
}

impl RegisterSnapshot {
    /// Reassembles full-width registers from the core's high/low halves.
    #[must_use]
    pub fn from_halves(halves: &RegisterHalves) -> Self {
        let mut snapshot = Self::default();
        for i in 0..8 {
            snapshot.data[i] = join(halves.data_high[i], halves.data_low[i]);
            snapshot.addr[i] = join(halves.addr_high[i], halves.addr_low[i]);
        }
        snapshot.pc = join(halves.pc_high, halves.pc_low);
        snapshot.flags = u32::from(halves.status);
        snapshot
    }

    /// Encodes the snapshot into the canonical big-endian byte layout.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; SNAPSHOT_BYTES] {
        let mut bytes = [0u8; SNAPSHOT_BYTES];
        let tail = [self.pc, self.flags];
        let words = self
            .data
            .iter()
            .chain(self.addr.iter())
            .chain(tail.iter())
            .copied();
        for (chunk, word) in bytes.chunks_exact_mut(4).zip(words) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        bytes
    }

    /// Decodes a snapshot from the canonical big-endian byte layout.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotLayoutError::Length`] when `bytes` is not exactly
    /// [`SNAPSHOT_BYTES`] long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotLayoutError> {
        if bytes.len() != SNAPSHOT_BYTES {
            return Err(SnapshotLayoutError::Length {
                expected: SNAPSHOT_BYTES,
                actual: bytes.len(),
            });
        }

        let mut words = bytes
            .chunks_exact(4)
            .map(|chunk| u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
        let mut snapshot = Self::default();
        for slot in snapshot.data.iter_mut().chain(snapshot.addr.iter_mut()) {
            *slot = words.next().unwrap_or(0);
        }
        snapshot.pc = words.next().unwrap_or(0);
        snapshot.flags = words.next().unwrap_or(0);
        Ok(snapshot)
    }
}

fn join(high: u16, low: u16) -> u32 {
    u32::from(high) << 16 | u32::from(low)
}
