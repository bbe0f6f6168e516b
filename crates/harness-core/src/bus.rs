//! Memory-backend boundary and the flat vector backend.
//!
//! Every decoded bus transaction is forwarded to a [`MemoryBackend`]. All
//! accesses are synchronous, stamped with the cycle counter they were
//! issued on, and big-endian at word width. A backend that wants to signal
//! faults does so through its own channel; this layer assumes every call
//! completes.

/// Power-on code vector written into a boot image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeAddress(
    /// Byte address of the first instruction.
    pub u32,
);

/// Power-on stack vector written into a boot image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackAddress(
    /// Byte address of the initial stack top.
    pub u32,
);

/// Synchronous memory boundary consumed by the bus dispatcher.
///
/// `cycle` is the counter value the access was issued on; accesses arrive
/// in strictly increasing cycle order, at most one read xor write per
/// cycle. Implementations must not block.
pub trait MemoryBackend {
    /// Reads one byte.
    fn read_byte(&mut self, cycle: u64, addr: u32) -> u8;

    /// Reads one big-endian 16-bit word spanning `addr` and `addr + 1`.
    fn read_word(&mut self, cycle: u64, addr: u32) -> u16;

    /// Writes one byte.
    fn write_byte(&mut self, cycle: u64, addr: u32, value: u8);

    /// Writes one big-endian 16-bit word spanning `addr` and `addr + 1`.
    fn write_word(&mut self, cycle: u64, addr: u32, value: u16);
}

impl<M: MemoryBackend + ?Sized> MemoryBackend for &mut M {
    fn read_byte(&mut self, cycle: u64, addr: u32) -> u8 {
        (**self).read_byte(cycle, addr)
    }

    fn read_word(&mut self, cycle: u64, addr: u32) -> u16 {
        (**self).read_word(cycle, addr)
    }

    fn write_byte(&mut self, cycle: u64, addr: u32, value: u8) {
        (**self).write_byte(cycle, addr, value)
    }

    fn write_word(&mut self, cycle: u64, addr: u32, value: u16) {
        (**self).write_word(cycle, addr, value)
    }
}

/// Flat byte-vector backend with big-endian word access.
///
/// Reads outside the image return zero and writes outside it are dropped,
/// so a short image behaves like a bus that decodes nothing past its end.
#[derive(Debug, Clone)]
pub struct VecBackend {
    bytes: Vec<u8>,
}

impl VecBackend {
    /// Creates a zero-filled image of `size` bytes.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0; size],
        }
    }

    /// Wraps an existing image.
    #[must_use]
    pub fn from_image(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Builds a boot image: the code vector at offset 0, the stack vector
    /// at offset 4 and the program copied to its load address.
    ///
    /// # Panics
    ///
    /// Panics when `size` cannot hold the eight vector bytes.
    #[must_use]
    pub fn with_boot_image(
        code: &[u8],
        code_addr: CodeAddress,
        stack_addr: StackAddress,
        size: usize,
    ) -> Self {
        let mut backend = Self::new(size);
        backend.bytes[0..4].copy_from_slice(&code_addr.0.to_be_bytes());
        backend.bytes[4..8].copy_from_slice(&stack_addr.0.to_be_bytes());
        backend.load(code_addr.0, code);
        backend
    }

    /// Copies `data` into the image at `addr`. Bytes that would land past
    /// the end of the image are dropped.
    pub fn load(&mut self, addr: u32, data: &[u8]) {
        let Ok(start) = usize::try_from(addr) else {
            log::warn!("image load at {addr:#x} is entirely out of range");
            return;
        };
        let available = self.bytes.len().saturating_sub(start);
        let take = data.len().min(available);
        if take < data.len() {
            log::warn!(
                "image load at {addr:#x} truncated to {take} of {} bytes",
                data.len()
            );
        }
        if take > 0 {
            self.bytes[start..start + take].copy_from_slice(&data[..take]);
        }
    }

    /// Image length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when the image holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Read-only view of the whole image.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn at(&self, addr: u32) -> u8 {
        usize::try_from(addr)
            .ok()
            .and_then(|index| self.bytes.get(index))
            .copied()
            .unwrap_or(0)
    }

    fn put(&mut self, addr: u32, value: u8) {
        let slot = usize::try_from(addr)
            .ok()
            .and_then(|index| self.bytes.get_mut(index));
        if let Some(slot) = slot {
            *slot = value;
        } else {
            log::warn!("byte write at {addr:#x} outside the image dropped");
        }
    }
}

impl MemoryBackend for VecBackend {
    fn read_byte(&mut self, _cycle: u64, addr: u32) -> u8 {
        self.at(addr)
    }

    fn read_word(&mut self, _cycle: u64, addr: u32) -> u16 {
        u16::from_be_bytes([self.at(addr), self.at(addr.wrapping_add(1))])
    }

    fn write_byte(&mut self, _cycle: u64, addr: u32, value: u8) {
        self.put(addr, value);
    }

    fn write_word(&mut self, _cycle: u64, addr: u32, value: u16) {
        let [high, low] = value.to_be_bytes();
        self.put(addr, high);
        self.put(addr.wrapping_add(1), low);
    }
}

#[cfg(test)]
mod tests {
    use super::{CodeAddress, MemoryBackend, StackAddress, VecBackend};

    #[test]
    fn word_access_is_big_endian() {
        let mut backend = VecBackend::new(16);
        backend.write_word(0, 4, 0x1234);
        assert_eq!(backend.bytes()[4], 0x12);
        assert_eq!(backend.bytes()[5], 0x34);
        assert_eq!(backend.read_word(1, 4), 0x1234);
        assert_eq!(backend.read_byte(2, 4), 0x12);
        assert_eq!(backend.read_byte(3, 5), 0x34);
    }

    #[test]
    fn out_of_range_reads_return_zero_and_writes_are_dropped() {
        let mut backend = VecBackend::new(4);
        assert_eq!(backend.read_byte(0, 100), 0);
        assert_eq!(backend.read_word(0, 3), 0);
        backend.write_byte(0, 100, 0xFF);
        backend.write_word(0, 3, 0xAABB);
        assert_eq!(backend.bytes(), &[0, 0, 0, 0xAA]);
    }

    #[test]
    fn boot_image_places_vectors_and_program() {
        let backend = VecBackend::with_boot_image(
            &[0x4E, 0x71],
            CodeAddress(8),
            StackAddress(0x100),
            16,
        );
        assert_eq!(&backend.bytes()[0..4], &[0, 0, 0, 8]);
        assert_eq!(&backend.bytes()[4..8], &[0, 0, 0x01, 0x00]);
        assert_eq!(&backend.bytes()[8..10], &[0x4E, 0x71]);
    }

    #[test]
    fn oversized_load_is_truncated_at_the_image_end() {
        let mut backend = VecBackend::new(4);
        backend.load(2, &[1, 2, 3, 4]);
        assert_eq!(backend.bytes(), &[0, 0, 1, 2]);
        backend.load(100, &[9]);
        assert_eq!(backend.bytes(), &[0, 0, 1, 2]);
    }

    #[test]
    fn mutable_references_satisfy_the_backend_bound() {
        fn poke(mut backend: impl MemoryBackend) {
            backend.write_byte(0, 0, 0x42);
        }
        let mut backend = VecBackend::new(2);
        poke(&mut backend);
        assert_eq!(backend.bytes()[0], 0x42);
    }
}
