use crate::constants::MEMORY_SIZE;
use crate::{LoadError, Ls8Error, Result};

/// Flat 256-byte RAM image.
#[derive(Clone)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let used = self.bytes.iter().filter(|b| **b != 0).count();
        f.debug_struct("Memory").field("nonzero", &used).finish()
    }
}

impl Memory {
    pub fn new() -> Self {
        Self {
            bytes: [0u8; MEMORY_SIZE],
        }
    }

    /// Read the byte at `mar`.
    pub fn read(&self, mar: usize) -> Result<u8> {
        self.bytes
            .get(mar)
            .copied()
            .ok_or(Ls8Error::OutOfBounds { address: mar })
    }

    /// Store `mdr` at `mar`.
    pub fn write(&mut self, mar: usize, mdr: u8) -> Result<()> {
        let slot = self
            .bytes
            .get_mut(mar)
            .ok_or(Ls8Error::OutOfBounds { address: mar })?;
        *slot = mdr;
        Ok(())
    }

    /// Copy `program` to address 0. Memory is left untouched on error.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        if program.is_empty() {
            return Err(LoadError::Empty.into());
        }
        if program.len() > MEMORY_SIZE {
            return Err(LoadError::TooLarge { len: program.len() }.into());
        }
        for (addr, byte) in program.iter().enumerate() {
            self.write(addr, *byte)?;
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.bytes = [0u8; MEMORY_SIZE];
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_round_trips() {
        let mut mem = Memory::new();
        mem.write(0x10, 0xAB).unwrap();
        assert_eq!(mem.read(0x10).unwrap(), 0xAB);
        assert_eq!(mem.read(0x11).unwrap(), 0x00);
    }

    #[test]
    fn edges_are_addressable_and_beyond_is_not() {
        let mut mem = Memory::new();
        mem.write(0, 1).unwrap();
        mem.write(0xFF, 2).unwrap();
        assert_eq!(mem.read(0xFF).unwrap(), 2);
        assert!(matches!(
            mem.read(0x100),
            Err(Ls8Error::OutOfBounds { address: 0x100 })
        ));
        assert!(matches!(
            mem.write(0x1234, 9),
            Err(Ls8Error::OutOfBounds { address: 0x1234 })
        ));
    }

    #[test]
    fn rejected_load_leaves_memory_untouched() {
        let mut mem = Memory::new();
        mem.write(0, 0x42).unwrap();

        let err = mem.load_program(&[]).unwrap_err();
        assert!(matches!(err, Ls8Error::Load(LoadError::Empty)));

        let oversized = vec![1u8; MEMORY_SIZE + 1];
        let err = mem.load_program(&oversized).unwrap_err();
        assert!(matches!(
            err,
            Ls8Error::Load(LoadError::TooLarge { len: 257 })
        ));
        assert_eq!(mem.read(0).unwrap(), 0x42);
    }

    #[test]
    fn full_size_program_fits() {
        let mut mem = Memory::new();
        let program: Vec<u8> = (0..=255u8).collect();
        mem.load_program(&program).unwrap();
        assert_eq!(mem.as_slice(), program.as_slice());
    }
}
