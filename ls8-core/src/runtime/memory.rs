//! Flat byte-addressable memory.

use crate::error::{VmError, VmResult};

/// Number of addressable cells.
pub const MEMORY_SIZE: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    cells: [u8; MEMORY_SIZE],
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    pub fn new() -> Self {
        Self {
            cells: [0; MEMORY_SIZE],
        }
    }

    /// Read the cell at `address`.
    pub fn read(&self, address: usize) -> VmResult<u8> {
        self.cells
            .get(address)
            .copied()
            .ok_or(VmError::AddressOutOfBounds(address))
    }

    /// Store `value` at `address`.
    pub fn write(&mut self, address: usize, value: u8) -> VmResult<()> {
        let cell = self
            .cells
            .get_mut(address)
            .ok_or(VmError::AddressOutOfBounds(address))?;
        *cell = value;
        Ok(())
    }

    /// Copy a program image to the start of memory.
    ///
    /// Cells past the end of the image are left untouched.
    pub fn load(&mut self, program: &[u8]) -> VmResult<()> {
        if program.len() > MEMORY_SIZE {
            return Err(VmError::ProgramTooLarge {
                len: program.len(),
                capacity: MEMORY_SIZE,
            });
        }

        self.cells[..program.len()].copy_from_slice(program);
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write() {
        let mut mem = Memory::new();
        mem.write(0x10, 0xAB).unwrap();
        assert_eq!(mem.read(0x10).unwrap(), 0xAB);
        assert_eq!(mem.read(0xFF).unwrap(), 0);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut mem = Memory::new();
        assert_eq!(mem.read(256), Err(VmError::AddressOutOfBounds(256)));
        assert_eq!(mem.write(300, 1), Err(VmError::AddressOutOfBounds(300)));
    }

    #[test]
    fn test_load_places_program_at_zero() {
        let mut mem = Memory::new();
        mem.load(&[0x82, 0x00, 0x08, 0x01]).unwrap();
        assert_eq!(&mem.as_slice()[..5], &[0x82, 0x00, 0x08, 0x01, 0x00]);
    }

    #[test]
    fn test_load_rejects_oversized_image() {
        let mut mem = Memory::new();
        let image = vec![0u8; MEMORY_SIZE + 1];
        assert_eq!(
            mem.load(&image),
            Err(VmError::ProgramTooLarge {
                len: 257,
                capacity: 256
            })
        );

        // a full image is fine
        assert!(mem.load(&image[..MEMORY_SIZE]).is_ok());
    }
}
