//! ZMachine [memory map](https://inform-fiction.org/zmachine/standards/z1point1/sect01.html)
use std::fmt;

use crate::{error::*, fatal_error};

/// Memory map
#[derive(Clone)]
pub struct Memory {
    /// Memory map bytes
    map: Vec<u8>,
    /// Byte address of the start of static memory
    static_mark: usize,
    /// Pristine copy of the dynamic memory region
    dynamic: Vec<u8>,
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Memory: {} bytes, static at ${:04x}",
            self.map.len(),
            self.static_mark
        )
    }
}

/// Assemble a word from high- and low-byte values
///
/// # Arguments
/// * `hb` - high byte value
/// * `lb` - low byte value
///
/// # Returns
/// Word value
pub fn word_value(hb: u8, lb: u8) -> u16 {
    (((hb as u16) << 8) & 0xFF00) + ((lb as u16) & 0xFF)
}

/// Break a word value down into high- and low-byte values
///
/// # Arguments
/// * `w` - Word value
///
/// # Returns
/// Tuple containing (high-byte, low-byte)
fn byte_values(w: u16) -> (u8, u8) {
    let hb = (w >> 8) as u8;
    let lb = w as u8;
    (hb, lb)
}

impl Memory {
    /// Constructor
    ///
    /// The static mark is clamped to the size of the map; header validation happens before
    /// a map gets here.
    ///
    /// # Arguments
    /// * `map` - Vector of memory bytes
    pub fn new(map: Vec<u8>) -> Memory {
        let static_mark = if map.len() > 0x0f {
            usize::min(word_value(map[0x0e], map[0x0f]) as usize, map.len())
        } else {
            map.len()
        };

        let dynamic = map[0..static_mark].to_vec();
        Memory {
            static_mark,
            map,
            dynamic,
        }
    }

    /// Get the start of the [static](https://inform-fiction.org/zmachine/standards/z1point1/sect01.html#one) memory region
    ///
    /// # Returns
    /// Byte address of the start of the static memory region
    pub fn static_mark(&self) -> usize {
        self.static_mark
    }

    /// Size of the memory map
    pub fn size(&self) -> usize {
        self.map.len()
    }

    /// Copy a slice of the memory map, truncated at the end of memory
    ///
    /// # Arguments
    /// * `start` - address of the start of the slice
    /// * `length` - length of the slice
    ///
    /// # Returns
    /// Vector containing a copy of the requested slice of memory
    pub fn slice(&self, start: usize, length: usize) -> Vec<u8> {
        let start = usize::min(start, self.map.len());
        let end = usize::min(start + length, self.map.len());
        self.map[start..end].to_vec()
    }

    /// Read a byte from the memory map.
    ///
    /// # Arguments
    /// * `address` - Address to read from
    ///
    /// # Returns
    /// [Result] with the byte value at the requested `address` or a [RuntimeError]
    pub fn read_byte(&self, address: usize) -> Result<u8, RuntimeError> {
        if address < self.map.len() {
            Ok(self.map[address])
        } else {
            fatal_error!(
                ErrorCode::InvalidAddress,
                "Byte address {:#06x} beyond end of memory ({:#06x})",
                address,
                self.map.len()
            )
        }
    }

    /// Read a word from the memory map.
    ///
    /// # Arguments
    /// * `address` - Address to read from
    ///
    /// # Returns
    /// [Result] with the word value at the requested `address` or a [RuntimeError]
    pub fn read_word(&self, address: usize) -> Result<u16, RuntimeError> {
        if address + 1 < self.map.len() {
            Ok(word_value(self.map[address], self.map[address + 1]))
        } else {
            fatal_error!(
                ErrorCode::InvalidAddress,
                "Word address {:#06x} beyond end of memory ({:#06x})",
                address,
                self.map.len()
            )
        }
    }

    /// Write a byte to dynamic memory.
    ///
    /// # Arguments
    /// * `address` - Address to write to
    /// * `value` - Byte value to write
    ///
    /// # Returns
    /// Empty [Result] or a [RuntimeError]
    pub fn write_byte(&mut self, address: usize, value: u8) -> Result<(), RuntimeError> {
        if address < self.static_mark {
            debug!(target: "app::state", "Write {:#02x} to ${:04x}", value, address);
            self.map[address] = value;
            Ok(())
        } else {
            fatal_error!(
                ErrorCode::StaticMemoryWrite,
                "Byte write to {:#06x} at or above static memory ({:#06x})",
                address,
                self.static_mark
            )
        }
    }

    /// Write a word to dynamic memory.
    ///
    /// # Arguments
    /// * `address` - Address to write to
    /// * `value` - Word value to write
    ///
    /// # Returns
    /// Empty [Result] or a [RuntimeError]
    pub fn write_word(&mut self, address: usize, value: u16) -> Result<(), RuntimeError> {
        if address + 1 < self.static_mark {
            debug!(target: "app::state", "Write {:#04x} to ${:04x}", value, address);
            let (hb, lb) = byte_values(value);
            self.map[address] = hb;
            self.map[address + 1] = lb;
            Ok(())
        } else {
            fatal_error!(
                ErrorCode::StaticMemoryWrite,
                "Word write to {:#06x} at or above static memory ({:#06x})",
                address,
                self.static_mark
            )
        }
    }

    /// Copy of the current dynamic memory region
    ///
    /// # Returns
    /// Vector with the bytes below the static mark
    pub fn dynamic_state(&self) -> Vec<u8> {
        self.map[..self.static_mark].to_vec()
    }

    /// Reset dynamic memory back to the initial state
    pub fn reset(&mut self) {
        self.map[..self.dynamic.len()].copy_from_slice(&self.dynamic)
    }

    /// Overwrite dynamic memory
    ///
    /// # Arguments
    /// * `data` - dynamic memory contents, exactly the size of the dynamic region
    ///
    /// # Returns
    /// Empty [Result] or a [RuntimeError]
    pub fn restore(&mut self, data: &[u8]) -> Result<(), RuntimeError> {
        if data.len() == self.static_mark {
            self.map[..self.static_mark].copy_from_slice(data);
            Ok(())
        } else {
            fatal_error!(
                ErrorCode::InvalidAddress,
                "Dynamic memory size mismatch: restore has {:#06x} bytes, expected {:#06x}",
                data.len(),
                self.static_mark
            )
        }
    }
}
