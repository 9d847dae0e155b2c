// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

//! The heap: a single growable byte arena, allocate-only for the life of
//! the program. Scalars, record fields, and array element storage are all
//! just byte ranges within it; the only structure the heap itself
//! understands is the 8-byte `{count, elt_size}` header `NEWARRAY` writes
//! ahead of an array's elements.

use mcvm_types::Address;

use crate::error::InterpreterError;

const PTR_WIDTH: usize = 8;
const ARRAY_HEADER_WIDTH: usize = 8;

/// Address `0` is reserved so it can serve as the null sentinel in the raw
/// byte encoding of a stored pointer, mirroring the source's use of a real
/// null pointer. The arena is seeded with one dummy word at construction
/// so the first real allocation never lands at offset 0.
pub struct Heap {
    data: Vec<u8>,
}

impl Heap {
    pub fn new() -> Self {
        Self {
            data: vec![0u8; PTR_WIDTH],
        }
    }

    /// Seeds the arena with the program's string pool immediately after
    /// the null guard word, so an `ALDC`-produced "byte offset within the
    /// string pool" is just an ordinary heap address like any other
    /// pointer: `ATHROW`/`IMLOAD`/etc. need no separate address space.
    /// Returns the base address at which the string pool now lives.
    pub fn with_string_pool(pool: &[u8]) -> (Self, Address) {
        Self::with_string_pool_and_capacity(pool, 0)
    }

    /// Like [`Heap::with_string_pool`], but reserves `extra_capacity` bytes
    /// beyond the null guard word and string pool, so later allocations
    /// don't immediately trigger a reallocation of the arena.
    pub fn with_string_pool_and_capacity(pool: &[u8], extra_capacity: usize) -> (Self, Address) {
        let mut data = Vec::with_capacity(PTR_WIDTH + pool.len() + extra_capacity);
        data.resize(PTR_WIDTH, 0);
        let base = data.len();
        data.extend_from_slice(pool);
        (Self { data }, base)
    }

    /// Allocates `size` zero-initialized bytes and returns their address.
    /// `size < 0` is a memory fault (the caller decodes the `NEW`/`NEWARRAY`
    /// immediate as a signed byte and must reject a negative request before
    /// it reaches here, but this is the final backstop).
    pub fn allocate(&mut self, size: i32) -> Result<Address, InterpreterError> {
        if size < 0 {
            return Err(InterpreterError::memory_fault(format!(
                "cannot allocate {} bytes",
                size
            )));
        }
        let address = self.data.len();
        self.data.resize(address + size as usize, 0);
        Ok(address)
    }

    /// Allocates an array: an 8-byte `{count, elt_size}` header followed by
    /// `count * elt_size` zero-initialized element bytes. Returns the
    /// address of the header, which is also the array's `Ptr` value.
    pub fn allocate_array(&mut self, count: i32, elt_size: i32) -> Result<Address, InterpreterError> {
        if count < 0 {
            return Err(InterpreterError::memory_fault(format!(
                "array count {} is negative",
                count
            )));
        }
        let element_bytes = count as usize * elt_size.max(0) as usize;
        let header = self.allocate((ARRAY_HEADER_WIDTH + element_bytes) as i32)?;
        self.data[header..header + 4].copy_from_slice(&count.to_be_bytes());
        self.data[header + 4..header + 8].copy_from_slice(&elt_size.to_be_bytes());
        Ok(header)
    }

    pub fn array_count(&self, header: Option<Address>) -> Result<i32, InterpreterError> {
        let header = non_null(header)?;
        let bytes: [u8; 4] = self.slice(header, 4)?.try_into().unwrap();
        Ok(i32::from_be_bytes(bytes))
    }

    /// `base + 8 + i * elt_size`, bounds-checked against the header's
    /// `count`.
    pub fn array_element_address(
        &self,
        header: Option<Address>,
        index: i32,
    ) -> Result<Address, InterpreterError> {
        let header = non_null(header)?;
        let count_bytes: [u8; 4] = self.slice(header, 4)?.try_into().unwrap();
        let elt_size_bytes: [u8; 4] = self.slice(header + 4, 4)?.try_into().unwrap();
        let count = i32::from_be_bytes(count_bytes);
        let elt_size = i32::from_be_bytes(elt_size_bytes);
        if index < 0 || index >= count {
            return Err(InterpreterError::memory_fault(format!(
                "array index {} out of bounds for length {}",
                index, count
            )));
        }
        Ok(header + ARRAY_HEADER_WIDTH + index as usize * elt_size as usize)
    }

    pub fn read_i32(&self, address: Option<Address>) -> Result<i32, InterpreterError> {
        let address = non_null(address)?;
        let bytes: [u8; 4] = self.slice(address, 4)?.try_into().unwrap();
        Ok(i32::from_be_bytes(bytes))
    }

    pub fn write_i32(&mut self, address: Option<Address>, value: i32) -> Result<(), InterpreterError> {
        let address = non_null(address)?;
        let slot = self.slice_mut(address, 4)?;
        slot.copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    /// Stores only the low 7 bits, per the source language's 7-bit `char`
    /// guarantee.
    pub fn write_i8(&mut self, address: Option<Address>, value: i32) -> Result<(), InterpreterError> {
        let address = non_null(address)?;
        let slot = self.slice_mut(address, 1)?;
        slot[0] = (value as u8) & 0x7F;
        Ok(())
    }

    pub fn read_i8_sign_extended(&self, address: Option<Address>) -> Result<i32, InterpreterError> {
        let address = non_null(address)?;
        let byte = self.slice(address, 1)?[0];
        Ok(byte as i8 as i32)
    }

    pub fn read_ptr(&self, address: Option<Address>) -> Result<Option<Address>, InterpreterError> {
        let address = non_null(address)?;
        let bytes: [u8; 8] = self.slice(address, PTR_WIDTH)?.try_into().unwrap();
        Ok(decode_ptr(u64::from_be_bytes(bytes)))
    }

    pub fn write_ptr(
        &mut self,
        address: Option<Address>,
        value: Option<Address>,
    ) -> Result<(), InterpreterError> {
        let address = non_null(address)?;
        let slot = self.slice_mut(address, PTR_WIDTH)?;
        slot.copy_from_slice(&encode_ptr(value).to_be_bytes());
        Ok(())
    }

    /// Reads a NUL-terminated byte string starting at `address`, terminator
    /// excluded. Used by `ATHROW`/`ASSERT` to recover the message a CMSTORE
    /// loop wrote into the heap byte-by-byte.
    pub fn read_c_string(&self, address: Address) -> Result<Vec<u8>, InterpreterError> {
        let mut bytes = Vec::new();
        let mut cursor = address;
        loop {
            let byte = self.slice(cursor, 1)?[0];
            if byte == 0 {
                return Ok(bytes);
            }
            bytes.push(byte);
            cursor += 1;
        }
    }

    /// `AADDF`/`AADDS`: interior pointer arithmetic. Produces an address
    /// without touching the heap contents; bounds are only checked on
    /// actual access.
    pub fn offset(&self, address: Option<Address>, delta: usize) -> Result<Address, InterpreterError> {
        let address = non_null(address)?;
        Ok(address + delta)
    }

    fn slice(&self, address: Address, len: usize) -> Result<&[u8], InterpreterError> {
        self.data
            .get(address..address + len)
            .ok_or_else(|| InterpreterError::memory_fault(format!("address {} out of bounds", address)))
    }

    fn slice_mut(&mut self, address: Address, len: usize) -> Result<&mut [u8], InterpreterError> {
        if address + len > self.data.len() {
            return Err(InterpreterError::memory_fault(format!(
                "address {} out of bounds",
                address
            )));
        }
        Ok(&mut self.data[address..address + len])
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

fn non_null(address: Option<Address>) -> Result<Address, InterpreterError> {
    address.ok_or_else(|| InterpreterError::memory_fault("null pointer dereference"))
}

fn encode_ptr(value: Option<Address>) -> u64 {
    match value {
        None => 0,
        Some(address) => address as u64,
    }
}

fn decode_ptr(raw: u64) -> Option<Address> {
    if raw == 0 {
        None
    } else {
        Some(raw as Address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fresh_allocation_is_zeroed() {
        let mut heap = Heap::new();
        let addr = heap.allocate(4).unwrap();
        assert_eq!(heap.read_i32(Some(addr)).unwrap(), 0);
    }

    #[test]
    fn negative_allocation_is_memory_fault() {
        let mut heap = Heap::new();
        assert!(heap.allocate(-1).is_err());
    }

    #[test]
    fn null_dereference_is_memory_fault() {
        let heap = Heap::new();
        assert!(heap.read_i32(None).is_err());
    }

    #[test]
    fn array_round_trips_count_and_bounds() {
        let mut heap = Heap::new();
        let header = heap.allocate_array(3, 4).unwrap();
        assert_eq!(heap.array_count(Some(header)).unwrap(), 3);
        assert!(heap.array_element_address(Some(header), 3).is_err());
        let elem0 = heap.array_element_address(Some(header), 0).unwrap();
        let elem2 = heap.array_element_address(Some(header), 2).unwrap();
        assert_eq!(elem2 - elem0, 8);
    }

    #[test]
    fn pointer_round_trip() {
        let mut heap = Heap::new();
        let cell = heap.allocate(8).unwrap();
        let target = heap.allocate(4).unwrap();
        heap.write_ptr(Some(cell), Some(target)).unwrap();
        assert_eq!(heap.read_ptr(Some(cell)).unwrap(), Some(target));
    }
}
