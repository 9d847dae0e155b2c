// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

use std::{
    any::Any,
    fmt::{Debug, Display},
};

pub mod opcode;
pub mod utils;

/// The kind of callable a `FnPtr` refers to.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FnPtrKind {
    Static,
    Native,
}

/// A heap address. `None` represents the null pointer; everything in this
/// crate treats `null` as a distinct, always-checked value rather than a
/// sentinel address, so a bytecode producer can never forge a "valid" null.
pub type Address = usize;

/// The uniform tagged machine word the interpreter operates on.
///
/// This is an explicit Rust sum type rather than a bit-packed word: the
/// source representation punches an integer, a pointer, and a tagged
/// pointer into the same machine word via low-bit tricks, but nothing in
/// this crate relies on, or needs, that kind of aliasing. Equality is
/// derived and therefore defined only within a variant; well-typed
/// bytecode never compares across variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Int(i32),
    Ptr(Option<Address>),
    TaggedPtr(Option<Address>, u16),
    FnPtr(FnPtrKind, u16),
}

impl Value {
    pub const NULL: Value = Value::Ptr(None);

    /// `val2int` in the source: extracts the integer payload.
    ///
    /// Only ever called on a `Value` known by the bytecode's own contract
    /// to be an `Int` (the function result at the outermost `RETURN`).
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_ptr(&self) -> Option<Option<Address>> {
        match self {
            Value::Ptr(addr) => Some(*addr),
            _ => None,
        }
    }

    pub fn as_tagged_ptr(&self) -> Option<(Option<Address>, u16)> {
        match self {
            Value::TaggedPtr(addr, tag) => Some((*addr, *tag)),
            _ => None,
        }
    }

    pub fn as_fn_ptr(&self) -> Option<(FnPtrKind, u16)> {
        match self {
            Value::FnPtr(kind, index) => Some((*kind, *index)),
            _ => None,
        }
    }
}

impl Default for Value {
    /// A zero-initialized local/slot. The source zeros raw bytes via a
    /// calloc-equivalent; this crate picks `Int(0)` as the one concrete
    /// representative of "all-zero bit pattern", since reading a local
    /// before it is written is already outside the bytecode producer's
    /// contract.
    fn default() -> Self {
        Value::Int(0)
    }
}

/// Uniform error taxonomy for fatal interpreter termination (see `RuntimeError`
/// in the reference runtime, kept here so both `mcvm-runtime` and any
/// embedder can depend on a single vocabulary).
pub trait RuntimeError: Debug + Display {
    fn get_message(&self) -> &str;
    fn as_any(&self) -> &dyn Any;
}
