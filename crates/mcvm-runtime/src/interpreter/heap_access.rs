// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

use mcvm_types::Value;

use crate::decoder;
use crate::error::InterpreterError;
use crate::interpreter::{Interpreter, Step};

/// `NEW <i8 size>`: allocates exactly `size` zero-initialized bytes. The
/// source computes this size from `sizeof(s)` of the int holding the
/// decoded immediate rather than the immediate's value, which allocates a
/// fixed four bytes regardless of what was requested; that is reproduced
/// nowhere here; `size` is used as written, and a negative `size` is a
/// memory fault rather than silently wrapping.
pub fn new(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let pc = interp.frame().pc;
    let size = decoder::read_i8(interp.frame().code, pc + 1)? as i32;
    let addr = interp.heap.allocate(size)?;
    interp.push(Value::Ptr(Some(addr)));
    interp.frame_mut().pc = pc + 2;
    Ok(Step::Continue)
}

pub fn imload(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let ptr = interp.pop_ptr()?;
    let value = interp.heap.read_i32(ptr)?;
    interp.push(Value::Int(value));
    interp.frame_mut().pc += 1;
    Ok(Step::Continue)
}

pub fn imstore(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let value = interp.pop_int()?;
    let ptr = interp.pop_ptr()?;
    interp.heap.write_i32(ptr, value)?;
    interp.frame_mut().pc += 1;
    Ok(Step::Continue)
}

pub fn amload(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let ptr = interp.pop_ptr()?;
    let value = interp.heap.read_ptr(ptr)?;
    interp.push(Value::Ptr(value));
    interp.frame_mut().pc += 1;
    Ok(Step::Continue)
}

pub fn amstore(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let value = interp.pop_ptr()?;
    let ptr = interp.pop_ptr()?;
    interp.heap.write_ptr(ptr, value)?;
    interp.frame_mut().pc += 1;
    Ok(Step::Continue)
}

pub fn cmload(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let ptr = interp.pop_ptr()?;
    let value = interp.heap.read_i8_sign_extended(ptr)?;
    interp.push(Value::Int(value));
    interp.frame_mut().pc += 1;
    Ok(Step::Continue)
}

pub fn cmstore(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let value = interp.pop_int()?;
    let ptr = interp.pop_ptr()?;
    interp.heap.write_i8(ptr, value)?;
    interp.frame_mut().pc += 1;
    Ok(Step::Continue)
}

pub fn aaddf(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let pc = interp.frame().pc;
    let offset = decoder::read_u8(interp.frame().code, pc + 1)? as usize;
    let ptr = interp.pop_ptr()?;
    let result = interp.heap.offset(ptr, offset)?;
    interp.push(Value::Ptr(Some(result)));
    interp.frame_mut().pc = pc + 2;
    Ok(Step::Continue)
}
