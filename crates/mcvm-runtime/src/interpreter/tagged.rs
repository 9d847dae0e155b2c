// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

use mcvm_types::Value;

use crate::decoder;
use crate::error::InterpreterError;
use crate::interpreter::{Interpreter, Step};

/// `ADDTAG <u16 tag>`: attaches `tag` to the popped pointer. The source
/// reinterprets the popped pointer as pointing at a tagged cell and
/// mutates its discriminator in place; the abstract operation is simply
/// "pair this pointer with this tag", so that is what this builds,
/// directly, with no heap access.
pub fn addtag(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let pc = interp.frame().pc;
    let tag = decoder::read_u16(interp.frame().code, pc + 1)?;
    let ptr = interp.pop_ptr()?;
    interp.push(Value::TaggedPtr(ptr, tag));
    interp.frame_mut().pc = pc + 3;
    Ok(Step::Continue)
}

pub fn checktag(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let pc = interp.frame().pc;
    let tag = decoder::read_u16(interp.frame().code, pc + 1)?;
    let (ptr, actual_tag) = interp
        .pop()?
        .as_tagged_ptr()
        .ok_or_else(|| InterpreterError::decode_fault("expected TaggedPtr on operand stack"))?;
    if ptr.is_none() {
        return Err(InterpreterError::memory_fault("null tagged pointer"));
    }
    if actual_tag != tag {
        return Err(InterpreterError::memory_fault(format!(
            "tag mismatch: expected {}, found {}",
            tag, actual_tag
        )));
    }
    interp.push(Value::Ptr(ptr));
    interp.frame_mut().pc = pc + 3;
    Ok(Step::Continue)
}

pub fn hastag(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let pc = interp.frame().pc;
    let tag = decoder::read_u16(interp.frame().code, pc + 1)?;
    let (ptr, actual_tag) = interp
        .pop()?
        .as_tagged_ptr()
        .ok_or_else(|| InterpreterError::decode_fault("expected TaggedPtr on operand stack"))?;
    let matches = ptr.is_some() && actual_tag == tag;
    interp.push(Value::Int(matches as i32));
    interp.frame_mut().pc = pc + 3;
    Ok(Step::Continue)
}
