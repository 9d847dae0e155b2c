// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

use mcvm_types::Value;

use crate::decoder;
use crate::error::InterpreterError;
use crate::interpreter::{Interpreter, Step};

pub fn bipush(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let pc = interp.frame().pc;
    let value = decoder::read_i8(interp.frame().code, pc + 1)?;
    interp.push(Value::Int(value as i32));
    interp.frame_mut().pc = pc + 2;
    Ok(Step::Continue)
}

pub fn ildc(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let pc = interp.frame().pc;
    let index = decoder::read_u16(interp.frame().code, pc + 1)? as usize;
    let value = *interp
        .program
        .int_pool
        .get(index)
        .ok_or_else(|| InterpreterError::decode_fault(format!("int pool index {} out of range", index)))?;
    interp.push(Value::Int(value));
    interp.frame_mut().pc = pc + 3;
    Ok(Step::Continue)
}

pub fn aldc(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let pc = interp.frame().pc;
    let offset = decoder::read_u16(interp.frame().code, pc + 1)? as usize;
    if offset > interp.program.string_pool.len() {
        return Err(InterpreterError::decode_fault(format!(
            "string pool offset {} out of range",
            offset
        )));
    }
    interp.push(Value::Ptr(Some(interp.string_pool_base + offset)));
    interp.frame_mut().pc = pc + 3;
    Ok(Step::Continue)
}

pub fn aconst_null(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    interp.push(Value::NULL);
    interp.frame_mut().pc += 1;
    Ok(Step::Continue)
}

pub fn vload(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let pc = interp.frame().pc;
    let slot = decoder::read_u8(interp.frame().code, pc + 1)? as usize;
    let value = *interp
        .frame()
        .locals
        .get(slot)
        .ok_or_else(|| InterpreterError::decode_fault(format!("local slot {} out of range", slot)))?;
    interp.push(value);
    interp.frame_mut().pc = pc + 2;
    Ok(Step::Continue)
}

pub fn vstore(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let pc = interp.frame().pc;
    let slot = decoder::read_u8(interp.frame().code, pc + 1)? as usize;
    let value = interp.pop()?;
    let frame = interp.frame_mut();
    let slot_ref = frame
        .locals
        .get_mut(slot)
        .ok_or_else(|| InterpreterError::decode_fault(format!("local slot {} out of range", slot)))?;
    *slot_ref = value;
    frame.pc = pc + 2;
    Ok(Step::Continue)
}
