// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

use mcvm_types::Value;

use crate::decoder;
use crate::error::InterpreterError;
use crate::interpreter::{Interpreter, Step};

pub fn newarray(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let pc = interp.frame().pc;
    let elt_size = decoder::read_i8(interp.frame().code, pc + 1)? as i32;
    let count = interp.pop_int()?;
    let header = interp.heap.allocate_array(count, elt_size)?;
    interp.push(Value::Ptr(Some(header)));
    interp.frame_mut().pc = pc + 2;
    Ok(Step::Continue)
}

pub fn arraylength(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let header = interp.pop_ptr()?;
    let count = interp.heap.array_count(header)?;
    interp.push(Value::Int(count));
    interp.frame_mut().pc += 1;
    Ok(Step::Continue)
}

pub fn aadds(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let index = interp.pop_int()?;
    let header = interp.pop_ptr()?;
    let element_addr = interp.heap.array_element_address(header, index)?;
    interp.push(Value::Ptr(Some(element_addr)));
    interp.frame_mut().pc += 1;
    Ok(Step::Continue)
}
