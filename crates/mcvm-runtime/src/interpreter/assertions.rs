// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

use crate::error::InterpreterError;
use crate::interpreter::{Interpreter, Step};

fn message_at(interp: &Interpreter, ptr: Option<mcvm_types::Address>) -> Result<String, InterpreterError> {
    let addr = ptr.ok_or_else(|| InterpreterError::memory_fault("null message pointer"))?;
    // the message lives in the heap arena as a NUL-terminated byte run,
    // written there by the bytecode before the throw/assert fires.
    let bytes = interp.heap.read_c_string(addr)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn athrow(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let ptr = interp.pop_ptr()?;
    let message = message_at(interp, ptr)?;
    Err(InterpreterError::user_error(message))
}

pub fn assert_(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let ptr = interp.pop_ptr()?;
    let condition = interp.pop_int()?;
    if condition == 0 {
        let message = message_at(interp, ptr)?;
        return Err(InterpreterError::assertion_failure(message));
    }
    interp.frame_mut().pc += 1;
    Ok(Step::Continue)
}
