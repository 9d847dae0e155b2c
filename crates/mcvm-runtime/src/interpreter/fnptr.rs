// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

use mcvm_types::{FnPtrKind, Value};

use crate::decoder;
use crate::error::InterpreterError;
use crate::interpreter::{Interpreter, Step};

pub fn addrof_static(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let pc = interp.frame().pc;
    let index = decoder::read_u16(interp.frame().code, pc + 1)?;
    interp.push(Value::FnPtr(FnPtrKind::Static, index));
    interp.frame_mut().pc = pc + 3;
    Ok(Step::Continue)
}

pub fn addrof_native(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let pc = interp.frame().pc;
    let index = decoder::read_u16(interp.frame().code, pc + 1)?;
    interp.push(Value::FnPtr(FnPtrKind::Native, index));
    interp.frame_mut().pc = pc + 3;
    Ok(Step::Continue)
}
