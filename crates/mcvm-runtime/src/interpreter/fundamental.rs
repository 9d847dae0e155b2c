// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

use crate::error::InterpreterError;
use crate::interpreter::{Interpreter, Step};

pub fn nop(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    interp.frame_mut().pc += 1;
    Ok(Step::Continue)
}

pub fn pop(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    interp.pop()?;
    interp.frame_mut().pc += 1;
    Ok(Step::Continue)
}

pub fn dup(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let top = *interp
        .frame()
        .operand_stack
        .last()
        .ok_or_else(|| InterpreterError::decode_fault("operand stack underflow"))?;
    interp.push(top);
    interp.frame_mut().pc += 1;
    Ok(Step::Continue)
}

pub fn swap(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let a = interp.pop()?;
    let b = interp.pop()?;
    interp.push(a);
    interp.push(b);
    interp.frame_mut().pc += 1;
    Ok(Step::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::NativeTable;
    use crate::program::Program;
    use crate::stack::Frame;
    use mcvm_types::Value;
    use pretty_assertions::assert_eq;

    fn interp_with<'a>(program: &'a Program, natives: &'a NativeTable, code: &'a [u8]) -> Interpreter<'a> {
        Interpreter::new(program, natives, Frame::new(code, 0))
    }

    #[test]
    fn swap_exchanges_top_two() {
        let program = Program::default();
        let natives = NativeTable::default();
        let code = [0u8];
        let mut interp = interp_with(&program, &natives, &code);
        interp.push(Value::Int(1));
        interp.push(Value::Int(2));
        swap(&mut interp).unwrap();
        assert_eq!(interp.pop().unwrap(), Value::Int(1));
        assert_eq!(interp.pop().unwrap(), Value::Int(2));
    }

    #[test]
    fn dup_duplicates_top() {
        let program = Program::default();
        let natives = NativeTable::default();
        let code = [0u8];
        let mut interp = interp_with(&program, &natives, &code);
        interp.push(Value::Int(9));
        dup(&mut interp).unwrap();
        assert_eq!(interp.pop().unwrap(), Value::Int(9));
        assert_eq!(interp.pop().unwrap(), Value::Int(9));
    }
}
