// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

use mcvm_types::{FnPtrKind, Value};

use crate::decoder;
use crate::error::InterpreterError;
use crate::interpreter::{Interpreter, Step};
use crate::stack::Frame;

/// Pops `num_args` values off the current frame's operand stack and places
/// them into a fresh locals vector of size `num_vars`: the first popped
/// value (the last-pushed argument) lands at the highest argument slot, so
/// argument 0 ends up at local 0.
fn pop_args_into_locals(interp: &mut Interpreter, num_args: u16, num_vars: u16) -> Result<Vec<Value>, InterpreterError> {
    let mut locals = vec![Value::default(); num_vars as usize];
    for i in (0..num_args as usize).rev() {
        locals[i] = interp.pop()?;
    }
    Ok(locals)
}

fn invoke_static_at<'a>(interp: &mut Interpreter<'a>, fn_index: usize) -> Result<(), InterpreterError> {
    if let Some(max_depth) = interp.max_call_stack_depth {
        if interp.call_stack.len() >= max_depth {
            return Err(InterpreterError::decode_fault(format!(
                "call stack depth exceeded ({} frames)",
                max_depth
            )));
        }
    }
    let entry = interp
        .program
        .function_pool
        .get(fn_index)
        .ok_or_else(|| InterpreterError::decode_fault(format!("function index {} out of range", fn_index)))?;
    let locals = pop_args_into_locals(interp, entry.num_args, entry.num_vars)?;
    let mut callee = Frame::new(&entry.code, 0);
    callee.locals = locals;
    interp.call_stack.push(callee);
    Ok(())
}

fn invoke_native_at(interp: &mut Interpreter, native_index: usize) -> Result<(), InterpreterError> {
    let entry = *interp
        .program
        .native_pool
        .get(native_index)
        .ok_or_else(|| InterpreterError::decode_fault(format!("native index {} out of range", native_index)))?;
    let mut args = vec![Value::default(); entry.num_args as usize];
    for i in (0..entry.num_args as usize).rev() {
        args[i] = interp.pop()?;
    }
    let function = interp.natives.get(entry.function_table_index as usize).ok_or_else(|| {
        InterpreterError::decode_fault(format!(
            "native function table index {} out of range",
            entry.function_table_index
        ))
    })?;
    let result = function(&args);
    interp.push(result);
    Ok(())
}

pub fn invokestatic(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let pc = interp.frame().pc;
    let fn_index = decoder::read_u16(interp.frame().code, pc + 1)? as usize;
    interp.frame_mut().pc = pc + 3;
    invoke_static_at(interp, fn_index)?;
    Ok(Step::Continue)
}

pub fn invokenative(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let pc = interp.frame().pc;
    let native_index = decoder::read_u16(interp.frame().code, pc + 1)? as usize;
    invoke_native_at(interp, native_index)?;
    interp.frame_mut().pc = pc + 3;
    Ok(Step::Continue)
}

pub fn invokedynamic(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let pc = interp.frame().pc;
    let (kind, index) = interp
        .pop()?
        .as_fn_ptr()
        .ok_or_else(|| InterpreterError::decode_fault("expected FnPtr on operand stack"))?;
    match kind {
        FnPtrKind::Native => {
            invoke_native_at(interp, index as usize)?;
            interp.frame_mut().pc = pc + 1;
        }
        FnPtrKind::Static => {
            interp.frame_mut().pc = pc + 1;
            invoke_static_at(interp, index as usize)?;
        }
    }
    Ok(Step::Continue)
}

pub fn return_(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let value = interp.pop()?;
    if !interp.frame().operand_stack.is_empty() {
        return Err(InterpreterError::decode_fault(
            "operand stack not empty at return",
        ));
    }
    interp.call_stack.pop();
    if interp.call_stack.is_empty() {
        let code = value
            .as_int()
            .ok_or_else(|| InterpreterError::decode_fault("outermost return value is not an Int"))?;
        return Ok(Step::Finished(code));
    }
    interp.push(value);
    Ok(Step::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::NativeTable;
    use crate::program::{FunctionEntry, NativeEntry, Program};
    use pretty_assertions::assert_eq;

    #[test]
    fn invokestatic_places_args_in_ascending_locals() {
        // function 0: calls function 1 with args (10, 32)
        let callee_code = vec![
            0x15, 0x00, // VLOAD 0
            0x15, 0x01, // VLOAD 1
            0x60, // IADD
            0xB0, // RETURN
        ];
        let program = Program::new(
            vec![
                FunctionEntry::new(vec![], 0, 0),
                FunctionEntry::new(callee_code, 2, 2),
            ],
            vec![],
            vec![],
            vec![],
        );
        let natives = NativeTable::default();
        let caller_code = [0u8];
        let mut interp = Interpreter::new(&program, &natives, Frame::new(&caller_code, 0));
        interp.push(Value::Int(10));
        interp.push(Value::Int(32));
        invoke_static_at(&mut interp, 1).unwrap();
        assert_eq!(interp.frame().locals, vec![Value::Int(10), Value::Int(32)]);
    }

    #[test]
    fn return_in_outermost_frame_finishes() {
        let program = Program::new(vec![FunctionEntry::new(vec![0xB0], 0, 0)], vec![], vec![], vec![]);
        let natives = NativeTable::default();
        let code = program.function_pool[0].code.clone();
        let mut interp = Interpreter::new(&program, &natives, Frame::new(&code, 0));
        interp.push(Value::Int(42));
        match return_(&mut interp).unwrap() {
            Step::Finished(code) => assert_eq!(code, 42),
            Step::Continue => panic!("expected Finished"),
        }
    }

    #[test]
    fn invokenative_dispatches_by_table_index() {
        let program = Program::new(
            vec![],
            vec![NativeEntry {
                num_args: 1,
                function_table_index: 0,
            }],
            vec![],
            vec![],
        );
        let natives = NativeTable::new(vec![Box::new(|args: &[Value]| {
            Value::Int(args[0].as_int().unwrap() * 2)
        })]);
        let code = [0u8];
        let mut interp = Interpreter::new(&program, &natives, Frame::new(&code, 0));
        interp.push(Value::Int(21));
        invoke_native_at(&mut interp, 0).unwrap();
        assert_eq!(interp.pop().unwrap(), Value::Int(42));
    }
}
