// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

use mcvm_types::Value;

use crate::decoder;
use crate::error::InterpreterError;
use crate::interpreter::{Interpreter, Step};

/// Target is the opcode's own byte plus the signed offset; fall-through
/// when not taken is three bytes further (opcode + i16 immediate).
fn branch(
    interp: &mut Interpreter,
    taken: bool,
) -> Result<Step, InterpreterError> {
    let opcode_pc = interp.frame().pc;
    if taken {
        let offset = decoder::read_i16(interp.frame().code, opcode_pc + 1)?;
        let target = opcode_pc as isize + offset as isize;
        if target < 0 {
            return Err(InterpreterError::decode_fault("branch target is negative"));
        }
        interp.frame_mut().pc = target as usize;
    } else {
        interp.frame_mut().pc = opcode_pc + 3;
    }
    Ok(Step::Continue)
}

pub fn if_cmpeq(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let b = interp.pop()?;
    let a = interp.pop()?;
    branch(interp, a == b)
}

pub fn if_cmpne(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let b = interp.pop()?;
    let a = interp.pop()?;
    branch(interp, a != b)
}

/// Pops `v1` then `v2` (`v1` was pushed second); the earlier-pushed value
/// is `v2`.
fn pop_int_operands(interp: &mut Interpreter) -> Result<(i32, i32), InterpreterError> {
    let v1 = interp.pop_int()?;
    let v2 = interp.pop_int()?;
    Ok((v2, v1))
}

pub fn if_icmplt(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let (v2, v1) = pop_int_operands(interp)?;
    branch(interp, v2 < v1)
}

pub fn if_icmpge(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let (v2, v1) = pop_int_operands(interp)?;
    branch(interp, v2 >= v1)
}

pub fn if_icmpgt(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let (v2, v1) = pop_int_operands(interp)?;
    branch(interp, v2 > v1)
}

pub fn if_icmple(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    let (v2, v1) = pop_int_operands(interp)?;
    branch(interp, v2 <= v1)
}

pub fn goto(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    branch(interp, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::NativeTable;
    use crate::program::Program;
    use crate::stack::Frame;
    use pretty_assertions::assert_eq;

    #[test]
    fn branch_offset_is_from_opcode_byte() {
        // BIPUSH 0xFF, BIPUSH 0x01, IF_ICMPLT +7, BIPUSH 0, RETURN, BIPUSH 1, RETURN
        let code = [
            0x10, 0xFF, // pc 0-1
            0x10, 0x01, // pc 2-3
            0xA1, 0x00, 0x07, // pc 4-6: IF_ICMPLT +7 -> target pc 11
            0x10, 0x00, // pc 7-8
            0xB0, // pc 9
            0x10, 0x01, // pc 10-11
            0xB0, // pc 12
        ];
        let program = Program::default();
        let natives = NativeTable::default();
        let mut interp = Interpreter::new(&program, &natives, Frame::new(&code, 0));
        interp.push(Value::Int(-1));
        interp.push(Value::Int(1));
        interp.frame_mut().pc = 4;
        if_icmplt(&mut interp).unwrap();
        assert_eq!(interp.frame().pc, 11);
    }

    #[test]
    fn not_taken_falls_through_three_bytes() {
        let code = [0xA1u8, 0x00, 0x05, 0x00, 0x00];
        let program = Program::default();
        let natives = NativeTable::default();
        let mut interp = Interpreter::new(&program, &natives, Frame::new(&code, 0));
        interp.push(Value::Int(1));
        interp.push(Value::Int(1));
        if_icmplt(&mut interp).unwrap();
        assert_eq!(interp.frame().pc, 3);
    }

    #[test]
    fn cmpeq_compares_by_value_equality() {
        let code = [0x9Fu8, 0x00, 0x04, 0x00, 0x00];
        let program = Program::default();
        let natives = NativeTable::default();
        let mut interp = Interpreter::new(&program, &natives, Frame::new(&code, 0));
        interp.push(Value::NULL);
        interp.push(Value::NULL);
        if_cmpeq(&mut interp).unwrap();
        assert_eq!(interp.frame().pc, 4);
    }
}
