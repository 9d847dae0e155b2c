// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

use mcvm_types::Value;

use crate::error::InterpreterError;
use crate::interpreter::{Interpreter, Step};

/// Pops `v1` then `v2` (`v1` was pushed second), per the pop order this
/// whole opcode family shares.
fn pop_operands(interp: &mut Interpreter) -> Result<(i32, i32), InterpreterError> {
    let v1 = interp.pop_int()?;
    let v2 = interp.pop_int()?;
    Ok((v2, v1))
}

fn binary(
    interp: &mut Interpreter,
    op: impl FnOnce(i32, i32) -> Result<i32, InterpreterError>,
) -> Result<Step, InterpreterError> {
    let (v2, v1) = pop_operands(interp)?;
    let result = op(v2, v1)?;
    interp.push(Value::Int(result));
    interp.frame_mut().pc += 1;
    Ok(Step::Continue)
}

pub fn iadd(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    binary(interp, |v2, v1| Ok(v2.wrapping_add(v1)))
}

pub fn isub(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    binary(interp, |v2, v1| Ok(v2.wrapping_sub(v1)))
}

pub fn imul(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    binary(interp, |v2, v1| Ok(v2.wrapping_mul(v1)))
}

pub fn idiv(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    binary(interp, |v2, v1| {
        if v1 == 0 {
            return Err(InterpreterError::arithmetic_fault("division by zero"));
        }
        if v2 == i32::MIN && v1 == -1 {
            return Err(InterpreterError::arithmetic_fault("INT_MIN / -1 overflows"));
        }
        Ok(v2.wrapping_div(v1))
    })
}

pub fn irem(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    binary(interp, |v2, v1| {
        if v1 == 0 {
            return Err(InterpreterError::arithmetic_fault("remainder by zero"));
        }
        if v2 == i32::MIN && v1 == -1 {
            return Err(InterpreterError::arithmetic_fault("INT_MIN % -1 overflows"));
        }
        Ok(v2.wrapping_rem(v1))
    })
}

pub fn ishl(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    binary(interp, |v2, v1| {
        if !(0..32).contains(&v1) {
            return Err(InterpreterError::arithmetic_fault(format!(
                "shift amount {} out of range",
                v1
            )));
        }
        Ok(((v2 as u32) << v1) as i32)
    })
}

pub fn ishr(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    binary(interp, |v2, v1| {
        if !(0..32).contains(&v1) {
            return Err(InterpreterError::arithmetic_fault(format!(
                "shift amount {} out of range",
                v1
            )));
        }
        Ok(v2 >> v1)
    })
}

pub fn iand(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    binary(interp, |v2, v1| Ok(v2 & v1))
}

pub fn ior(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    binary(interp, |v2, v1| Ok(v2 | v1))
}

pub fn ixor(interp: &mut Interpreter) -> Result<Step, InterpreterError> {
    binary(interp, |v2, v1| Ok(v2 ^ v1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::NativeTable;
    use crate::program::Program;
    use crate::stack::Frame;
    use pretty_assertions::assert_eq;

    fn run_binop(
        a: i32,
        b: i32,
        op: fn(&mut Interpreter) -> Result<Step, InterpreterError>,
    ) -> Result<i32, InterpreterError> {
        let program = Program::default();
        let natives = NativeTable::default();
        let code = [0u8];
        let mut interp = Interpreter::new(&program, &natives, Frame::new(&code, 0));
        interp.push(Value::Int(a));
        interp.push(Value::Int(b));
        op(&mut interp)?;
        Ok(interp.pop_int()?)
    }

    #[test]
    fn add_computes_v2_plus_v1() {
        assert_eq!(run_binop(3, 4, iadd).unwrap(), 7);
    }

    #[test]
    fn sub_is_v2_minus_v1() {
        assert_eq!(run_binop(10, 3, isub).unwrap(), 7);
    }

    #[test]
    fn div_by_zero_is_arithmetic_fault() {
        assert!(run_binop(1, 0, idiv).is_err());
    }

    #[test]
    fn int_min_div_neg_one_is_arithmetic_fault() {
        assert!(run_binop(i32::MIN, -1, idiv).is_err());
    }

    #[test]
    fn rem_identity_holds() {
        let a = 17;
        let b = 5;
        let quotient = run_binop(a, b, idiv).unwrap();
        let remainder = run_binop(a, b, irem).unwrap();
        assert_eq!(quotient * b + remainder, a);
    }

    #[test]
    fn shift_by_32_is_arithmetic_fault() {
        assert!(run_binop(1, 32, ishl).is_err());
    }

    #[test]
    fn shift_by_negative_is_arithmetic_fault() {
        assert!(run_binop(1, -1, ishr).is_err());
    }

    #[test]
    fn shr_is_arithmetic_sign_extending() {
        assert_eq!(run_binop(-8, 1, ishr).unwrap(), -4);
    }
}
