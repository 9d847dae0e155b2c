// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

//! The outermost driving loop: set up the entry function's frame and step
//! the interpreter until it returns or faults.

use crate::config::InterpreterConfig;
use crate::error::InterpreterError;
use crate::interpreter::{Interpreter, Step};
use crate::native::NativeTable;
use crate::program::Program;
use crate::stack::Frame;

/// Runs `program` starting from `function_pool[0]`, with `num_args = 0`
/// (the entry function takes no arguments), until the outermost frame
/// returns or a fault aborts execution.
pub fn run(program: &Program, natives: &NativeTable) -> Result<i32, InterpreterError> {
    run_with_config(program, natives, &InterpreterConfig::default())
}

/// Like [`run`], but with embedder-supplied capacity hints and an optional
/// call-stack depth guard.
pub fn run_with_config(
    program: &Program,
    natives: &NativeTable,
    config: &InterpreterConfig,
) -> Result<i32, InterpreterError> {
    let entry = program
        .function_pool
        .first()
        .ok_or_else(|| InterpreterError::decode_fault("program has no entry function"))?;
    let frame = Frame::with_capacity(
        &entry.code,
        entry.num_vars as usize,
        config.initial_operand_stack_capacity,
    );
    let mut interp = Interpreter::with_config(program, natives, frame, config);

    #[cfg(feature = "tracing")]
    tracing::debug!(num_functions = program.function_pool.len(), "interpreter starting");

    loop {
        match interp.step() {
            Ok(Step::Continue) => continue,
            Ok(Step::Finished(code)) => return Ok(code),
            Err(error) => return Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::FunctionEntry;
    use pretty_assertions::assert_eq;

    #[test]
    fn s1_arithmetic_and_return() {
        // BIPUSH 3, BIPUSH 4, IADD, RETURN
        let code = vec![0x10, 3, 0x10, 4, 0x60, 0xB0];
        let program = Program::new(vec![FunctionEntry::new(code, 0, 0)], vec![], vec![], vec![]);
        let natives = NativeTable::default();
        assert_eq!(run(&program, &natives).unwrap(), 7);
    }

    #[test]
    fn s2_signed_branch() {
        // BIPUSH 0xFF, BIPUSH 0x01, IF_ICMPLT +6 (targets the BIPUSH 1 at
        // pc 10, measured from the IF_ICMPLT opcode at pc 4), BIPUSH 0,
        // RETURN, BIPUSH 1, RETURN
        let code = vec![
            0x10, 0xFF, 0x10, 0x01, 0xA1, 0x00, 0x06, 0x10, 0x00, 0xB0, 0x10, 0x01, 0xB0,
        ];
        let program = Program::new(vec![FunctionEntry::new(code, 0, 0)], vec![], vec![], vec![]);
        let natives = NativeTable::default();
        assert_eq!(run(&program, &natives).unwrap(), 1);
    }

    #[test]
    fn s3_division_fault() {
        // BIPUSH 1, BIPUSH 0, IDIV, RETURN
        let code = vec![0x10, 1, 0x10, 0, 0x6C, 0xB0];
        let program = Program::new(vec![FunctionEntry::new(code, 0, 0)], vec![], vec![], vec![]);
        let natives = NativeTable::default();
        let err = run(&program, &natives).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::ArithmeticFault);
    }

    #[test]
    fn s4_array_bounds() {
        // BIPUSH 3, NEWARRAY 4, DUP, BIPUSH 3, AADDS
        let code = vec![0x10, 3, 0xBC, 4, 0x59, 0x10, 3, 0x63];
        let program = Program::new(vec![FunctionEntry::new(code, 0, 0)], vec![], vec![], vec![]);
        let natives = NativeTable::default();
        let err = run(&program, &natives).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::MemoryFault);
    }

    #[test]
    fn s5_tagged_variant_round_trip() {
        // NEW 4, ADDTAG 0x0007, CHECKTAG 0x0007, IMLOAD, RETURN
        let code = vec![
            0xBB, 4, 0xC2, 0x00, 0x07, 0xC0, 0x00, 0x07, 0x2E, 0xB0,
        ];
        let program = Program::new(vec![FunctionEntry::new(code, 0, 0)], vec![], vec![], vec![]);
        let natives = NativeTable::default();
        assert_eq!(run(&program, &natives).unwrap(), 0);
    }

    #[test]
    fn s5_tag_mismatch_is_memory_fault() {
        let code = vec![
            0xBB, 4, 0xC2, 0x00, 0x07, 0xC0, 0x00, 0x08, 0x2E, 0xB0,
        ];
        let program = Program::new(vec![FunctionEntry::new(code, 0, 0)], vec![], vec![], vec![]);
        let natives = NativeTable::default();
        let err = run(&program, &natives).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::MemoryFault);
    }

    #[test]
    fn s6_call_and_return() {
        // function 0: BIPUSH 10, BIPUSH 32, INVOKESTATIC 1, RETURN
        // function 1: VLOAD 0, VLOAD 1, IADD, RETURN
        let caller = vec![0x10, 10, 0x10, 32, 0xB8, 0x00, 0x01, 0xB0];
        let callee = vec![0x15, 0x00, 0x15, 0x01, 0x60, 0xB0];
        let program = Program::new(
            vec![FunctionEntry::new(caller, 0, 0), FunctionEntry::new(callee, 2, 2)],
            vec![],
            vec![],
            vec![],
        );
        let natives = NativeTable::default();
        assert_eq!(run(&program, &natives).unwrap(), 42);
    }

    #[test]
    fn call_stack_depth_guard_is_a_decode_fault() {
        // function 0 calls itself unconditionally via INVOKESTATIC 0
        let code = vec![0xB8, 0x00, 0x00, 0xB0];
        let program = Program::new(vec![FunctionEntry::new(code, 0, 0)], vec![], vec![], vec![]);
        let natives = NativeTable::default();
        let config = crate::config::InterpreterConfig {
            max_call_stack_depth: Some(4),
            ..crate::config::InterpreterConfig::default()
        };
        let err = run_with_config(&program, &natives, &config).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::DecodeFault);
    }
}
