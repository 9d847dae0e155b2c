// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

//! Per-frame operand stacks and the call stack. A [`Frame`] is a plain
//! value record, not a heap-linked node: it is pushed once on call and
//! popped verbatim on return, never mutated through a reference held
//! elsewhere.

use mcvm_types::Value;

/// LIFO of temporaries for the currently executing frame.
pub type OperandStack = Vec<Value>;

/// The saved/active execution context of one function activation: its code
/// bytes, program counter, locals, and operand stack.
pub struct Frame<'a> {
    pub code: &'a [u8],
    pub pc: usize,
    pub locals: Vec<Value>,
    pub operand_stack: OperandStack,
}

impl<'a> Frame<'a> {
    pub fn new(code: &'a [u8], num_vars: usize) -> Self {
        Self {
            code,
            pc: 0,
            locals: vec![Value::default(); num_vars],
            operand_stack: OperandStack::new(),
        }
    }

    /// Like [`Frame::new`], but reserves `operand_stack_capacity` up front
    /// instead of growing the operand stack from empty.
    pub fn with_capacity(code: &'a [u8], num_vars: usize, operand_stack_capacity: usize) -> Self {
        Self {
            code,
            pc: 0,
            locals: vec![Value::default(); num_vars],
            operand_stack: OperandStack::with_capacity(operand_stack_capacity),
        }
    }
}

/// LIFO of saved caller frames, owned by the interpreter.
pub type CallStack<'a> = Vec<Frame<'a>>;
