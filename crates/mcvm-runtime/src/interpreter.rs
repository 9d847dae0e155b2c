// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

//! The fetch-decode-dispatch loop. [`Interpreter::step`] executes exactly
//! one opcode and reports what the driving loop in [`crate::process`]
//! should do next.

use mcvm_types::opcode::Opcode;
use mcvm_types::Value;

use crate::config::InterpreterConfig;
use crate::error::InterpreterError;
use crate::heap::Heap;
use crate::native::NativeTable;
use crate::program::Program;
use crate::stack::{CallStack, Frame};

mod arithmetic;
mod arrays;
mod assertions;
mod calling;
mod constants;
mod control_flow;
mod fnptr;
mod fundamental;
mod heap_access;
mod tagged;

/// What the dispatch loop should do after one `step`.
pub enum Step {
    /// Keep looping; the current frame's `pc` has already been advanced.
    Continue,
    /// The outermost frame returned; this is the program's exit value.
    Finished(i32),
}

/// All mutable state shared across opcode handlers during one run.
pub struct Interpreter<'a> {
    pub program: &'a Program,
    pub natives: &'a NativeTable,
    pub heap: Heap,
    /// Address at which the program's string pool was copied into the
    /// heap arena; `ALDC <index>` resolves to `string_pool_base + index`.
    pub string_pool_base: mcvm_types::Address,
    pub call_stack: CallStack<'a>,
    /// Frames beyond this depth are a decode fault rather than unbounded
    /// native recursion. `None` means unbounded.
    pub max_call_stack_depth: Option<usize>,
}

impl<'a> Interpreter<'a> {
    pub fn new(program: &'a Program, natives: &'a NativeTable, entry: Frame<'a>) -> Self {
        Self::with_config(program, natives, entry, &InterpreterConfig::default())
    }

    /// Like [`Interpreter::new`], but threads embedder-supplied capacity
    /// hints and an optional call-stack depth guard through construction.
    pub fn with_config(
        program: &'a Program,
        natives: &'a NativeTable,
        entry: Frame<'a>,
        config: &InterpreterConfig,
    ) -> Self {
        let (heap, string_pool_base) =
            Heap::with_string_pool_and_capacity(&program.string_pool, config.initial_heap_capacity);
        Self {
            program,
            natives,
            heap,
            string_pool_base,
            call_stack: vec![entry],
            max_call_stack_depth: config.max_call_stack_depth,
        }
    }

    pub fn frame(&self) -> &Frame<'a> {
        self.call_stack
            .last()
            .expect("call stack is never empty while running")
    }

    pub fn frame_mut(&mut self) -> &mut Frame<'a> {
        self.call_stack
            .last_mut()
            .expect("call stack is never empty while running")
    }

    /// Executes the opcode at the current frame's `pc`.
    pub fn step(&mut self) -> Result<Step, InterpreterError> {
        let pc = self.frame().pc;
        let opcode_byte = *self
            .frame()
            .code
            .get(pc)
            .ok_or_else(|| InterpreterError::decode_fault(format!("pc {} past end of code", pc)))?;
        let opcode = Opcode::try_from(opcode_byte)
            .map_err(|unknown| InterpreterError::decode_fault(format!("unknown opcode 0x{:02X}", unknown.0)))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(pc, opcode = opcode.get_name(), "dispatch");

        match opcode {
            Opcode::nop => fundamental::nop(self),
            Opcode::pop => fundamental::pop(self),
            Opcode::dup => fundamental::dup(self),
            Opcode::swap => fundamental::swap(self),

            Opcode::bipush => constants::bipush(self),
            Opcode::ildc => constants::ildc(self),
            Opcode::aldc => constants::aldc(self),
            Opcode::aconst_null => constants::aconst_null(self),
            Opcode::vload => constants::vload(self),
            Opcode::vstore => constants::vstore(self),

            Opcode::iadd => arithmetic::iadd(self),
            Opcode::isub => arithmetic::isub(self),
            Opcode::imul => arithmetic::imul(self),
            Opcode::idiv => arithmetic::idiv(self),
            Opcode::irem => arithmetic::irem(self),
            Opcode::ishl => arithmetic::ishl(self),
            Opcode::ishr => arithmetic::ishr(self),
            Opcode::iand => arithmetic::iand(self),
            Opcode::ior => arithmetic::ior(self),
            Opcode::ixor => arithmetic::ixor(self),

            Opcode::if_cmpeq => control_flow::if_cmpeq(self),
            Opcode::if_cmpne => control_flow::if_cmpne(self),
            Opcode::if_icmplt => control_flow::if_icmplt(self),
            Opcode::if_icmpge => control_flow::if_icmpge(self),
            Opcode::if_icmpgt => control_flow::if_icmpgt(self),
            Opcode::if_icmple => control_flow::if_icmple(self),
            Opcode::goto_ => control_flow::goto(self),

            Opcode::invokestatic => calling::invokestatic(self),
            Opcode::invokenative => calling::invokenative(self),
            Opcode::invokedynamic => calling::invokedynamic(self),
            Opcode::return_ => calling::return_(self),

            Opcode::new => heap_access::new(self),
            Opcode::imload => heap_access::imload(self),
            Opcode::imstore => heap_access::imstore(self),
            Opcode::amload => heap_access::amload(self),
            Opcode::amstore => heap_access::amstore(self),
            Opcode::cmload => heap_access::cmload(self),
            Opcode::cmstore => heap_access::cmstore(self),
            Opcode::aaddf => heap_access::aaddf(self),

            Opcode::newarray => arrays::newarray(self),
            Opcode::arraylength => arrays::arraylength(self),
            Opcode::aadds => arrays::aadds(self),

            Opcode::addtag => tagged::addtag(self),
            Opcode::checktag => tagged::checktag(self),
            Opcode::hastag => tagged::hastag(self),

            Opcode::addrof_static => fnptr::addrof_static(self),
            Opcode::addrof_native => fnptr::addrof_native(self),

            Opcode::athrow => assertions::athrow(self),
            Opcode::assert_ => assertions::assert_(self),
        }
    }

    pub fn push(&mut self, value: Value) {
        self.frame_mut().operand_stack.push(value);
    }

    pub fn pop(&mut self) -> Result<Value, InterpreterError> {
        self.frame_mut()
            .operand_stack
            .pop()
            .ok_or_else(|| InterpreterError::decode_fault("operand stack underflow"))
    }

    pub fn pop_int(&mut self) -> Result<i32, InterpreterError> {
        self.pop()?
            .as_int()
            .ok_or_else(|| InterpreterError::decode_fault("expected Int on operand stack"))
    }

    pub fn pop_ptr(&mut self) -> Result<Option<mcvm_types::Address>, InterpreterError> {
        self.pop()?
            .as_ptr()
            .ok_or_else(|| InterpreterError::decode_fault("expected Ptr on operand stack"))
    }
}
