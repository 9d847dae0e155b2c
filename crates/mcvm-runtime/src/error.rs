// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

use std::{any::Any, fmt::Display};

use mcvm_types::RuntimeError;

/// The taxonomy of ways the interpreter can terminate abnormally. All of
/// these are fatal: none can be caught from bytecode, and none leave the
/// interpreter state in a condition from which execution could resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Division/remainder by zero, `INT_MIN / -1`, or a shift by a negative
    /// amount or an amount `>= 32`.
    ArithmeticFault,

    /// A null pointer dereference, an out-of-bounds array index, a negative
    /// allocation size, or a tag mismatch on `CHECKTAG`.
    MemoryFault,

    /// `ASSERT` popped a zero condition.
    AssertionFailure,

    /// `ATHROW` was executed.
    UserError,

    /// An unknown opcode, an operand-stack underflow, or any other
    /// structurally-impossible state: a sign that the bytecode does not
    /// honor this core's contract.
    DecodeFault,
}

impl ErrorKind {
    /// A distinct, stable non-zero code per error kind, exposed so an
    /// embedding CLI (out of scope for this crate) has a ready-made exit
    /// code table instead of having to invent one.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorKind::ArithmeticFault => 1,
            ErrorKind::MemoryFault => 2,
            ErrorKind::AssertionFailure => 3,
            ErrorKind::UserError => 4,
            ErrorKind::DecodeFault => 5,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ErrorKind::ArithmeticFault => "arithmetic fault",
            ErrorKind::MemoryFault => "memory fault",
            ErrorKind::AssertionFailure => "assertion failure",
            ErrorKind::UserError => "user error",
            ErrorKind::DecodeFault => "decode fault",
        }
    }
}

/// A fatal interpreter termination, carrying the error kind and, where
/// applicable, the message string popped off the operand stack (the
/// argument to `ATHROW`/`ASSERT`, or a short diagnostic for the other
/// kinds).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterError {
    pub kind: ErrorKind,
    message: String,
}

impl InterpreterError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let error = Self {
            kind,
            message: message.into(),
        };

        #[cfg(feature = "tracing")]
        tracing::error!(kind = ?error.kind, message = %error.message, "interpreter terminated");

        error
    }

    pub fn arithmetic_fault(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ArithmeticFault, message)
    }

    pub fn memory_fault(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MemoryFault, message)
    }

    pub fn assertion_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AssertionFailure, message)
    }

    pub fn user_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UserError, message)
    }

    pub fn decode_fault(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DecodeFault, message)
    }

    pub fn exit_code(&self) -> i32 {
        self.kind.exit_code()
    }
}

impl Display for InterpreterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.label(), self.message)
    }
}

impl std::error::Error for InterpreterError {}

impl RuntimeError for InterpreterError {
    fn get_message(&self) -> &str {
        &self.message
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub type InterpretResult<T> = Result<T, InterpreterError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn exit_codes_are_distinct() {
        let kinds = [
            ErrorKind::ArithmeticFault,
            ErrorKind::MemoryFault,
            ErrorKind::AssertionFailure,
            ErrorKind::UserError,
            ErrorKind::DecodeFault,
        ];
        let mut codes: Vec<i32> = kinds.iter().map(|k| k.exit_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
        assert!(codes.iter().all(|&c| c != 0));
    }

    #[test]
    fn display_includes_kind_and_message() {
        let error = InterpreterError::arithmetic_fault("divide by zero");
        assert_eq!(format!("{}", error), "arithmetic fault: divide by zero");
    }
}
