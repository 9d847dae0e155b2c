// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

// Loading a bytecode file into a `Program` is an external collaborator's
// job (the bytecode parser isn't part of this repository), so this binary
// has nothing real to load from argv. It exists to demonstrate wiring an
// embedder's `Program` and `NativeTable` into `mcvm_runtime::run` and to
// report the resulting exit code the way a real frontend would.

use mcvm_runtime::{FunctionEntry, NativeTable, Program};

fn demo_program() -> Program {
    // BIPUSH 3, BIPUSH 4, IADD, RETURN
    let code = vec![0x10, 3, 0x10, 4, 0x60, 0xB0];
    Program::new(vec![FunctionEntry::new(code, 0, 0)], vec![], vec![], vec![])
}

fn main() {
    #[cfg(feature = "tracing")]
    tracing_subscriber::fmt::init();

    let program = demo_program();
    let natives = NativeTable::default();

    match mcvm_runtime::run(&program, &natives) {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            eprintln!("{}", error);
            std::process::exit(error.exit_code());
        }
    }
}
