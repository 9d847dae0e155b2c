// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

// note:
//
// every instruction is a single opcode byte, optionally followed by an immediate:
// - no immediate: 1 byte total (e.g. `nop`, `iadd`, `return_`)
// - i8/u8 immediate: 2 bytes total (e.g. `bipush`, `vload`)
// - u16/i16 immediate: 3 bytes total (e.g. `ildc`, `goto`)
//
// unlike a fixed-width instruction set there is no padding: the decoder always
// knows how many bytes an opcode consumes because the opcode alone determines it.

pub const MAX_OPCODE_NUMBER: usize = 256;

#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[allow(non_camel_case_types)]
pub enum Opcode {
    nop = 0x00,
    aconst_null = 0x01,

    bipush = 0x10,
    ildc = 0x13,
    aldc = 0x14,
    vload = 0x15,
    vstore = 0x36,

    imload = 0x2E,
    amload = 0x2F,
    cmload = 0x34,
    imstore = 0x4E,
    amstore = 0x4F,
    cmstore = 0x55,
    aaddf = 0x62,
    aadds = 0x63,

    pop = 0x57,
    dup = 0x59,
    swap = 0x5F,

    iadd = 0x60,
    isub = 0x64,
    imul = 0x68,
    idiv = 0x6C,
    irem = 0x70,

    ishl = 0x78,
    ishr = 0x7A,
    iand = 0x7E,
    ior = 0x80,
    ixor = 0x82,

    if_cmpeq = 0x9F,
    if_cmpne = 0xA0,
    if_icmplt = 0xA1,
    if_icmpge = 0xA2,
    if_icmpgt = 0xA3,
    if_icmple = 0xA4,
    goto_ = 0xA7,

    return_ = 0xB0,
    invokedynamic = 0xB6,
    invokenative = 0xB7,
    invokestatic = 0xB8,

    new = 0xBB,
    newarray = 0xBC,
    arraylength = 0xBE,

    athrow = 0xBF,

    checktag = 0xC0,
    hastag = 0xC1,
    addtag = 0xC2,

    addrof_static = 0xCA,
    addrof_native = 0xCB,

    assert_ = 0xCF,
}

/// A byte that does not correspond to any recognized opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownOpcode(pub u8);

impl TryFrom<u8> for Opcode {
    type Error = UnknownOpcode;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Ok(match byte {
            0x00 => Opcode::nop,
            0x01 => Opcode::aconst_null,
            0x10 => Opcode::bipush,
            0x13 => Opcode::ildc,
            0x14 => Opcode::aldc,
            0x15 => Opcode::vload,
            0x36 => Opcode::vstore,
            0x2E => Opcode::imload,
            0x2F => Opcode::amload,
            0x34 => Opcode::cmload,
            0x4E => Opcode::imstore,
            0x4F => Opcode::amstore,
            0x55 => Opcode::cmstore,
            0x62 => Opcode::aaddf,
            0x63 => Opcode::aadds,
            0x57 => Opcode::pop,
            0x59 => Opcode::dup,
            0x5F => Opcode::swap,
            0x60 => Opcode::iadd,
            0x64 => Opcode::isub,
            0x68 => Opcode::imul,
            0x6C => Opcode::idiv,
            0x70 => Opcode::irem,
            0x78 => Opcode::ishl,
            0x7A => Opcode::ishr,
            0x7E => Opcode::iand,
            0x80 => Opcode::ior,
            0x82 => Opcode::ixor,
            0x9F => Opcode::if_cmpeq,
            0xA0 => Opcode::if_cmpne,
            0xA1 => Opcode::if_icmplt,
            0xA2 => Opcode::if_icmpge,
            0xA3 => Opcode::if_icmpgt,
            0xA4 => Opcode::if_icmple,
            0xA7 => Opcode::goto_,
            0xB0 => Opcode::return_,
            0xB6 => Opcode::invokedynamic,
            0xB7 => Opcode::invokenative,
            0xB8 => Opcode::invokestatic,
            0xBB => Opcode::new,
            0xBC => Opcode::newarray,
            0xBE => Opcode::arraylength,
            0xBF => Opcode::athrow,
            0xC0 => Opcode::checktag,
            0xC1 => Opcode::hastag,
            0xC2 => Opcode::addtag,
            0xCA => Opcode::addrof_static,
            0xCB => Opcode::addrof_native,
            0xCF => Opcode::assert_,
            other => return Err(UnknownOpcode(other)),
        })
    }
}
