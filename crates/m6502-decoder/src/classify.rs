//! Opcode classification table.
//!
//! Every opcode maps to exactly one [`Cell`]: the addressing mode that
//! produces its effective address and the kind of memory access the
//! instruction performs there. Cells marked [`AddrMode::Invalid`] are the
//! KIL/JAM slots and the unstable undocumented opcodes (ANC, ALR, ARR, XAA,
//! LXA, SBX, SHA, SHX, SHY, TAS, LAS), which the decoder does not emulate.

use serde::Serialize;

use crate::opcode::Opcode;

/// Addressing mode of an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddrMode {
    /// No memory operand. PC stays on the address bus without incrementing.
    Implied,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    /// `(zp,X)`
    IndexedIndirect,
    /// `(zp),Y`
    IndirectIndexed,
    /// JMP abs and JMP (abs). Only the low operand byte is fetched here.
    Jump,
    /// JSR. Only the first operand fetch is started here.
    JumpSubroutine,
    Invalid,
}

impl AddrMode {
    /// Operand syntax used in generated comments.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::Implied | Self::Jump | Self::JumpSubroutine | Self::Invalid => "",
            Self::Immediate => "#",
            Self::ZeroPage => "zp",
            Self::ZeroPageX => "zp,X",
            Self::ZeroPageY => "zp,Y",
            Self::Absolute => "abs",
            Self::AbsoluteX => "abs,X",
            Self::AbsoluteY => "abs,Y",
            Self::IndexedIndirect => "(zp,X)",
            Self::IndirectIndexed => "(zp),Y",
        }
    }

    /// True for modes that compute an effective address in memory.
    #[must_use]
    pub const fn addresses_memory(self) -> bool {
        !matches!(
            self,
            Self::Implied | Self::Immediate | Self::Jump | Self::JumpSubroutine | Self::Invalid
        )
    }
}

/// What the instruction does at the effective address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemAccess {
    None,
    Read,
    Write,
    ReadModifyWrite,
}

/// One entry of the classification grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Cell {
    pub mode: AddrMode,
    pub access: MemAccess,
}

impl Cell {
    #[must_use]
    pub const fn new(mode: AddrMode, access: MemAccess) -> Self {
        Self { mode, access }
    }

    #[must_use]
    pub const fn is_invalid(self) -> bool {
        matches!(self.mode, AddrMode::Invalid)
    }
}

/// The full table, indexed `[cc][bbb][aaa]`.
pub type Grid = [[[Cell; 8]; 8]; 4];

const IMP__: Cell = Cell::new(AddrMode::Implied, MemAccess::None);
const IMP_R: Cell = Cell::new(AddrMode::Implied, MemAccess::Read);
const IMP_W: Cell = Cell::new(AddrMode::Implied, MemAccess::Write);
const IMM_R: Cell = Cell::new(AddrMode::Immediate, MemAccess::Read);
const ZER_R: Cell = Cell::new(AddrMode::ZeroPage, MemAccess::Read);
const ZER_W: Cell = Cell::new(AddrMode::ZeroPage, MemAccess::Write);
const ZER_M: Cell = Cell::new(AddrMode::ZeroPage, MemAccess::ReadModifyWrite);
const ZPX_R: Cell = Cell::new(AddrMode::ZeroPageX, MemAccess::Read);
const ZPX_W: Cell = Cell::new(AddrMode::ZeroPageX, MemAccess::Write);
const ZPX_M: Cell = Cell::new(AddrMode::ZeroPageX, MemAccess::ReadModifyWrite);
const ZPY_R: Cell = Cell::new(AddrMode::ZeroPageY, MemAccess::Read);
const ZPY_W: Cell = Cell::new(AddrMode::ZeroPageY, MemAccess::Write);
const ABS_R: Cell = Cell::new(AddrMode::Absolute, MemAccess::Read);
const ABS_W: Cell = Cell::new(AddrMode::Absolute, MemAccess::Write);
const ABS_M: Cell = Cell::new(AddrMode::Absolute, MemAccess::ReadModifyWrite);
const ABX_R: Cell = Cell::new(AddrMode::AbsoluteX, MemAccess::Read);
const ABX_W: Cell = Cell::new(AddrMode::AbsoluteX, MemAccess::Write);
const ABX_M: Cell = Cell::new(AddrMode::AbsoluteX, MemAccess::ReadModifyWrite);
const ABY_R: Cell = Cell::new(AddrMode::AbsoluteY, MemAccess::Read);
const ABY_W: Cell = Cell::new(AddrMode::AbsoluteY, MemAccess::Write);
const ABY_M: Cell = Cell::new(AddrMode::AbsoluteY, MemAccess::ReadModifyWrite);
const IDX_R: Cell = Cell::new(AddrMode::IndexedIndirect, MemAccess::Read);
const IDX_W: Cell = Cell::new(AddrMode::IndexedIndirect, MemAccess::Write);
const IDX_M: Cell = Cell::new(AddrMode::IndexedIndirect, MemAccess::ReadModifyWrite);
const IDY_R: Cell = Cell::new(AddrMode::IndirectIndexed, MemAccess::Read);
const IDY_W: Cell = Cell::new(AddrMode::IndirectIndexed, MemAccess::Write);
const IDY_M: Cell = Cell::new(AddrMode::IndirectIndexed, MemAccess::ReadModifyWrite);
const JMP_R: Cell = Cell::new(AddrMode::Jump, MemAccess::Read);
const JSR_R: Cell = Cell::new(AddrMode::JumpSubroutine, MemAccess::Read);
const INVAL: Cell = Cell::new(AddrMode::Invalid, MemAccess::None);

/// The NMOS 6502 opcode grid. Rows are `bbb`, columns are `aaa`.
#[rustfmt::skip]
pub static CLASSIFICATION: Grid = [
    // cc = 00: control, branches, flag ops, X/Y loads and stores
    [
        [IMP__, JSR_R, IMP_R, IMP_R, IMM_R, IMM_R, IMM_R, IMM_R],
        [ZER_R, ZER_R, ZER_R, ZER_R, ZER_W, ZER_R, ZER_R, ZER_R],
        [IMP__, IMP__, IMP_W, IMP__, IMP__, IMP__, IMP__, IMP__],
        [ABS_R, ABS_R, JMP_R, JMP_R, ABS_W, ABS_R, ABS_R, ABS_R],
        [IMM_R, IMM_R, IMM_R, IMM_R, IMM_R, IMM_R, IMM_R, IMM_R],
        [ZPX_R, ZPX_R, ZPX_R, ZPX_R, ZPX_W, ZPX_R, ZPX_R, ZPX_R],
        [IMP__, IMP__, IMP__, IMP__, IMP__, IMP__, IMP__, IMP__],
        [ABX_R, ABX_R, ABX_R, ABX_R, INVAL, ABX_R, ABX_R, ABX_R],
    ],
    // cc = 01: accumulator ALU ops
    [
        [IDX_R, IDX_R, IDX_R, IDX_R, IDX_W, IDX_R, IDX_R, IDX_R],
        [ZER_R, ZER_R, ZER_R, ZER_R, ZER_W, ZER_R, ZER_R, ZER_R],
        [IMM_R, IMM_R, IMM_R, IMM_R, IMM_R, IMM_R, IMM_R, IMM_R],
        [ABS_R, ABS_R, ABS_R, ABS_R, ABS_W, ABS_R, ABS_R, ABS_R],
        [IDY_R, IDY_R, IDY_R, IDY_R, IDY_W, IDY_R, IDY_R, IDY_R],
        [ZPX_R, ZPX_R, ZPX_R, ZPX_R, ZPX_W, ZPX_R, ZPX_R, ZPX_R],
        [ABY_R, ABY_R, ABY_R, ABY_R, ABY_W, ABY_R, ABY_R, ABY_R],
        [ABX_R, ABX_R, ABX_R, ABX_R, ABX_W, ABX_R, ABX_R, ABX_R],
    ],
    // cc = 10: shifts, INC/DEC, X loads and stores, register transfers
    [
        [INVAL, INVAL, INVAL, INVAL, IMM_R, IMM_R, IMM_R, IMM_R],
        [ZER_M, ZER_M, ZER_M, ZER_M, ZER_W, ZER_R, ZER_M, ZER_M],
        [IMP__, IMP__, IMP__, IMP__, IMP__, IMP__, IMP__, IMP__],
        [ABS_M, ABS_M, ABS_M, ABS_M, ABS_W, ABS_R, ABS_M, ABS_M],
        [INVAL, INVAL, INVAL, INVAL, INVAL, INVAL, INVAL, INVAL],
        [ZPX_M, ZPX_M, ZPX_M, ZPX_M, ZPY_W, ZPY_R, ZPX_M, ZPX_M],
        [IMP_R, IMP_R, IMP_R, IMP_R, IMP__, IMP__, IMP_R, IMP_R],
        [ABX_M, ABX_M, ABX_M, ABX_M, INVAL, ABY_R, ABX_M, ABX_M],
    ],
    // cc = 11: undocumented combined ops
    [
        [IDX_M, IDX_M, IDX_M, IDX_M, IDX_W, IDX_R, IDX_M, IDX_M],
        [ZER_M, ZER_M, ZER_M, ZER_M, ZER_W, ZER_R, ZER_M, ZER_M],
        [INVAL, INVAL, INVAL, INVAL, INVAL, INVAL, INVAL, IMM_R],
        [ABS_M, ABS_M, ABS_M, ABS_M, ABS_W, ABS_R, ABS_M, ABS_M],
        [IDY_M, IDY_M, IDY_M, IDY_M, INVAL, IDY_R, IDY_M, IDY_M],
        [ZPX_M, ZPX_M, ZPX_M, ZPX_M, ZPY_W, ZPY_R, ZPX_M, ZPX_M],
        [ABY_M, ABY_M, ABY_M, ABY_M, INVAL, INVAL, ABY_M, ABY_M],
        [ABX_M, ABX_M, ABX_M, ABX_M, INVAL, ABY_R, ABX_M, ABX_M],
    ],
];

/// Look up an opcode in the shipped grid.
#[must_use]
pub fn classify(op: Opcode) -> Cell {
    lookup(&CLASSIFICATION, op)
}

/// Look up an opcode in an arbitrary grid.
#[must_use]
pub fn lookup(grid: &Grid, op: Opcode) -> Cell {
    grid[op.cc()][op.bbb()][op.aaa()]
}

/// Mutable access to the cell for `op`, for building modified grids.
pub fn cell_mut(grid: &mut Grid, op: Opcode) -> &mut Cell {
    &mut grid[op.cc()][op.bbb()][op.aaa()]
}

/// Operand shape the chip uses for an invalid slot.
///
/// Only the bus footprint is kept (operand bytes and cycle count), so an
/// invalid opcode run as a no-op stays in step with the instruction stream.
/// The KIL slots have no operand and come back as implied.
#[must_use]
pub const fn reserved_shape(op: Opcode) -> Cell {
    match op.0 {
        // ANC, ALR, ARR, XAA, LXA, SBX
        0x0B | 0x2B | 0x4B | 0x6B | 0x8B | 0xAB | 0xCB => IMM_R,
        // SHA (zp),Y
        0x93 => IDY_W,
        // SHY abs,X
        0x9C => ABX_W,
        // TAS, SHX, SHA abs,Y
        0x9B | 0x9E | 0x9F => ABY_W,
        // LAS abs,Y
        0xBB => ABY_R,
        _ => IMP__,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(op: u8) -> Cell {
        classify(Opcode(op))
    }

    #[test]
    fn well_known_opcodes() {
        assert_eq!(cell(0xA9), IMM_R); // LDA #
        assert_eq!(cell(0xBD), ABX_R); // LDA abs,X
        assert_eq!(cell(0x9D), ABX_W); // STA abs,X
        assert_eq!(cell(0xFE), ABX_M); // INC abs,X
        assert_eq!(cell(0xB6), ZPY_R); // LDX zp,Y
        assert_eq!(cell(0xBE), ABY_R); // LDX abs,Y
        assert_eq!(cell(0x6C), JMP_R); // JMP (abs)
        assert_eq!(cell(0x20), JSR_R);
        assert_eq!(cell(0xEA), IMP__); // NOP
    }

    #[test]
    fn undocumented_abs_x_nops_are_indexed_reads() {
        assert_eq!(cell(0x5C), ABX_R);
        assert_eq!(cell(0x7C), ABX_R);
    }

    #[test]
    fn stores_are_never_reads() {
        for op in [0x84, 0x85, 0x86, 0x87, 0x8C, 0x8D, 0x8E, 0x8F, 0x91, 0x94, 0x95, 0x96, 0x97] {
            assert_eq!(cell(op).access, MemAccess::Write, "opcode {op:#04X}");
        }
    }

    #[test]
    fn invalid_slot_count() {
        let invalid = Opcode::all().filter(|&op| classify(op).is_invalid()).count();
        assert_eq!(invalid, 25);
    }

    #[test]
    fn reserved_shapes() {
        assert_eq!(reserved_shape(Opcode(0x0B)), IMM_R);
        assert_eq!(reserved_shape(Opcode(0x9C)), ABX_W);
        assert_eq!(reserved_shape(Opcode(0x93)), IDY_W);
        assert_eq!(reserved_shape(Opcode(0xBB)), ABY_R);
        assert_eq!(reserved_shape(Opcode(0x02)), IMP__);
        assert_eq!(reserved_shape(Opcode(0xF2)), IMP__);

        let shaped = Opcode::all()
            .filter(|&op| reserved_shape(op) != IMP__)
            .inspect(|&op| assert!(classify(op).is_invalid(), "{op} is a valid slot"))
            .count();
        assert_eq!(shaped, 13);
    }

    #[test]
    fn mode_text() {
        assert_eq!(AddrMode::IndirectIndexed.text(), "(zp),Y");
        assert_eq!(AddrMode::Implied.text(), "");
        assert!(AddrMode::AbsoluteY.addresses_memory());
        assert!(!AddrMode::Immediate.addresses_memory());
    }
}
