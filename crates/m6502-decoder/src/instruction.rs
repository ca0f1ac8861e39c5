//! Instruction resolver.
//!
//! Maps an opcode's bit fields to the instruction it executes. Where the
//! opcode matrix is regular a whole row is table data; the rest is a small
//! match on `(bbb, aaa)`. Slots with no emulated instruction resolve to
//! `None`, which must agree with the classification grid marking them
//! invalid.

use serde::Serialize;

use crate::classify::{AddrMode, MemAccess};
use crate::flags::{C, D, I, N, V, Z};
use crate::opcode::Opcode;
use crate::ops::{AluOp, Reg, RmwOp};

/// Undocumented read-modify-write combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Combined {
    /// ASL then ORA.
    Slo,
    /// ROL then AND.
    Rla,
    /// LSR then EOR.
    Sre,
    /// ROR then ADC.
    Rra,
    /// DEC then CMP.
    Dcp,
    /// INC then SBC.
    Isb,
}

impl Combined {
    #[must_use]
    pub const fn modify(self) -> RmwOp {
        match self {
            Self::Slo => RmwOp::Asl,
            Self::Rla => RmwOp::Rol,
            Self::Sre => RmwOp::Lsr,
            Self::Rra => RmwOp::Ror,
            Self::Dcp => RmwOp::Dec,
            Self::Isb => RmwOp::Inc,
        }
    }

    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Slo => "SLO",
            Self::Rla => "RLA",
            Self::Sre => "SRE",
            Self::Rra => "RRA",
            Self::Dcp => "DCP",
            Self::Isb => "ISB",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Instruction {
    Brk,
    Jsr,
    Rti,
    Rts,
    Jmp,
    JmpIndirect,
    Php,
    Plp,
    Pha,
    Pla,
    /// Taken when `P & mask == (if test { mask } else { 0 })`.
    Branch { mask: u8, test: bool },
    Flag { mask: u8, set: bool },
    Bit,
    Load(Reg),
    Store(Reg),
    Transfer { from: Reg, to: Reg },
    Increment(Reg),
    Decrement(Reg),
    Compare(Reg),
    Alu(AluOp),
    /// Memory ASL/ROL/LSR/ROR/INC/DEC.
    Modify(RmwOp),
    /// ASL/ROL/LSR/ROR A.
    ShiftAccumulator(RmwOp),
    Nop,
    Lax,
    Sax,
    Combined(Combined),
}

/// An opcode's instruction and whether it is part of the documented set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Resolved {
    pub instruction: Instruction,
    pub undocumented: bool,
}

impl Instruction {
    #[must_use]
    pub fn mnemonic(self) -> String {
        match self {
            Self::Brk => "BRK".into(),
            Self::Jsr => "JSR".into(),
            Self::Rti => "RTI".into(),
            Self::Rts => "RTS".into(),
            Self::Jmp | Self::JmpIndirect => "JMP".into(),
            Self::Php => "PHP".into(),
            Self::Plp => "PLP".into(),
            Self::Pha => "PHA".into(),
            Self::Pla => "PLA".into(),
            Self::Branch { mask, test } => branch_mnemonic(mask, test).into(),
            Self::Flag { mask, set } => {
                let prefix = if set { "SE" } else { "CL" };
                format!("{prefix}{}", crate::flags::name(mask).unwrap_or("?"))
            }
            Self::Bit => "BIT".into(),
            Self::Load(reg) => format!("LD{}", reg.name()),
            Self::Store(reg) => format!("ST{}", reg.name()),
            Self::Transfer { from, to } => format!("T{}{}", from.name(), to.name()),
            Self::Increment(reg) => format!("IN{}", reg.name()),
            Self::Decrement(reg) => format!("DE{}", reg.name()),
            Self::Compare(Reg::A) => "CMP".into(),
            Self::Compare(reg) => format!("CP{}", reg.name()),
            Self::Alu(op) => op.mnemonic().into(),
            Self::Modify(op) | Self::ShiftAccumulator(op) => op.mnemonic().into(),
            Self::Nop => "NOP".into(),
            Self::Lax => "LAX".into(),
            Self::Sax => "SAX".into(),
            Self::Combined(op) => op.mnemonic().into(),
        }
    }

    /// Operand text for generated comments, given the opcode's mode.
    #[must_use]
    pub fn operand_text(self, mode: AddrMode) -> &'static str {
        match self {
            Self::ShiftAccumulator(_) => "A",
            Self::Jmp | Self::Jsr => "abs",
            Self::JmpIndirect => "(abs)",
            Self::Branch { .. } => "rel",
            _ => mode.text(),
        }
    }

    /// Whether this instruction can run with the given memory-access kind.
    ///
    /// Only instructions that reach memory through an effective address are
    /// constrained. Control flow and stack instructions carry their own
    /// sequences.
    #[must_use]
    pub fn accepts(self, access: MemAccess) -> bool {
        match self {
            Self::Store(_) | Self::Sax => access == MemAccess::Write,
            Self::Modify(_) | Self::Combined(_) => access == MemAccess::ReadModifyWrite,
            Self::Load(_) | Self::Lax | Self::Alu(_) | Self::Compare(_) | Self::Bit => {
                access == MemAccess::Read
            }
            _ => true,
        }
    }

    /// Whether the instruction needs an operand (immediate or memory).
    #[must_use]
    pub const fn needs_operand(self) -> bool {
        matches!(
            self,
            Self::Store(_)
                | Self::Sax
                | Self::Modify(_)
                | Self::Combined(_)
                | Self::Load(_)
                | Self::Lax
                | Self::Alu(_)
                | Self::Compare(_)
                | Self::Bit
        )
    }
}

fn branch_mnemonic(mask: u8, test: bool) -> &'static str {
    match (mask, test) {
        (N, false) => "BPL",
        (N, true) => "BMI",
        (V, false) => "BVC",
        (V, true) => "BVS",
        (C, false) => "BCC",
        (C, true) => "BCS",
        (Z, false) => "BNE",
        (Z, true) => "BEQ",
        _ => "B??",
    }
}

const fn doc(instruction: Instruction) -> Option<Resolved> {
    Some(Resolved {
        instruction,
        undocumented: false,
    })
}

const fn undoc(instruction: Instruction) -> Option<Resolved> {
    Some(Resolved {
        instruction,
        undocumented: true,
    })
}

use Instruction as Op;

/// `cc = 00`, `bbb = 000`: interrupts, subroutines and immediate X/Y ops.
const CONTROL_ROW: [Option<Resolved>; 8] = [
    doc(Op::Brk),
    doc(Op::Jsr),
    doc(Op::Rti),
    doc(Op::Rts),
    undoc(Op::Nop),
    doc(Op::Load(Reg::Y)),
    doc(Op::Compare(Reg::Y)),
    doc(Op::Compare(Reg::X)),
];

/// `cc = 00`, `bbb = 010`.
const STACK_ROW: [Option<Resolved>; 8] = [
    doc(Op::Php),
    doc(Op::Plp),
    doc(Op::Pha),
    doc(Op::Pla),
    doc(Op::Decrement(Reg::Y)),
    doc(Op::Transfer { from: Reg::A, to: Reg::Y }),
    doc(Op::Increment(Reg::Y)),
    doc(Op::Increment(Reg::X)),
];

/// `cc = 00`, `bbb = 100`, in `aaa` order.
const BRANCHES: [(u8, bool); 8] = [
    (N, false),
    (N, true),
    (V, false),
    (V, true),
    (C, false),
    (C, true),
    (Z, false),
    (Z, true),
];

/// `cc = 00`, `bbb = 110`.
const FLAG_ROW: [Option<Resolved>; 8] = [
    doc(Op::Flag { mask: C, set: false }),
    doc(Op::Flag { mask: C, set: true }),
    doc(Op::Flag { mask: I, set: false }),
    doc(Op::Flag { mask: I, set: true }),
    doc(Op::Transfer { from: Reg::Y, to: Reg::A }),
    doc(Op::Flag { mask: V, set: false }),
    doc(Op::Flag { mask: D, set: false }),
    doc(Op::Flag { mask: D, set: true }),
];

/// `cc = 01`, every row.
const ALU_GROUP: [Instruction; 8] = [
    Op::Alu(AluOp::Ora),
    Op::Alu(AluOp::And),
    Op::Alu(AluOp::Eor),
    Op::Alu(AluOp::Adc),
    Op::Store(Reg::A),
    Op::Load(Reg::A),
    Op::Compare(Reg::A),
    Op::Alu(AluOp::Sbc),
];

const SHIFTS: [RmwOp; 4] = [RmwOp::Asl, RmwOp::Rol, RmwOp::Lsr, RmwOp::Ror];

/// `cc = 10`, `bbb = 010`.
const ACCUMULATOR_ROW: [Option<Resolved>; 8] = [
    doc(Op::ShiftAccumulator(RmwOp::Asl)),
    doc(Op::ShiftAccumulator(RmwOp::Rol)),
    doc(Op::ShiftAccumulator(RmwOp::Lsr)),
    doc(Op::ShiftAccumulator(RmwOp::Ror)),
    doc(Op::Transfer { from: Reg::X, to: Reg::A }),
    doc(Op::Transfer { from: Reg::A, to: Reg::X }),
    doc(Op::Decrement(Reg::X)),
    doc(Op::Nop),
];

/// `cc = 10`, `bbb = 110`.
const STACK_TRANSFER_ROW: [Option<Resolved>; 8] = [
    undoc(Op::Nop),
    undoc(Op::Nop),
    undoc(Op::Nop),
    undoc(Op::Nop),
    doc(Op::Transfer { from: Reg::X, to: Reg::S }),
    doc(Op::Transfer { from: Reg::S, to: Reg::X }),
    undoc(Op::Nop),
    undoc(Op::Nop),
];

/// `cc = 11`: the stable undocumented opcodes.
const COMBINED_GROUP: [Option<Resolved>; 8] = [
    undoc(Op::Combined(Combined::Slo)),
    undoc(Op::Combined(Combined::Rla)),
    undoc(Op::Combined(Combined::Sre)),
    undoc(Op::Combined(Combined::Rra)),
    undoc(Op::Sax),
    undoc(Op::Lax),
    undoc(Op::Combined(Combined::Dcp)),
    undoc(Op::Combined(Combined::Isb)),
];

/// Resolve the instruction behind an opcode.
#[must_use]
pub fn resolve(op: Opcode) -> Option<Resolved> {
    let (bbb, aaa) = (op.bbb(), op.aaa());
    match op.cc() {
        0 => resolve_control(bbb, aaa),
        1 => resolve_alu(bbb, aaa),
        2 => resolve_rmw(bbb, aaa),
        _ => resolve_combined(bbb, aaa),
    }
}

fn resolve_control(bbb: usize, aaa: usize) -> Option<Resolved> {
    match (bbb, aaa) {
        (0, _) => CONTROL_ROW[aaa],
        (2, _) => STACK_ROW[aaa],
        (4, _) => {
            let (mask, test) = BRANCHES[aaa];
            doc(Op::Branch { mask, test })
        }
        (6, _) => FLAG_ROW[aaa],
        // SHY abs,X
        (7, 4) => None,
        (3, 2) => doc(Op::Jmp),
        (3, 3) => doc(Op::JmpIndirect),
        (_, 0 | 2 | 3) => undoc(Op::Nop),
        (1 | 3, 1) => doc(Op::Bit),
        (_, 1) => undoc(Op::Nop),
        (_, 4) => doc(Op::Store(Reg::Y)),
        (_, 5) => doc(Op::Load(Reg::Y)),
        (5 | 7, 6 | 7) => undoc(Op::Nop),
        (_, 6) => doc(Op::Compare(Reg::Y)),
        _ => doc(Op::Compare(Reg::X)),
    }
}

fn resolve_alu(bbb: usize, aaa: usize) -> Option<Resolved> {
    match (bbb, aaa) {
        // STA # does not exist; $89 is a two-byte NOP.
        (2, 4) => undoc(Op::Nop),
        _ => doc(ALU_GROUP[aaa]),
    }
}

fn resolve_rmw(bbb: usize, aaa: usize) -> Option<Resolved> {
    match (bbb, aaa) {
        // KIL slots and SHX abs,Y
        (0, 0..=3) | (4, _) | (7, 4) => None,
        (2, _) => ACCUMULATOR_ROW[aaa],
        (6, _) => STACK_TRANSFER_ROW[aaa],
        (_, 0..=3) => doc(Op::Modify(SHIFTS[aaa])),
        (0, 4 | 6 | 7) => undoc(Op::Nop),
        (_, 4) => doc(Op::Store(Reg::X)),
        (_, 5) => doc(Op::Load(Reg::X)),
        (_, 6) => doc(Op::Modify(RmwOp::Dec)),
        _ => doc(Op::Modify(RmwOp::Inc)),
    }
}

fn resolve_combined(bbb: usize, aaa: usize) -> Option<Resolved> {
    match (bbb, aaa) {
        (2, 7) => undoc(Op::Alu(AluOp::Sbc)),
        // ANC ALR ARR XAA LXA SBX, SHA (zp),Y, TAS LAS, SHA abs,Y
        (2, _) | (4, 4) | (6, 4 | 5) | (7, 4) => None,
        _ => COMBINED_GROUP[aaa],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mnemonic(op: u8) -> Option<(String, bool)> {
        resolve(Opcode(op)).map(|r| (r.instruction.mnemonic(), r.undocumented))
    }

    fn documented(name: &str) -> Option<(String, bool)> {
        Some((name.to_string(), false))
    }

    fn undocumented(name: &str) -> Option<(String, bool)> {
        Some((name.to_string(), true))
    }

    #[test]
    fn documented_samples() {
        assert_eq!(mnemonic(0x00), documented("BRK"));
        assert_eq!(mnemonic(0x24), documented("BIT"));
        assert_eq!(mnemonic(0x4C), documented("JMP"));
        assert_eq!(mnemonic(0x6C), documented("JMP"));
        assert_eq!(mnemonic(0x8A), documented("TXA"));
        assert_eq!(mnemonic(0x9A), documented("TXS"));
        assert_eq!(mnemonic(0xBA), documented("TSX"));
        assert_eq!(mnemonic(0x98), documented("TYA"));
        assert_eq!(mnemonic(0xA8), documented("TAY"));
        assert_eq!(mnemonic(0xB8), documented("CLV"));
        assert_eq!(mnemonic(0xBE), documented("LDX"));
        assert_eq!(mnemonic(0xC0), documented("CPY"));
        assert_eq!(mnemonic(0xCD), documented("CMP"));
        assert_eq!(mnemonic(0xE0), documented("CPX"));
        assert_eq!(mnemonic(0xEA), documented("NOP"));
        assert_eq!(mnemonic(0xF0), documented("BEQ"));
        assert_eq!(mnemonic(0x10), documented("BPL"));
        assert_eq!(mnemonic(0x6A), documented("ROR"));
        assert_eq!(mnemonic(0xCA), documented("DEX"));
        assert_eq!(mnemonic(0xC8), documented("INY"));
    }

    #[test]
    fn undocumented_samples() {
        assert_eq!(mnemonic(0x07), undocumented("SLO"));
        assert_eq!(mnemonic(0x1A), undocumented("NOP"));
        assert_eq!(mnemonic(0x80), undocumented("NOP"));
        assert_eq!(mnemonic(0x89), undocumented("NOP"));
        assert_eq!(mnemonic(0x5C), undocumented("NOP"));
        assert_eq!(mnemonic(0x97), undocumented("SAX"));
        assert_eq!(mnemonic(0xBF), undocumented("LAX"));
        assert_eq!(mnemonic(0xEB), undocumented("SBC"));
        assert_eq!(mnemonic(0xFF), undocumented("ISB"));
    }

    #[test]
    fn reserved_slots_do_not_resolve() {
        for op in [0x02, 0x12, 0xF2, 0x0B, 0x8B, 0x93, 0x9B, 0x9C, 0x9E, 0x9F, 0xBB] {
            assert_eq!(resolve(Opcode(op)), None, "opcode {op:#04X}");
        }
    }

    #[test]
    fn operand_text_overrides() {
        let asl_a = Instruction::ShiftAccumulator(RmwOp::Asl);
        assert_eq!(asl_a.operand_text(AddrMode::Implied), "A");
        assert_eq!(Instruction::JmpIndirect.operand_text(AddrMode::Jump), "(abs)");
        assert_eq!(
            Instruction::Alu(AluOp::Adc).operand_text(AddrMode::IndirectIndexed),
            "(zp),Y"
        );
    }

    #[test]
    fn access_constraints() {
        assert!(Instruction::Store(Reg::A).accepts(MemAccess::Write));
        assert!(!Instruction::Store(Reg::A).accepts(MemAccess::Read));
        assert!(!Instruction::Load(Reg::X).accepts(MemAccess::ReadModifyWrite));
        assert!(Instruction::Modify(RmwOp::Inc).accepts(MemAccess::ReadModifyWrite));
        assert!(Instruction::Pha.accepts(MemAccess::Write));
        assert!(Instruction::Nop.accepts(MemAccess::None));
    }
}
