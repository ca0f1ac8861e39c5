//! Instruction fragment assembler.
//!
//! Combines the classification grid, the addressing sequencer and the
//! instruction resolver into one [`Fragment`] per opcode. The result is a
//! plain data table; rendering it is [`crate::emit`]'s job.

use log::{debug, info};
use serde::Serialize;

use crate::addressing;
use crate::classify::{self, AddrMode, CLASSIFICATION, Grid, MemAccess};
use crate::effects;
use crate::error::DecoderError;
use crate::instruction::{self, Instruction};
use crate::opcode::Opcode;
use crate::ops::{BusOp, Cycles, count_cycles};

/// The generated behaviour of one opcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    pub opcode: Opcode,
    /// `None` for invalid opcodes.
    pub instruction: Option<Instruction>,
    pub mnemonic: Option<String>,
    pub mode: AddrMode,
    pub access: MemAccess,
    pub undocumented: bool,
    pub invalid: bool,
    /// Addressing sequence followed by the register-effect sequence. Empty
    /// for invalid opcodes.
    pub ops: Vec<BusOp>,
}

impl Fragment {
    fn invalid(opcode: Opcode, mode: AddrMode, access: MemAccess) -> Self {
        Self {
            opcode,
            instruction: None,
            mnemonic: None,
            mode,
            access,
            undocumented: false,
            invalid: true,
            ops: Vec::new(),
        }
    }

    /// Cycle range including the opcode fetch.
    #[must_use]
    pub fn cycles(&self) -> Cycles {
        Cycles::fixed(1) + count_cycles(&self.ops)
    }

    /// Bus operations for an invalid opcode run as a no-op: the slot's
    /// operand fetch, then one discarded read at the operand address.
    #[must_use]
    pub fn nop_ops(&self) -> Vec<BusOp> {
        let shape = classify::reserved_shape(self.opcode);
        let mut ops = addressing::sequence(shape.mode, shape.access);
        ops.push(BusOp::Read);
        ops
    }

    /// Human-readable description, e.g. `LDA abs,X` or `SLO zp (undocumented)`.
    #[must_use]
    pub fn comment(&self) -> String {
        let (Some(instruction), Some(mnemonic)) = (self.instruction, &self.mnemonic) else {
            return "invalid".to_string();
        };
        let operand = instruction.operand_text(self.mode);
        let mut text = if operand.is_empty() {
            mnemonic.clone()
        } else {
            format!("{mnemonic} {operand}")
        };
        if self.undocumented {
            text.push_str(" (undocumented)");
        }
        text
    }
}

/// All 256 fragments plus the interrupt-acknowledge sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecoderTable {
    fragments: Vec<Fragment>,
    interrupt: Vec<BusOp>,
}

impl DecoderTable {
    /// Build the table from the shipped classification grid.
    pub fn build() -> Result<Self, DecoderError> {
        Self::build_from(&CLASSIFICATION)
    }

    /// Build the table from an arbitrary grid.
    ///
    /// Fails on the first opcode whose classification and instruction
    /// disagree.
    pub fn build_from(grid: &Grid) -> Result<Self, DecoderError> {
        let fragments = Opcode::all()
            .map(|op| assemble(grid, op))
            .collect::<Result<Vec<_>, _>>()?;

        let undocumented = fragments.iter().filter(|f| f.undocumented).count();
        let invalid = fragments.iter().filter(|f| f.invalid).count();
        info!(
            "decoder table: {} documented, {undocumented} undocumented, {invalid} invalid",
            fragments.len() - undocumented - invalid
        );

        Ok(Self {
            fragments,
            interrupt: effects::interrupt(),
        })
    }

    /// Fragment for one opcode.
    #[must_use]
    pub fn fragment(&self, opcode: u8) -> &Fragment {
        &self.fragments[usize::from(opcode)]
    }

    /// Fragments in opcode order.
    #[must_use]
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Interrupt-acknowledge sequence, run between instructions.
    #[must_use]
    pub fn interrupt(&self) -> &[BusOp] {
        &self.interrupt
    }

    /// Cycle range of the interrupt sequence.
    #[must_use]
    pub fn interrupt_cycles(&self) -> Cycles {
        count_cycles(&self.interrupt)
    }
}

fn assemble(grid: &Grid, opcode: Opcode) -> Result<Fragment, DecoderError> {
    let cell = classify::lookup(grid, opcode);
    let resolved = instruction::resolve(opcode);

    if cell.is_invalid() {
        if let Some(resolved) = resolved {
            return Err(DecoderError::UnexpectedInstruction {
                opcode,
                mnemonic: resolved.instruction.mnemonic(),
            });
        }
        debug!("{opcode}: invalid");
        return Ok(Fragment::invalid(opcode, cell.mode, cell.access));
    }

    let resolved = resolved.ok_or(DecoderError::UnresolvedOpcode { opcode })?;
    let instruction = resolved.instruction;
    let mnemonic = instruction.mnemonic();

    if !instruction.accepts(cell.access) {
        return Err(DecoderError::AccessMismatch {
            opcode,
            mnemonic,
            access: cell.access,
        });
    }
    if instruction.needs_operand() && cell.mode == AddrMode::Implied {
        return Err(DecoderError::MissingOperand { opcode, mnemonic });
    }

    let mut ops = addressing::sequence(cell.mode, cell.access);
    ops.extend(effects::fragment(instruction));

    if resolved.undocumented {
        debug!("{opcode}: {mnemonic} {} (undocumented)", cell.mode.text());
    }

    Ok(Fragment {
        opcode,
        instruction: Some(instruction),
        mnemonic: Some(mnemonic),
        mode: cell.mode,
        access: cell.access,
        undocumented: resolved.undocumented,
        invalid: false,
        ops,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DecoderTable {
        DecoderTable::build().expect("shipped grid builds")
    }

    #[test]
    fn one_fragment_per_opcode() {
        let table = table();
        assert_eq!(table.fragments().len(), 256);
        for (i, fragment) in table.fragments().iter().enumerate() {
            assert_eq!(usize::from(fragment.opcode.0), i);
        }
    }

    #[test]
    fn comments() {
        let table = table();
        assert_eq!(table.fragment(0xBD).comment(), "LDA abs,X");
        assert_eq!(table.fragment(0x0A).comment(), "ASL A");
        assert_eq!(table.fragment(0xEA).comment(), "NOP");
        assert_eq!(table.fragment(0x6C).comment(), "JMP (abs)");
        assert_eq!(table.fragment(0xD0).comment(), "BNE rel");
        assert_eq!(table.fragment(0x03).comment(), "SLO (zp,X) (undocumented)");
        assert_eq!(table.fragment(0x02).comment(), "invalid");
    }

    #[test]
    fn invalid_fragments_are_empty() {
        let table = table();
        let jam = table.fragment(0x12);
        assert!(jam.invalid);
        assert!(jam.ops.is_empty());
        assert_eq!(jam.cycles(), Cycles::fixed(1));
    }

    #[test]
    fn reserved_nops_keep_the_slot_footprint() {
        let table = table();
        let nop_cycles =
            |op: u8| Cycles::fixed(1) + count_cycles(&table.fragment(op).nop_ops());

        assert_eq!(nop_cycles(0x02), Cycles::fixed(2));
        assert_eq!(nop_cycles(0x0B), Cycles::fixed(2));
        assert_eq!(nop_cycles(0x9C), Cycles::fixed(5));
        assert_eq!(nop_cycles(0x93), Cycles::fixed(6));
        assert_eq!(nop_cycles(0xBB), Cycles { min: 4, max: 5 });
        assert!(!table.fragment(0x9C).nop_ops().contains(&BusOp::Write));
    }

    #[test]
    fn interrupt_sequence_is_seven_cycles() {
        assert_eq!(table().interrupt_cycles(), Cycles::fixed(7));
    }
}
