//! Register-effect fragments.
//!
//! Each instruction contributes the bus cycles that follow its addressing
//! sequence: the final operand read (with the effect applied to the byte
//! just read), the final write (with the byte set up just before), or a
//! complete control-flow sequence for instructions whose addressing mode
//! only starts the operand fetch.

use crate::flags::I;
use crate::instruction::{Combined, Instruction};
use crate::ops::{Addr, AluOp, BusOp, Cond, Data, Effect, Latch, Reg};

use BusOp::{Read, SetAddr, Write};

fn effect(effect: Effect) -> BusOp {
    BusOp::Effect(effect)
}

/// Push one byte: `$0100 | S`, write, then decrement S.
fn push(data: Data) -> [BusOp; 3] {
    [
        BusOp::SetAddrData(Addr::Stack, data),
        Write,
        effect(Effect::DecSp),
    ]
}

/// Load PC from a two-byte vector whose address is already in `ea`.
fn load_vector() -> [BusOp; 6] {
    [
        SetAddr(Addr::Ea),
        Read,
        BusOp::Latch(Latch::Temp),
        SetAddr(Addr::EaNextInPage),
        Read,
        effect(Effect::LoadPc),
    ]
}

/// Operations that complete `instruction` after its addressing sequence.
#[must_use]
pub fn fragment(instruction: Instruction) -> Vec<BusOp> {
    match instruction {
        Instruction::Load(reg) => vec![Read, effect(Effect::Load(reg))],
        Instruction::Lax => vec![Read, effect(Effect::LoadAX)],
        Instruction::Alu(op) => vec![Read, effect(Effect::Alu(op))],
        Instruction::Compare(reg) => vec![Read, effect(Effect::Compare(reg))],
        Instruction::Bit => vec![Read, effect(Effect::Bit)],
        Instruction::Nop => vec![Read],
        Instruction::Store(reg) => vec![BusOp::SetData(Data::Reg(reg)), Write],
        Instruction::Sax => vec![BusOp::SetData(Data::AandX), Write],
        Instruction::Modify(op) => {
            vec![Read, Write, effect(Effect::Modify(op)), Write]
        }
        Instruction::Combined(op) => vec![
            Read,
            // the unmodified value is written back first
            Write,
            effect(Effect::Modify(op.modify())),
            effect(follow_up(op)),
            Write,
        ],
        Instruction::ShiftAccumulator(op) => vec![Read, effect(Effect::ShiftAccumulator(op))],
        Instruction::Transfer { from, to } => vec![Read, effect(Effect::Transfer { from, to })],
        Instruction::Increment(reg) => vec![Read, effect(Effect::Increment(reg))],
        Instruction::Decrement(reg) => vec![Read, effect(Effect::Decrement(reg))],
        Instruction::Flag { mask, set } => vec![Read, effect(Effect::Flag { mask, set })],
        Instruction::Branch { mask, test } => vec![
            Read,
            BusOp::Latch(Latch::BranchTarget),
            BusOp::When(
                Cond::Branch { mask, test },
                vec![
                    SetAddr(Addr::Pc),
                    Read,
                    BusOp::When(
                        Cond::BranchPageCrossed,
                        vec![SetAddr(Addr::BranchFixup), Read],
                    ),
                    effect(Effect::JumpEa),
                ],
            ),
        ],
        Instruction::Php => {
            let mut ops = vec![Read];
            ops.extend(push(Data::StatusBrk));
            ops
        }
        Instruction::Pha => {
            let mut ops = vec![Read];
            ops.extend(push(Data::Reg(Reg::A)));
            ops
        }
        Instruction::Pla => pull(Effect::Load(Reg::A)),
        Instruction::Plp => pull(Effect::PullStatus),
        Instruction::Jmp => vec![Read, effect(Effect::LoadPc)],
        Instruction::JmpIndirect => {
            let mut ops = vec![Read, BusOp::Latch(Latch::HighTemp)];
            ops.extend(load_vector());
            ops
        }
        Instruction::Jsr => {
            let mut ops = vec![
                Read,
                BusOp::Latch(Latch::Temp),
                SetAddr(Addr::Stack),
                Read,
            ];
            ops.extend(push(Data::PcHi));
            ops.extend(push(Data::PcLo));
            ops.extend([SetAddr(Addr::Pc), Read, effect(Effect::LoadPc)]);
            ops
        }
        Instruction::Rts => vec![
            Read,
            SetAddr(Addr::Stack),
            Read,
            effect(Effect::IncSp),
            SetAddr(Addr::Stack),
            Read,
            BusOp::Latch(Latch::Temp),
            effect(Effect::IncSp),
            SetAddr(Addr::Stack),
            Read,
            effect(Effect::LoadPc),
            SetAddr(Addr::Pc),
            Read,
            effect(Effect::IncPc),
        ],
        Instruction::Rti => vec![
            Read,
            SetAddr(Addr::Stack),
            Read,
            effect(Effect::IncSp),
            SetAddr(Addr::Stack),
            Read,
            effect(Effect::PullStatus),
            effect(Effect::IncSp),
            SetAddr(Addr::Stack),
            Read,
            BusOp::Latch(Latch::Temp),
            effect(Effect::IncSp),
            SetAddr(Addr::Stack),
            Read,
            effect(Effect::LoadPc),
        ],
        Instruction::Brk => {
            // the padding byte after BRK is skipped
            let mut ops = vec![Read, effect(Effect::IncPc)];
            ops.extend(push(Data::PcHi));
            ops.extend(push(Data::PcLo));
            ops.extend(push(Data::StatusBrk));
            ops.push(BusOp::Latch(Latch::Vector(0xFFFE)));
            ops.extend(load_vector());
            ops.push(effect(Effect::Flag { mask: I, set: true }));
            ops
        }
    }
}

/// Accumulator operation applied to the modified byte.
fn follow_up(op: Combined) -> Effect {
    match op {
        Combined::Slo => Effect::Alu(AluOp::Ora),
        Combined::Rla => Effect::Alu(AluOp::And),
        Combined::Sre => Effect::Alu(AluOp::Eor),
        Combined::Rra => Effect::Alu(AluOp::Adc),
        Combined::Dcp => Effect::Compare(Reg::A),
        Combined::Isb => Effect::Alu(AluOp::Sbc),
    }
}

/// Dummy read at PC, dummy stack read, then increment S and read the value.
fn pull(then: Effect) -> Vec<BusOp> {
    vec![
        Read,
        SetAddr(Addr::Stack),
        Read,
        effect(Effect::IncSp),
        SetAddr(Addr::Stack),
        Read,
        effect(then),
    ]
}

/// Hardware interrupt acknowledge, run between instructions.
///
/// Two dummy reads at PC, pushes of PC and P (B clear), then the vector
/// chosen by whether NMI is asserted. Sets I and deasserts both interrupt
/// pins.
#[must_use]
pub fn interrupt() -> Vec<BusOp> {
    let mut ops = vec![SetAddr(Addr::Pc), Read, Read];
    ops.extend(push(Data::PcHi));
    ops.extend(push(Data::PcLo));
    ops.extend(push(Data::StatusIrq));
    ops.push(BusOp::Latch(Latch::InterruptVector));
    ops.extend(load_vector());
    ops.push(effect(Effect::Flag { mask: I, set: true }));
    ops.push(effect(Effect::ClearInterrupts));
    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{C, Z};
    use crate::ops::{Cycles, RmwOp, count_cycles};

    fn cycles(instruction: Instruction) -> Cycles {
        count_cycles(&fragment(instruction))
    }

    #[test]
    fn control_flow_lengths_after_addressing() {
        // Totals minus the opcode fetch and the addressing sequence.
        assert_eq!(cycles(Instruction::Brk), Cycles::fixed(6));
        assert_eq!(cycles(Instruction::Rti), Cycles::fixed(5));
        assert_eq!(cycles(Instruction::Rts), Cycles::fixed(5));
        assert_eq!(cycles(Instruction::Jsr), Cycles::fixed(5));
        assert_eq!(cycles(Instruction::Jmp), Cycles::fixed(1));
        assert_eq!(cycles(Instruction::JmpIndirect), Cycles::fixed(3));
        assert_eq!(cycles(Instruction::Pha), Cycles::fixed(2));
        assert_eq!(cycles(Instruction::Pla), Cycles::fixed(3));
    }

    #[test]
    fn branches_take_one_to_three_cycles() {
        let bne = Instruction::Branch { mask: Z, test: false };
        assert_eq!(cycles(bne), Cycles { min: 1, max: 3 });
    }

    #[test]
    fn read_modify_write_writes_twice() {
        for instruction in [
            Instruction::Modify(RmwOp::Asl),
            Instruction::Combined(Combined::Dcp),
        ] {
            let writes = fragment(instruction)
                .iter()
                .filter(|op| **op == Write)
                .count();
            assert_eq!(writes, 2);
        }
    }

    #[test]
    fn combined_ops_follow_up_on_the_modified_value() {
        let ops = fragment(Instruction::Combined(Combined::Isb));
        let modify = ops
            .iter()
            .position(|op| *op == effect(Effect::Modify(RmwOp::Inc)));
        let sbc = ops
            .iter()
            .position(|op| *op == effect(Effect::Alu(AluOp::Sbc)));
        assert!(modify < sbc);
    }

    #[test]
    fn interrupt_is_seven_cycles_and_pushes_b_clear() {
        let ops = interrupt();
        assert_eq!(count_cycles(&ops), Cycles::fixed(7));
        assert!(ops.contains(&BusOp::SetAddrData(Addr::Stack, Data::StatusIrq)));
        assert!(!ops.contains(&BusOp::SetAddrData(Addr::Stack, Data::StatusBrk)));
        assert_eq!(ops.last(), Some(&effect(Effect::ClearInterrupts)));
    }

    #[test]
    fn flag_ops_apply_after_the_dummy_read() {
        let sec = fragment(Instruction::Flag { mask: C, set: true });
        assert_eq!(sec, vec![Read, effect(Effect::Flag { mask: C, set: true })]);
    }
}
