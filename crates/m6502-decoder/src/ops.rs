//! Bus-operation IR.
//!
//! A fragment is a flat list of [`BusOp`]s. Only [`BusOp::Read`] and
//! [`BusOp::Write`] consume a clock cycle; everything else models the
//! address unit and the register file between cycles. [`BusOp::When`]
//! wraps operations that only run when a runtime condition holds (page
//! crossings, taken branches).

use std::ops::Add;

use serde::Serialize;

/// Index register used by indexed addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Index {
    X,
    Y,
}

/// Programmer-visible 8-bit registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Reg {
    A,
    X,
    Y,
    S,
}

impl Reg {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::X => "X",
            Self::Y => "Y",
            Self::S => "S",
        }
    }
}

impl From<Index> for Reg {
    fn from(index: Index) -> Self {
        match index {
            Index::X => Self::X,
            Index::Y => Self::Y,
        }
    }
}

/// Where the next bus address comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Addr {
    /// PC, left unchanged.
    Pc,
    /// PC, then PC is incremented.
    PcInc,
    /// The effective address latch.
    Ea,
    /// Effective address + 1 without carrying into the high byte (JMP ind bug).
    EaNextInPage,
    /// `$0100 | S`.
    Stack,
    /// Branch target low byte on the old PC page.
    BranchFixup,
}

/// Value driven onto the data bus before a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Data {
    Reg(Reg),
    /// `A & X` (SAX).
    AandX,
    /// P with B and U set (BRK, PHP).
    StatusBrk,
    /// P with B clear and U set (hardware interrupts).
    StatusIrq,
    PcHi,
    PcLo,
}

/// Address-unit updates. `ea` is the effective address latch and `t` a
/// 16-bit scratch value holding a low byte plus index (so bit 8 records the
/// page carry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Latch {
    /// `ea = data`
    ZeroPage,
    /// `ea = (ea + index) & 0xFF`
    ZeroPageIndexed(Index),
    /// `ea = (ea + 1) & 0xFF`
    ZeroPageNext,
    /// `t = data`
    Temp,
    /// `t = data + index`
    TempIndexed(Index),
    /// `ea = data << 8 | (t & 0xFF)`
    HighTemp,
    /// `ea = (ea & 0xFF00) + t`, applying the carry left in `t`.
    PageCarry,
    /// `ea = vector`
    Vector(u16),
    /// `ea = $FFFA` while NMI is asserted, else `$FFFE`.
    InterruptVector,
    /// `ea = pc + (data as i8)`
    BranchTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AluOp {
    Ora,
    And,
    Eor,
    Adc,
    Sbc,
}

impl AluOp {
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Ora => "ORA",
            Self::And => "AND",
            Self::Eor => "EOR",
            Self::Adc => "ADC",
            Self::Sbc => "SBC",
        }
    }
}

/// Single-operand read-modify-write operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RmwOp {
    Asl,
    Rol,
    Lsr,
    Ror,
    Inc,
    Dec,
}

impl RmwOp {
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Asl => "ASL",
            Self::Rol => "ROL",
            Self::Lsr => "LSR",
            Self::Ror => "ROR",
            Self::Inc => "INC",
            Self::Dec => "DEC",
        }
    }
}

/// Register effects. None of these touch the bus pins except
/// [`Effect::Modify`], which replaces the data byte, and
/// [`Effect::ClearInterrupts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Effect {
    /// `reg = data`, update N and Z.
    Load(Reg),
    /// `A = X = data`, update N and Z.
    LoadAX,
    Alu(AluOp),
    Compare(Reg),
    Bit,
    /// `data = op(data)`
    Modify(RmwOp),
    ShiftAccumulator(RmwOp),
    /// `to = from`; N and Z are updated unless `to` is S.
    Transfer { from: Reg, to: Reg },
    Increment(Reg),
    Decrement(Reg),
    Flag { mask: u8, set: bool },
    /// `P = data` with U forced on.
    PullStatus,
    IncPc,
    IncSp,
    DecSp,
    /// `pc = data << 8 | (t & 0xFF)`
    LoadPc,
    /// `pc = ea`
    JumpEa,
    /// Deassert IRQ and NMI after an interrupt has been taken.
    ClearInterrupts,
}

/// Runtime conditions for [`BusOp::When`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Cond {
    /// The index addition carried into `t`'s high byte.
    PageCrossed,
    /// Branch taken: `P & mask == (if test { mask } else { 0 })`.
    Branch { mask: u8, test: bool },
    /// The branch target is on a different page from PC.
    BranchPageCrossed,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum BusOp {
    SetAddr(Addr),
    SetAddrData(Addr, Data),
    SetData(Data),
    /// Set RW high and tick.
    Read,
    /// Set RW low and tick.
    Write,
    Latch(Latch),
    Effect(Effect),
    When(Cond, Vec<BusOp>),
}

impl BusOp {
    /// Clock cycles this operation can take.
    #[must_use]
    pub fn cycles(&self) -> Cycles {
        match self {
            Self::Read | Self::Write => Cycles::fixed(1),
            Self::When(_, ops) => Cycles {
                min: 0,
                max: count_cycles(ops).max,
            },
            _ => Cycles::ZERO,
        }
    }
}

/// Shortest and longest cycle count of an op sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Cycles {
    pub min: u32,
    pub max: u32,
}

impl Cycles {
    pub const ZERO: Self = Self { min: 0, max: 0 };

    #[must_use]
    pub const fn fixed(n: u32) -> Self {
        Self { min: n, max: n }
    }
}

impl Add for Cycles {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            min: self.min + rhs.min,
            max: self.max + rhs.max,
        }
    }
}

#[must_use]
pub fn count_cycles(ops: &[BusOp]) -> Cycles {
    ops.iter().fold(Cycles::ZERO, |acc, op| acc + op.cycles())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_reads_and_writes_take_cycles() {
        let ops = vec![
            BusOp::SetAddr(Addr::Pc),
            BusOp::Read,
            BusOp::Latch(Latch::Temp),
            BusOp::SetData(Data::Reg(Reg::A)),
            BusOp::Write,
            BusOp::Effect(Effect::IncPc),
        ];
        assert_eq!(count_cycles(&ops), Cycles::fixed(2));
    }

    #[test]
    fn conditional_groups_only_raise_the_maximum() {
        let ops = vec![
            BusOp::Read,
            BusOp::When(
                Cond::Branch { mask: 0x01, test: true },
                vec![
                    BusOp::Read,
                    BusOp::When(Cond::BranchPageCrossed, vec![BusOp::Read]),
                ],
            ),
        ];
        assert_eq!(count_cycles(&ops), Cycles { min: 1, max: 3 });
    }
}
