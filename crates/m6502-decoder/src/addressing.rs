//! Addressing-mode cycle sequencer.
//!
//! Expands a classification cell into the bus operations the NMOS 6502
//! performs to fetch its operand bytes and form the effective address. The
//! sequence ends with the effective address (or PC) on the address bus; the
//! instruction's own read or write follows in [`crate::effects`].
//!
//! The opcode fetch itself is not part of the sequence. On entry PC already
//! points at the byte after the opcode.

use crate::classify::{AddrMode, MemAccess};
use crate::ops::{Addr, BusOp, Cond, Index, Latch};

use BusOp::{Read, SetAddr};

/// Bus operations for one addressing mode. Empty for [`AddrMode::Invalid`].
#[must_use]
pub fn sequence(mode: AddrMode, access: MemAccess) -> Vec<BusOp> {
    match mode {
        AddrMode::Implied => vec![SetAddr(Addr::Pc)],
        AddrMode::Immediate | AddrMode::JumpSubroutine => vec![SetAddr(Addr::PcInc)],
        AddrMode::ZeroPage => zero_page(),
        AddrMode::ZeroPageX => zero_page_indexed(Index::X),
        AddrMode::ZeroPageY => zero_page_indexed(Index::Y),
        AddrMode::Absolute => vec![
            SetAddr(Addr::PcInc),
            Read,
            BusOp::Latch(Latch::Temp),
            SetAddr(Addr::PcInc),
            Read,
            BusOp::Latch(Latch::HighTemp),
            SetAddr(Addr::Ea),
        ],
        AddrMode::AbsoluteX => absolute_indexed(Index::X, access),
        AddrMode::AbsoluteY => absolute_indexed(Index::Y, access),
        AddrMode::IndexedIndirect => {
            let mut ops = zero_page();
            ops.extend([
                // dummy read of the unindexed pointer
                Read,
                BusOp::Latch(Latch::ZeroPageIndexed(Index::X)),
                SetAddr(Addr::Ea),
                Read,
                BusOp::Latch(Latch::Temp),
                BusOp::Latch(Latch::ZeroPageNext),
                SetAddr(Addr::Ea),
                Read,
                BusOp::Latch(Latch::HighTemp),
                SetAddr(Addr::Ea),
            ]);
            ops
        }
        AddrMode::IndirectIndexed => {
            let mut ops = zero_page();
            ops.extend([
                Read,
                BusOp::Latch(Latch::TempIndexed(Index::Y)),
                BusOp::Latch(Latch::ZeroPageNext),
                SetAddr(Addr::Ea),
                Read,
                BusOp::Latch(Latch::HighTemp),
                SetAddr(Addr::Ea),
            ]);
            ops.extend(page_fixup(access));
            ops
        }
        AddrMode::Jump => vec![
            SetAddr(Addr::PcInc),
            Read,
            BusOp::Latch(Latch::Temp),
            SetAddr(Addr::PcInc),
        ],
        AddrMode::Invalid => Vec::new(),
    }
}

fn zero_page() -> Vec<BusOp> {
    vec![
        SetAddr(Addr::PcInc),
        Read,
        BusOp::Latch(Latch::ZeroPage),
        SetAddr(Addr::Ea),
    ]
}

fn zero_page_indexed(index: Index) -> Vec<BusOp> {
    let mut ops = zero_page();
    ops.extend([
        Read,
        BusOp::Latch(Latch::ZeroPageIndexed(index)),
        SetAddr(Addr::Ea),
    ]);
    ops
}

fn absolute_indexed(index: Index, access: MemAccess) -> Vec<BusOp> {
    let mut ops = vec![
        SetAddr(Addr::PcInc),
        Read,
        BusOp::Latch(Latch::TempIndexed(index)),
        SetAddr(Addr::PcInc),
        Read,
        BusOp::Latch(Latch::HighTemp),
        SetAddr(Addr::Ea),
    ];
    ops.extend(page_fixup(access));
    ops
}

/// Read at the provisional address, then carry into the high byte.
///
/// Reads only pay for this when the low-byte addition overflowed. Writes
/// and read-modify-writes always take the extra cycle.
fn page_fixup(access: MemAccess) -> Vec<BusOp> {
    let fix = vec![
        Read,
        BusOp::Latch(Latch::PageCarry),
        SetAddr(Addr::Ea),
    ];
    match access {
        MemAccess::Read => vec![BusOp::When(Cond::PageCrossed, fix)],
        _ => fix,
    }
}
