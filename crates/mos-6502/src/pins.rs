//! Pin word layout.
//!
//! | bits  | pin |
//! |-------|-----|
//! | 0-15  | address bus |
//! | 16-23 | data bus |
//! | 24    | RW (1 = read, 0 = write) |
//! | 25    | SYNC, high during the opcode fetch cycle |
//! | 26    | IRQ, level-triggered maskable interrupt request |
//! | 27    | NMI, non-maskable interrupt request |
//! | 28    | JAM, the CPU fetched a reserved opcode |
//!
//! IRQ and NMI are active high here. The CPU deasserts both when it takes an
//! interrupt.

pub const RW: u64 = 1 << 24;
pub const SYNC: u64 = 1 << 25;
pub const IRQ: u64 = 1 << 26;
pub const NMI: u64 = 1 << 27;
pub const JAM: u64 = 1 << 28;

const ADDR_MASK: u64 = 0xFFFF;
const DATA_SHIFT: u32 = 16;
const DATA_MASK: u64 = 0xFF << DATA_SHIFT;

/// Address currently on the bus.
#[must_use]
pub const fn addr(pins: u64) -> u16 {
    (pins & ADDR_MASK) as u16
}

/// Byte currently on the data bus.
#[must_use]
pub const fn data(pins: u64) -> u8 {
    ((pins & DATA_MASK) >> DATA_SHIFT) as u8
}

#[must_use]
pub const fn with_addr(pins: u64, addr: u16) -> u64 {
    (pins & !ADDR_MASK) | addr as u64
}

#[must_use]
pub const fn with_data(pins: u64, data: u8) -> u64 {
    (pins & !DATA_MASK) | ((data as u64) << DATA_SHIFT)
}

/// Build a pin word from its parts.
#[must_use]
pub const fn make(addr: u16, data: u8, ctrl: u64) -> u64 {
    with_data(with_addr(ctrl, addr), data)
}
