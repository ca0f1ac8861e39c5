//! Table-driven generator for a cycle-stepped 6502 instruction decoder.
//!
//! The generator works in four stages:
//!
//! 1. [`classify`] maps each of the 256 opcode bytes to an addressing mode
//!    and a memory-access kind through a static `[cc][bbb][aaa]` grid.
//! 2. [`addressing`] expands a (mode, access) pair into the exact bus
//!    operations the NMOS 6502 performs to produce its effective address.
//! 3. [`fragment`] resolves the instruction behind each opcode and appends
//!    its register effects, giving one [`Fragment`] per opcode.
//! 4. [`emit`] renders the resulting [`DecoderTable`] as Rust source for the
//!    `mos-6502` core (or as JSON for inspection).
//!
//! Nothing here runs at emulation time. The `mos-6502` build script calls
//! [`DecoderTable::build`] and [`emit::render_rust`] and `include!`s the
//! output.

pub mod addressing;
pub mod classify;
pub mod config;
pub mod effects;
pub mod emit;
pub mod error;
pub mod flags;
pub mod fragment;
pub mod instruction;
pub mod opcode;
pub mod ops;

pub use classify::{AddrMode, Cell, MemAccess};
pub use config::{GeneratorConfig, InvalidOpcodePolicy};
pub use error::DecoderError;
pub use fragment::{DecoderTable, Fragment};
pub use instruction::{Instruction, Resolved};
pub use opcode::Opcode;
pub use ops::{BusOp, Cycles};
