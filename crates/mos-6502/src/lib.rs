//! Cycle-stepped MOS 6502 CPU core.
//!
//! The CPU talks to the outside world through a single 64-bit pin word (see
//! [`pins`]) and a tick callback that runs once per clock cycle. The callback
//! sees the address, data and control pins the CPU is driving, performs the
//! memory or I/O access, and returns the updated pins (data byte for reads,
//! and any interrupt lines it wants to raise).
//!
//! The instruction decoder itself is generated at build time by
//! `m6502-decoder` from its opcode classification table.
//!
//! ```ignore
//! let mut ram = vec![0u8; 0x10000];
//! let mut cpu = M6502::new(|mut p: u64| {
//!     let addr = usize::from(pins::addr(p));
//!     if p & pins::RW != 0 {
//!         p = pins::with_data(p, ram[addr]);
//!     } else {
//!         ram[addr] = pins::data(p);
//!     }
//!     p
//! });
//! cpu.execute(1000);
//! ```

mod alu;
mod cpu;
pub mod flags;
pub mod pins;
mod registers;

pub use cpu::M6502;
pub use flags::Status;
pub use registers::Registers;
