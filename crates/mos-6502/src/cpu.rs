//! The 6502 processor object and the bus-cycle helper the generated decoder
//! drives.

use crate::flags::{C, D, I, N, Status, V, Z};
use crate::pins::{self, IRQ, JAM, NMI, RW, SYNC};
use crate::registers::Registers;

/// A 6502 attached to a tick callback.
///
/// The callback runs once per clock cycle with the current pin word and
/// returns the pin word the CPU should continue with. On read cycles (RW
/// high) it places the addressed byte on the data pins; on write cycles it
/// stores the data pins at the address. It may also raise IRQ or NMI.
pub struct M6502<T> {
    pub regs: Registers,
    pub pins: u64,
    /// [`M6502::execute`] returns early at the first instruction boundary
    /// where any of these pins is set.
    pub break_mask: u64,
    pub tick: T,
}

impl<T: FnMut(u64) -> u64> M6502<T> {
    /// Create a CPU in the post-reset register state with PC at 0.
    pub fn new(tick: T) -> Self {
        Self {
            regs: Registers::new(),
            pins: RW,
            break_mask: 0,
            tick,
        }
    }

    /// Run whole instructions until at least `num_ticks` ticks have elapsed
    /// or a pin in `break_mask` is set. Returns the ticks actually executed,
    /// which can exceed `num_ticks` by the tail of the last instruction.
    ///
    /// At least one instruction always runs.
    pub fn execute(&mut self, num_ticks: u32) -> u32 {
        exec(self, num_ticks)
    }

    /// Whether the CPU has fetched a reserved opcode and stopped. A jammed
    /// CPU leaves IRQ and NMI pending.
    #[must_use]
    pub fn is_jammed(&self) -> bool {
        self.pins & JAM != 0
    }

    /// Assert or release the IRQ line.
    pub fn set_irq(&mut self, active: bool) {
        self.set_pin(IRQ, active);
    }

    /// Assert or release the NMI line.
    pub fn set_nmi(&mut self, active: bool) {
        self.set_pin(NMI, active);
    }

    fn set_pin(&mut self, mask: u64, active: bool) {
        if active {
            self.pins |= mask;
        } else {
            self.pins &= !mask;
        }
    }
}

/// Pin state and tick count for one `execute` call.
struct BusCycle<'a, T> {
    pins: u64,
    ticks: u32,
    tick: &'a mut T,
}

impl<'a, T: FnMut(u64) -> u64> BusCycle<'a, T> {
    fn new(pins: u64, tick: &'a mut T) -> Self {
        Self {
            pins,
            ticks: 0,
            tick,
        }
    }

    fn set_addr(&mut self, addr: u16) {
        self.pins = pins::with_addr(self.pins, addr);
    }

    fn set_addr_data(&mut self, addr: u16, data: u8) {
        self.pins = pins::with_data(pins::with_addr(self.pins, addr), data);
    }

    fn set_data(&mut self, data: u8) {
        self.pins = pins::with_data(self.pins, data);
    }

    fn data(&self) -> u8 {
        pins::data(self.pins)
    }

    fn on(&mut self, mask: u64) {
        self.pins |= mask;
    }

    fn off(&mut self, mask: u64) {
        self.pins &= !mask;
    }

    fn read(&mut self) {
        self.on(RW);
        self.cycle();
    }

    fn write(&mut self) {
        self.off(RW);
        self.cycle();
    }

    fn cycle(&mut self) {
        self.pins = (self.tick)(self.pins);
        self.ticks += 1;
    }

    fn finish(self) -> (u64, u32) {
        (self.pins, self.ticks)
    }
}

include!(concat!(env!("OUT_DIR"), "/decoder.rs"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bus_cycle_sets_rw_per_direction() {
        let mut seen = Vec::new();
        let mut tick = |p: u64| {
            seen.push(p);
            p
        };
        let mut bus = BusCycle::new(0, &mut tick);
        bus.set_addr(0x1234);
        bus.read();
        bus.set_addr_data(0x0200, 0xAB);
        bus.write();
        let (_, ticks) = bus.finish();

        assert_eq!(ticks, 2);
        assert_eq!(seen[0], pins::make(0x1234, 0, RW));
        assert_eq!(seen[1], pins::make(0x0200, 0xAB, 0));
    }

    #[test]
    fn irq_and_nmi_setters() {
        let mut cpu = M6502::new(|p: u64| p);
        cpu.set_irq(true);
        cpu.set_nmi(true);
        assert_eq!(cpu.pins & (IRQ | NMI), IRQ | NMI);
        cpu.set_irq(false);
        assert_eq!(cpu.pins & (IRQ | NMI), NMI);
    }
}
