//! 6502 processor status register (P).
//!
//! The flag bit masks are shared with the decoder generator so that the
//! generated code and this crate agree on them.

pub use m6502_decoder::flags::{B, C, D, I, N, U, V, Z};

/// Processor status register.
///
/// U reads back as 1 on every path that loads P. B has no latch of its own
/// on the chip; it only shows up in the copies pushed to the stack, set by
/// BRK and PHP and clear for IRQ and NMI. A P pulled with B set keeps it
/// here, which only matters to code that looks at the raw byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(pub u8);

impl Status {
    /// P after the reset sequence.
    pub const RESET: Self = Self(U | I);

    /// P loaded from the stack by PLP or RTI.
    #[must_use]
    pub const fn from_byte(value: u8) -> Self {
        Self(value | U)
    }

    #[must_use]
    pub const fn brk_push(self) -> u8 {
        self.0 | U | B
    }

    #[must_use]
    pub const fn irq_push(self) -> u8 {
        (self.0 | U) & !B
    }

    #[must_use]
    pub const fn is_set(self, mask: u8) -> bool {
        self.0 & mask != 0
    }

    pub fn set(&mut self, mask: u8) {
        self.0 |= mask;
    }

    pub fn clear(&mut self, mask: u8) {
        self.0 &= !mask;
    }

    pub fn assign(&mut self, mask: u8, on: bool) {
        if on {
            self.set(mask);
        } else {
            self.clear(mask);
        }
    }

    pub fn update_nz(&mut self, value: u8) {
        self.assign(N, value & 0x80 != 0);
        self.assign(Z, value == 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pushed_bytes() {
        let p = Status(C | Z);
        assert_eq!(p.brk_push(), C | Z | U | B);
        assert_eq!(p.irq_push(), C | Z | U);
        assert_eq!(Status(B).irq_push(), U);
    }

    #[test]
    fn pulled_byte_forces_unused() {
        assert_eq!(Status::from_byte(0), Status(U));
        assert_eq!(Status::from_byte(B | N), Status(B | N | U));
    }

    #[test]
    fn update_nz() {
        let mut p = Status::RESET;
        p.update_nz(0);
        assert!(p.is_set(Z) && !p.is_set(N));
        p.update_nz(0x80);
        assert!(!p.is_set(Z) && p.is_set(N));
        assert!(p.is_set(I), "other flags untouched");
    }
}
