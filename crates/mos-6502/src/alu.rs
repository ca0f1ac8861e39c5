//! Register effects used by the generated decoder.
//!
//! Each method applies one operation to the register copy the decoder works
//! on. Methods that produce a memory value (shifts, INC, DEC) return it so
//! the decoder can put it on the data bus.

use crate::flags::{C, D, N, V, Z};
use crate::registers::Registers;

impl Registers {
    pub(crate) fn ora(&mut self, val: u8) {
        self.a |= val;
        self.p.update_nz(self.a);
    }

    pub(crate) fn and(&mut self, val: u8) {
        self.a &= val;
        self.p.update_nz(self.a);
    }

    pub(crate) fn eor(&mut self, val: u8) {
        self.a ^= val;
        self.p.update_nz(self.a);
    }

    pub(crate) fn adc(&mut self, val: u8) {
        if self.p.is_set(D) {
            self.adc_decimal(val);
        } else {
            self.adc_binary(val);
        }
    }

    fn adc_binary(&mut self, val: u8) {
        let a = self.a;
        let carry = u16::from(self.p.is_set(C));
        let sum = u16::from(a) + u16::from(val) + carry;
        let result = sum as u8;

        self.p.assign(C, sum > 0xFF);
        self.p.assign(V, (a ^ result) & (val ^ result) & 0x80 != 0);
        self.a = result;
        self.p.update_nz(result);
    }

    /// NMOS decimal add. Z comes from the binary sum; N and V come from the
    /// high nibble before its decimal adjust.
    fn adc_decimal(&mut self, val: u8) {
        let a = self.a;
        let carry = u8::from(self.p.is_set(C));

        let mut lo = (a & 0x0F) + (val & 0x0F) + carry;
        if lo > 9 {
            lo += 6;
        }
        let mut hi = (a >> 4) + (val >> 4) + u8::from(lo > 0x0F);

        let binary = a.wrapping_add(val).wrapping_add(carry);
        self.p.assign(Z, binary == 0);
        self.p.assign(N, binary != 0 && hi & 0x08 != 0);
        self.p.assign(V, !(a ^ val) & (a ^ (hi << 4)) & 0x80 != 0);

        if hi > 9 {
            hi += 6;
        }
        self.p.assign(C, hi > 0x0F);
        self.a = (hi << 4) | (lo & 0x0F);
    }

    pub(crate) fn sbc(&mut self, val: u8) {
        if self.p.is_set(D) {
            self.sbc_decimal(val);
        } else {
            self.adc_binary(!val);
        }
    }

    /// NMOS decimal subtract. All flags come from the binary difference.
    fn sbc_decimal(&mut self, val: u8) {
        let a = self.a;
        let borrow = u8::from(!self.p.is_set(C));

        let diff = u16::from(a)
            .wrapping_sub(u16::from(val))
            .wrapping_sub(u16::from(borrow));
        let binary = diff as u8;
        self.p.assign(C, diff & 0xFF00 == 0);
        self.p.assign(Z, binary == 0);
        self.p.assign(N, binary & 0x80 != 0);
        self.p.assign(V, (a ^ val) & (a ^ binary) & 0x80 != 0);

        let mut lo = (a & 0x0F).wrapping_sub(val & 0x0F).wrapping_sub(borrow);
        let lo_borrow = lo & 0x80 != 0;
        if lo_borrow {
            lo = lo.wrapping_sub(6);
        }
        let mut hi = (a >> 4)
            .wrapping_sub(val >> 4)
            .wrapping_sub(u8::from(lo_borrow));
        if hi & 0x80 != 0 {
            hi = hi.wrapping_sub(6);
        }
        self.a = (hi << 4) | (lo & 0x0F);
    }

    /// CMP/CPX/CPY against `reg`.
    pub(crate) fn compare(&mut self, reg: u8, val: u8) {
        self.p.assign(C, reg >= val);
        self.p.update_nz(reg.wrapping_sub(val));
    }

    pub(crate) fn bit(&mut self, val: u8) {
        self.p.assign(Z, self.a & val == 0);
        self.p.assign(N, val & 0x80 != 0);
        self.p.assign(V, val & 0x40 != 0);
    }

    pub(crate) fn asl(&mut self, val: u8) -> u8 {
        self.p.assign(C, val & 0x80 != 0);
        let result = val << 1;
        self.p.update_nz(result);
        result
    }

    pub(crate) fn lsr(&mut self, val: u8) -> u8 {
        self.p.assign(C, val & 0x01 != 0);
        let result = val >> 1;
        self.p.update_nz(result);
        result
    }

    pub(crate) fn rol(&mut self, val: u8) -> u8 {
        let carry = u8::from(self.p.is_set(C));
        self.p.assign(C, val & 0x80 != 0);
        let result = (val << 1) | carry;
        self.p.update_nz(result);
        result
    }

    pub(crate) fn ror(&mut self, val: u8) -> u8 {
        let carry = if self.p.is_set(C) { 0x80 } else { 0 };
        self.p.assign(C, val & 0x01 != 0);
        let result = (val >> 1) | carry;
        self.p.update_nz(result);
        result
    }

    pub(crate) fn inc(&mut self, val: u8) -> u8 {
        let result = val.wrapping_add(1);
        self.p.update_nz(result);
        result
    }

    pub(crate) fn dec(&mut self, val: u8) -> u8 {
        let result = val.wrapping_sub(1);
        self.p.update_nz(result);
        result
    }
}

#[cfg(test)]
mod tests {
    use crate::flags::{C, D, N, Status, U, V, Z};
    use crate::registers::Registers;

    fn regs(a: u8, p: u8) -> Registers {
        Registers {
            a,
            p: Status(U | p),
            ..Registers::new()
        }
    }

    #[test]
    fn adc_binary_overflow() {
        let mut r = regs(0x50, 0);
        r.adc(0x50);
        assert_eq!(r.a, 0xA0);
        assert!(r.p.is_set(V) && r.p.is_set(N) && !r.p.is_set(C));

        let mut r = regs(0xFF, C);
        r.adc(0x00);
        assert_eq!(r.a, 0x00);
        assert!(r.p.is_set(Z) && r.p.is_set(C) && !r.p.is_set(V));
    }

    #[test]
    fn adc_decimal() {
        let mut r = regs(0x15, D);
        r.adc(0x27);
        assert_eq!(r.a, 0x42);
        assert!(!r.p.is_set(C));

        let mut r = regs(0x99, D);
        r.adc(0x01);
        assert_eq!(r.a, 0x00);
        assert!(r.p.is_set(C));
        // Z reflects the binary sum $9A
        assert!(!r.p.is_set(Z));
    }

    #[test]
    fn sbc_binary_borrow() {
        let mut r = regs(0x10, C);
        r.sbc(0x20);
        assert_eq!(r.a, 0xF0);
        assert!(!r.p.is_set(C) && r.p.is_set(N));
    }

    #[test]
    fn sbc_decimal() {
        let mut r = regs(0x42, D | C);
        r.sbc(0x15);
        assert_eq!(r.a, 0x27);
        assert!(r.p.is_set(C));

        let mut r = regs(0x00, D | C);
        r.sbc(0x01);
        assert_eq!(r.a, 0x99);
        assert!(!r.p.is_set(C));
    }

    #[test]
    fn compare_sets_carry_when_greater_or_equal() {
        let mut r = regs(0, 0);
        r.compare(0x40, 0x40);
        assert!(r.p.is_set(C) && r.p.is_set(Z));
        r.compare(0x3F, 0x40);
        assert!(!r.p.is_set(C) && r.p.is_set(N));
    }

    #[test]
    fn rotates_through_carry() {
        let mut r = regs(0, C);
        assert_eq!(r.rol(0x80), 0x01);
        assert!(r.p.is_set(C));
        assert_eq!(r.ror(0x00), 0x80);
        assert!(!r.p.is_set(C) && r.p.is_set(N));
    }

    #[test]
    fn bit_copies_high_bits() {
        let mut r = regs(0x01, 0);
        r.bit(0xC0);
        assert!(r.p.is_set(N) && r.p.is_set(V) && r.p.is_set(Z));
    }
}
