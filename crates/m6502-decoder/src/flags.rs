//! Status register bit masks.

/// Carry.
pub const C: u8 = 0x01;
/// Zero.
pub const Z: u8 = 0x02;
/// IRQ disable.
pub const I: u8 = 0x04;
/// Decimal mode.
pub const D: u8 = 0x08;
/// Break (only meaningful in the pushed copy of P).
pub const B: u8 = 0x10;
/// Unused, always reads as 1.
pub const U: u8 = 0x20;
/// Overflow.
pub const V: u8 = 0x40;
/// Negative.
pub const N: u8 = 0x80;

/// Name of a single flag bit, as used for the constants above.
///
/// Returns `None` for masks with zero or several bits set.
#[must_use]
pub const fn name(mask: u8) -> Option<&'static str> {
    match mask {
        C => Some("C"),
        Z => Some("Z"),
        I => Some("I"),
        D => Some("D"),
        B => Some("B"),
        U => Some("U"),
        V => Some("V"),
        N => Some("N"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_single_bit_has_a_name() {
        for bit in 0..8 {
            assert!(name(1 << bit).is_some());
        }
        assert_eq!(name(C | Z), None);
        assert_eq!(name(0), None);
    }
}
