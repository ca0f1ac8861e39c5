//! Opcode bit fields.
//!
//! The 6502 decodes an opcode as `aaabbbcc`: `cc` selects one of four
//! instruction groups, `bbb` mostly selects the addressing mode and `aaa`
//! mostly selects the operation.

use std::fmt;

use serde::Serialize;

/// One opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Opcode(pub u8);

impl Opcode {
    /// Group selector, bits 0-1.
    #[must_use]
    pub const fn cc(self) -> usize {
        (self.0 & 0x03) as usize
    }

    /// Middle selector, bits 2-4.
    #[must_use]
    pub const fn bbb(self) -> usize {
        ((self.0 >> 2) & 0x07) as usize
    }

    /// Block selector, bits 5-7.
    #[must_use]
    pub const fn aaa(self) -> usize {
        ((self.0 >> 5) & 0x07) as usize
    }

    /// Reassemble an opcode from its fields. Out-of-range bits are masked off.
    #[must_use]
    pub const fn from_fields(cc: usize, bbb: usize, aaa: usize) -> Self {
        Self(((aaa & 7) << 5 | (bbb & 7) << 2 | (cc & 3)) as u8)
    }

    /// All 256 opcodes in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..=u8::MAX).map(Self)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:02X}", self.0)
    }
}

impl From<u8> for Opcode {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_split_aaabbbcc() {
        // LDA abs,X = 101 111 01
        let op = Opcode(0xBD);
        assert_eq!(op.cc(), 1);
        assert_eq!(op.bbb(), 7);
        assert_eq!(op.aaa(), 5);
    }

    #[test]
    fn from_fields_inverts_the_split() {
        for op in Opcode::all() {
            assert_eq!(Opcode::from_fields(op.cc(), op.bbb(), op.aaa()), op);
        }
    }

    #[test]
    fn display_uses_dollar_hex() {
        assert_eq!(Opcode(0x0A).to_string(), "$0A");
    }
}
