//! Generator configuration.

use std::fmt;
use std::str::FromStr;

use crate::error::DecoderError;

/// What the generated core does when it fetches an opcode with no
/// emulated instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidOpcodePolicy {
    /// Leave PC on the opcode and assert the JAM pin. The CPU keeps
    /// refetching the opcode until the caller stops it, e.g. with
    /// `break_mask`.
    #[default]
    Jam,
    /// Treat the opcode as a 2-cycle implied NOP.
    Nop,
}

impl FromStr for InvalidOpcodePolicy {
    type Err = DecoderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jam" => Ok(Self::Jam),
            "nop" => Ok(Self::Nop),
            _ => Err(DecoderError::UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for InvalidOpcodePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jam => write!(f, "jam"),
            Self::Nop => write!(f, "nop"),
        }
    }
}

/// Options for the Rust emitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub invalid_policy: InvalidOpcodePolicy,
    /// Emit a mnemonic comment on every match arm.
    pub comments: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            invalid_policy: InvalidOpcodePolicy::Jam,
            comments: true,
        }
    }
}

impl GeneratorConfig {
    #[must_use]
    pub fn with_policy(invalid_policy: InvalidOpcodePolicy) -> Self {
        Self {
            invalid_policy,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("jam".parse::<InvalidOpcodePolicy>().ok(), Some(InvalidOpcodePolicy::Jam));
        assert_eq!("NOP".parse::<InvalidOpcodePolicy>().ok(), Some(InvalidOpcodePolicy::Nop));
        assert!(matches!(
            "halt".parse::<InvalidOpcodePolicy>(),
            Err(DecoderError::UnknownPolicy(s)) if s == "halt"
        ));
    }

    #[test]
    fn defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.invalid_policy, InvalidOpcodePolicy::Jam);
        assert!(config.comments);
        assert_eq!(
            GeneratorConfig::with_policy(InvalidOpcodePolicy::Nop).invalid_policy,
            InvalidOpcodePolicy::Nop
        );
    }
}
