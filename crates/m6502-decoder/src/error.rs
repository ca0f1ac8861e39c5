//! Error types for decoder generation.

use std::fmt;

use crate::classify::MemAccess;
use crate::opcode::Opcode;

/// Errors from building or writing a decoder table.
#[derive(Debug)]
pub enum DecoderError {
    /// A classified (non-invalid) opcode has no instruction.
    UnresolvedOpcode { opcode: Opcode },
    /// The classified access kind does not fit the instruction.
    AccessMismatch {
        opcode: Opcode,
        mnemonic: String,
        access: MemAccess,
    },
    /// A memory instruction was classified as implied.
    MissingOperand { opcode: Opcode, mnemonic: String },
    /// An opcode classified invalid still resolves to an instruction.
    UnexpectedInstruction { opcode: Opcode, mnemonic: String },
    /// Unrecognised invalid-opcode policy name.
    UnknownPolicy(String),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for DecoderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedOpcode { opcode } => {
                write!(f, "opcode {opcode} is classified but has no instruction")
            }
            Self::AccessMismatch {
                opcode,
                mnemonic,
                access,
            } => write!(f, "opcode {opcode} ({mnemonic}) cannot use {access:?} access"),
            Self::MissingOperand { opcode, mnemonic } => {
                write!(f, "opcode {opcode} ({mnemonic}) needs an operand but is implied")
            }
            Self::UnexpectedInstruction { opcode, mnemonic } => {
                write!(f, "opcode {opcode} is classified invalid but resolves to {mnemonic}")
            }
            Self::UnknownPolicy(name) => {
                write!(f, "unknown invalid-opcode policy '{name}' (expected jam or nop)")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for DecoderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DecoderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for DecoderError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
