//! Caller-owned conversion session state
//!
//! A [`ConversionState`] lives for as long as the caller's conversion
//! session. The encoder only ever adds to its counter; resetting it is the
//! caller's decision.

use serde::{Deserialize, Serialize};

/// Byte emitted in place of a character CP437 cannot represent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Substitution {
    /// Emit `'?'` (0x3F)
    #[default]
    QuestionMark,
    /// Emit a null byte (0x00)
    Null,
}

impl Substitution {
    /// The byte written for an unrepresentable character
    #[inline]
    pub fn byte(self) -> u8 {
        match self {
            Substitution::QuestionMark => b'?',
            Substitution::Null => 0x00,
        }
    }
}

/// Substitution policy plus the running count of unrepresentable characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConversionState {
    substitution: Substitution,
    invalid_chars: usize,
}

impl ConversionState {
    /// Fresh state: `'?'` substitution, zero invalid characters
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh state with the given substitution policy
    pub fn with_substitution(substitution: Substitution) -> Self {
        Self {
            substitution,
            invalid_chars: 0,
        }
    }

    /// Substitution policy in effect
    pub fn substitution(&self) -> Substitution {
        self.substitution
    }

    /// Choose between null-byte and `'?'` substitution
    pub fn set_convert_invalid_to_null(&mut self, enabled: bool) {
        self.substitution = if enabled {
            Substitution::Null
        } else {
            Substitution::QuestionMark
        };
    }

    /// Whether unrepresentable characters become null bytes
    pub fn converts_invalid_to_null(&self) -> bool {
        self.substitution == Substitution::Null
    }

    /// Unrepresentable characters seen since creation or the last [`reset`](Self::reset)
    pub fn invalid_chars(&self) -> usize {
        self.invalid_chars
    }

    /// Whether any conversion in this session was lossy
    pub fn has_invalid(&self) -> bool {
        self.invalid_chars > 0
    }

    /// Byte the encoder writes for an unrepresentable character
    #[inline]
    pub fn substitute_byte(&self) -> u8 {
        self.substitution.byte()
    }

    /// Zero the counter, keeping the substitution policy
    pub fn reset(&mut self) {
        self.invalid_chars = 0;
    }

    /// Add `count` unrepresentable characters to the session total
    ///
    /// For [`TextCodec`](crate::TextCodec) implementations; callers normally
    /// only read the counter.
    pub fn record_invalid(&mut self, count: usize) {
        self.invalid_chars = self.invalid_chars.saturating_add(count);
    }
}
