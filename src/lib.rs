//! # cp437-codec - CP437 Text Codec
//!
//! Conversion between IBM PC code page 437 ("OEM-US", the DOS character set)
//! and Unicode.
//!
//! ## Features
//!
//! - **Total decoding**: all 256 byte values have a Unicode target
//! - **Counted substitution** when encoding characters CP437 lacks, with
//!   either `'?'` or a null byte as the placeholder
//! - **Session state** owned by the caller, so one invalid-character count
//!   can span a whole document
//! - **Static tables**, shareable across threads without locking
//!
//! ## Quick Start
//!
//! ```rust
//! use cp437_codec::{ConversionState, Cp437Codec, TextCodec};
//!
//! let codec = Cp437Codec;
//!
//! // Box-drawing frame from a DOS screen dump
//! let text = codec.decode(&[0xC9, 0xCD, 0xBB]);
//! assert_eq!(text, "╔═╗");
//!
//! let mut state = ConversionState::new();
//! let bytes = codec.encode("Straße 5€", &mut state);
//! assert_eq!(bytes, b"Stra\xE1e 5?");
//! assert_eq!(state.invalid_chars(), 1);
//! ```

#![deny(missing_docs)]

pub mod codec;
pub mod state;
pub mod tables;

pub use codec::{
    decode, decode_char, decode_into, decode_to_utf16, encode, encode_char, encode_chars,
    encode_lossy, encode_strict, encode_utf16, encode_utf8_strict, is_representable,
};
pub use state::{ConversionState, Substitution};

use thiserror::Error;

/// Result type for strict conversions
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from the strict encoding entry points
///
/// The regular encoder never fails; it substitutes and counts instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Character has no CP437 representation
    #[error("Cannot encode character '{character}' at position {position}")]
    Unrepresentable {
        /// The unrepresentable character
        character: char,
        /// Character index in the input
        position: usize,
    },
    /// Input bytes were not valid UTF-8
    #[error("Invalid UTF-8 input after {valid_up_to} bytes")]
    InvalidUtf8 {
        /// Length of the valid UTF-8 prefix
        valid_up_to: usize,
    },
}

/// A named, bidirectional text codec as consumed by a host application
///
/// Implementations must be total: `decode` accepts any bytes and `encode`
/// accepts any text, recording losses in the [`ConversionState`].
pub trait TextCodec {
    /// Canonical encoding name
    fn name(&self) -> &'static str;

    /// Decode bytes to text
    fn decode(&self, input: &[u8]) -> String;

    /// Encode text, substituting and counting unrepresentable characters
    fn encode(&self, input: &str, state: &mut ConversionState) -> Vec<u8>;

    /// Encode text, failing on the first unrepresentable character
    fn encode_strict(&self, input: &str) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(input.len());
        let mut buf = [0u8; 4];
        for (position, character) in input.chars().enumerate() {
            let mut probe = ConversionState::new();
            output.extend(self.encode(character.encode_utf8(&mut buf), &mut probe));
            if probe.has_invalid() {
                return Err(Error::Unrepresentable {
                    character,
                    position,
                });
            }
        }
        Ok(output)
    }

    /// Whether every character of `input` can be encoded losslessly
    fn can_encode(&self, input: &str) -> bool {
        let mut state = ConversionState::new();
        self.encode(input, &mut state);
        !state.has_invalid()
    }
}

/// The CP437 codec
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Cp437Codec;

impl Cp437Codec {
    /// Name this codec reports
    pub const NAME: &'static str = "IBM437";
}

impl TextCodec for Cp437Codec {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn decode(&self, input: &[u8]) -> String {
        codec::decode(input)
    }

    fn encode(&self, input: &str, state: &mut ConversionState) -> Vec<u8> {
        codec::encode(input, state)
    }

    fn encode_strict(&self, input: &str) -> Result<Vec<u8>> {
        codec::encode_strict(input)
    }

    fn can_encode(&self, input: &str) -> bool {
        input.chars().all(codec::is_representable)
    }
}
