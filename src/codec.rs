//! CP437 decode and encode
//!
//! Both directions are single pass and one-to-one: every input byte yields
//! exactly one character and every input character yields exactly one byte.
//! Decoding is total. Encoding substitutes characters CP437 lacks and counts
//! them in the caller's [`ConversionState`].

use crate::state::ConversionState;
use crate::tables;
use crate::{Error, Result};

/// Decode a single CP437 byte
#[inline]
pub fn decode_char(byte: u8) -> char {
    tables::to_unicode(byte)
}

/// Decode CP437 bytes into a `String`
pub fn decode(input: &[u8]) -> String {
    let mut output = String::with_capacity(input.len());
    decode_into(input, &mut output);
    output
}

/// Decode CP437 bytes, appending to `output`
pub fn decode_into(input: &[u8], output: &mut String) {
    output.reserve(input.len());
    output.extend(input.iter().map(|&byte| tables::to_unicode(byte)));
}

/// Decode CP437 bytes into UTF-16 code units, one unit per input byte
pub fn decode_to_utf16(input: &[u8]) -> Vec<u16> {
    // Every CP437 target lies in the BMP.
    input
        .iter()
        .map(|&byte| tables::to_unicode(byte) as u16)
        .collect()
}

/// CP437 byte for `ch`, or `None` if CP437 cannot represent it
#[inline]
pub fn encode_char(ch: char) -> Option<u8> {
    tables::from_unicode(ch)
}

/// Whether `ch` has a CP437 representation
#[inline]
pub fn is_representable(ch: char) -> bool {
    tables::from_unicode(ch).is_some()
}

/// Encode text as CP437, substituting unrepresentable characters
///
/// Each substitution adds one to `state`'s invalid-character count. The
/// counter is never reset here, so one state can span many calls.
pub fn encode(input: &str, state: &mut ConversionState) -> Vec<u8> {
    encode_scalars(input.chars().map(u32::from), input.len(), state)
}

/// Encode a sequence of characters as CP437, see [`encode`]
pub fn encode_chars<I>(input: I, state: &mut ConversionState) -> Vec<u8>
where
    I: IntoIterator<Item = char>,
{
    let iter = input.into_iter();
    let capacity = iter.size_hint().0;
    encode_scalars(iter.map(u32::from), capacity, state)
}

/// Encode UTF-16 code units as CP437, one byte per unit
///
/// Surrogate halves have no CP437 form and are substituted like any other
/// unrepresentable unit.
pub fn encode_utf16(input: &[u16], state: &mut ConversionState) -> Vec<u8> {
    encode_scalars(input.iter().map(|&unit| u32::from(unit)), input.len(), state)
}

/// Encode with `'?'` substitution and no session bookkeeping
pub fn encode_lossy(input: &str) -> Vec<u8> {
    encode(input, &mut ConversionState::new())
}

/// Encode text as CP437, failing on the first unrepresentable character
///
/// The error carries the character index (not the byte offset) of the
/// offending character.
pub fn encode_strict(input: &str) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(input.len());
    for (position, character) in input.chars().enumerate() {
        match tables::from_unicode(character) {
            Some(byte) => output.push(byte),
            None => {
                return Err(Error::Unrepresentable {
                    character,
                    position,
                });
            }
        }
    }
    Ok(output)
}

/// Strict encode of UTF-8 bytes
pub fn encode_utf8_strict(input: &[u8]) -> Result<Vec<u8>> {
    let text = std::str::from_utf8(input).map_err(|e| Error::InvalidUtf8 {
        valid_up_to: e.valid_up_to(),
    })?;
    encode_strict(text)
}

fn encode_scalars<I>(input: I, capacity: usize, state: &mut ConversionState) -> Vec<u8>
where
    I: Iterator<Item = u32>,
{
    let substitute = state.substitute_byte();
    let mut invalid = 0usize;
    let mut output = Vec::with_capacity(capacity);

    for code in input {
        match char::from_u32(code).and_then(tables::from_unicode) {
            Some(byte) => output.push(byte),
            None => {
                log::trace!("U+{:04X} has no CP437 form, writing 0x{:02X}", code, substitute);
                output.push(substitute);
                invalid += 1;
            }
        }
    }

    if invalid > 0 {
        state.record_invalid(invalid);
        log::debug!(
            "CP437 encode substituted {} of {} characters ({} total this session)",
            invalid,
            output.len(),
            state.invalid_chars()
        );
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Substitution;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_every_byte_round_trips() {
        let mut state = ConversionState::new();
        for byte in 0x00u8..=0xFF {
            let text = decode(&[byte]);
            assert_eq!(text.chars().count(), 1);
            assert_eq!(encode(&text, &mut state), vec![byte], "byte 0x{:02X}", byte);
        }
        assert_eq!(state.invalid_chars(), 0);
    }

    #[test]
    fn test_full_range_round_trip() {
        let all: Vec<u8> = (0x00u8..=0xFF).collect();
        let mut state = ConversionState::new();

        let text = decode(&all);
        assert_eq!(text.chars().count(), 256);
        assert_eq!(encode(&text, &mut state), all);

        let units = decode_to_utf16(&all);
        assert_eq!(units.len(), 256);
        assert_eq!(encode_utf16(&units, &mut state), all);
        assert_eq!(state.invalid_chars(), 0);
    }

    #[test]
    fn test_ascii_identity() {
        let mut state = ConversionState::new();
        for byte in 0x00u8..0x80 {
            assert_eq!(decode(&[byte]), (byte as char).to_string());
            assert_eq!(encode(&(byte as char).to_string(), &mut state), vec![byte]);
        }
        assert_eq!(decode(b"Hello, World!"), "Hello, World!");
        assert_eq!(state.invalid_chars(), 0);
    }

    #[test]
    fn test_box_drawing_and_shades() {
        let input = &[0xC9, 0xCD, 0xBB, 0x20, 0xB0, 0xB1, 0xB2, 0xDB];
        assert_eq!(decode(input), "╔═╗ ░▒▓█");

        let mut state = ConversionState::new();
        assert_eq!(encode("╚═╝", &mut state), vec![0xC8, 0xCD, 0xBC]);
        assert_eq!(state.invalid_chars(), 0);
    }

    #[test]
    fn test_concrete_examples() {
        assert_eq!(decode_char(0xB0), '\u{2591}');
        assert_eq!(decode_char(0xE1), '\u{00DF}');

        let mut state = ConversionState::new();
        assert_eq!(encode("\u{2591}", &mut state), vec![0xB0]);
        assert_eq!(encode("ß", &mut state), vec![0xE1]);
        assert_eq!(state.invalid_chars(), 0);

        assert_eq!(encode("€", &mut state), vec![0x3F]);
        assert_eq!(state.invalid_chars(), 1);
    }

    #[test]
    fn test_question_mark_substitution() {
        let mut state = ConversionState::new();
        assert_eq!(encode("\u{1F600}", &mut state), vec![b'?']);
        assert_eq!(state.invalid_chars(), 1);
    }

    #[test]
    fn test_null_substitution() {
        let mut state = ConversionState::with_substitution(Substitution::Null);
        assert_eq!(encode("\u{1F600}", &mut state), vec![0x00]);
        assert_eq!(state.invalid_chars(), 1);
    }

    #[test]
    fn test_mixed_text_keeps_length() {
        let mut state = ConversionState::new();
        let output = encode("Grüße €5 ½", &mut state);
        assert_eq!(
            output,
            vec![b'G', b'r', 0x81, 0xE1, b'e', b' ', b'?', b'5', b' ', 0xAB]
        );
        assert_eq!(state.invalid_chars(), 1);
    }

    #[test]
    fn test_counter_accumulates_across_calls() {
        let mut state = ConversionState::new();
        encode("a€", &mut state);
        encode("€b", &mut state);
        assert_eq!(state.invalid_chars(), 2);

        encode_chars(['ž', 'x'], &mut state);
        assert_eq!(state.invalid_chars(), 3);
    }

    #[test]
    fn test_empty_input() {
        let mut state = ConversionState::new();
        assert_eq!(decode(&[]), "");
        assert!(decode_to_utf16(&[]).is_empty());
        assert!(encode("", &mut state).is_empty());
        assert!(encode_utf16(&[], &mut state).is_empty());
        assert!(encode_chars(std::iter::empty(), &mut state).is_empty());
        assert_eq!(state.invalid_chars(), 0);
    }

    #[test]
    fn test_decode_into_appends() {
        let mut text = String::from("> ");
        decode_into(&[0xAE, b'x', 0xAF], &mut text);
        assert_eq!(text, "> «x»");
    }

    #[test]
    fn test_lone_surrogate_is_substituted() {
        let mut state = ConversionState::with_substitution(Substitution::Null);
        let units = [u16::from(b'A'), 0xD83D, 0x2591, 0xDE00];
        assert_eq!(encode_utf16(&units, &mut state), vec![b'A', 0x00, 0xB0, 0x00]);
        assert_eq!(state.invalid_chars(), 2);
    }

    #[test]
    fn test_no_nearest_match() {
        // Close relatives of table entries that CP437 still lacks.
        for ch in ['\u{0080}', '\u{00C0}', '\u{2022}', '\u{2503}', '\u{FFFD}'] {
            assert!(!is_representable(ch), "U+{:04X}", ch as u32);
        }
        assert!(is_representable('\u{2502}'));
        assert_eq!(encode_char('\u{00C0}'), None);
        assert_eq!(encode_lossy("\u{00C0}"), vec![b'?']);
    }

    #[test]
    fn test_strict_reports_character_position() {
        assert_eq!(encode_strict("Ωmega"), Ok(vec![0xEA, b'm', b'e', b'g', b'a']));

        let err = encode_strict("ab╬c€d").unwrap_err();
        assert_eq!(
            err,
            Error::Unrepresentable {
                character: '€',
                position: 4
            }
        );
    }

    #[test]
    fn test_strict_utf8_input() {
        assert_eq!(encode_utf8_strict("π≈3".as_bytes()), Ok(vec![0xE3, 0xF7, b'3']));
        assert_eq!(
            encode_utf8_strict(&[b'o', b'k', 0xFF]),
            Err(Error::InvalidUtf8 { valid_up_to: 2 })
        );
    }
}
