//! Binary puzzle codes: the wire format and its URL-safe base64 wrapping.
//!
//! # Wire format
//!
//! ```text
//! byte 0          placement count N
//! bytes 1..=3N    N records of (rel_x: u8, rel_y: u8, direction: u8 ∈ {0, 1})
//! then            N NUL-terminated UTF-8 words, in placement order
//! then            N NUL-terminated UTF-8 clues, in placement order
//! ```
//!
//! The blob is base64-encoded with the URL-safe alphabet (`-` and `_` instead of `+` and `/`)
//! and the trailing `=` padding dropped. There is no version byte and no explicit placement id:
//! record order is the identity, and words and clues are matched to records by position.
//!
//! # Error Handling
//!
//! Encoding never truncates a field. Values that do not fit are rejected:
//!
//! - C001: `TooManyPlacements` (Count does not fit the header byte)
//! - C002: `CoordinateOutOfRange` (Coordinate does not fit its byte)
//! - C003: `EmbeddedNul` (Word or clue contains the terminator byte)
//!
//! Decoding is all-or-nothing; a malformed code never yields a partial puzzle:
//!
//! - C004: `InvalidBase64` (Not valid base64 text)
//! - C005: `InvalidLength` (Length cannot be padded to a base64 quantum)
//! - C006: `Truncated` (Fewer bytes than the header promises)
//! - C007: `MissingTerminator` (A word or clue runs off the end)
//! - C008: `InvalidDirection` (Direction byte other than 0 or 1)
//! - C009: `InvalidWordLength` (Empty word, or longer than 255 letters; also checked on encode)
//! - C010: `InvalidPercentEncoding` (Share-link value does not percent-decode to UTF-8)
//!
//! Invalid UTF-8 inside a word or clue is *not* an error: it is decoded lossily, with U+FFFD
//! standing in for each bad sequence, so a damaged letter stays confined to its own string.

use crate::errors::{format_error_with_code_and_help, EntryField};
use crate::placement::{Direction, PlacedEntry, PlacementSet};
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use log::debug;

/// Bytes per placement record.
const RECORD_LEN: usize = 3;
/// Words are laid out on a grid addressed by single-byte coordinates.
pub const MAX_WORD_LEN: usize = u8::MAX as usize;

/// Errors raised while encoding or decoding a puzzle code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("{count} placements do not fit in the one-byte header (maximum {max})", max = u8::MAX)]
    TooManyPlacements { count: usize },

    #[error("placement {index}: {axis} = {value} does not fit in one byte")]
    CoordinateOutOfRange { index: usize, axis: char, value: usize },

    #[error("placement {index}: the {field} contains a NUL byte")]
    EmbeddedNul { index: usize, field: EntryField },

    #[error("puzzle code is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("puzzle code has an impossible length ({len} characters)")]
    InvalidLength { len: usize },

    #[error("puzzle code is truncated: needs {needed} bytes, has {available}")]
    Truncated { needed: usize, available: usize },

    #[error("puzzle code ends inside the {field} of placement {index}")]
    MissingTerminator { index: usize, field: EntryField },

    #[error("placement {index} has direction byte {value} (expected 0 or 1)")]
    InvalidDirection { index: usize, value: u8 },

    #[error("placement {index} has a word of {len} letters (expected 1 to {max})", max = MAX_WORD_LEN)]
    InvalidWordLength { index: usize, len: usize },

    #[error("share link value \"{value}\" is not valid percent-encoded UTF-8")]
    InvalidPercentEncoding { value: String },
}

impl CodecError {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            CodecError::TooManyPlacements { .. } => "C001",
            CodecError::CoordinateOutOfRange { .. } => "C002",
            CodecError::EmbeddedNul { .. } => "C003",
            CodecError::InvalidBase64(_) => "C004",
            CodecError::InvalidLength { .. } => "C005",
            CodecError::Truncated { .. } => "C006",
            CodecError::MissingTerminator { .. } => "C007",
            CodecError::InvalidDirection { .. } => "C008",
            CodecError::InvalidWordLength { .. } => "C009",
            CodecError::InvalidPercentEncoding { .. } => "C010",
        }
    }

    /// Returns a short description of this error type (for documentation)
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            CodecError::TooManyPlacements { .. } => "Placement count does not fit the header byte",
            CodecError::CoordinateOutOfRange { .. } => "Coordinate does not fit its byte",
            CodecError::EmbeddedNul { .. } => "Word or clue contains the terminator byte",
            CodecError::InvalidBase64(_) => "Puzzle code is not valid base64",
            CodecError::InvalidLength { .. } => "Puzzle code has an impossible length",
            CodecError::Truncated { .. } => "Puzzle code is shorter than its header promises",
            CodecError::MissingTerminator { .. } => "A word or clue runs off the end of the code",
            CodecError::InvalidDirection { .. } => "Direction byte is neither across nor down",
            CodecError::InvalidWordLength { .. } => "Word is empty or too long",
            CodecError::InvalidPercentEncoding { .. } => "Share link carries a malformed escape",
        }
    }

    /// Returns detailed explanation of this error type (for documentation)
    #[must_use]
    pub fn details(&self) -> &'static str {
        match self {
            CodecError::TooManyPlacements { .. } => "The first byte of a puzzle code is the number of placements, so at most 255 can be encoded. The packer itself stops at 50.",
            CodecError::CoordinateOutOfRange { .. } => "Each placement stores its x and y offset from the top-left of the grid in one byte, so the grid can be at most 256 cells across.",
            CodecError::EmbeddedNul { .. } => "Words and clues are stored as zero-terminated strings, so a zero byte inside one would split it in two.",
            CodecError::InvalidBase64(_) => "The code contains characters outside the URL-safe base64 alphabet, or its final character carries stray bits. It was most likely altered while being copied.",
            CodecError::InvalidLength { .. } => "A base64 text whose length leaves a remainder of 1 when divided by 4 cannot be produced by any byte sequence. Usually one character has been lost or added.",
            CodecError::Truncated { .. } => "The header announces more placement records than the code contains. The code was probably cut short.",
            CodecError::MissingTerminator { .. } => "Every word and clue ends in a zero byte; the code ended before one was found. The code was probably cut short.",
            CodecError::InvalidDirection { .. } => "Each placement record ends in a direction byte which must be 0 (across) or 1 (down).",
            CodecError::InvalidWordLength { .. } => "Every placement must carry a word of at least one letter, and no longer than 255 letters so that it fits the byte-addressed grid.",
            CodecError::InvalidPercentEncoding { .. } => "The puzzle code inside a share link is percent-encoded; after undoing the %XX escapes the value must be UTF-8 text.",
        }
    }

    /// Returns a helpful suggestion for this error
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            CodecError::TooManyPlacements { .. } | CodecError::CoordinateOutOfRange { .. } => {
                Some("Split the puzzle into smaller ones")
            }
            CodecError::EmbeddedNul { .. } => Some("Remove control characters from the answers and clues"),
            CodecError::InvalidWordLength { .. } => None,
            _ => Some("Ask for the puzzle link again and copy it in full"),
        }
    }

    /// Formats the error with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        format_error_with_code_and_help(&self.to_string(), self.code(), self.help())
    }
}

/// Encode a placement set into a URL-safe puzzle code.
///
/// # Errors
///
/// Returns a [`CodecError`] if the count, a coordinate, or a word length does not fit the wire
/// format, or if a word or clue contains a NUL character.
pub fn encode(set: &PlacementSet) -> Result<String, CodecError> {
    let bytes = to_bytes(set)?;
    let token = URL_SAFE_NO_PAD.encode(&bytes);
    debug!("Encoded {} placements into {} bytes ({} characters)", set.len(), bytes.len(), token.len());
    Ok(token)
}

/// Decode a puzzle code back into its placement set.
///
/// Both the URL-safe and the standard base64 alphabets are accepted, with or without padding,
/// and surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns a [`CodecError`] if the code is not valid base64 or does not describe a complete
/// puzzle.
pub fn decode(token: &str) -> Result<PlacementSet, CodecError> {
    let trimmed = token.trim().trim_end_matches('=');
    if trimmed.len() % 4 == 1 {
        return Err(CodecError::InvalidLength { len: trimmed.len() });
    }

    let mut standard: String = trimmed
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    while standard.len() % 4 != 0 {
        standard.push('=');
    }

    let bytes = STANDARD.decode(standard)?;
    from_bytes(&bytes)
}

/// Serialize a placement set into the raw wire blob.
///
/// # Errors
///
/// See [`encode`].
pub fn to_bytes(set: &PlacementSet) -> Result<Vec<u8>, CodecError> {
    let count = u8::try_from(set.len()).map_err(|_| CodecError::TooManyPlacements { count: set.len() })?;

    let text_len: usize = set.iter().map(|p| p.word.len() + p.clue.len() + 2).sum();
    let mut bytes = Vec::with_capacity(1 + RECORD_LEN * set.len() + text_len);
    bytes.push(count);

    for (index, p) in set.iter().enumerate() {
        let coordinate = |axis: char, value: usize| {
            u8::try_from(value).map_err(|_| CodecError::CoordinateOutOfRange { index, axis, value })
        };
        bytes.push(coordinate('x', p.x)?);
        bytes.push(coordinate('y', p.y)?);
        bytes.push(p.direction.to_byte());
    }

    for (index, p) in set.iter().enumerate() {
        let len = p.len();
        if len == 0 || len > MAX_WORD_LEN {
            return Err(CodecError::InvalidWordLength { index, len });
        }
        push_terminated(&mut bytes, &p.word, index, EntryField::Key)?;
    }
    for (index, p) in set.iter().enumerate() {
        push_terminated(&mut bytes, &p.clue, index, EntryField::Clue)?;
    }

    Ok(bytes)
}

fn push_terminated(bytes: &mut Vec<u8>, text: &str, index: usize, field: EntryField) -> Result<(), CodecError> {
    if text.contains('\0') {
        return Err(CodecError::EmbeddedNul { index, field });
    }
    bytes.extend_from_slice(text.as_bytes());
    bytes.push(0);
    Ok(())
}

/// Parse a raw wire blob.
///
/// # Errors
///
/// See [`decode`].
pub fn from_bytes(bytes: &[u8]) -> Result<PlacementSet, CodecError> {
    let mut reader = Reader { bytes, offset: 0 };

    let count = usize::from(reader.header()?);
    let needed = 1 + RECORD_LEN * count;
    if bytes.len() < needed {
        return Err(CodecError::Truncated { needed, available: bytes.len() });
    }

    let mut records = Vec::with_capacity(count);
    for index in 0..count {
        let record = reader.take(RECORD_LEN);
        let direction = Direction::from_byte(record[2])
            .ok_or(CodecError::InvalidDirection { index, value: record[2] })?;
        records.push((usize::from(record[0]), usize::from(record[1]), direction));
    }

    let mut words = Vec::with_capacity(count);
    for index in 0..count {
        let word = reader.terminated(index, EntryField::Key)?;
        let len = word.chars().count();
        if len == 0 || len > MAX_WORD_LEN {
            return Err(CodecError::InvalidWordLength { index, len });
        }
        words.push(word);
    }

    let mut placements = Vec::with_capacity(count);
    for (index, ((x, y, direction), word)) in records.into_iter().zip(words).enumerate() {
        let clue = reader.terminated(index, EntryField::Clue)?;
        placements.push(PlacedEntry { x, y, direction, word, clue });
    }

    if reader.offset < bytes.len() {
        debug!("Ignoring {} trailing bytes after the last clue", bytes.len() - reader.offset);
    }

    Ok(placements.into())
}

/// Forward-only cursor over a wire blob.
struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn header(&mut self) -> Result<u8, CodecError> {
        let byte = *self
            .bytes
            .first()
            .ok_or(CodecError::Truncated { needed: 1, available: 0 })?;
        self.offset = 1;
        Ok(byte)
    }

    // caller has checked the length
    fn take(&mut self, len: usize) -> &'a [u8] {
        let slice = &self.bytes[self.offset..self.offset + len];
        self.offset += len;
        slice
    }

    fn terminated(&mut self, index: usize, field: EntryField) -> Result<String, CodecError> {
        let rest = &self.bytes[self.offset..];
        let end = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(CodecError::MissingTerminator { index, field })?;
        self.offset += end + 1;
        Ok(String::from_utf8_lossy(&rest[..end]).into_owned())
    }
}
