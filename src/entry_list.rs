//! Parse the author's `ANSWER=CLUE` text into validated entries.
//!
//! This is the authoring-side front door to the packer. The text can come from a file (CLI) or
//! straight from a text area (WebAssembly/browser builds, where direct file I/O isn't allowed).
//!
//! The parsing logic:
//! - Each non-blank line is expected to be in the format `ANSWER=CLUE`, split on the first `=`.
//! - Lines starting with `#` or `;` are comments and `[section]` lines are headers; both are skipped.
//! - Answers are trimmed and uppercased; clues are trimmed.
//! - A malformed line rejects only that line. It is recorded in [`EntryList::rejected`] together
//!   with its 1-based line number so the author can be told what was skipped.
//!
//! Input order is preserved: an entry's position in [`EntryList::entries`] is the index the packer
//! uses to refer back to it.

use crate::errors::{EntryError, EntryField};
use crate::packer::GRID_SIZE;

/// One validated author entry: an uppercase answer and its clue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    key: String,
    clue: String,
}

impl Entry {
    /// Validate and normalize a raw `(answer, clue)` pair.
    ///
    /// # Errors
    ///
    /// Returns an [`EntryError`] if the answer is empty after trimming, contains anything other
    /// than letters, is longer than the working grid, or if either half contains a NUL character.
    pub fn new(key: &str, clue: &str) -> Result<Entry, EntryError> {
        if key.contains('\0') {
            return Err(EntryError::EmbeddedNul { field: EntryField::Key });
        }
        if clue.contains('\0') {
            return Err(EntryError::EmbeddedNul { field: EntryField::Clue });
        }

        let key = key.trim().to_uppercase();
        if key.is_empty() {
            return Err(EntryError::EmptyKey);
        }
        if let Some(invalid_char) = key.chars().find(|c| !c.is_alphabetic()) {
            return Err(EntryError::InvalidKeyChar { key, invalid_char });
        }
        // NB: uppercasing can change the length (e.g. 'ß' -> "SS"), so measure afterwards
        let len = key.chars().count();
        if len > GRID_SIZE {
            return Err(EntryError::KeyTooLong { key, len, max: GRID_SIZE });
        }

        Ok(Entry { key, clue: clue.trim().to_string() })
    }

    /// The uppercase answer.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn clue(&self) -> &str {
        &self.clue
    }

    /// The answer as individual letters (one per grid cell).
    #[must_use]
    pub fn letters(&self) -> Vec<char> {
        self.key.chars().collect()
    }
}

/// A line of author input that could not be turned into an [`Entry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    /// 1-based line number in the original text
    pub line_number: usize,
    pub error: EntryError,
}

/// The result of parsing a block of author text.
#[derive(Debug, Clone, Default)]
pub struct EntryList {
    /// Valid entries, in input order.
    pub entries: Vec<Entry>,
    /// Lines that were skipped because they were malformed.
    pub rejected: Vec<RejectedLine>,
}

impl EntryList {
    /// Parse author text from an in-memory string.
    ///
    /// This is **WASM-safe** because it doesn't touch the filesystem.
    #[must_use]
    pub fn parse_from_str(contents: &str) -> EntryList {
        let mut list = EntryList::default();

        for (idx, raw_line) in contents.lines().enumerate() {
            let line = raw_line.trim();
            if is_skippable(line) {
                continue;
            }

            let parsed = match line.split_once('=') {
                Some((key, clue)) => Entry::new(key, clue),
                None => Err(EntryError::MissingSeparator { line: line.to_string() }),
            };

            match parsed {
                Ok(entry) => list.entries.push(entry),
                Err(error) => {
                    log::warn!("Skipping line {}: {}", idx + 1, error);
                    list.rejected.push(RejectedLine { line_number: idx + 1, error });
                }
            }
        }

        log::debug!(
            "Parsed {} entries ({} rejected lines)",
            list.entries.len(),
            list.rejected.len()
        );
        list
    }

    /// Native-only convenience method: read from a file path and parse.
    ///
    /// # Errors
    ///
    /// Will return an `Error` if unable to read a file at `path`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> std::io::Result<EntryList> {
        let path_ref = path.as_ref();

        let data = std::fs::read_to_string(path_ref).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!("failed to read entries from '{}': {}", path_ref.display(), e)
            )
        })?;

        Ok(Self::parse_from_str(&data))
    }
}

// blank lines, `#`/`;` comments, and `[section]` headers
fn is_skippable(line: &str) -> bool {
    line.is_empty()
        || line.starts_with('#')
        || line.starts_with(';')
        || (line.starts_with('[') && line.ends_with(']'))
}
