//! Error types for malformed author entries, with error codes and helpful messages.
//!
//! # Error Codes
//!
//! Each error variant has a unique code (E001-E005) for documentation lookup:
//!
//! - E001: `EmptyKey` (Answer is empty after trimming)
//! - E002: `MissingSeparator` (Line has no `=` between answer and clue)
//! - E003: `InvalidKeyChar` (Answer contains a non-letter)
//! - E004: `KeyTooLong` (Answer cannot fit the working grid)
//! - E005: `EmbeddedNul` (Answer or clue contains a NUL character)
//!
//! A malformed entry only ever rejects that single entry; the rest of the list is still packed.
//!
//! # Examples
//!
//! ```
//! use crossword_link::entry_list::Entry;
//! use crossword_link::errors::EntryError;
//!
//! match Entry::new("   ", "an empty answer") {
//!     Err(e) => {
//!         assert!(matches!(e, EntryError::EmptyKey));
//!         println!("Error: {}", e);
//!         println!("Code: {}", e.code());
//!         if let Some(help) = e.help() {
//!             println!("Help: {}", help);
//!         }
//!     }
//!     Ok(_) => unreachable!(),
//! }
//! ```

/// Which half of an entry an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    Key,
    Clue,
}

impl std::fmt::Display for EntryField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryField::Key => write!(f, "answer"),
            EntryField::Clue => write!(f, "clue"),
        }
    }
}

/// Why a single author entry was rejected before packing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    #[error("Empty answer")]
    EmptyKey,

    #[error("Missing '=' separator in line: \"{line}\"")]
    MissingSeparator { line: String },

    #[error("Answer \"{key}\" contains invalid character '{invalid_char}' (only letters allowed)")]
    InvalidKeyChar { key: String, invalid_char: char },

    #[error("Answer \"{key}\" is {len} letters long (maximum is {max})")]
    KeyTooLong { key: String, len: usize, max: usize },

    #[error("The {field} contains a NUL character")]
    EmbeddedNul { field: EntryField },
}

impl EntryError {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            EntryError::EmptyKey => "E001",
            EntryError::MissingSeparator { .. } => "E002",
            EntryError::InvalidKeyChar { .. } => "E003",
            EntryError::KeyTooLong { .. } => "E004",
            EntryError::EmbeddedNul { .. } => "E005",
        }
    }

    /// Returns a short description of this error type (for documentation)
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            EntryError::EmptyKey => "Answer is empty after trimming",
            EntryError::MissingSeparator { .. } => "Line has no '=' between answer and clue",
            EntryError::InvalidKeyChar { .. } => "Answer contains a non-letter",
            EntryError::KeyTooLong { .. } => "Answer cannot fit the working grid",
            EntryError::EmbeddedNul { .. } => "Answer or clue contains a NUL character",
        }
    }

    /// Returns detailed explanation of this error type (for documentation)
    #[must_use]
    pub fn details(&self) -> &'static str {
        match self {
            EntryError::EmptyKey => "Every entry needs an answer made of at least one letter. Leading and trailing whitespace is ignored, so an answer consisting only of spaces is empty.",
            EntryError::MissingSeparator { .. } => "Each non-blank line must have the form ANSWER=CLUE. The line is split on the first '=' only, so clues may contain further '=' characters.",
            EntryError::InvalidKeyChar { .. } => "Answers are written into grid cells one letter per cell, so digits, spaces and punctuation cannot be placed.",
            EntryError::KeyTooLong { .. } => "Words are packed into a fixed 20x20 working grid; an answer longer than one side of that grid can never be placed.",
            EntryError::EmbeddedNul { .. } => "The puzzle code terminates every answer and clue with a zero byte, so neither may contain one.",
        }
    }

    /// Returns a helpful suggestion or example for this error
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            EntryError::EmptyKey => Some("Put the answer before the '=' (e.g., 'CAT=Small feline')"),
            EntryError::MissingSeparator { .. } => Some("Use the format ANSWER=CLUE (e.g., 'CAT=Small feline')"),
            EntryError::InvalidKeyChar { .. } => Some("Remove spaces, digits and punctuation from the answer (e.g., 'NEWYORK' instead of 'NEW YORK')"),
            EntryError::KeyTooLong { .. } => Some("Use an answer of at most 20 letters"),
            EntryError::EmbeddedNul { .. } => None,
        }
    }

    /// Formats the error with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        format_error_with_code_and_help(&self.to_string(), self.code(), self.help())
    }
}

/// Helper function to format error messages with code and optional help text
pub(crate) fn format_error_with_code_and_help(base_msg: &str, code: &str, help: Option<&str>) -> String {
    if let Some(help_text) = help {
        format!("{base_msg} ({code})\n{help_text}")
    } else {
        format!("{base_msg} ({code})")
    }
}
