//! Generate error code documentation from the source of truth (error enums).
//!
//! This binary reads the error codes, descriptions, details, and help text
//! directly from the `EntryError`, `PackError` and `CodecError` implementations via their
//! `code()`, `description()`, `details()`, and `help()` methods.
//!
//! Run with:
//! ```bash
//! cargo run --bin generate_error_docs > docs/ERROR_CODES.md
//! ```

use crossword_link::codec::CodecError;
use crossword_link::errors::{EntryError, EntryField};
use crossword_link::packer::{PackError, GRID_SIZE};

/// Macro to generate error documentation for any error type
/// with `code()`, `description()`, `details()`, `help()`, and `display_detailed()` methods
macro_rules! generate_error_docs {
    ($errors:expr) => {
        for error in $errors {
            println!("### {}: {}\n", error.code(), error.description());
            println!("**Details:** {}\n", error.details());

            if let Some(help_text) = error.help() {
                println!("**How to fix:**");
                println!("```");
                println!("{help_text}");
                println!("```\n");
            }

            println!("**Example error message:**");
            println!("```");
            println!("{error}");
            println!("```\n");

            println!("**Detailed format:**");
            println!("```");
            println!("{}", error.display_detailed());
            println!("```\n");

            println!("---\n");
        }
    };
}

fn all_entry_error_variants() -> Vec<EntryError> {
    vec![
        EntryError::EmptyKey,
        EntryError::MissingSeparator { line: "CAT Small feline".to_string() },
        EntryError::InvalidKeyChar { key: "ICE-CREAM".to_string(), invalid_char: '-' },
        EntryError::KeyTooLong { key: "SUPERCALIFRAGILISTICEXPIALIDOCIOUS".to_string(), len: 34, max: GRID_SIZE },
        EntryError::EmbeddedNul { field: EntryField::Clue },
    ]
}

fn all_pack_error_variants() -> Vec<PackError> {
    vec![PackError::NoPlacements { entries: 0 }]
}

fn all_codec_error_variants() -> Vec<CodecError> {
    vec![
        CodecError::TooManyPlacements { count: 300 },
        CodecError::CoordinateOutOfRange { index: 3, axis: 'x', value: 300 },
        CodecError::EmbeddedNul { index: 0, field: EntryField::Key },
        CodecError::InvalidBase64(base64::DecodeError::InvalidByte(4, b'!')),
        CodecError::InvalidLength { len: 5 },
        CodecError::Truncated { needed: 7, available: 4 },
        CodecError::MissingTerminator { index: 1, field: EntryField::Clue },
        CodecError::InvalidDirection { index: 0, value: 2 },
        CodecError::InvalidWordLength { index: 0, len: 0 },
        CodecError::InvalidPercentEncoding { value: "%FFgAA".to_string() },
    ]
}

fn main() {
    println!("# Error Code Reference\n");
    println!("**⚠️ This document is auto-generated from the source code. Do not edit manually.**\n");

    println!("## Table of Contents\n");
    println!("- [Entry Errors (E001–E005)](#entry-errors)");
    println!("- [Packing Errors (P001)](#packing-errors)");
    println!("- [Puzzle Code Errors (C001–C010)](#puzzle-code-errors)");
    println!("- [How to Use Error Codes](#how-to-use-error-codes)\n");

    println!("## Entry Errors\n");
    println!("Problems with a single `ANSWER=CLUE` line. The line is skipped and the rest of the input is still used.\n");
    generate_error_docs!(all_entry_error_variants());

    println!("## Packing Errors\n");
    println!("Errors from laying the answers out on the grid.\n");
    generate_error_docs!(all_pack_error_variants());

    println!("## Puzzle Code Errors\n");
    println!("Errors from turning a layout into a puzzle code (C001–C003) or reading one back (C004–C010).\n");
    generate_error_docs!(all_codec_error_variants());

    println!("\n## How to Use Error Codes\n");
    println!("When you see an error like:\n");
    println!("```");
    println!("{}", CodecError::InvalidLength { len: 5 }.display_detailed());
    println!("```\n");
    println!("1. Note the error code (e.g., `C005`)");
    println!("2. Look it up in this document for detailed explanation");
    println!("3. Follow the suggested resolution steps\n");
}
