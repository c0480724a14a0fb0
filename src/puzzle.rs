//! End-to-end pipeline used by both front ends.
//!
//! - **Authoring:** [`generate`] takes the author's `ANSWER=CLUE` text and returns a puzzle code,
//!   together with everything that did *not* make it into the puzzle.
//! - **Solving:** [`load`] takes a puzzle code (or a whole share link) and returns the placements
//!   and the reconstructed grids.
//!
//! # Examples
//!
//! ```
//! use crossword_link::puzzle;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let generated = puzzle::generate_with_rng("CAT=Small feline\nCAR=Has four wheels", &mut rng)?;
//! let url = puzzle::share_url("https://example.com/crosswords", &generated.token);
//!
//! let loaded = puzzle::load(&url)?;
//! assert_eq!(loaded.placements.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::codec::{self, CodecError};
use crate::entry_list::{EntryList, RejectedLine};
use crate::grid::{self, Grids};
use crate::packer::{self, PackError};
use crate::placement::{BoundingBox, PlacementSet};
use log::info;
use rand::Rng;
use serde::Serialize;

/// Query parameter that carries the puzzle code in a share link.
pub const TOKEN_PARAM: &str = "p";

/// Unified error type for the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PuzzleError {
    #[error("packing failed: {0}")]
    Pack(#[from] PackError),

    #[error("invalid puzzle code: {0}")]
    Codec(#[from] CodecError),
}

impl PuzzleError {
    /// Returns the error code of the underlying error
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            PuzzleError::Pack(e) => e.code(),
            PuzzleError::Codec(e) => e.code(),
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            PuzzleError::Pack(e) => e.description(),
            PuzzleError::Codec(e) => e.description(),
        }
    }

    #[must_use]
    pub fn details(&self) -> &'static str {
        match self {
            PuzzleError::Pack(e) => e.details(),
            PuzzleError::Codec(e) => e.details(),
        }
    }

    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            PuzzleError::Pack(e) => e.help(),
            PuzzleError::Codec(e) => e.help(),
        }
    }

    /// Delegates to the underlying error's detailed display
    #[must_use]
    pub fn display_detailed(&self) -> String {
        match self {
            PuzzleError::Pack(e) => e.display_detailed(),
            PuzzleError::Codec(e) => e.display_detailed(),
        }
    }
}

/// A freshly generated puzzle code plus a report of what was left out.
#[derive(Debug, Clone)]
pub struct Generated {
    pub token: String,
    pub placements: PlacementSet,
    pub bounds: BoundingBox,
    /// Answers that could not cross any placed word.
    pub dropped: Vec<String>,
    /// Answers left out because the placement ceiling was reached.
    pub truncated: Vec<String>,
    /// Input lines rejected before packing.
    pub rejected: Vec<RejectedLine>,
}

/// A decoded puzzle, ready for a solving surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedPuzzle {
    pub placements: PlacementSet,
    pub grids: Grids,
}

/// Parse, pack and encode author text using the thread-local RNG.
///
/// # Errors
///
/// See [`generate_with_rng`].
pub fn generate(text: &str) -> Result<Generated, PuzzleError> {
    generate_with_rng(text, &mut rand::thread_rng())
}

/// Parse, pack and encode author text.
///
/// Malformed lines are skipped and reported in [`Generated::rejected`].
///
/// # Errors
///
/// Returns [`PuzzleError::Pack`] if no word could be placed and [`PuzzleError::Codec`] if the
/// layout does not fit the wire format.
pub fn generate_with_rng<R: Rng + ?Sized>(text: &str, rng: &mut R) -> Result<Generated, PuzzleError> {
    generate_from_list(EntryList::parse_from_str(text), rng)
}

/// Pack and encode an already parsed entry list; its rejected lines are passed through.
///
/// # Errors
///
/// See [`generate_with_rng`].
pub fn generate_from_list<R: Rng + ?Sized>(list: EntryList, rng: &mut R) -> Result<Generated, PuzzleError> {
    let layout = packer::pack_with_rng(&list.entries, rng)?;
    let placements = layout.placement_set();
    let token = codec::encode(&placements)?;

    let keys = |indices: Vec<usize>| -> Vec<String> {
        indices.into_iter().map(|i| list.entries[i].key().to_string()).collect()
    };
    let dropped = keys(layout.dropped());
    let truncated = keys(layout.truncated());

    info!(
        "Generated puzzle code of {} characters ({} placed, {} dropped, {} truncated, {} rejected)",
        token.len(),
        placements.len(),
        dropped.len(),
        truncated.len(),
        list.rejected.len()
    );

    Ok(Generated {
        token,
        placements,
        bounds: layout.bounds,
        dropped,
        truncated,
        rejected: list.rejected,
    })
}

/// Decode a puzzle code (or a share link carrying one) and rebuild its grids.
///
/// # Errors
///
/// Returns [`PuzzleError::Codec`] if the code is malformed.
pub fn load(input: &str) -> Result<LoadedPuzzle, PuzzleError> {
    let token = extract_token(input)?;
    let placements = codec::decode(&token)?;
    let grids = grid::reconstruct(&placements);
    info!("Loaded puzzle with {} placements ({}x{})", placements.len(), grids.width, grids.height);
    Ok(LoadedPuzzle { placements, grids })
}

/// Pull the puzzle code out of a share link or query string; anything else is taken to be a
/// bare code. The `p` value of a link is percent-decoded.
///
/// # Errors
///
/// Returns [`CodecError::InvalidPercentEncoding`] if the `p` value does not decode to UTF-8.
pub fn extract_token(input: &str) -> Result<String, CodecError> {
    let input = input.trim();
    let (has_query, query) = match input.split_once('?') {
        Some((_, query)) => (true, query),
        None => (false, input),
    };
    let query = query.split('#').next().unwrap_or_default();

    let param = query
        .split('&')
        .find_map(|pair| pair.strip_prefix(TOKEN_PARAM).and_then(|rest| rest.strip_prefix('=')));

    match param {
        Some(value) => urlencoding::decode(value)
            .map(|decoded| decoded.into_owned())
            .map_err(|_| CodecError::InvalidPercentEncoding { value: value.to_string() }),
        None if has_query => Ok(String::new()),
        None => Ok(input.to_string()),
    }
}

/// Build the link a solver opens: `base` with the code as its `p` query parameter.
#[must_use]
pub fn share_url(base: &str, token: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}{TOKEN_PARAM}={}", urlencoding::encode(token))
}
