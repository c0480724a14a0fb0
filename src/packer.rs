//! Greedy packer that lays entries out as an interlocking crossword.
//!
//! The packer shuffles the entries, drops the first one somewhere in the middle of a fixed
//! working grid, and then tries to hang every following word off a letter of a word that is
//! already placed. The first geometrically valid crossing wins; there is no backtracking and no
//! scoring of alternatives, so packing the same list twice usually gives different layouts.
//!
//! # Error Handling
//!
//! - P001: `NoPlacements` (Nothing could be placed, e.g. the entry list is empty)
//!
//! Entries that cannot cross anything are *dropped*, and entries beyond [`MAX_PLACEMENTS`] are
//! *truncated*. Neither is an error; both are reported through [`Layout::fates`].
//!
//! # Examples
//!
//! ```
//! use crossword_link::entry_list::Entry;
//! use crossword_link::packer;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let entries = vec![
//!     Entry::new("cat", "Small feline")?,
//!     Entry::new("car", "Has four wheels")?,
//! ];
//! let mut rng = StdRng::seed_from_u64(7);
//! let layout = packer::pack_with_rng(&entries, &mut rng)?;
//!
//! assert_eq!(layout.placements.len(), 2);
//! let set = layout.placement_set();
//! assert_eq!(set.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::entry_list::Entry;
use crate::errors::format_error_with_code_and_help;
use crate::placement::{BoundingBox, Direction, PlacedEntry, Placement, PlacementSet};
use instant::Instant;
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;

/// Side length of the square working grid.
pub const GRID_SIZE: usize = 20;
/// Hard ceiling on any coordinate a word may reach.
pub const COORD_CEILING: usize = 64;
/// Most placements a single puzzle may hold (the count travels in one byte).
pub const MAX_PLACEMENTS: usize = 50;

/// What happened to one entry during packing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryFate {
    /// Placed; holds the placement index (commit order).
    Placed(usize),
    /// No valid crossing with any placed word.
    Dropped,
    /// Skipped because the placement ceiling was already reached.
    Truncated,
}

/// Errors that abort packing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PackError {
    #[error("no words could be placed ({entries} entries given)")]
    NoPlacements { entries: usize },
}

impl PackError {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            PackError::NoPlacements { .. } => "P001",
        }
    }

    /// Returns a short description of this error type (for documentation)
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            PackError::NoPlacements { .. } => "Nothing could be placed in the grid",
        }
    }

    /// Returns detailed explanation of this error type (for documentation)
    #[must_use]
    pub fn details(&self) -> &'static str {
        match self {
            PackError::NoPlacements { .. } => "The packer committed zero words, so there is no puzzle to encode. This happens when the entry list is empty, or when every line was rejected as malformed before packing.",
        }
    }

    /// Returns a helpful suggestion for this error
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            PackError::NoPlacements { .. } => Some("Add at least one ANSWER=CLUE line, ideally several answers that share letters"),
        }
    }

    /// Formats the error with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        format_error_with_code_and_help(&self.to_string(), self.code(), self.help())
    }
}

/// The outcome of a successful pack.
#[derive(Debug, Clone)]
pub struct Layout<'a> {
    entries: &'a [Entry],
    /// Committed placements in commit order, in working-grid coordinates.
    pub placements: Vec<Placement>,
    /// Crop of the working grid that contains every placement.
    pub bounds: BoundingBox,
    /// One fate per entry, indexed like the input slice.
    pub fates: Vec<EntryFate>,
}

impl Layout<'_> {
    /// Indices of entries that could not cross any placed word.
    #[must_use]
    pub fn dropped(&self) -> Vec<usize> {
        self.indices_with(EntryFate::Dropped)
    }

    /// Indices of entries skipped because the ceiling was reached.
    #[must_use]
    pub fn truncated(&self) -> Vec<usize> {
        self.indices_with(EntryFate::Truncated)
    }

    fn indices_with(&self, fate: EntryFate) -> Vec<usize> {
        self.fates
            .iter()
            .enumerate()
            .filter(|(_, f)| **f == fate)
            .map(|(i, _)| i)
            .collect()
    }

    /// Attach words and clues and shift every placement so the bounding box starts at (0, 0).
    #[must_use]
    pub fn placement_set(&self) -> PlacementSet {
        self.placements
            .iter()
            .map(|p| {
                let entry = &self.entries[p.entry_index];
                PlacedEntry {
                    x: p.x - self.bounds.min_x,
                    y: p.y - self.bounds.min_y,
                    direction: p.direction,
                    word: entry.key().to_string(),
                    clue: entry.clue().to_string(),
                }
            })
            .collect::<Vec<_>>()
            .into()
    }
}

/// Pack `entries` using the thread-local RNG.
///
/// # Errors
///
/// Returns [`PackError::NoPlacements`] if nothing could be placed.
pub fn pack(entries: &[Entry]) -> Result<Layout<'_>, PackError> {
    pack_with_rng(entries, &mut rand::thread_rng())
}

/// Pack `entries` drawing all randomness from `rng`.
///
/// # Errors
///
/// Returns [`PackError::NoPlacements`] if nothing could be placed.
pub fn pack_with_rng<'a, R: Rng + ?Sized>(
    entries: &'a [Entry],
    rng: &mut R,
) -> Result<Layout<'a>, PackError> {
    pack_with_limit(entries, rng, MAX_PLACEMENTS)
}

fn pack_with_limit<'a, R: Rng + ?Sized>(
    entries: &'a [Entry],
    rng: &mut R,
    max_placements: usize,
) -> Result<Layout<'a>, PackError> {
    let t_pack = Instant::now();

    let mut order: Vec<usize> = (0..entries.len()).collect();
    order.shuffle(rng);

    let mut packer = Packer::new(entries);
    let mut fates = vec![EntryFate::Dropped; entries.len()];

    for &entry_index in &order {
        if packer.placements.len() >= max_placements {
            fates[entry_index] = EntryFate::Truncated;
            continue;
        }

        let candidate = if packer.placements.is_empty() {
            Some(packer.seed_placement(entry_index, rng))
        } else {
            packer.find_crossing(entry_index)
        };

        match candidate {
            Some(placement) => {
                fates[entry_index] = EntryFate::Placed(packer.placements.len());
                packer.commit(placement);
            }
            None => {
                warn!("Dropping \"{}\": no valid crossing", entries[entry_index].key());
            }
        }
    }

    if packer.placements.is_empty() {
        return Err(PackError::NoPlacements { entries: entries.len() });
    }

    let num_truncated = fates.iter().filter(|f| **f == EntryFate::Truncated).count();
    if num_truncated > 0 {
        warn!("Placement ceiling of {max_placements} reached; {num_truncated} entries left out");
    }

    let bounds = packer.bounding_box();
    info!(
        "Packed {}/{} entries into {}x{} in {:?}",
        packer.placements.len(),
        entries.len(),
        bounds.width,
        bounds.height,
        t_pack.elapsed()
    );

    Ok(Layout { entries, placements: packer.placements, bounds, fates })
}

/// Which placements own a working-grid cell, per direction.
#[derive(Debug, Clone, Copy, Default)]
struct Owners {
    across: Option<usize>,
    down: Option<usize>,
}

impl Owners {
    fn get(self, direction: Direction) -> Option<usize> {
        match direction {
            Direction::Across => self.across,
            Direction::Down => self.down,
        }
    }

    fn any(self) -> Option<usize> {
        self.across.or(self.down)
    }

    fn is_empty(self) -> bool {
        self.any().is_none()
    }

    fn contains(self, placement: usize) -> bool {
        self.across == Some(placement) || self.down == Some(placement)
    }
}

/// Transient state of one packing call.
struct Packer<'a> {
    letters: Vec<Vec<char>>,
    entries: &'a [Entry],
    occupancy: Vec<Owners>,
    placements: Vec<Placement>,
}

impl<'a> Packer<'a> {
    fn new(entries: &'a [Entry]) -> Self {
        Packer {
            letters: entries.iter().map(Entry::letters).collect(),
            entries,
            occupancy: vec![Owners::default(); GRID_SIZE * GRID_SIZE],
            placements: Vec::new(),
        }
    }

    fn owners(&self, (x, y): (usize, usize)) -> Owners {
        self.occupancy[y * GRID_SIZE + x]
    }

    /// Owners of the cell `delta` steps away along `direction`, or `None` if off the grid.
    fn neighbor(&self, (x, y): (usize, usize), direction: Direction, delta: isize) -> Option<Owners> {
        let (nx, ny) = match direction {
            Direction::Across => (x.checked_add_signed(delta)?, y),
            Direction::Down => (x, y.checked_add_signed(delta)?),
        };
        (nx < GRID_SIZE && ny < GRID_SIZE).then(|| self.owners((nx, ny)))
    }

    fn letter_at(&self, placement_index: usize, (x, y): (usize, usize)) -> char {
        let p = &self.placements[placement_index];
        let offset = match p.direction {
            Direction::Across => x - p.x,
            Direction::Down => y - p.y,
        };
        self.letters[p.entry_index][offset]
    }

    /// Somewhere in the middle of the grid, in a random orientation, clamped so the word fits.
    fn seed_placement<R: Rng + ?Sized>(&self, entry_index: usize, rng: &mut R) -> Placement {
        let len = self.letters[entry_index].len();
        let direction = if rng.gen_bool(0.5) { Direction::Across } else { Direction::Down };
        let interior = GRID_SIZE / 4..GRID_SIZE - GRID_SIZE / 4;
        let mut x = rng.gen_range(interior.clone());
        let mut y = rng.gen_range(interior);
        match direction {
            Direction::Across => x = x.min(GRID_SIZE - len),
            Direction::Down => y = y.min(GRID_SIZE - len),
        }
        Placement { x, y, direction, entry_index }
    }

    /// First-fit search: placed words in commit order, then their letters, then the candidate's.
    fn find_crossing(&self, entry_index: usize) -> Option<Placement> {
        let word = &self.letters[entry_index];

        for (crossed, existing) in self.placements.iter().enumerate() {
            let direction = existing.direction.perpendicular();
            for (i, &shared) in self.letters[existing.entry_index].iter().enumerate() {
                let (cx, cy) = existing.cell(i);
                for (j, _) in word.iter().enumerate().filter(|(_, c)| **c == shared) {
                    let start = match direction {
                        Direction::Across => cx.checked_sub(j).map(|sx| (sx, cy)),
                        Direction::Down => cy.checked_sub(j).map(|sy| (cx, sy)),
                    };
                    let Some(start) = start else { continue };

                    if self.fits(word, start, direction, crossed) {
                        debug!(
                            "\"{}\" crosses \"{}\" at ({cx}, {cy})",
                            self.entries[entry_index].key(),
                            self.entries[existing.entry_index].key()
                        );
                        return Some(Placement { x: start.0, y: start.1, direction, entry_index });
                    }
                }
            }
        }
        None
    }

    fn fits(&self, word: &[char], start: (usize, usize), direction: Direction, crossed: usize) -> bool {
        let along = match direction {
            Direction::Across => start.0,
            Direction::Down => start.1,
        };
        let end = along + word.len();
        if end > COORD_CEILING || end > GRID_SIZE {
            return false;
        }

        let perpendicular = direction.perpendicular();
        for (k, &letter) in word.iter().enumerate() {
            let cell = direction.advance(start, k);
            let owners = self.owners(cell);

            // a cell may be shared only with a word running the other way, on the same letter
            if owners.get(direction).is_some() {
                return false;
            }
            if let Some(owner) = owners.any() {
                if self.letter_at(owner, cell) != letter {
                    return false;
                }
            }

            for delta in [-1, 1] {
                if let Some(side) = self.neighbor(cell, perpendicular, delta) {
                    if !side.is_empty() && !side.contains(crossed) {
                        return false;
                    }
                }
            }
        }

        // no abutting end-to-end
        let before = self.neighbor(start, direction, -1);
        let after = self.neighbor(direction.advance(start, word.len() - 1), direction, 1);
        [before, after].into_iter().flatten().all(Owners::is_empty)
    }

    fn commit(&mut self, placement: Placement) {
        let index = self.placements.len();
        let len = self.letters[placement.entry_index].len();
        for k in 0..len {
            let (x, y) = placement.cell(k);
            let owners = &mut self.occupancy[y * GRID_SIZE + x];
            match placement.direction {
                Direction::Across => owners.across = Some(index),
                Direction::Down => owners.down = Some(index),
            }
        }
        self.placements.push(placement);
    }

    fn bounding_box(&self) -> BoundingBox {
        let mut min_x = usize::MAX;
        let mut min_y = usize::MAX;
        let mut max_x = 0;
        let mut max_y = 0;
        for p in &self.placements {
            let (end_x, end_y) = p.cell(self.letters[p.entry_index].len() - 1);
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(end_x + 1);
            max_y = max_y.max(end_y + 1);
        }
        BoundingBox { min_x, min_y, width: max_x - min_x, height: max_y - min_y }
    }
}
