//! Shared data model: orientations, packer placements, and the box-relative placement set that
//! travels inside a puzzle code.

use serde::Serialize;

/// The two orientations a word may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Across,
    Down,
}

impl Direction {
    /// Wire value: 0 for across, 1 for down.
    #[must_use]
    pub fn to_byte(self) -> u8 {
        match self {
            Direction::Across => 0,
            Direction::Down => 1,
        }
    }

    /// Inverse of [`Direction::to_byte`]; any other byte is not a direction.
    #[must_use]
    pub fn from_byte(byte: u8) -> Option<Direction> {
        match byte {
            0 => Some(Direction::Across),
            1 => Some(Direction::Down),
            _ => None,
        }
    }

    #[must_use]
    pub fn perpendicular(self) -> Direction {
        match self {
            Direction::Across => Direction::Down,
            Direction::Down => Direction::Across,
        }
    }

    /// The cell `offset` steps from `(x, y)` along this direction.
    #[must_use]
    pub fn advance(self, (x, y): (usize, usize), offset: usize) -> (usize, usize) {
        match self {
            Direction::Across => (x + offset, y),
            Direction::Down => (x, y + offset),
        }
    }
}

/// A committed word inside the packer's working grid.
///
/// `entry_index` is the only link back to the entry's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: usize,
    pub y: usize,
    pub direction: Direction,
    pub entry_index: usize,
}

impl Placement {
    #[must_use]
    pub fn cell(&self, offset: usize) -> (usize, usize) {
        self.direction.advance((self.x, self.y), offset)
    }
}

/// Smallest rectangle containing every committed placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BoundingBox {
    pub min_x: usize,
    pub min_y: usize,
    pub width: usize,
    pub height: usize,
}

/// One placement together with its text, in box-relative coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedEntry {
    pub x: usize,
    pub y: usize,
    pub direction: Direction,
    pub word: String,
    pub clue: String,
}

impl PlacedEntry {
    /// Length in letters (grid cells), not bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.word.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.word.is_empty()
    }

    /// Every cell of the word paired with the letter that belongs there.
    pub fn cells(&self) -> impl Iterator<Item = ((usize, usize), char)> + '_ {
        self.word
            .chars()
            .enumerate()
            .map(move |(offset, letter)| (self.direction.advance((self.x, self.y), offset), letter))
    }

    /// One past the last cell along each axis: `(x_end, y_end)`.
    #[must_use]
    pub fn extent(&self) -> (usize, usize) {
        match self.direction {
            Direction::Across => (self.x + self.len(), self.y + 1),
            Direction::Down => (self.x + 1, self.y + self.len()),
        }
    }
}

/// An ordered list of placements. Order is significant: it is the only placement identifier
/// the puzzle code carries, and the reference grid indexes into it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct PlacementSet {
    pub placements: Vec<PlacedEntry>,
}

impl PlacementSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PlacedEntry> {
        self.placements.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlacedEntry> {
        self.placements.iter()
    }
}

impl From<Vec<PlacedEntry>> for PlacementSet {
    fn from(placements: Vec<PlacedEntry>) -> Self {
        PlacementSet { placements }
    }
}

impl<'a> IntoIterator for &'a PlacementSet {
    type Item = &'a PlacedEntry;
    type IntoIter = std::slice::Iter<'a, PlacedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.placements.iter()
    }
}
