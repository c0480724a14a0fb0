//! Rebuild the solution and reference grids from a placement set.
//!
//! Reconstruction only looks at the placements themselves (no stored crop metadata), so a
//! decoder that has nothing but a puzzle code can still lay the grid out. It is pure and
//! deterministic: the same placement set always gives the same grids.

use crate::placement::{Direction, PlacementSet};
use log::warn;
use serde::Serialize;

/// One cell of the solution grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(untagged)]
pub enum Cell {
    /// Not part of any word.
    #[default]
    Void,
    /// Part of at least one word; holds the answer letter.
    Letter(char),
}

impl Cell {
    #[must_use]
    pub fn is_void(self) -> bool {
        self == Cell::Void
    }

    #[must_use]
    pub fn letter(self) -> Option<char> {
        match self {
            Cell::Void => None,
            Cell::Letter(c) => Some(c),
        }
    }
}

/// Which placements run through a cell, per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CellRefs {
    pub across: Option<usize>,
    pub down: Option<usize>,
}

impl CellRefs {
    #[must_use]
    pub fn get(self, direction: Direction) -> Option<usize> {
        match direction {
            Direction::Across => self.across,
            Direction::Down => self.down,
        }
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.across.is_none() && self.down.is_none()
    }
}

/// Dense row-major 2-D array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Copy + Default> Grid<T> {
    pub(crate) fn new(width: usize, height: usize) -> Self {
        Grid { width, height, cells: vec![T::default(); width * height] }
    }

    /// `None` outside the grid.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x])
    }

    /// Callers must stay in bounds.
    pub(crate) fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        &mut self.cells[y * self.width + x]
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks(0) panics, and an empty grid has no rows anyway
        self.cells.chunks(self.width.max(1))
    }
}

/// Everything a solving surface needs to lay out and drive a puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grids {
    pub width: usize,
    pub height: usize,
    pub solution: Grid<Cell>,
    pub references: Grid<CellRefs>,
}

/// Build the solution and reference grids for `set`.
#[must_use]
pub fn reconstruct(set: &PlacementSet) -> Grids {
    let (width, height) = set.iter().fold((0, 0), |(w, h), p| {
        let (x_end, y_end) = p.extent();
        (w.max(x_end), h.max(y_end))
    });

    let mut solution = Grid::new(width, height);
    let mut references = Grid::new(width, height);

    for (index, p) in set.iter().enumerate() {
        for ((x, y), letter) in p.cells() {
            let cell = solution.get_mut(x, y);
            if let Cell::Letter(existing) = *cell {
                if existing != letter {
                    warn!("Placement {index} disagrees with a crossing at ({x}, {y}): {existing} vs {letter}");
                }
            }
            *cell = Cell::Letter(letter);

            let refs: &mut CellRefs = references.get_mut(x, y);
            match p.direction {
                Direction::Across => refs.across = Some(index),
                Direction::Down => refs.down = Some(index),
            }
        }
    }

    Grids { width, height, solution, references }
}
