//! Interactive solving state for a loaded puzzle.
//!
//! A [`SolveSession`] owns everything a solving surface mutates: the letters typed so far, the
//! cursor, and which placements are already solved. The surface itself only renders.

use crate::grid::{Cell, CellRefs, Grid};
use crate::placement::Direction;
use crate::puzzle::LoadedPuzzle;
use log::debug;

/// The selected cell and the direction typing advances in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub x: usize,
    pub y: usize,
    pub direction: Direction,
}

/// What a keystroke changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeOutcome {
    /// Placements that became solved with this letter, in placement order.
    pub newly_solved: Vec<usize>,
    /// Every placement is solved.
    pub complete: bool,
}

/// Progress of one solver through a loaded puzzle.
#[derive(Debug, Clone)]
pub struct SolveSession<'a> {
    puzzle: &'a LoadedPuzzle,
    typed: Grid<Option<char>>,
    solved_cells: Grid<bool>,
    solved: Vec<bool>,
    cursor: Option<Cursor>,
}

impl<'a> SolveSession<'a> {
    #[must_use]
    pub fn new(puzzle: &'a LoadedPuzzle) -> Self {
        let (width, height) = (puzzle.grids.width, puzzle.grids.height);
        SolveSession {
            puzzle,
            typed: Grid::new(width, height),
            solved_cells: Grid::new(width, height),
            solved: vec![false; puzzle.placements.len()],
            cursor: None,
        }
    }

    #[must_use]
    pub fn cursor(&self) -> Option<Cursor> {
        self.cursor
    }

    /// The letter typed into a cell, if any.
    #[must_use]
    pub fn letter_at(&self, x: usize, y: usize) -> Option<char> {
        self.typed.get(x, y).flatten()
    }

    #[must_use]
    pub fn is_cell_solved(&self, x: usize, y: usize) -> bool {
        self.solved_cells.get(x, y).unwrap_or(false)
    }

    #[must_use]
    pub fn is_solved(&self, placement: usize) -> bool {
        self.solved.get(placement).copied().unwrap_or(false)
    }

    /// True once every placement is solved (trivially true for a puzzle with no placements).
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.solved.iter().all(|&s| s)
    }

    /// Click or tap on a cell.
    ///
    /// A fresh cell is selected across when an across word runs through it, down otherwise.
    /// Selecting the selected cell again switches to down if possible and deselects after that.
    /// Void and solved cells clear the selection.
    pub fn select_cell(&mut self, x: usize, y: usize) -> Option<Cursor> {
        let Some(refs) = self.selectable_refs(x, y) else {
            self.cursor = None;
            return None;
        };

        self.cursor = match self.cursor {
            Some(current) if (current.x, current.y) == (x, y) => match current.direction {
                Direction::Across if refs.down.is_some() => Some(Cursor { direction: Direction::Down, ..current }),
                _ => None,
            },
            _ => {
                let direction = if refs.across.is_some() { Direction::Across } else { Direction::Down };
                Some(Cursor { x, y, direction })
            }
        };
        self.cursor
    }

    /// Arrow-key movement: turn to `direction` and step `delta` cells, hopping over solved ones.
    /// Running into a void cell or off the grid clears the selection.
    pub fn move_cursor(&mut self, direction: Direction, delta: isize) -> Option<Cursor> {
        let current = self.cursor?;
        let mut position = (current.x, current.y);

        loop {
            let next = step(position, direction, delta).filter(|&(x, y)| {
                matches!(self.puzzle.grids.solution.get(x, y), Some(Cell::Letter(_)))
            });
            let Some((x, y)) = next else {
                self.cursor = None;
                return None;
            };
            position = (x, y);
            if !self.is_cell_solved(x, y) {
                break;
            }
        }

        let (x, y) = position;
        let refs = self.puzzle.grids.references.get(x, y).unwrap_or_default();
        // a cell only crossed by the other direction turns the cursor
        let direction = if refs.get(direction).is_some() { direction } else { direction.perpendicular() };
        self.cursor = Some(Cursor { x, y, direction });
        self.cursor
    }

    /// Write a letter into the selected cell and advance.
    ///
    /// Returns `None` (and changes nothing) without a selection or for a non-letter.
    pub fn type_letter(&mut self, letter: char) -> Option<TypeOutcome> {
        let cursor = self.cursor?;
        if !letter.is_alphabetic() {
            return None;
        }
        let letter = letter.to_uppercase().next().unwrap_or(letter);
        *self.typed.get_mut(cursor.x, cursor.y) = Some(letter);

        let refs = self.puzzle.grids.references.get(cursor.x, cursor.y).unwrap_or_default();
        let newly_solved: Vec<usize> = [refs.across, refs.down]
            .into_iter()
            .flatten()
            .filter(|&index| self.try_solve(index))
            .collect();

        self.move_cursor(cursor.direction, 1);

        Some(TypeOutcome { newly_solved, complete: self.is_complete() })
    }

    /// Clear the selected cell; on an already empty cell step back one first.
    pub fn backspace(&mut self) {
        let Some(cursor) = self.cursor else { return };
        if self.letter_at(cursor.x, cursor.y).is_none() {
            self.move_cursor(cursor.direction, -1);
        }
        if let Some(cursor) = self.cursor {
            *self.typed.get_mut(cursor.x, cursor.y) = None;
        }
    }

    /// Index of the placement the cursor is in.
    #[must_use]
    pub fn active_placement(&self) -> Option<usize> {
        let cursor = self.cursor?;
        self.puzzle.grids.references.get(cursor.x, cursor.y)?.get(cursor.direction)
    }

    #[must_use]
    pub fn active_clue(&self) -> Option<&'a str> {
        let puzzle = self.puzzle;
        let placement = puzzle.placements.get(self.active_placement()?)?;
        Some(placement.clue.as_str())
    }

    /// Every cell of the active placement, selected cell included.
    #[must_use]
    pub fn highlighted_cells(&self) -> Vec<(usize, usize)> {
        self.active_placement()
            .and_then(|index| self.puzzle.placements.get(index))
            .map(|p| p.cells().map(|(cell, _)| cell).collect())
            .unwrap_or_default()
    }

    fn selectable_refs(&self, x: usize, y: usize) -> Option<CellRefs> {
        let refs = self.puzzle.grids.references.get(x, y)?;
        (!refs.is_empty() && !self.is_cell_solved(x, y)).then_some(refs)
    }

    fn try_solve(&mut self, index: usize) -> bool {
        if self.is_solved(index) {
            return false;
        }
        let puzzle = self.puzzle;
        let Some(placement) = puzzle.placements.get(index) else {
            return false;
        };
        if !placement.cells().all(|((x, y), letter)| self.letter_at(x, y) == Some(letter)) {
            return false;
        }

        for ((x, y), _) in placement.cells() {
            *self.solved_cells.get_mut(x, y) = true;
        }
        self.solved[index] = true;
        debug!("Solved placement {index} ({})", placement.word);
        true
    }
}

fn step((x, y): (usize, usize), direction: Direction, delta: isize) -> Option<(usize, usize)> {
    match direction {
        Direction::Across => Some((x.checked_add_signed(delta)?, y)),
        Direction::Down => Some((x, y.checked_add_signed(delta)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid;
    use crate::placement::{PlacedEntry, PlacementSet};

    //   B
    // C A T
    //   D
    fn crossing() -> LoadedPuzzle {
        let placements: PlacementSet = vec![
            PlacedEntry { x: 0, y: 1, direction: Direction::Across, word: "CAT".into(), clue: "Feline".into() },
            PlacedEntry { x: 1, y: 0, direction: Direction::Down, word: "BAD".into(), clue: "Not good".into() },
        ]
        .into();
        let grids = grid::reconstruct(&placements);
        LoadedPuzzle { placements, grids }
    }

    fn type_word(session: &mut SolveSession<'_>, word: &str) -> Vec<TypeOutcome> {
        word.chars().filter_map(|c| session.type_letter(c)).collect()
    }

    #[test]
    fn test_select_prefers_across() {
        let puzzle = crossing();
        let mut session = SolveSession::new(&puzzle);

        let cursor = session.select_cell(1, 1).unwrap();
        assert_eq!(cursor.direction, Direction::Across);
        assert_eq!(session.active_placement(), Some(0));
        assert_eq!(session.active_clue(), Some("Feline"));
    }

    #[test]
    fn test_reselect_cycles_then_deselects() {
        let puzzle = crossing();
        let mut session = SolveSession::new(&puzzle);

        session.select_cell(1, 1);
        assert_eq!(session.select_cell(1, 1).map(|c| c.direction), Some(Direction::Down));
        assert_eq!(session.active_clue(), Some("Not good"));
        assert_eq!(session.select_cell(1, 1), None);
        assert_eq!(session.active_clue(), None);
    }

    #[test]
    fn test_reselect_without_down_deselects() {
        let puzzle = crossing();
        let mut session = SolveSession::new(&puzzle);

        session.select_cell(0, 1);
        assert_eq!(session.select_cell(0, 1), None);
    }

    #[test]
    fn test_select_down_only_cell() {
        let puzzle = crossing();
        let mut session = SolveSession::new(&puzzle);

        assert_eq!(session.select_cell(1, 0).map(|c| c.direction), Some(Direction::Down));
        assert_eq!(session.select_cell(1, 0), None);
    }

    #[test]
    fn test_select_void_or_outside_clears() {
        let puzzle = crossing();
        let mut session = SolveSession::new(&puzzle);

        session.select_cell(0, 1);
        assert_eq!(session.select_cell(0, 0), None);
        assert_eq!(session.cursor(), None);
        assert_eq!(session.select_cell(9, 9), None);
    }

    #[test]
    fn test_typing_advances_and_solves() {
        let puzzle = crossing();
        let mut session = SolveSession::new(&puzzle);
        session.select_cell(0, 1);

        let outcomes = type_word(&mut session, "ca");
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.newly_solved.is_empty()));
        assert_eq!(session.letter_at(0, 1), Some('C'));
        assert_eq!(session.cursor(), Some(Cursor { x: 2, y: 1, direction: Direction::Across }));

        let last = session.type_letter('t').unwrap();
        assert_eq!(last.newly_solved, vec![0]);
        assert!(!last.complete);
        assert!(session.is_solved(0));
        assert!(session.is_cell_solved(1, 1));
        // stepped off the right edge
        assert_eq!(session.cursor(), None);
    }

    #[test]
    fn test_wrong_letters_do_not_solve() {
        let puzzle = crossing();
        let mut session = SolveSession::new(&puzzle);
        session.select_cell(0, 1);

        let outcomes = type_word(&mut session, "COT");
        assert!(outcomes.iter().all(|o| o.newly_solved.is_empty()));
        assert!(!session.is_solved(0));
    }

    #[test]
    fn test_non_letters_are_ignored() {
        let puzzle = crossing();
        let mut session = SolveSession::new(&puzzle);

        assert_eq!(session.type_letter('C'), None);
        session.select_cell(0, 1);
        assert_eq!(session.type_letter('1'), None);
        assert_eq!(session.letter_at(0, 1), None);
        assert_eq!(session.cursor().map(|c| c.x), Some(0));
    }

    #[test]
    fn test_cursor_skips_solved_cells() {
        let puzzle = crossing();
        let mut session = SolveSession::new(&puzzle);
        session.select_cell(0, 1);
        type_word(&mut session, "CAT");

        session.select_cell(1, 0);
        session.type_letter('B');
        // (1, 1) belongs to the solved CAT
        assert_eq!(session.cursor(), Some(Cursor { x: 1, y: 2, direction: Direction::Down }));

        let outcome = session.type_letter('D').unwrap();
        assert_eq!(outcome.newly_solved, vec![1]);
        assert!(outcome.complete);
        assert!(session.is_complete());
    }

    #[test]
    fn test_solved_cells_cannot_be_selected() {
        let puzzle = crossing();
        let mut session = SolveSession::new(&puzzle);
        session.select_cell(0, 1);
        type_word(&mut session, "CAT");

        assert_eq!(session.select_cell(2, 1), None);
        assert_eq!(session.select_cell(1, 1), None);
    }

    #[test]
    fn test_crossing_letter_solves_other_direction() {
        let puzzle = crossing();
        let mut session = SolveSession::new(&puzzle);
        session.select_cell(1, 0);
        session.type_letter('B');
        session.select_cell(1, 2);
        session.type_letter('D');

        session.select_cell(0, 1);
        let outcomes = type_word(&mut session, "CA");
        assert_eq!(outcomes[1].newly_solved, vec![1]);

        let last = session.type_letter('T').unwrap();
        assert_eq!(last.newly_solved, vec![0]);
        assert!(last.complete);
    }

    #[test]
    fn test_backspace_clears_then_steps_back() {
        let puzzle = crossing();
        let mut session = SolveSession::new(&puzzle);
        session.select_cell(0, 1);
        session.type_letter('C');

        // (1, 1) is empty: step back to (0, 1) and clear it
        session.backspace();
        assert_eq!(session.cursor().map(|c| (c.x, c.y)), Some((0, 1)));
        assert_eq!(session.letter_at(0, 1), None);

        session.type_letter('C');
        session.select_cell(0, 1);
        session.backspace();
        assert_eq!(session.letter_at(0, 1), None);
        assert_eq!(session.cursor().map(|c| (c.x, c.y)), Some((0, 1)));
    }

    #[test]
    fn test_backspace_at_word_start_deselects() {
        let puzzle = crossing();
        let mut session = SolveSession::new(&puzzle);
        session.select_cell(0, 1);

        session.backspace();
        assert_eq!(session.cursor(), None);
    }

    #[test]
    fn test_arrow_keys() {
        let puzzle = crossing();
        let mut session = SolveSession::new(&puzzle);
        session.select_cell(0, 1);

        assert_eq!(
            session.move_cursor(Direction::Across, 1),
            Some(Cursor { x: 1, y: 1, direction: Direction::Across })
        );
        assert_eq!(
            session.move_cursor(Direction::Down, -1),
            Some(Cursor { x: 1, y: 0, direction: Direction::Down })
        );
        assert_eq!(session.move_cursor(Direction::Down, -1), None);
        assert_eq!(session.move_cursor(Direction::Down, 1), None);
    }

    #[test]
    fn test_arrow_onto_other_direction_turns() {
        let puzzle = crossing();
        let mut session = SolveSession::new(&puzzle);
        session.select_cell(1, 1);

        // (1, 2) is only crossed by the down word
        assert_eq!(
            session.move_cursor(Direction::Down, 1),
            Some(Cursor { x: 1, y: 2, direction: Direction::Down })
        );
        assert_eq!(session.move_cursor(Direction::Across, 1), None);
    }

    #[test]
    fn test_highlighted_cells() {
        let puzzle = crossing();
        let mut session = SolveSession::new(&puzzle);

        assert!(session.highlighted_cells().is_empty());
        session.select_cell(2, 1);
        assert_eq!(session.highlighted_cells(), vec![(0, 1), (1, 1), (2, 1)]);
        session.select_cell(1, 2);
        assert_eq!(session.highlighted_cells(), vec![(1, 0), (1, 1), (1, 2)]);
    }

    #[test]
    fn test_empty_puzzle_is_complete() {
        let placements = PlacementSet::default();
        let grids = grid::reconstruct(&placements);
        let puzzle = LoadedPuzzle { placements, grids };
        let mut session = SolveSession::new(&puzzle);

        assert!(session.is_complete());
        assert_eq!(session.select_cell(0, 0), None);
    }
}
