//! Integration tests for crossword-link.
//!
//! These tests drive the complete pipeline from author text through packing and encoding to
//! decoding, grid reconstruction and solving, using the fixture files in `tests/fixtures`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crossword_link::codec::{self, CodecError};
use crossword_link::entry_list::{Entry, EntryList};
use crossword_link::errors::EntryError;
use crossword_link::grid::{self, Cell, Grids};
use crossword_link::packer::{self, EntryFate, PackError, MAX_PLACEMENTS};
use crossword_link::placement::PlacementSet;
use crossword_link::puzzle::{self, PuzzleError};
use crossword_link::session::SolveSession;

fn load_fixture(name: &str) -> EntryList {
    EntryList::load_from_path(format!("tests/fixtures/{name}")).expect("Failed to read fixture")
}

fn entries(keys: &[&str]) -> Vec<Entry> {
    keys.iter().map(|k| Entry::new(k, &format!("clue for {k}")).unwrap()).collect()
}

fn packed_set(entries: &[Entry], seed: u64) -> PlacementSet {
    let mut rng = StdRng::seed_from_u64(seed);
    packer::pack_with_rng(entries, &mut rng).unwrap().placement_set()
}

/// Orthogonally adjacent letter cells must belong to one word running along that axis.
fn assert_no_illegal_adjacency(grids: &Grids) {
    for y in 0..grids.height {
        for x in 0..grids.width {
            if grids.solution.get(x, y).map_or(true, Cell::is_void) {
                continue;
            }
            let here = grids.references.get(x, y).unwrap();
            if let Some(Cell::Letter(_)) = grids.solution.get(x + 1, y) {
                let right = grids.references.get(x + 1, y).unwrap();
                assert!(here.across.is_some() && here.across == right.across, "({x}, {y}) touches its right neighbour");
            }
            if let Some(Cell::Letter(_)) = grids.solution.get(x, y + 1) {
                let below = grids.references.get(x, y + 1).unwrap();
                assert!(here.down.is_some() && here.down == below.down, "({x}, {y}) touches the cell below");
            }
        }
    }
}

#[cfg(test)]
mod fixtures {
    use super::*;

    #[test]
    fn test_animals_fixture_parses() {
        let list = load_fixture("animals.txt");

        assert_eq!(list.entries.len(), 10);
        assert_eq!(list.entries[0].key(), "CAT");
        let rejected: Vec<usize> = list.rejected.iter().map(|r| r.line_number).collect();
        assert_eq!(rejected, vec![15, 16, 17]);
        assert!(matches!(list.rejected[0].error, EntryError::MissingSeparator { .. }));
        assert!(matches!(list.rejected[1].error, EntryError::InvalidKeyChar { invalid_char: '-', .. }));
        assert_eq!(list.rejected[2].error, EntryError::EmptyKey);
    }

    #[test]
    fn test_missing_fixture_is_an_io_error() {
        let err = EntryList::load_from_path("tests/fixtures/does_not_exist.txt").unwrap_err();
        assert!(err.to_string().contains("does_not_exist.txt"));
    }
}

#[cfg(test)]
mod round_trip {
    use super::*;

    #[test]
    fn test_decode_inverts_encode_for_packed_layouts() {
        for fixture in ["animals.txt", "many_entries.txt"] {
            let list = load_fixture(fixture);
            for seed in 0..20 {
                let set = packed_set(&list.entries, seed);
                let token = codec::encode(&set).unwrap();
                assert_eq!(codec::decode(&token).unwrap(), set, "{fixture}, seed {seed}");
            }
        }
    }

    #[test]
    fn test_share_link_round_trip() {
        let list = load_fixture("animals.txt");
        let generated = puzzle::generate_from_list(list, &mut StdRng::seed_from_u64(3)).unwrap();
        let url = puzzle::share_url("https://example.com/crosswords", &generated.token);

        let loaded = puzzle::load(&url).unwrap();
        assert_eq!(loaded.placements, generated.placements);
        assert_eq!(generated.rejected.len(), 3);
        assert_eq!(generated.placements.len() + generated.dropped.len(), 10);
    }

    #[test]
    fn test_share_link_with_percent_escaped_code() {
        let list = load_fixture("animals.txt");
        let generated = puzzle::generate_from_list(list, &mut StdRng::seed_from_u64(3)).unwrap();
        let (first, rest) = generated.token.split_at(1);
        let url = format!("https://example.com/crosswords?p=%{:02X}{rest}", first.as_bytes()[0]);

        let loaded = puzzle::load(&url).unwrap();
        assert_eq!(loaded.placements, generated.placements);

        let err = puzzle::load(&format!("https://example.com/crosswords?p=%C3{rest}")).unwrap_err();
        assert_eq!(err.code(), "C010");
    }

    #[test]
    fn test_unicode_clues_survive() {
        let entries = vec![
            Entry::new("çiçek", "Bahçede açar 🌷").unwrap(),
            Entry::new("KEÇİ", "Dağ hayvanı").unwrap(),
        ];
        let set = packed_set(&entries, 1);
        let decoded = codec::decode(&codec::encode(&set).unwrap()).unwrap();

        assert_eq!(decoded, set);
        assert!(decoded.iter().any(|p| p.clue == "Bahçede açar 🌷"));
    }
}

#[cfg(test)]
mod scenarios {
    use super::*;

    #[test]
    fn test_two_crossing_words() {
        let entries = entries(&["CAT", "CAR"]);
        for seed in 0..10 {
            let set = packed_set(&entries, seed);
            assert_eq!(set.len(), 2);

            let (a, b) = (&set.placements[0], &set.placements[1]);
            assert_ne!(a.direction, b.direction);
            let shared: Vec<_> = a.cells().filter(|c| b.cells().any(|d| d == *c)).collect();
            assert_eq!(shared.len(), 1, "seed {seed}: exactly one crossing with a matching letter");

            let token = codec::encode(&set).unwrap();
            assert_eq!(codec::decode(&token).unwrap(), set);
        }
    }

    #[test]
    fn test_words_without_shared_letters() {
        let entries = entries(&["ZEBRA", "QUICK"]);
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let layout = packer::pack_with_rng(&entries, &mut rng).unwrap();

            assert_eq!(layout.placements.len(), 1);
            assert_eq!(layout.dropped().len(), 1);
        }
    }

    #[test]
    fn test_tampered_word_only_changes_that_word() {
        let entries = entries(&["CAT", "CAR", "ACT"]);
        let set = packed_set(&entries, 4);
        let mut bytes = codec::to_bytes(&set).unwrap();

        // first byte of the first word
        let offset = 1 + 3 * set.len();
        bytes[offset] = if bytes[offset] == b'Q' { b'X' } else { b'Q' };
        let tampered = codec::decode(&URL_SAFE_NO_PAD.encode(&bytes)).unwrap();

        assert_eq!(tampered.len(), set.len());
        assert_ne!(tampered.placements[0].word, set.placements[0].word);
        assert_eq!(tampered.placements[0].clue, set.placements[0].clue);
        assert_eq!(tampered.placements[1..], set.placements[1..]);
    }

    #[test]
    fn test_any_single_character_edit_fails_cleanly() {
        let entries = entries(&["CAT", "CAR", "ACT", "TAR"]);
        let token = codec::encode(&packed_set(&entries, 2)).unwrap();

        for i in 0..token.len() {
            for replacement in ['A', 'z', '_', '-', '0', '!', '='] {
                let mut edited: Vec<char> = token.chars().collect();
                edited[i] = replacement;
                let edited: String = edited.into_iter().collect();
                // must return, never panic
                if let Ok(set) = codec::decode(&edited) {
                    let _ = grid::reconstruct(&set);
                }
            }
        }

        let cut = &token[..token.len() / 2];
        assert!(codec::decode(cut).is_err());
    }

    #[test]
    fn test_empty_input_has_no_placements() {
        let err = puzzle::generate("# nothing but a comment\n").unwrap_err();
        assert_eq!(err, PuzzleError::Pack(PackError::NoPlacements { entries: 0 }));
    }

    #[test]
    fn test_single_entry_is_placed() {
        let entries = entries(&["LONELY"]);
        let set = packed_set(&entries, 0);

        assert_eq!(set.len(), 1);
        let grids = grid::reconstruct(&set);
        assert_eq!(grids.width * grids.height, 6);
    }
}

#[cfg(test)]
mod limits {
    use super::*;

    #[test]
    fn test_many_entries_respect_the_ceiling() {
        let list = load_fixture("many_entries.txt");
        assert_eq!(list.entries.len(), 60);

        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let layout = packer::pack_with_rng(&list.entries, &mut rng).unwrap();

            assert!(layout.placements.len() <= MAX_PLACEMENTS);
            let placed = layout.fates.iter().filter(|f| matches!(f, EntryFate::Placed(_))).count();
            assert_eq!(placed, layout.placements.len());
            assert_eq!(placed + layout.dropped().len() + layout.truncated().len(), 60);
        }
    }

    #[test]
    fn test_coordinates_fit_one_byte() {
        let list = load_fixture("many_entries.txt");
        for seed in 0..10 {
            let set = packed_set(&list.entries, seed);
            for p in &set {
                let (x_end, y_end) = p.extent();
                assert!(x_end <= 255 && y_end <= 255);
            }
        }
    }

    #[test]
    fn test_oversized_header_is_rejected() {
        let err = codec::decode(&URL_SAFE_NO_PAD.encode([3u8, 0, 0])).unwrap_err();
        assert_eq!(err, CodecError::Truncated { needed: 10, available: 3 });
    }
}

#[cfg(test)]
mod grid_consistency {
    use super::*;

    #[test]
    fn test_references_agree_with_solution() {
        let list = load_fixture("many_entries.txt");
        for seed in 0..10 {
            let set = packed_set(&list.entries, seed);
            let grids = grid::reconstruct(&set);

            for y in 0..grids.height {
                for x in 0..grids.width {
                    let cell = grids.solution.get(x, y).unwrap();
                    let refs = grids.references.get(x, y).unwrap();
                    assert_eq!(cell.is_void(), refs.is_empty(), "seed {seed}, ({x}, {y})");
                }
            }

            for (i, p) in set.iter().enumerate() {
                for ((x, y), letter) in p.cells() {
                    assert_eq!(grids.solution.get(x, y), Some(Cell::Letter(letter)));
                    assert_eq!(grids.references.get(x, y).unwrap().get(p.direction), Some(i));
                }
            }
        }
    }

    #[test]
    fn test_layout_is_cropped_to_its_words() {
        let list = load_fixture("animals.txt");
        for seed in 0..10 {
            let grids = grid::reconstruct(&packed_set(&list.entries, seed));

            let first_row_used = (0..grids.width).any(|x| !grids.solution.get(x, 0).unwrap().is_void());
            let first_col_used = (0..grids.height).any(|y| !grids.solution.get(0, y).unwrap().is_void());
            assert!(first_row_used && first_col_used, "seed {seed}");
        }
    }

    #[test]
    fn test_no_illegal_adjacency() {
        for fixture in ["animals.txt", "many_entries.txt"] {
            let list = load_fixture(fixture);
            for seed in 0..25 {
                assert_no_illegal_adjacency(&grid::reconstruct(&packed_set(&list.entries, seed)));
            }
        }
    }
}

#[cfg(test)]
mod solving {
    use super::*;

    #[test]
    fn test_typing_every_answer_completes_the_puzzle() {
        let list = load_fixture("animals.txt");
        let generated = puzzle::generate_from_list(list, &mut StdRng::seed_from_u64(8)).unwrap();
        let loaded = puzzle::load(&generated.token).unwrap();
        let mut session = SolveSession::new(&loaded);

        let mut solved = Vec::new();
        for (i, p) in loaded.placements.iter().enumerate() {
            if session.is_solved(i) {
                continue;
            }
            for ((x, y), letter) in p.cells() {
                if session.is_cell_solved(x, y) {
                    continue;
                }
                // typing may already have moved the cursor here
                let on_target = session.cursor().map(|c| (c.x, c.y, c.direction)) == Some((x, y, p.direction));
                if !on_target {
                    session.select_cell(x, y);
                    if session.active_placement() != Some(i) {
                        session.select_cell(x, y);
                    }
                }
                assert_eq!(session.active_placement(), Some(i));
                solved.extend(session.type_letter(letter).unwrap().newly_solved);
            }
        }

        solved.sort_unstable();
        assert_eq!(solved, (0..loaded.placements.len()).collect::<Vec<_>>());
        assert!(session.is_complete());
    }
}
