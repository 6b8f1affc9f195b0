use std::collections::BTreeSet;

use itertools::Itertools;
use log::debug;
use rustc_hash::FxHashMap;

use crate::board::Board;
use crate::encode::{decode_board, domino_count_shift, SIZE};
use crate::enumerate::{all_boards_up_to, all_boards_with_dominoes};
use crate::model::{Domino, ALL_DOMINOES};
use crate::puzzle::Puzzle;

/// Every board that reproduces the puzzle's lights.
///
/// With `allow_fewer_pieces` any sub-multiset of the dominoes may be used,
/// the empty one included; otherwise every domino must be placed.
pub fn solve(puzzle: &Puzzle, allow_fewer_pieces: bool) -> Vec<Board> {
    let multisets: BTreeSet<Vec<Domino>> = if allow_fewer_pieces {
        puzzle
            .dominoes()
            .iter()
            .copied()
            .powerset()
            .map(|subset| subset.into_iter().sorted().collect_vec())
            .collect()
    } else {
        BTreeSet::from([puzzle.dominoes().to_vec()])
    };

    multisets
        .iter()
        .flat_map(|dominoes| all_boards_with_dominoes(puzzle.n(), dominoes))
        .filter(|board| puzzle.is_solved_by(board))
        .collect()
}

pub fn has_unique_solution(puzzle: &Puzzle, allow_fewer_pieces: bool) -> bool {
    solve(puzzle, allow_fewer_pieces).len() == 1
}

/// Every 4×4 board with up to some number of pieces, grouped by packed
/// domino multiset, so a puzzle is solved by lookup instead of search.
pub struct PuzzleTable {
    max_pieces: usize,
    by_dominoes: FxHashMap<u32, Vec<(u32, u64)>>,
}

impl PuzzleTable {
    pub fn new(max_pieces: usize) -> Self {
        let mut by_dominoes = FxHashMap::<u32, Vec<(u32, u64)>>::default();
        for packed in all_boards_up_to(max_pieces) {
            by_dominoes
                .entry(packed.dominoes)
                .or_default()
                .push((packed.lights, packed.board));
        }

        debug!(
            "puzzle table up to {} pieces: {} domino multisets",
            max_pieces,
            by_dominoes.len()
        );

        Self {
            max_pieces,
            by_dominoes,
        }
    }

    pub fn max_pieces(&self) -> usize {
        self.max_pieces
    }

    /// Packed boards with exactly this domino multiset and these lights.
    pub fn boards(&self, lights: u32, dominoes: u32) -> impl Iterator<Item = u64> + '_ {
        self.by_dominoes
            .get(&dominoes)
            .into_iter()
            .flatten()
            .filter(move |&&(l, _)| l == lights)
            .map(|&(_, board)| board)
    }
}

/// Every packed multiset contained in `dominoes`, itself and the empty one
/// included.
fn sub_multisets(dominoes: u32) -> impl Iterator<Item = u32> {
    (0..ALL_DOMINOES.len())
        .map(|i| 0..=dominoes >> domino_count_shift(i) & 0xF)
        .multi_cartesian_product()
        .map(|counts| {
            counts
                .into_iter()
                .enumerate()
                .fold(0, |acc, (i, count)| acc | count << domino_count_shift(i))
        })
}

/// [`solve`] answered from a [`PuzzleTable`].
///
/// `None` when the table does not cover the puzzle: boards other than 4×4,
/// or more pieces than the table was built with.
pub fn quick_solve(
    table: &PuzzleTable,
    puzzle: &Puzzle,
    allow_fewer_pieces: bool,
) -> Option<Vec<Board>> {
    if puzzle.n() != SIZE || puzzle.dominoes().len() > table.max_pieces() {
        return None;
    }

    let lights = puzzle.lights_int();
    let dominoes = puzzle.dominoes_int();
    let multisets = if allow_fewer_pieces {
        sub_multisets(dominoes).collect_vec()
    } else {
        vec![dominoes]
    };

    let boards = multisets
        .into_iter()
        .flat_map(|multiset| table.boards(lights, multiset))
        .map(decode_board)
        .collect();
    Some(boards)
}

pub fn quick_has_unique_solution(
    table: &PuzzleTable,
    puzzle: &Puzzle,
    allow_fewer_pieces: bool,
) -> Option<bool> {
    quick_solve(table, puzzle, allow_fewer_pieces).map(|boards| boards.len() == 1)
}

#[cfg(test)]
mod tests {
    use rand::seq::SliceRandom;

    use super::*;
    use crate::encode::{encode_board, encode_dominoes};
    use crate::enumerate::all_boards;
    use crate::fixtures::{EXAMPLE_PUZZLE, FEWER_PIECES_PUZZLE, THREE_PIECE_PUZZLE, UNIQUE_PUZZLE};
    use crate::puzzle::decode_puzzle;

    fn packed_set(boards: &[Board]) -> BTreeSet<u64> {
        boards.iter().map(encode_board).collect()
    }

    #[test]
    fn fixtures() {
        for (json, exact, fewer) in [
            (EXAMPLE_PUZZLE, 1, 1),
            (UNIQUE_PUZZLE, 1, 1),
            (FEWER_PIECES_PUZZLE, 1, 3),
            (THREE_PIECE_PUZZLE, 1, 1),
        ] {
            let puzzle = Puzzle::from_json_str(json).unwrap();
            assert_eq!(solve(&puzzle, false).len(), exact);
            let solutions = solve(&puzzle, true);
            assert_eq!(solutions.len(), fewer);
            assert!(solutions.iter().any(|b| Some(b) == puzzle.solution()));
        }
    }

    #[test]
    fn fewer_pieces_break_uniqueness() {
        let puzzle = Puzzle::from_json_str(FEWER_PIECES_PUZZLE).unwrap();
        assert!(has_unique_solution(&puzzle, false));
        assert!(!has_unique_solution(&puzzle, true));

        // the full-set answer survives when fewer pieces are allowed
        let exact = solve(&puzzle, false);
        let fewer = solve(&puzzle, true);
        assert!(fewer.contains(&exact[0]));
        assert_eq!(exact[0].placed_dominoes().len(), 4);
        assert_eq!(puzzle.solution().map(|b| b.placed_dominoes().len()), Some(3));
    }

    #[test]
    fn sub_multisets_of_packed_counts() {
        let dominoes = encode_dominoes([ALL_DOMINOES[2], ALL_DOMINOES[6], ALL_DOMINOES[6]]);
        let subs = sub_multisets(dominoes).collect_vec();
        assert_eq!(subs.len(), 2 * 3);
        assert!(subs.contains(&0));
        assert!(subs.contains(&dominoes));
        assert_eq!(sub_multisets(0).collect_vec(), vec![0]);
    }

    #[test]
    fn quick_solve_agrees() {
        let mut rng = rand::thread_rng();
        let table = PuzzleTable::new(3);

        for num_pieces in 1..=3 {
            let boards = all_boards(num_pieces);
            for packed in boards.choose_multiple(&mut rng, 40) {
                let puzzle = decode_puzzle(packed.lights, packed.dominoes);
                for allow_fewer_pieces in [false, true] {
                    let slow = solve(&puzzle, allow_fewer_pieces);
                    let quick = quick_solve(&table, &puzzle, allow_fewer_pieces).unwrap();
                    assert_eq!(slow.len(), quick.len());
                    assert_eq!(packed_set(&slow), packed_set(&quick));
                    assert!(packed_set(&quick).contains(&packed.board));
                }
            }
        }
    }

    #[test]
    fn quick_solve_four_pieces() {
        let table = PuzzleTable::new(4);
        assert_eq!(table.max_pieces(), 4);

        for json in [EXAMPLE_PUZZLE, UNIQUE_PUZZLE, FEWER_PIECES_PUZZLE, THREE_PIECE_PUZZLE] {
            let puzzle = Puzzle::from_json_str(json).unwrap();
            for allow_fewer_pieces in [false, true] {
                assert_eq!(
                    packed_set(&quick_solve(&table, &puzzle, allow_fewer_pieces).unwrap()),
                    packed_set(&solve(&puzzle, allow_fewer_pieces))
                );
            }
        }

        let puzzle = Puzzle::from_json_str(FEWER_PIECES_PUZZLE).unwrap();
        assert_eq!(quick_has_unique_solution(&table, &puzzle, false), Some(true));
        assert_eq!(quick_has_unique_solution(&table, &puzzle, true), Some(false));
    }

    #[test]
    fn other_sizes_are_not_tabled() {
        let table = PuzzleTable::new(1);
        let puzzle = Puzzle::new(3, vec![1, 0, 0, 1, 1, 0], vec![ALL_DOMINOES[0]]);
        assert!(quick_solve(&table, &puzzle, false).is_none());
        assert_eq!(solve(&puzzle, false).len(), 1);
    }

    #[test]
    fn too_many_pieces_for_table() {
        let table = PuzzleTable::new(1);
        let puzzle = Puzzle::from_json_str(THREE_PIECE_PUZZLE).unwrap();
        for allow_fewer_pieces in [false, true] {
            assert!(quick_solve(&table, &puzzle, allow_fewer_pieces).is_none());
            assert_eq!(quick_has_unique_solution(&table, &puzzle, allow_fewer_pieces), None);
        }
        assert_eq!(solve(&puzzle, false).len(), 1);

        let table = PuzzleTable::new(3);
        assert_eq!(quick_solve(&table, &puzzle, false).map(|boards| boards.len()), Some(1));
    }
}
