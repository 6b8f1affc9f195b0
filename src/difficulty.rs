//! Features of a puzzle that hint at how hard it is to solve by hand.

use itertools::Itertools;
use nanoserde::SerJson;
use rustc_hash::FxHashSet;

use crate::board::Board;
use crate::model::{Domino, PlacedDomino};
use crate::puzzle::Puzzle;

#[derive(Clone, Debug, PartialEq, Eq, SerJson)]
pub struct PuzzleFeatures {
    pub num_dominoes: usize,
    pub num_distinct_dominoes: usize,
    /// Lines that must stay dark.
    pub num_yellow_spots: usize,
    pub total_num_valid_domino_places: usize,
    pub total_candidate_boards: usize,
}

pub fn puzzle_features(puzzle: &Puzzle) -> PuzzleFeatures {
    PuzzleFeatures {
        num_dominoes: puzzle.dominoes().len(),
        num_distinct_dominoes: puzzle.dominoes().iter().unique().count(),
        num_yellow_spots: puzzle.lights().iter().filter(|&&light| light == 0).count(),
        total_num_valid_domino_places: puzzle
            .dominoes()
            .iter()
            .map(|&domino| num_valid_domino_places(puzzle, domino))
            .sum(),
        total_candidate_boards: num_candidate_boards(puzzle),
    }
}

/// Placements of `domino` that, alone on the board, light no line brighter
/// than the puzzle asks for.
pub fn valid_domino_places(puzzle: &Puzzle, domino: Domino) -> impl Iterator<Item = PlacedDomino> + '_ {
    domino
        .places(puzzle.n())
        .map(move |(row, col)| PlacedDomino::new(domino, col, row))
        .filter(move |&pd| {
            Board::with_dominoes(puzzle.n(), [pd]).is_some_and(|board| {
                board
                    .lights()
                    .iter()
                    .zip(puzzle.lights())
                    .all(|(light, target)| light <= target)
            })
        })
}

pub fn num_valid_domino_places(puzzle: &Puzzle, domino: Domino) -> usize {
    valid_domino_places(puzzle, domino).count()
}

/// Distinct boards assembled from one valid placement per domino, where the
/// placements do not collide. The boards need not solve the puzzle.
pub fn num_candidate_boards(puzzle: &Puzzle) -> usize {
    if puzzle.dominoes().is_empty() {
        return 1;
    }

    puzzle
        .dominoes()
        .iter()
        .map(|&domino| valid_domino_places(puzzle, domino).collect_vec())
        .multi_cartesian_product()
        .filter_map(|placed| Board::with_dominoes(puzzle.n(), placed))
        .collect::<FxHashSet<_>>()
        .len()
}
