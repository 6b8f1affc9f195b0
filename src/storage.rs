//! Puzzles on disk, as JSON.
//!
//! ```json
//! {"n": 4, "lights": [2, 2, 1, 2, 2, 2, 0, 1], "dominoes": [7, 1, 0, 4],
//!  "initial_placed_dominoes": [{"domino": 7, "i": 0, "j": 0}, ...],
//!  "solution": {"values": [[2, 0, 0, 1], ...], "placed_dominoes": [...]}}
//! ```
//!
//! `domino` is an index into [`ALL_DOMINOES`], `i` the column and `j` the row.
//! Loading checks the file against itself and refuses anything inconsistent.

use std::path::Path;

use itertools::Itertools;
use nanoserde::{DeJson, SerJson};
use thiserror::Error;

use crate::board::Board;
use crate::model::{Domino, PlacedDomino, ALL_DOMINOES};
use crate::puzzle::Puzzle;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("can't access puzzle file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed puzzle JSON: {0}")]
    Json(String),
    #[error("unknown domino {0}, expected 0..{}", ALL_DOMINOES.len())]
    UnknownDomino(usize),
    #[error("expected {expected} lights, found {found}")]
    LightsLength { expected: usize, found: usize },
    #[error("light {index} is {value}, at most 2 allowed")]
    LightValue { index: usize, value: u8 },
    #[error("solution grid is not {n}×{n}")]
    GridShape { n: usize },
    #[error("solution dominoes overlap or leave the board")]
    Overlap,
    #[error("solution grid does not match its placed dominoes")]
    GridMismatch,
    #[error("solution lights {found:?} differ from puzzle lights {expected:?}")]
    SolutionLights { expected: Vec<u8>, found: Vec<u8> },
    #[error("solution uses dominoes the puzzle does not provide")]
    SolutionDominoes,
}

#[derive(Clone, Debug, PartialEq, SerJson, DeJson)]
struct PlacedDominoRecord {
    domino: usize,
    i: usize,
    j: usize,
}

#[derive(Clone, Debug, PartialEq, SerJson, DeJson)]
struct SolutionRecord {
    values: Vec<Vec<u8>>,
    placed_dominoes: Vec<PlacedDominoRecord>,
}

#[derive(Clone, Debug, PartialEq, SerJson, DeJson)]
struct PuzzleRecord {
    n: usize,
    lights: Vec<u8>,
    dominoes: Vec<usize>,
    #[nserde(default)]
    initial_placed_dominoes: Vec<PlacedDominoRecord>,
    #[nserde(default)]
    solution: Option<SolutionRecord>,
}

fn domino(index: usize) -> Result<Domino, StorageError> {
    ALL_DOMINOES
        .get(index)
        .copied()
        .ok_or(StorageError::UnknownDomino(index))
}

impl PlacedDominoRecord {
    fn new(pd: &PlacedDomino) -> Self {
        Self {
            domino: usize::from(pd.domino.value()),
            i: pd.x,
            j: pd.y,
        }
    }

    fn placed(&self) -> Result<PlacedDomino, StorageError> {
        Ok(PlacedDomino::new(domino(self.domino)?, self.i, self.j))
    }
}

impl SolutionRecord {
    fn new(board: &Board) -> Self {
        Self {
            values: board.values().rows().into_iter().map(|row| row.to_vec()).collect(),
            placed_dominoes: board
                .placed_dominoes()
                .iter()
                .map(PlacedDominoRecord::new)
                .collect(),
        }
    }

    fn board(&self, n: usize) -> Result<Board, StorageError> {
        if self.values.len() != n || self.values.iter().any(|row| row.len() != n) {
            return Err(StorageError::GridShape { n });
        }

        let placed: Vec<PlacedDomino> = self
            .placed_dominoes
            .iter()
            .map(PlacedDominoRecord::placed)
            .collect::<Result<_, _>>()?;
        let board = Board::with_dominoes(n, placed).ok_or(StorageError::Overlap)?;

        let matches = board
            .values()
            .rows()
            .into_iter()
            .zip(&self.values)
            .all(|(row, expected)| row.iter().eq(expected));
        if !matches {
            return Err(StorageError::GridMismatch);
        }
        Ok(board)
    }
}

impl PuzzleRecord {
    fn new(puzzle: &Puzzle) -> Self {
        Self {
            n: puzzle.n(),
            lights: puzzle.lights().to_vec(),
            dominoes: puzzle
                .dominoes()
                .iter()
                .map(|d| usize::from(d.value()))
                .collect(),
            initial_placed_dominoes: puzzle
                .initial_placed_dominoes()
                .iter()
                .map(PlacedDominoRecord::new)
                .collect(),
            solution: puzzle.solution().map(SolutionRecord::new),
        }
    }

    fn puzzle(&self) -> Result<Puzzle, StorageError> {
        let n = self.n;
        let found = self.lights.len();
        let expected = n
            .checked_mul(2)
            .ok_or(StorageError::LightsLength { expected: usize::MAX, found })?;
        if found != expected {
            return Err(StorageError::LightsLength { expected, found });
        }
        if let Some((index, &value)) = self.lights.iter().find_position(|&&light| light > 2) {
            return Err(StorageError::LightValue { index, value });
        }

        let dominoes: Vec<Domino> = self
            .dominoes
            .iter()
            .map(|&i| domino(i))
            .collect::<Result<_, _>>()?;
        let layout: Vec<PlacedDomino> = self
            .initial_placed_dominoes
            .iter()
            .map(PlacedDominoRecord::placed)
            .collect::<Result<_, _>>()?;

        let puzzle = Puzzle::new(n, self.lights.clone(), dominoes).with_layout(layout);

        let Some(solution) = &self.solution else {
            return Ok(puzzle);
        };
        let board = solution.board(n)?;

        let lights = board.lights();
        if lights != self.lights {
            return Err(StorageError::SolutionLights {
                expected: self.lights.clone(),
                found: lights,
            });
        }

        // a solution may leave pieces unused, but never adds any
        let available = puzzle.dominoes().iter().counts();
        let used = board.dominoes().counts();
        let covered = used
            .iter()
            .all(|(d, &count)| available.get(d).is_some_and(|&have| count <= have));
        if !covered {
            return Err(StorageError::SolutionDominoes);
        }

        Ok(puzzle.with_solution(board))
    }
}

impl Puzzle {
    pub fn from_json_str(json: &str) -> Result<Self, StorageError> {
        PuzzleRecord::deserialize_json(json)
            .map_err(|e| StorageError::Json(e.to_string()))?
            .puzzle()
    }

    pub fn to_json_string(&self) -> String {
        PuzzleRecord::new(self).serialize_json()
    }
}

pub fn load_puzzle(path: impl AsRef<Path>) -> Result<Puzzle, StorageError> {
    Puzzle::from_json_str(&std::fs::read_to_string(path)?)
}

pub fn save_puzzle(puzzle: &Puzzle, path: impl AsRef<Path>) -> Result<(), StorageError> {
    std::fs::write(path, puzzle.to_json_string())?;
    Ok(())
}
