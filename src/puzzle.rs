use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::board::{initial_layout, Board};
use crate::encode::{decode_dominoes, decode_lights, encode_dominoes, SIZE};
use crate::model::{Domino, PlacedDomino};

/// Target lights plus the dominoes available to reproduce them.
///
/// Optionally carries where the pieces start off-board and the board the
/// puzzle was made from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Puzzle {
    n: usize,
    lights: Vec<u8>,
    dominoes: Vec<Domino>,
    initial_placed_dominoes: Vec<PlacedDomino>,
    solution: Option<Board>,
}

impl Puzzle {
    pub fn new(n: usize, lights: Vec<u8>, dominoes: Vec<Domino>) -> Self {
        debug_assert_eq!(lights.len(), 2 * n);
        Self {
            n,
            lights,
            dominoes,
            initial_placed_dominoes: Vec::new(),
            solution: None,
        }
    }

    pub fn with_layout(mut self, layout: Vec<PlacedDomino>) -> Self {
        self.initial_placed_dominoes = layout;
        self
    }

    pub fn with_solution(mut self, solution: Board) -> Self {
        debug_assert_eq!(solution.lights(), self.lights);
        self.solution = Some(solution);
        self
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn lights(&self) -> &[u8] {
        &self.lights
    }

    /// Same packing as [`Board::lights_int`].
    pub fn lights_int(&self) -> u32 {
        self.lights
            .iter()
            .fold(0, |acc, &light| acc << 2 | u32::from(light))
    }

    pub fn dominoes(&self) -> &[Domino] {
        &self.dominoes
    }

    pub fn dominoes_int(&self) -> u32 {
        encode_dominoes(self.dominoes.iter().copied())
    }

    pub fn initial_placed_dominoes(&self) -> &[PlacedDomino] {
        &self.initial_placed_dominoes
    }

    pub fn solution(&self) -> Option<&Board> {
        self.solution.as_ref()
    }

    /// Whether `board` lights up exactly like this puzzle asks.
    pub fn is_solved_by(&self, board: &Board) -> bool {
        board.n() == self.n && board.lights() == self.lights
    }
}

/// Rebuild a 4×4 puzzle from its packed lights and domino multiset.
pub fn decode_puzzle(lights: u32, dominoes: u32) -> Puzzle {
    let dominoes = decode_dominoes(dominoes);
    let layout = initial_layout(SIZE, &dominoes).unwrap_or_default();
    Puzzle::new(SIZE, decode_lights(lights), dominoes).with_layout(layout)
}

impl Display for Puzzle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let (rows, cols) = self.lights.split_at(self.n);
        writeln!(f, "rows: {}", rows.iter().join(" "))?;
        writeln!(f, "cols: {}", cols.iter().join(" "))?;
        write!(f, "dominoes: {}", self.dominoes.iter().join(" "))
    }
}
