use itertools::Itertools;
use log::{info, trace};
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::board::{Board, DEFAULT_SIZE};
use crate::enumerate::all_boards_with_dominoes;
use crate::model::{Domino, ALL_DOMINOES};
use crate::puzzle::Puzzle;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Board size.
    pub n: usize,
    /// Dominoes per puzzle.
    pub pieces: usize,
    /// Domino draws to try before giving up; `None` keeps drawing forever.
    pub max_attempts: Option<usize>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            n: DEFAULT_SIZE,
            pieces: 3,
            max_attempts: None,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("no puzzle with a unique solution after {attempts} draws")]
    Exhausted { attempts: usize },
}

/// A random `n`×`n` puzzle with `num_pieces` dominoes and exactly one
/// solution, together with that solution.
///
/// Draws dominoes until some draw has a lights pattern that only one
/// arrangement produces. This does not return if no draw ever does.
pub fn generate(n: usize, num_pieces: usize) -> (Puzzle, Board) {
    let mut rng = rand::thread_rng();
    loop {
        if let Some(found) = attempt(n, num_pieces, &mut rng) {
            return found;
        }
    }
}

/// [`generate`] with a caller supplied random source and an optional limit
/// on the number of draws.
pub fn generate_with<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<(Puzzle, Board), GenerateError> {
    let mut attempts = 0;
    while config.max_attempts.map_or(true, |max| attempts < max) {
        attempts += 1;
        if let Some(found) = attempt(config.n, config.pieces, rng) {
            info!("found a {}-piece puzzle after {} draws", config.pieces, attempts);
            return Ok(found);
        }
    }
    Err(GenerateError::Exhausted { attempts })
}

fn attempt<R: Rng + ?Sized>(n: usize, num_pieces: usize, rng: &mut R) -> Option<(Puzzle, Board)> {
    let dominoes: Vec<Domino> = (0..num_pieces)
        .map(|_| ALL_DOMINOES[rng.gen_range(0..ALL_DOMINOES.len())])
        .collect();

    let boards = all_boards_with_dominoes(n, &dominoes).collect_vec();

    // sorted so a seeded rng always picks the same puzzle
    let unique = boards
        .iter()
        .map(Board::lights)
        .counts()
        .into_iter()
        .filter(|&(_, count)| count == 1)
        .map(|(lights, _)| lights)
        .sorted()
        .collect_vec();

    trace!(
        "drew {}: {} boards, {} with unique lights",
        dominoes.iter().join(" "),
        boards.len(),
        unique.len()
    );

    let lights = unique.choose(rng)?;
    let board = boards.into_iter().find(|board| &board.lights() == lights)?;
    Some((board.to_puzzle(), board))
}
