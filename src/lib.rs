//! Polarize: place dominoes of polarizing filters on a small square board so
//! that every row and column lets through the requested amount of light.
//!
//! [`board`] and [`model`] hold the pieces and the rules, [`encode`] packs
//! 4×4 boards into integers with the symmetries of the square done by bit
//! twiddling, and the remaining modules enumerate, canonicalize, solve and
//! generate puzzles.

pub mod board;
pub mod canonical;
pub mod count;
pub mod difficulty;
pub mod encode;
pub mod enumerate;
pub mod generate;
pub mod model;
pub mod puzzle;
pub mod solve;
pub mod storage;

#[cfg(test)]
mod fixtures;

pub use board::Board;
pub use model::{Domino, Filter, Orientation, PlacedDomino, ALL_DOMINOES};
pub use puzzle::Puzzle;

/// Replace the current terminal line on stderr with `line`.
pub fn print_overwrite(line: &str) {
    use std::io::Write;

    let mut stderr = std::io::stderr().lock();
    let _ = write!(stderr, "\r{:width$}\r{line}", "", width = line.len() + 1);
    let _ = stderr.flush();
}
