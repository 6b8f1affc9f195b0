//! Canonical forms under the eight symmetries of the square.
//!
//! A board's canonical form is the smallest packed value among its images.
//! A puzzle has no board, so its canonical form picks the smallest packed
//! lights first and breaks ties on the packed domino multiset under the
//! same symmetry.

use itertools::Itertools;
use log::debug;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::encode::{dominoes_transforms, lights_transforms, transforms};
use crate::enumerate::{all_boards, PackedBoard};

pub fn canonicalize_board(val: u64) -> u64 {
    transforms(val).into_iter().min().unwrap_or(val)
}

/// Index into [`transforms`] of the image that [`canonicalize_board`] picks.
fn min_transform(val: u64) -> (usize, u64) {
    transforms(val)
        .into_iter()
        .enumerate()
        .min_by_key(|&(_, t)| t)
        .unwrap_or((0, val))
}

pub fn canonicalize_puzzle(lights: u32, dominoes: u32) -> (u32, u32) {
    let lights = lights_transforms(lights);
    let dominoes = dominoes_transforms(dominoes);

    lights
        .into_iter()
        .zip(dominoes)
        .min()
        .unwrap_or((lights[0], dominoes[0]))
}

/// One representative per symmetry class of boards with `num_pieces`
/// dominoes, each already in canonical form, sorted by packed board.
pub fn canonical_boards(num_pieces: usize) -> Vec<PackedBoard> {
    let boards = all_boards(num_pieces);

    let mut canonical = boards
        .par_iter()
        .map(|packed| {
            let (i, board) = min_transform(packed.board);
            PackedBoard {
                board,
                lights: lights_transforms(packed.lights)[i],
                dominoes: dominoes_transforms(packed.dominoes)[i],
            }
        })
        .collect::<Vec<_>>();

    canonical.par_sort_unstable();
    canonical.dedup_by_key(|b| b.board);

    debug!(
        "{} boards with {} pieces, {} up to symmetry",
        boards.len(),
        num_pieces,
        canonical.len()
    );
    canonical
}

/// `(lights, dominoes)` pairs with `num_pieces` dominoes that exactly one
/// board produces, reduced to canonical form and deduplicated.
pub fn canonical_puzzles_with_unique_solution(num_pieces: usize) -> Vec<(u32, u32)> {
    let boards = all_boards(num_pieces);

    let mut counts = FxHashMap::<(u32, u32), usize>::default();
    for packed in &boards {
        *counts.entry((packed.lights, packed.dominoes)).or_default() += 1;
    }

    let unique = counts
        .into_iter()
        .filter(|&(_, count)| count == 1)
        .map(|(puzzle, _)| puzzle)
        .collect_vec();

    let mut canonical = unique
        .par_iter()
        .map(|&(lights, dominoes)| canonicalize_puzzle(lights, dominoes))
        .collect::<Vec<_>>();

    canonical.par_sort_unstable();
    canonical.dedup();

    debug!(
        "{} unique puzzles with {} pieces, {} up to symmetry",
        unique.len(),
        num_pieces,
        canonical.len()
    );
    canonical
}
