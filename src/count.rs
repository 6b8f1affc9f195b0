use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};

use itertools::Itertools;
use log::debug;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::board::Board;
use crate::enumerate::all_boards_with_dominoes;
use crate::model::ALL_DOMINOES;

/// Puzzles with `num_pieces` dominoes on an `n`×`n` board that exactly one
/// arrangement of their dominoes solves. Symmetric copies count separately.
pub fn count_puzzles(n: usize, num_pieces: usize) -> usize {
    count_unique_readings(n, num_pieces, Board::lights, |_, _| {})
}

/// As [`count_puzzles`], but a line only reads whether both filter kinds
/// block it.
pub fn count_blocked_puzzles(n: usize, num_pieces: usize) -> usize {
    count_unique_readings(n, num_pieces, Board::blocked_lines, |_, _| {})
}

/// For every multiset of `num_pieces` catalogue dominoes, count the readings
/// that exactly one of its boards gives, and sum over the multisets.
///
/// Multisets are shared out over the rayon pool; `progress` is called with
/// the number finished so far and the total.
pub fn count_unique_readings<K: Hash + Eq>(
    n: usize,
    num_pieces: usize,
    readout: impl Fn(&Board) -> K + Sync,
    progress: impl Fn(usize, usize) + Sync,
) -> usize {
    let multisets = ALL_DOMINOES
        .iter()
        .copied()
        .combinations_with_replacement(num_pieces)
        .collect_vec();
    let total = multisets.len();
    let done = AtomicUsize::new(0);

    let count = multisets
        .par_iter()
        .map(|dominoes| {
            let mut readings = FxHashMap::<K, usize>::default();
            for board in all_boards_with_dominoes(n, dominoes) {
                *readings.entry(readout(&board)).or_default() += 1;
            }
            progress(done.fetch_add(1, Ordering::Relaxed) + 1, total);
            readings.into_values().filter(|&c| c == 1).count()
        })
        .sum();

    debug!("{} puzzles over {} multisets of {} pieces", count, total, num_pieces);
    count
}
