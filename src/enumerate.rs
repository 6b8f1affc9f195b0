use itertools::{Either, Itertools};
use log::debug;
use rayon::prelude::*;

use crate::board::Board;
use crate::encode::{self, cell_shift, domino_count_shift, CELLS, SIZE};
use crate::model::{Domino, Orientation, PlacedDomino, ALL_DOMINOES};

/// Every board on which all of `dominoes` are placed, each exactly once.
///
/// Distinct orderings of the multiset are tried in turn; within one ordering
/// anchors must increase in raster order, so a board is reached through the
/// single ordering that lists its pieces by anchor.
pub fn all_boards_with_dominoes(n: usize, dominoes: &[Domino]) -> impl Iterator<Item = Board> + '_ {
    if dominoes.is_empty() {
        return Either::Left(std::iter::once(Board::new(n)));
    }

    let boards = dominoes
        .iter()
        .copied()
        .permutations(dominoes.len())
        .unique()
        .flat_map(move |order| {
            let anchors = order
                .iter()
                .map(|domino| domino.places(n))
                .multi_cartesian_product();
            anchors
                .filter(move |anchors| {
                    anchors
                        .iter()
                        .map(|&(row, col)| row * n + col)
                        .tuple_windows()
                        .all(|(a, b)| a < b)
                })
                .filter_map(move |anchors| {
                    let placed = order
                        .iter()
                        .zip(anchors)
                        .map(|(&domino, (row, col))| PlacedDomino::new(domino, col, row));
                    // gives up at the first piece that collides
                    Board::with_dominoes(n, placed)
                })
        });

    Either::Right(boards)
}

/// A 4×4 board in packed form alongside its packed lights and domino multiset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackedBoard {
    pub board: u64,
    pub lights: u32,
    pub dominoes: u32,
}

#[derive(Copy, Clone, Default)]
struct Partial {
    filters: u32,
    orientations: u32,
    dominoes: u32,
}

impl Partial {
    /// Put catalogue domino `index` at raster cell `anchor`, if it fits.
    fn place(self, index: usize, anchor: usize) -> Option<Self> {
        let domino = ALL_DOMINOES[index];
        let second = match domino.orientation() {
            Orientation::Horizontal if anchor % SIZE == SIZE - 1 => return None,
            Orientation::Vertical if anchor >= CELLS - SIZE => return None,
            Orientation::Horizontal => anchor + 1,
            Orientation::Vertical => anchor + SIZE,
        };

        let shift_1 = cell_shift(anchor);
        let shift_2 = cell_shift(second);
        if (self.orientations >> shift_1 | self.orientations >> shift_2) & 0b11 != 0 {
            return None;
        }

        let code = u32::from(domino.orientation().code());
        Some(Self {
            filters: self.filters
                | u32::from(domino.filter1().code()) << shift_1
                | u32::from(domino.filter2().code()) << shift_2,
            orientations: self.orientations | code << shift_1 | code << shift_2,
            dominoes: self.dominoes + (1 << domino_count_shift(index)),
        })
    }

    fn finish(self) -> PackedBoard {
        PackedBoard {
            board: encode::pack(self.filters, self.orientations),
            lights: encode::encode_lights_from_filters(self.filters),
            dominoes: self.dominoes,
        }
    }
}

fn extend(partial: Partial, remaining: usize, min_anchor: usize, out: &mut Vec<PackedBoard>) {
    if remaining == 0 {
        out.push(partial.finish());
        return;
    }

    // leave a cell for each piece still to come
    for anchor in min_anchor..=CELLS - remaining {
        for index in 0..ALL_DOMINOES.len() {
            if let Some(next) = partial.place(index, anchor) {
                extend(next, remaining - 1, anchor + 1, out);
            }
        }
    }
}

/// Every 4×4 board holding exactly `num_pieces` dominoes, any mix of the
/// catalogue with repetition, sorted by packed board.
///
/// Pieces are placed on the packed halves directly. The work is split by
/// the first piece over the rayon pool.
pub fn all_boards(num_pieces: usize) -> Vec<PackedBoard> {
    if num_pieces == 0 {
        return vec![Partial::default().finish()];
    }
    if num_pieces > CELLS / 2 {
        return Vec::new();
    }

    let mut boards = (0..=CELLS - num_pieces)
        .into_par_iter()
        .flat_map_iter(|anchor| (0..ALL_DOMINOES.len()).map(move |index| (anchor, index)))
        .map(|(anchor, index)| {
            let mut out = Vec::new();
            if let Some(first) = Partial::default().place(index, anchor) {
                extend(first, num_pieces - 1, anchor + 1, &mut out);
            }
            out
        })
        .flatten_iter()
        .collect::<Vec<_>>();

    boards.par_sort_unstable();
    boards.dedup_by_key(|b| b.board);

    debug!("{} boards with {} pieces", boards.len(), num_pieces);
    boards
}

/// [`all_boards`] for every piece count from 0 to `max_pieces`.
pub fn all_boards_up_to(max_pieces: usize) -> Vec<PackedBoard> {
    (0..=max_pieces).flat_map(all_boards).collect()
}
