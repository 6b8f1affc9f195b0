//! Fixed-width bit packings of 4×4 boards, lights and domino multisets, and
//! the symmetries of the square applied directly to the packed values.
//!
//! Board: the upper 32 bits hold the filter grid and the lower 32 bits the
//! orientation grid, two bits per cell in raster order with cell (0, 0) in
//! the most significant pair.
//!
//! Lights: eight two-bit readings, row lights then column lights, the first
//! in bits 15..14.
//!
//! Dominoes: eight four-bit counts, one per [`ALL_DOMINOES`] index, index 0
//! in bits 31..28.

use ndarray::Array2;

use crate::board::Board;
use crate::model::{Domino, Filter, Orientation, PlacedDomino, ALL_DOMINOES};

pub const SIZE: usize = 4;
pub const CELLS: usize = SIZE * SIZE;

// ---------- helpers ----------

/// Swap the bits selected by `mask` with the bits `delta` places above them.
#[inline]
const fn delta_swap(v: u32, mask: u32, delta: u32) -> u32 {
    let t = ((v >> delta) ^ v) & mask;
    v ^ t ^ (t << delta)
}

/// Exchange the two bits of every bit pair.
#[inline]
const fn swap_pair_bits(v: u32) -> u32 {
    ((v & 0xAAAA_AAAA) >> 1) | ((v & 0x5555_5555) << 1)
}

/// Reverse the order of the four bit pairs inside every byte.
#[inline]
const fn reverse_pairs_in_bytes(v: u32) -> u32 {
    let v = ((v & 0xF0F0_F0F0) >> 4) | ((v & 0x0F0F_0F0F) << 4);
    ((v & 0xCCCC_CCCC) >> 2) | ((v & 0x3333_3333) << 2)
}

/// Move cell (r, c) to cell (c, r) of a 4×4 grid of bit pairs.
#[inline]
const fn transpose_cells(v: u32) -> u32 {
    // swap the off-diagonal cells of each 2×2 block, then the off-diagonal blocks
    let v = delta_swap(v, 0x00CC_00CC, 6);
    delta_swap(v, 0x0000_F0F0, 12)
}

#[inline]
pub(crate) const fn cell_shift(cell: usize) -> u32 {
    ((CELLS - 1 - cell) * 2) as u32
}

#[inline]
pub const fn filters(board: u64) -> u32 {
    (board >> 32) as u32
}

#[inline]
pub const fn orientations(board: u64) -> u32 {
    board as u32
}

#[inline]
pub const fn pack(filters: u32, orientations: u32) -> u64 {
    (filters as u64) << 32 | orientations as u64
}

fn encode_bit_pairs(values: &Array2<u8>) -> u32 {
    values
        .iter()
        .fold(0, |acc, &v| acc << 2 | u32::from(v & 0b11))
}

fn decode_bit_pairs(val: u32) -> Array2<u8> {
    Array2::from_shape_fn((SIZE, SIZE), |(row, col)| {
        (val >> cell_shift(row * SIZE + col) & 0b11) as u8
    })
}

// ---------- boards ----------

pub fn encode_board(board: &Board) -> u64 {
    debug_assert_eq!(board.n(), SIZE);
    pack(
        encode_bit_pairs(board.values()),
        encode_bit_pairs(&board.orientations()),
    )
}

/// Unpack a board produced by [`encode_board`] or the packed enumeration.
///
/// Cells are scanned in raster order; an unclaimed cell with an orientation
/// starts a domino that also claims its neighbour to the right or below.
pub fn decode_board(val: u64) -> Board {
    let filters = decode_bit_pairs(filters(val));
    let orientations = decode_bit_pairs(orientations(val));

    let mut board = Board::new(SIZE);
    for ((y, x), &code) in orientations.indexed_iter() {
        let Some(orientation) = Orientation::from_code(code) else {
            continue;
        };
        if board.values()[[y, x]] != 0 {
            // second cell of a domino already placed
            continue;
        }
        let (dy, dx) = orientation.step();
        let first = Filter::from_code(filters[[y, x]]);
        let second = filters.get([y + dy, x + dx]).copied().and_then(Filter::from_code);
        let (Some(first), Some(second)) = (first, second) else {
            debug_assert!(false, "malformed packed board {val:#018x}");
            continue;
        };

        let pd = PlacedDomino::new(Domino::new(orientation, first, second), x, y);
        if board.can_add(pd) {
            board.add_domino(pd);
        } else {
            debug_assert!(false, "malformed packed board {val:#018x}");
        }
    }

    debug_assert_eq!(encode_board(&board), val);
    board
}

/// Columns swap; each filter is mirrored too, so filter bits reverse one by
/// one while orientation pairs only move.
pub const fn reflect_horizontally(val: u64) -> u64 {
    pack(
        swap_pair_bits(reverse_pairs_in_bytes(filters(val))),
        reverse_pairs_in_bytes(orientations(val)),
    )
}

/// Rows swap; filters mirror as in [`reflect_horizontally`].
pub const fn reflect_vertically(val: u64) -> u64 {
    pack(
        swap_pair_bits(filters(val).swap_bytes()),
        orientations(val).swap_bytes(),
    )
}

/// Reflect in the leading diagonal. Filters keep their angle; horizontal and
/// vertical swap, which exchanges the two bits of each orientation pair.
pub const fn transpose(val: u64) -> u64 {
    pack(
        transpose_cells(filters(val)),
        transpose_cells(swap_pair_bits(orientations(val))),
    )
}

/// The eight images of `val` under `reflect_h`, `reflect_v` and `transpose`,
/// in the order of [`Board::transforms`].
#[inline]
fn dihedral<T: Copy>(
    val: T,
    reflect_h: fn(T) -> T,
    reflect_v: fn(T) -> T,
    transpose: fn(T) -> T,
) -> [T; 8] {
    let horizontal = reflect_h(val);
    let vertical = reflect_v(val);
    let transposed = transpose(val);

    let rotated_90 = reflect_h(transposed);
    let rotated_180 = reflect_v(horizontal);
    let rotated_270 = reflect_v(transposed);
    let anti_transposed = reflect_v(rotated_90);

    [
        val,
        rotated_270,
        rotated_180,
        rotated_90,
        transposed,
        vertical,
        anti_transposed,
        horizontal,
    ]
}

pub fn transforms(val: u64) -> [u64; 8] {
    dihedral(val, reflect_horizontally, reflect_vertically, transpose)
}

// ---------- lights ----------

#[inline]
const fn count_pair(v: u32) -> u32 {
    (v & 1) + (v >> 1 & 1)
}

/// Lights of a packed filter grid, without unpacking it.
pub const fn encode_lights_from_filters(filters: u32) -> u32 {
    let mut lights = 0;

    let mut row = 0;
    while row < SIZE {
        let byte = filters >> (24 - 8 * row) & 0xFF;
        let seen = (byte | byte >> 2 | byte >> 4 | byte >> 6) & 0b11;
        lights = lights << 2 | count_pair(seen);
        row += 1;
    }

    let columns = (filters | filters >> 8 | filters >> 16 | filters >> 24) & 0xFF;
    let mut col = 0;
    while col < SIZE {
        lights = lights << 2 | count_pair(columns >> (6 - 2 * col) & 0b11);
        col += 1;
    }

    lights
}

pub fn decode_lights(val: u32) -> Vec<u8> {
    (0..2 * SIZE)
        .map(|i| (val >> (2 * (2 * SIZE - 1 - i)) & 0b11) as u8)
        .collect()
}

/// Column lights reverse; mirrored filters light a line the same way.
pub const fn reflect_lights_horizontally(val: u32) -> u32 {
    (val & !0xFF) | (reverse_pairs_in_bytes(val) & 0xFF)
}

pub const fn reflect_lights_vertically(val: u32) -> u32 {
    (val & !0xFF00) | (reverse_pairs_in_bytes(val) & 0xFF00)
}

/// Row and column lights trade places.
pub const fn transpose_lights(val: u32) -> u32 {
    (val & 0xFF) << 8 | (val >> 8 & 0xFF)
}

pub fn lights_transforms(val: u32) -> [u32; 8] {
    dihedral(
        val,
        reflect_lights_horizontally,
        reflect_lights_vertically,
        transpose_lights,
    )
}

// ---------- dominoes ----------

#[inline]
pub const fn domino_count_shift(index: usize) -> u32 {
    ((ALL_DOMINOES.len() - 1 - index) * 4) as u32
}

/// Count each distinct domino into its four-bit field. At most 15 copies of
/// any one domino.
pub fn encode_dominoes(dominoes: impl IntoIterator<Item = Domino>) -> u32 {
    dominoes.into_iter().fold(0, |acc, domino| {
        debug_assert!(acc >> domino_count_shift(usize::from(domino.value())) & 0xF < 0xF);
        acc + (1 << domino_count_shift(usize::from(domino.value())))
    })
}

/// The multiset as a list, sorted by catalogue index.
pub fn decode_dominoes(val: u32) -> Vec<Domino> {
    ALL_DOMINOES
        .iter()
        .enumerate()
        .flat_map(|(i, &domino)| {
            let count = val >> domino_count_shift(i) & 0xF;
            std::iter::repeat(domino).take(count as usize)
        })
        .collect()
}

// Mirrors map catalogue indices as follows (see `Domino::reflect_*`):
//   horizontally: 0<->3, 4<->7, 5<->6
//   vertically:   0<->3, 1<->2, 4<->7
//   transpose:    i <-> i ^ 4

pub const fn reflect_dominoes_horizontally(val: u32) -> u32 {
    let val = delta_swap(val, 0x000F_000F, 12);
    delta_swap(val, 0x0000_00F0, 4)
}

pub const fn reflect_dominoes_vertically(val: u32) -> u32 {
    let val = delta_swap(val, 0x000F_000F, 12);
    delta_swap(val, 0x00F0_0000, 4)
}

pub const fn transpose_dominoes(val: u32) -> u32 {
    val.rotate_left(16)
}

pub fn dominoes_transforms(val: u32) -> [u32; 8] {
    dihedral(
        val,
        reflect_dominoes_horizontally,
        reflect_dominoes_vertically,
        transpose_dominoes,
    )
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use rand::seq::SliceRandom;

    use super::*;
    use crate::enumerate::all_boards;
    use crate::fixtures::example_board;

    #[test]
    fn encode_example() {
        let board = example_board();
        let val = encode_board(&board);
        assert_eq!(filters(val), 0b10000001_10000001_01010000_01100000);
        assert_eq!(orientations(val), 0b10000010_10000010_01010000_01010000);
        assert_eq!(decode_board(val), board);
    }

    #[test]
    fn round_trip_all_boards() {
        for num_pieces in 0..=3 {
            for packed in all_boards(num_pieces) {
                let board = decode_board(packed.board);
                assert_eq!(board.placed_dominoes().len(), num_pieces);
                assert_eq!(encode_board(&board), packed.board);
                assert_eq!(decode_board(encode_board(&board)), board);
            }
        }
    }

    #[test]
    fn example_transforms() {
        let board = example_board();
        let val = encode_board(&board);

        assert_eq!(decode_board(reflect_horizontally(val)), board.reflect_horizontally());
        assert_eq!(decode_board(reflect_vertically(val)), board.reflect_vertically());
        assert_eq!(decode_board(transpose(val)), board.transpose());

        for (tb, tv) in board.transforms().iter().zip(transforms(val)) {
            assert_eq!(&decode_board(tv), tb);
        }
    }

    // every board with up to three pieces
    #[test]
    fn bitwise_transforms_match_board_transforms() {
        for num_pieces in 1..=3 {
            for packed in all_boards(num_pieces) {
                let board = decode_board(packed.board);
                assert_eq!(
                    decode_board(reflect_horizontally(packed.board)),
                    board.reflect_horizontally()
                );
                assert_eq!(
                    decode_board(reflect_vertically(packed.board)),
                    board.reflect_vertically()
                );
                assert_eq!(decode_board(transpose(packed.board)), board.transpose());
            }
        }
    }

    #[test]
    fn transforms_match_on_random_full_boards() {
        let mut rng = rand::thread_rng();
        let boards = all_boards(4);

        for packed in boards.choose_multiple(&mut rng, 200) {
            let board = decode_board(packed.board);
            for (tb, tv) in board.transforms().iter().zip(transforms(packed.board)) {
                assert_eq!(&decode_board(tv), tb);
            }
        }
    }

    #[test]
    fn involutions() {
        let mut rng = rand::thread_rng();
        for packed in all_boards(3).choose_multiple(&mut rng, 500) {
            let val = packed.board;
            assert_eq!(reflect_horizontally(reflect_horizontally(val)), val);
            assert_eq!(reflect_vertically(reflect_vertically(val)), val);
            assert_eq!(transpose(transpose(val)), val);

            let l = packed.lights;
            assert_eq!(reflect_lights_horizontally(reflect_lights_horizontally(l)), l);
            assert_eq!(reflect_lights_vertically(reflect_lights_vertically(l)), l);
            assert_eq!(transpose_lights(transpose_lights(l)), l);

            let d = packed.dominoes;
            assert_eq!(reflect_dominoes_horizontally(reflect_dominoes_horizontally(d)), d);
            assert_eq!(reflect_dominoes_vertically(reflect_dominoes_vertically(d)), d);
            assert_eq!(transpose_dominoes(transpose_dominoes(d)), d);
        }
    }

    #[test]
    fn lights_from_filters() {
        let board = example_board();
        let val = encode_board(&board);
        assert_eq!(encode_lights_from_filters(filters(val)), board.lights_int());
        assert_eq!(decode_lights(board.lights_int()), board.lights());
        assert_eq!(encode_lights_from_filters(0), 0);

        for packed in all_boards(2) {
            let board = decode_board(packed.board);
            assert_eq!(packed.lights, board.lights_int());
        }
    }

    #[test]
    fn lights_follow_board_transforms() {
        for packed in all_boards(2) {
            let expected = transforms(packed.board).map(|t| encode_lights_from_filters(filters(t)));
            assert_eq!(lights_transforms(packed.lights), expected);
        }

        let board = example_board();
        let lights = board.lights_int();
        assert_eq!(
            reflect_lights_horizontally(lights),
            board.reflect_horizontally().lights_int()
        );
        assert_eq!(
            reflect_lights_vertically(lights),
            board.reflect_vertically().lights_int()
        );
        assert_eq!(transpose_lights(lights), board.transpose().lights_int());
    }

    #[test]
    fn encode_decode_dominoes() {
        let board = example_board();
        let val = encode_dominoes(board.dominoes());
        assert_eq!(val, 0b0001_0001_0000_0000_0001_0000_0000_0001);
        assert_eq!(
            decode_dominoes(val),
            [0, 1, 4, 7].map(|i| ALL_DOMINOES[i]).to_vec()
        );

        let repeated = [5, 5, 5, 0].map(|i| ALL_DOMINOES[i]);
        let val = encode_dominoes(repeated);
        assert_eq!(val, 0x1000_0300);
        assert_eq!(decode_dominoes(val), [0, 5, 5, 5].map(|i| ALL_DOMINOES[i]).to_vec());
        assert_eq!(encode_dominoes(Vec::<Domino>::new()), 0);
    }

    #[test]
    fn domino_transforms_match_catalogue() {
        for domino in ALL_DOMINOES {
            let val = encode_dominoes([domino]);
            assert_eq!(
                reflect_dominoes_horizontally(val),
                encode_dominoes([domino.reflect_horizontally()])
            );
            assert_eq!(
                reflect_dominoes_vertically(val),
                encode_dominoes([domino.reflect_vertically()])
            );
            assert_eq!(transpose_dominoes(val), encode_dominoes([domino.transpose()]));
        }

        let board = example_board();
        let val = encode_dominoes(board.dominoes());
        let expected = board.transforms().map(|b| encode_dominoes(b.dominoes()));
        assert_eq!(dominoes_transforms(val), expected);
    }

    #[test]
    fn dominoes_follow_board_transforms() {
        for packed in all_boards(3) {
            let expected = transforms(packed.board)
                .map(|t| encode_dominoes(decode_board(t).dominoes()));
            assert_eq!(dominoes_transforms(packed.dominoes), expected);
        }
    }

    #[test]
    fn transforms_are_distinct_for_asymmetric_board() {
        let val = encode_board(&example_board());
        assert_eq!(transforms(val).iter().unique().count(), 8);
    }
}
