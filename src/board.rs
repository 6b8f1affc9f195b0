use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use itertools::Itertools;
use ndarray::{Array2, ArrayView1, Axis};

use crate::enumerate::all_boards_with_dominoes;
use crate::model::{Domino, Filter, Orientation, PlacedDomino};
use crate::puzzle::Puzzle;

pub const DEFAULT_SIZE: usize = 4;

/// An `n`×`n` grid of filters together with the dominoes that put them there.
///
/// The grid is only ever written through [`Board::add_domino`] and
/// [`Board::remove_domino`], so it always equals the projection of the placed
/// dominoes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    n: usize,
    values: Array2<u8>,
    placed: BTreeSet<PlacedDomino>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE)
    }
}

impl Board {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            values: Array2::zeros((n, n)),
            placed: BTreeSet::new(),
        }
    }

    /// Build a board by placing each domino in turn, or `None` if any of them
    /// does not fit.
    pub fn with_dominoes(n: usize, placed: impl IntoIterator<Item = PlacedDomino>) -> Option<Self> {
        let mut board = Self::new(n);
        for pd in placed {
            if !board.can_add(pd) {
                return None;
            }
            board.add_domino(pd);
        }
        Some(board)
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Cell values: 0 for empty, otherwise a [`Filter`] code.
    pub fn values(&self) -> &Array2<u8> {
        &self.values
    }

    pub fn placed_dominoes(&self) -> &BTreeSet<PlacedDomino> {
        &self.placed
    }

    pub fn dominoes(&self) -> impl Iterator<Item = Domino> + '_ {
        self.placed.iter().map(|pd| pd.domino)
    }

    /// [`Orientation`] code of the domino covering each cell, 0 for empty.
    pub fn orientations(&self) -> Array2<u8> {
        let mut orientations = Array2::zeros((self.n, self.n));
        for pd in &self.placed {
            for cell in pd.cells() {
                orientations[cell] = pd.domino.orientation().code();
            }
        }
        orientations
    }

    pub fn can_add(&self, pd: PlacedDomino) -> bool {
        pd.cells()
            .iter()
            .all(|&cell| self.values.get(cell) == Some(&0))
    }

    /// Caller must have checked [`Board::can_add`].
    pub fn add_domino(&mut self, pd: PlacedDomino) {
        let [first, second] = pd.cells();
        self.values[first] = pd.domino.filter1().code();
        self.values[second] = pd.domino.filter2().code();
        self.placed.insert(pd);
    }

    pub fn can_remove(&self, pd: PlacedDomino) -> bool {
        let [first, second] = pd.cells();
        self.values.get(first) == Some(&pd.domino.filter1().code())
            && self.values.get(second) == Some(&pd.domino.filter2().code())
            && self.placed.contains(&pd)
    }

    /// Caller must have checked [`Board::can_remove`].
    pub fn remove_domino(&mut self, pd: PlacedDomino) {
        for cell in pd.cells() {
            self.values[cell] = 0;
        }
        self.placed.remove(&pd);
    }

    /// One reading per row, then one per column: how many filter kinds the
    /// beam crosses along that line.
    pub fn lights(&self) -> Vec<u8> {
        self.values
            .rows()
            .into_iter()
            .chain(self.values.columns())
            .map(line_light)
            .collect()
    }

    /// [`Board::lights`] packed two bits per reading, first reading in the
    /// most significant position. Fits boards up to 8×8.
    pub fn lights_int(&self) -> u32 {
        debug_assert!(self.n <= 8);
        self.lights()
            .into_iter()
            .fold(0, |acc, light| acc << 2 | u32::from(light))
    }

    /// Lines where both filter kinds appear, i.e. lines with light 2, rows
    /// first.
    pub fn blocked_lines(&self) -> Vec<bool> {
        self.lights().into_iter().map(|light| light == 2).collect()
    }

    /// Light along each row after crossing 0..=n cells from the left.
    pub fn paths_horizontal(&self) -> Array2<u8> {
        prefix_lights(&self.values)
    }

    /// Light along each column after crossing 0..=n cells from the top,
    /// laid out with rows as the crossing count.
    pub fn paths_vertical(&self) -> Array2<u8> {
        prefix_lights(&self.values.t().to_owned())
            .reversed_axes()
            .as_standard_layout()
            .to_owned()
    }

    fn map_placed(&self, f: impl Fn(&PlacedDomino) -> PlacedDomino) -> Self {
        let mut board = Self::new(self.n);
        for pd in self.placed.iter().map(f) {
            debug_assert!(board.can_add(pd));
            board.add_domino(pd);
        }
        board
    }

    /// Mirror in a vertical axis: columns swap and every filter flips.
    pub fn reflect_horizontally(&self) -> Self {
        self.map_placed(|pd| pd.reflect_horizontally(self.n))
    }

    /// Mirror in a horizontal axis: rows swap and every filter flips.
    pub fn reflect_vertically(&self) -> Self {
        self.map_placed(|pd| pd.reflect_vertically(self.n))
    }

    /// Mirror in the leading diagonal; filters keep their angle and dominoes
    /// swap orientation.
    pub fn transpose(&self) -> Self {
        self.map_placed(PlacedDomino::transpose)
    }

    /// All eight images under the symmetries of the square, in the order
    /// identity, rot 270, rot 180, rot 90, transpose, vertical reflection,
    /// anti-transpose, horizontal reflection.
    ///
    /// Matches [`crate::encode::transforms`] element for element.
    pub fn transforms(&self) -> [Self; 8] {
        let horizontal = self.reflect_horizontally();
        let vertical = self.reflect_vertically();
        let transposed = self.transpose();

        let rotated_90 = transposed.reflect_horizontally();
        let rotated_180 = horizontal.reflect_vertically();
        let rotated_270 = transposed.reflect_vertically();
        let anti_transposed = rotated_90.reflect_vertically();

        [
            self.clone(),
            rotated_270,
            rotated_180,
            rotated_90,
            transposed,
            vertical,
            anti_transposed,
            horizontal,
        ]
    }

    /// The puzzle this board solves, with this board attached as its answer.
    pub fn to_puzzle(&self) -> Puzzle {
        let dominoes = self.dominoes().collect_vec();
        let layout = initial_layout(self.n, &dominoes).unwrap_or_default();
        Puzzle::new(self.n, self.lights(), dominoes)
            .with_layout(layout)
            .with_solution(self.clone())
    }
}

fn line_light(line: ArrayView1<u8>) -> u8 {
    line.fold(0u8, |acc, &v| acc | v).count_ones() as u8
}

fn prefix_lights(values: &Array2<u8>) -> Array2<u8> {
    let (rows, cols) = values.dim();
    let mut paths = Array2::zeros((rows, cols + 1));
    for (row, mut path) in values.axis_iter(Axis(0)).zip(paths.axis_iter_mut(Axis(0))) {
        let mut seen = 0u8;
        for (col, &v) in row.iter().enumerate() {
            seen |= v;
            path[col + 1] = seen.count_ones() as u8;
        }
    }
    paths
}

/// Off-board starting positions for the pieces of a puzzle.
///
/// Vertical pieces go first, then the first arrangement found by the
/// placement search on an `n`×`n` tray is taken. Returns `None` if the pieces
/// do not fit.
pub fn initial_layout(n: usize, dominoes: &[Domino]) -> Option<Vec<PlacedDomino>> {
    let sorted = dominoes
        .iter()
        .copied()
        .sorted_by_key(|d| d.orientation() != Orientation::Vertical)
        .collect_vec();

    let board = all_boards_with_dominoes(n, &sorted).next()?;

    // report in the sorted order rather than the board's
    let mut remaining = board.placed_dominoes().clone();
    let layout = sorted
        .iter()
        .filter_map(|domino| {
            let pd = *remaining.iter().find(|pd| pd.domino == *domino)?;
            remaining.remove(&pd);
            Some(pd)
        })
        .collect_vec();
    Some(layout)
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.values.rows() {
            for &v in row {
                let glyph = Filter::from_code(v).map_or('.', Filter::glyph);
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
