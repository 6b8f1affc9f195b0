use std::fmt::{Display, Formatter};

use strum::VariantArray;

/// A polarizing filter, set at one of two angles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, VariantArray)]
pub enum Filter {
    Pos45,
    Neg45,
}

impl Filter {
    /// The value written into a board cell holding this filter.
    pub const fn code(self) -> u8 {
        match self {
            Self::Pos45 => 1,
            Self::Neg45 => 2,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Pos45),
            2 => Some(Self::Neg45),
            _ => None,
        }
    }

    pub const fn glyph(self) -> char {
        match self {
            Self::Pos45 => '/',
            Self::Neg45 => '\\',
        }
    }

    /// The filter at the other angle; a mirror image of `self`.
    pub const fn other(self) -> Self {
        match self {
            Self::Pos45 => Self::Neg45,
            Self::Neg45 => Self::Pos45,
        }
    }

    const fn bit(self) -> u8 {
        self.code() - 1
    }
}

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, VariantArray, strum::Display,
)]
pub enum Orientation {
    #[strum(serialize = "H")]
    Horizontal,
    #[strum(serialize = "V")]
    Vertical,
}

impl Orientation {
    pub const fn code(self) -> u8 {
        match self {
            Self::Horizontal => 1,
            Self::Vertical => 2,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Horizontal),
            2 => Some(Self::Vertical),
            _ => None,
        }
    }

    pub const fn transpose(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Raster offset from the first cell of a domino to its second cell.
    pub const fn step(self) -> (usize, usize) {
        match self {
            Self::Horizontal => (0, 1),
            Self::Vertical => (1, 0),
        }
    }
}

/// Two filters joined in a fixed orientation.
///
/// `filter1` sits in the cell that comes first in raster order. Field order
/// gives the derived ordering: orientation, then filter1, then filter2.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Domino {
    orientation: Orientation,
    filter1: Filter,
    filter2: Filter,
}

/// Every distinct domino, indexed by [`Domino::value`].
pub const ALL_DOMINOES: [Domino; 8] = [
    Domino::new(Orientation::Horizontal, Filter::Pos45, Filter::Pos45),
    Domino::new(Orientation::Horizontal, Filter::Pos45, Filter::Neg45),
    Domino::new(Orientation::Horizontal, Filter::Neg45, Filter::Pos45),
    Domino::new(Orientation::Horizontal, Filter::Neg45, Filter::Neg45),
    Domino::new(Orientation::Vertical, Filter::Pos45, Filter::Pos45),
    Domino::new(Orientation::Vertical, Filter::Pos45, Filter::Neg45),
    Domino::new(Orientation::Vertical, Filter::Neg45, Filter::Pos45),
    Domino::new(Orientation::Vertical, Filter::Neg45, Filter::Neg45),
];

impl Domino {
    pub const fn new(orientation: Orientation, filter1: Filter, filter2: Filter) -> Self {
        Self {
            orientation,
            filter1,
            filter2,
        }
    }

    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub const fn filter1(&self) -> Filter {
        self.filter1
    }

    pub const fn filter2(&self) -> Filter {
        self.filter2
    }

    /// Index into [`ALL_DOMINOES`]: `orientation << 2 | filter1 << 1 | filter2`.
    pub const fn value(&self) -> u8 {
        let orientation = match self.orientation {
            Orientation::Horizontal => 0,
            Orientation::Vertical => 1,
        };
        orientation << 2 | self.filter1.bit() << 1 | self.filter2.bit()
    }

    pub fn from_value(value: u8) -> Option<Self> {
        ALL_DOMINOES.get(usize::from(value)).copied()
    }

    /// Every `(row, col)` at which this domino can be anchored on an `n`×`n` board.
    pub fn places(&self, n: usize) -> impl Iterator<Item = (usize, usize)> + Clone {
        let (dr, dc) = self.orientation.step();
        (0..n.saturating_sub(dr))
            .flat_map(move |row| (0..n.saturating_sub(dc)).map(move |col| (row, col)))
    }

    /// Mirror image in a vertical axis (columns swap).
    pub const fn reflect_horizontally(&self) -> Self {
        match self.orientation {
            Orientation::Horizontal => {
                Self::new(self.orientation, self.filter2.other(), self.filter1.other())
            }
            Orientation::Vertical => {
                Self::new(self.orientation, self.filter1.other(), self.filter2.other())
            }
        }
    }

    /// Mirror image in a horizontal axis (rows swap).
    pub const fn reflect_vertically(&self) -> Self {
        match self.orientation {
            Orientation::Horizontal => {
                Self::new(self.orientation, self.filter1.other(), self.filter2.other())
            }
            Orientation::Vertical => {
                Self::new(self.orientation, self.filter2.other(), self.filter1.other())
            }
        }
    }

    pub const fn transpose(&self) -> Self {
        Self::new(self.orientation.transpose(), self.filter1, self.filter2)
    }
}

impl Display for Domino {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.orientation,
            self.filter1.glyph(),
            self.filter2.glyph()
        )
    }
}

/// A domino anchored at column `x`, row `y`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlacedDomino {
    pub domino: Domino,
    pub x: usize,
    pub y: usize,
}

impl PlacedDomino {
    pub const fn new(domino: Domino, x: usize, y: usize) -> Self {
        Self { domino, x, y }
    }

    /// `[row, col]` indices of the two cells, first cell first.
    pub const fn cells(&self) -> [[usize; 2]; 2] {
        let (dr, dc) = self.domino.orientation.step();
        [[self.y, self.x], [self.y + dr, self.x + dc]]
    }

    pub const fn transpose(&self) -> Self {
        Self::new(self.domino.transpose(), self.y, self.x)
    }

    // both mirrors assume the domino lies on an n×n board

    pub const fn reflect_horizontally(&self, n: usize) -> Self {
        let (_, dc) = self.domino.orientation.step();
        Self::new(self.domino.reflect_horizontally(), n - 1 - self.x - dc, self.y)
    }

    pub const fn reflect_vertically(&self, n: usize) -> Self {
        let (dr, _) = self.domino.orientation.step();
        Self::new(self.domino.reflect_vertically(), self.x, n - 1 - self.y - dr)
    }
}
