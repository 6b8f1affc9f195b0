//! Boards and puzzles shared by the unit tests.

use crate::board::Board;
use crate::model::{PlacedDomino, ALL_DOMINOES};

/// Values `[[2,0,0,1],[2,0,0,1],[1,1,0,0],[1,2,0,0]]`, lights `[2,2,1,2,2,2,0,1]`.
pub fn example_board() -> Board {
    Board::with_dominoes(
        4,
        [
            PlacedDomino::new(ALL_DOMINOES[7], 0, 0),
            PlacedDomino::new(ALL_DOMINOES[1], 0, 3),
            PlacedDomino::new(ALL_DOMINOES[0], 0, 2),
            PlacedDomino::new(ALL_DOMINOES[4], 3, 0),
        ],
    )
    .unwrap()
}

pub const EXAMPLE_PUZZLE: &str = r#"{"n": 4, "lights": [2, 2, 1, 2, 2, 2, 0, 1], "dominoes": [7, 1, 0, 4], "initial_placed_dominoes": [{"domino": 7, "i": 0, "j": 0}, {"domino": 4, "i": 1, "j": 0}, {"domino": 0, "i": 2, "j": 1}, {"domino": 1, "i": 2, "j": 0}], "solution": {"values": [[2, 0, 0, 1], [2, 0, 0, 1], [1, 1, 0, 0], [1, 2, 0, 0]], "placed_dominoes": [{"domino": 7, "i": 0, "j": 0}, {"domino": 1, "i": 0, "j": 3}, {"domino": 0, "i": 0, "j": 2}, {"domino": 4, "i": 3, "j": 0}]}}"#;

/// Unique with four pieces and still unique when fewer may be used.
pub const UNIQUE_PUZZLE: &str = r#"{"n": 4, "lights": [2, 2, 1, 1, 0, 2, 2, 1], "dominoes": [5, 0, 5, 1], "initial_placed_dominoes": [{"domino": 5, "i": 0, "j": 0}, {"domino": 0, "i": 2, "j": 0}, {"domino": 5, "i": 1, "j": 0}, {"domino": 1, "i": 2, "j": 1}], "solution": {"values": [[0, 1, 1, 2], [0, 2, 1, 0], [0, 0, 2, 0], [0, 1, 1, 0]], "placed_dominoes": [{"domino": 1, "i": 2, "j": 0}, {"domino": 0, "i": 1, "j": 3}, {"domino": 5, "i": 2, "j": 1}, {"domino": 5, "i": 1, "j": 0}]}}"#;

/// Unique with all four pieces, but three of them also reproduce the lights.
/// The stored answer is the three-piece one.
pub const FEWER_PIECES_PUZZLE: &str = r#"{"n": 4, "lights": [2, 0, 1, 2, 1, 1, 2, 2], "dominoes": [4, 2, 1, 3], "initial_placed_dominoes": [{"domino": 1, "i": 1, "j": 1}, {"domino": 2, "i": 1, "j": 0}, {"domino": 4, "i": 0, "j": 0}, {"domino": 3, "i": 0, "j": 2}], "solution": {"values": [[0, 0, 1, 2], [0, 0, 0, 0], [2, 2, 0, 0], [0, 0, 2, 1]], "placed_dominoes": [{"domino": 1, "i": 2, "j": 0}, {"domino": 2, "i": 2, "j": 3}, {"domino": 3, "i": 0, "j": 2}]}}"#;

pub const THREE_PIECE_PUZZLE: &str = r#"{"n": 4, "lights": [1, 2, 2, 0, 0, 1, 2, 2], "dominoes": [2, 6, 6], "initial_placed_dominoes": [{"domino": 6, "i": 0, "j": 0}, {"domino": 2, "i": 2, "j": 0}, {"domino": 6, "i": 1, "j": 0}], "solution": {"values": [[0, 0, 2, 0], [0, 0, 1, 2], [0, 2, 1, 1], [0, 0, 0, 0]], "placed_dominoes": [{"domino": 2, "i": 1, "j": 2}, {"domino": 6, "i": 3, "j": 1}, {"domino": 6, "i": 2, "j": 0}]}}"#;
