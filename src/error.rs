use crate::piece::{Cell, Shape};

/// Reasons a start configuration is rejected before any search begins.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{shape} anchored at {anchor} does not fit on the board")]
    OutOfBounds { shape: Shape, anchor: u8 },

    #[error("cell {0} is covered by more than one piece")]
    Overlap(Cell),

    #[error("expected {expected} {shape} piece(s), found {found}")]
    ShapeCount {
        shape: Shape,
        expected: usize,
        found: usize,
    },

    #[error("a board leaves exactly 2 empty cells, this one leaves {0}")]
    WrongEmptyCount(usize),

    #[error("layout must have 5 rows, got {0}")]
    BadRowCount(usize),

    #[error("layout row {row} must have 4 cells, got {len}")]
    BadRowWidth { row: usize, len: usize },

    #[error("unknown cell label {0:?}")]
    UnknownLabel(char),

    #[error("{shape} anchored at {anchor} is not a complete piece")]
    BrokenPiece { shape: Shape, anchor: Cell },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("no solution found after testing {positions_tested} positions")]
    NoSolution { positions_tested: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
}
