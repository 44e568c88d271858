pub const ROWS: u8 = 5;
pub const COLS: u8 = 4;
pub const CELLS: u8 = ROWS * COLS;

/// Number of pieces on every board: 1 big, 1 horizontal, 4 vertical, 4 single.
pub const PIECE_COUNT: usize = 10;

/// Anchor the big piece has to reach (row 3, column 1).
pub const GOAL_CELL: u8 = 13;

/// The physical puzzle as it comes out of the box.
pub const START_LAYOUT: &str = ".BB./VBBV/VHHV/VSSV/VSSV";

/// Options for a single search run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// Successors deeper than this many moves are neither recorded nor queued.
    pub max_depth: Option<usize>,
}

impl SearchConfig {
    pub fn with_max_depth(depth: usize) -> Self {
        Self {
            max_depth: Some(depth),
        }
    }
}
