use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{CELLS, COLS, PIECE_COUNT, ROWS, START_LAYOUT};
use crate::error::ConfigError;
use crate::piece::{Cell, CellSet, Direction, Piece, Shape};

/// Label used for empty cells in rendered grids and parsed layouts.
pub const EMPTY_LABEL: char = '.';

/// Order-independent packed identity of a board: three bits per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey(pub u64);

const KEY_BITS: u32 = 3;
const KEY_EMPTY: u64 = 5;

fn anchor_code(shape: Shape) -> u64 {
    match shape {
        Shape::Big => 1,
        Shape::HorizontalPair => 2,
        Shape::VerticalPair => 3,
        Shape::Single => 4,
    }
}

/// One piece sliding one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub piece: Piece,
    pub direction: Direction,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.piece, self.direction)
    }
}

/// An immutable board position.
///
/// Pieces are kept sorted by anchor and the empties in ascending order, so a
/// physical configuration has exactly one in-memory form. Equality and
/// hashing still go through [`BoardState::key`].
#[derive(Debug, Clone, Copy)]
pub struct BoardState {
    pieces: [Piece; PIECE_COUNT],
    empties: [Cell; 2],
}

impl BoardState {
    /// Builds a board from its pieces; the empty cells are whatever is left.
    pub fn new<I: IntoIterator<Item = Piece>>(pieces: I) -> Result<Self, ConfigError> {
        let mut pieces: Vec<Piece> = pieces.into_iter().collect();

        let mut occupied = CellSet::EMPTY;
        for piece in &pieces {
            let clash = occupied.intersection(piece.footprint());
            if let Some(cell) = clash.iter().next() {
                return Err(ConfigError::Overlap(cell));
            }
            occupied = occupied.union(piece.footprint());
        }

        for shape in Shape::ALL {
            let found = pieces.iter().filter(|p| p.shape() == shape).count();
            let expected = shape.expected_count();
            if found != expected {
                return Err(ConfigError::ShapeCount {
                    shape,
                    expected,
                    found,
                });
            }
        }

        let free = CellSet::FULL.difference(occupied);
        let empties = free
            .pair()
            .ok_or(ConfigError::WrongEmptyCount(free.len()))?;

        pieces.sort_unstable();
        let pieces: [Piece; PIECE_COUNT] = pieces
            .try_into()
            .map_err(|_| ConfigError::WrongEmptyCount(free.len()))?;

        Ok(Self { pieces, empties })
    }

    /// The puzzle's starting position.
    pub fn standard() -> Result<Self, ConfigError> {
        START_LAYOUT.parse()
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn empties(&self) -> [Cell; 2] {
        self.empties
    }

    pub fn empty_set(&self) -> CellSet {
        self.empties.into_iter().collect()
    }

    pub fn occupied(&self) -> CellSet {
        self.pieces
            .iter()
            .fold(CellSet::EMPTY, |acc, p| acc.union(p.footprint()))
    }

    pub fn big_anchor(&self) -> Option<Cell> {
        self.pieces
            .iter()
            .find(|p| p.shape() == Shape::Big)
            .map(|p| p.anchor())
    }

    pub fn key(&self) -> StateKey {
        let mut key = 0u64;
        for piece in &self.pieces {
            key |= anchor_code(piece.shape()) << (piece.anchor().index() as u32 * KEY_BITS);
        }
        for cell in self.empties {
            key |= KEY_EMPTY << (cell.index() as u32 * KEY_BITS);
        }
        StateKey(key)
    }

    /// Every move available from here: pieces by ascending anchor, each
    /// piece's directions in its shape's probe order.
    pub fn possible_moves(&self) -> Vec<Move> {
        let empties = self.empty_set();
        let mut out = Vec::with_capacity(8);
        for &piece in &self.pieces {
            out.extend(
                piece
                    .legal_moves(empties)
                    .map(|direction| Move { piece, direction }),
            );
        }
        out
    }

    /// The board after `mv`, or `None` if the piece is not here or cannot
    /// move that way.
    pub fn transition(&self, mv: Move) -> Option<Self> {
        let slot = self.pieces.iter().position(|&p| p == mv.piece)?;
        let (moved, empties) = mv.piece.apply(mv.direction, self.empties)?;

        let mut pieces = self.pieces;
        pieces[slot] = moved;
        pieces.sort_unstable();
        Some(Self { pieces, empties })
    }

    /// All boards one move away, paired with the move that reaches them.
    pub fn successors(&self) -> impl Iterator<Item = (Move, BoardState)> + '_ {
        self.possible_moves()
            .into_iter()
            .filter_map(move |mv| self.transition(mv).map(|next| (mv, next)))
    }

    /// One label per cell, row-major.
    pub fn render(&self) -> [char; CELLS as usize] {
        let mut grid = [EMPTY_LABEL; CELLS as usize];
        for piece in &self.pieces {
            for cell in piece.footprint().iter() {
                grid[cell.index() as usize] = piece.shape().label();
            }
        }
        grid
    }

    /// Random walk of `steps` legal moves.
    pub fn scramble<R: Rng + ?Sized>(&self, rng: &mut R, steps: usize) -> Self {
        let mut current = *self;
        for _ in 0..steps {
            let Some(&mv) = current.possible_moves().choose(rng) else {
                break;
            };
            if let Some(next) = current.transition(mv) {
                current = next;
            }
        }
        current
    }
}

impl PartialEq for BoardState {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for BoardState {}

impl Hash for BoardState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.render().chunks(COLS as usize) {
            for &label in row {
                write!(f, "{}", label)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Parses rows of labels separated by `/` or newlines, e.g.
/// `.BB./VBBV/VHHV/VSSV/VSSV`. `X` is accepted for empty and `Y` for single.
impl FromStr for BoardState {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s
            .split(|c: char| c == '/' || c == '\n')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .collect();
        if rows.len() != ROWS as usize {
            return Err(ConfigError::BadRowCount(rows.len()));
        }

        let mut labels: Vec<Option<Shape>> = Vec::with_capacity(CELLS as usize);
        for (row, text) in rows.iter().enumerate() {
            let len = text.chars().count();
            if len != COLS as usize {
                return Err(ConfigError::BadRowWidth { row, len });
            }
            for c in text.chars() {
                let label = match c {
                    EMPTY_LABEL | 'X' | 'x' => None,
                    other => Some(
                        Shape::from_label(other).ok_or(ConfigError::UnknownLabel(other))?,
                    ),
                };
                labels.push(label);
            }
        }

        let mut claimed = CellSet::EMPTY;
        let mut pieces = Vec::with_capacity(PIECE_COUNT);
        for cell in Cell::all() {
            let Some(shape) = labels[cell.index() as usize] else {
                continue;
            };
            if claimed.contains(cell) {
                continue;
            }
            let broken = ConfigError::BrokenPiece {
                shape,
                anchor: cell,
            };
            let piece = Piece::new(shape, cell.index()).map_err(|_| broken.clone())?;
            let footprint = piece.footprint();
            let intact = footprint
                .iter()
                .all(|c| labels[c.index() as usize] == Some(shape) && !claimed.contains(c));
            if !intact {
                return Err(broken);
            }
            claimed = claimed.union(footprint);
            pieces.push(piece);
        }

        BoardState::new(pieces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(shape: Shape, anchor: u8) -> Piece {
        Piece::new(shape, anchor).unwrap()
    }

    fn start_pieces() -> Vec<Piece> {
        vec![
            piece(Shape::Big, 1),
            piece(Shape::HorizontalPair, 9),
            piece(Shape::VerticalPair, 4),
            piece(Shape::VerticalPair, 7),
            piece(Shape::VerticalPair, 12),
            piece(Shape::VerticalPair, 15),
            piece(Shape::Single, 13),
            piece(Shape::Single, 14),
            piece(Shape::Single, 17),
            piece(Shape::Single, 18),
        ]
    }

    #[test]
    fn standard_layout_matches_the_piece_list() {
        let parsed = BoardState::standard().unwrap();
        let built = BoardState::new(start_pieces()).unwrap();
        assert_eq!(parsed, built);
        assert_eq!(
            parsed.empties(),
            [Cell::new(0).unwrap(), Cell::new(3).unwrap()]
        );
        assert_eq!(parsed.big_anchor(), Cell::new(1));
    }

    #[test]
    fn identity_ignores_piece_order() {
        let mut reversed = start_pieces();
        reversed.reverse();
        let a = BoardState::new(start_pieces()).unwrap();
        let b = BoardState::new(reversed).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn render_and_display() {
        let board = BoardState::standard().unwrap();
        let grid: String = board.render().iter().collect();
        assert_eq!(grid, ".BB.VBBVVHHVVSSVVSSV");
        assert_eq!(board.to_string(), ".BB.\nVBBV\nVHHV\nVSSV\nVSSV\n");
    }

    #[test]
    fn start_position_moves() {
        let board = BoardState::standard().unwrap();
        let moves = board.possible_moves();
        // Only the two outer vertical pieces can slide up into the corners.
        assert_eq!(
            moves,
            vec![
                Move {
                    piece: piece(Shape::VerticalPair, 4),
                    direction: Direction::Up,
                },
                Move {
                    piece: piece(Shape::VerticalPair, 7),
                    direction: Direction::Up,
                },
            ]
        );
    }

    #[test]
    fn transition_moves_one_piece() {
        let board = BoardState::standard().unwrap();
        let mv = Move {
            piece: piece(Shape::VerticalPair, 4),
            direction: Direction::Up,
        };
        let next = board.transition(mv).unwrap();
        assert_eq!(next.to_string(), "VBB.\nVBBV\n.HHV\nVSSV\nVSSV\n");
        assert_eq!(next.empties(), [Cell::new(3).unwrap(), Cell::new(8).unwrap()]);
        assert_ne!(next, board);
    }

    #[test]
    fn transition_rejects_absent_pieces_and_blocked_moves() {
        let board = BoardState::standard().unwrap();
        let absent = Move {
            piece: piece(Shape::Single, 0),
            direction: Direction::Right,
        };
        assert!(board.transition(absent).is_none());
        let blocked = Move {
            piece: piece(Shape::Big, 1),
            direction: Direction::Down,
        };
        assert!(board.transition(blocked).is_none());
    }

    #[test]
    fn rejects_overlapping_pieces() {
        let mut pieces = start_pieces();
        pieces[6] = piece(Shape::Single, 14);
        assert_eq!(
            BoardState::new(pieces),
            Err(ConfigError::Overlap(Cell::new(14).unwrap()))
        );
    }

    #[test]
    fn rejects_wrong_shape_counts() {
        let mut pieces = start_pieces();
        pieces[5] = piece(Shape::Single, 15);
        assert!(matches!(
            BoardState::new(pieces),
            Err(ConfigError::ShapeCount {
                shape: Shape::VerticalPair,
                expected: 4,
                found: 3,
            })
        ));

        let mut short = start_pieces();
        short.pop();
        assert!(matches!(
            BoardState::new(short),
            Err(ConfigError::ShapeCount {
                shape: Shape::Single,
                ..
            })
        ));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            "....".parse::<BoardState>(),
            Err(ConfigError::BadRowCount(1))
        );
        assert_eq!(
            ".BB./VBBV/VHHV/VSSV/VSS".parse::<BoardState>(),
            Err(ConfigError::BadRowWidth { row: 4, len: 3 })
        );
        assert_eq!(
            ".BB./VBBV/VHHV/VSQV/VSSV".parse::<BoardState>(),
            Err(ConfigError::UnknownLabel('Q'))
        );
        // A lone H has no partner.
        assert!(matches!(
            ".BB./VBBV/VH.V/VSSV/VSSV".parse::<BoardState>(),
            Err(ConfigError::BrokenPiece {
                shape: Shape::HorizontalPair,
                ..
            })
        ));
    }

    #[test]
    fn parses_newline_layout_with_x_and_y_letters() {
        let text = "XBBX\nVBBV\nVHHV\nVYYV\nVYYV\n";
        assert_eq!(
            text.parse::<BoardState>().unwrap(),
            BoardState::standard().unwrap()
        );
    }

    #[test]
    fn key_tells_boards_apart() {
        let board = BoardState::standard().unwrap();
        let keys: Vec<StateKey> = board.successors().map(|(_, s)| s.key()).collect();
        assert_eq!(keys.len(), 2);
        assert_ne!(keys[0], keys[1]);
        assert!(keys.iter().all(|&k| k != board.key()));
    }
}
