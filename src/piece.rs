use std::fmt;

use crate::config::{CELLS, COLS, ROWS};
use crate::error::ConfigError;

/// A cell of the 5x4 board, numbered row-major from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell(u8);

impl Cell {
    pub fn new(index: u8) -> Option<Self> {
        (index < CELLS).then_some(Self(index))
    }

    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn row(self) -> u8 {
        self.0 / COLS
    }

    #[inline]
    pub fn col(self) -> u8 {
        self.0 % COLS
    }

    /// The neighbouring cell in `dir`, or `None` at the board edge. Horizontal
    /// steps never wrap onto the next row.
    pub fn step(self, dir: Direction) -> Option<Self> {
        match dir {
            Direction::Up => (self.0 >= COLS).then(|| Self(self.0 - COLS)),
            Direction::Down => Self::new(self.0 + COLS),
            Direction::Left => (self.col() != 0).then(|| Self(self.0 - 1)),
            Direction::Right => (self.col() != COLS - 1).then(|| Self(self.0 + 1)),
        }
    }

    pub fn all() -> impl Iterator<Item = Cell> {
        (0..CELLS).map(Cell)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A set of cells packed into the low 20 bits of a `u32`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CellSet(u32);

impl CellSet {
    pub const EMPTY: Self = Self(0);
    pub const FULL: Self = Self((1 << CELLS) - 1);

    #[inline]
    pub fn single(cell: Cell) -> Self {
        Self(1 << cell.0)
    }

    #[inline]
    pub fn contains(self, cell: Cell) -> bool {
        self.0 & (1 << cell.0) != 0
    }

    #[inline]
    pub fn insert(&mut self, cell: Cell) {
        self.0 |= 1 << cell.0;
    }

    #[inline]
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    #[inline]
    pub fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    #[inline]
    pub fn is_subset(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Cells in ascending order.
    pub fn iter(self) -> impl Iterator<Item = Cell> {
        Cell::all().filter(move |&c| self.contains(c))
    }

    /// The two cells of a two-cell set, lowest first.
    pub fn pair(self) -> Option<[Cell; 2]> {
        if self.len() != 2 {
            return None;
        }
        let mut it = self.iter();
        Some([it.next()?, it.next()?])
    }
}

impl FromIterator<Cell> for CellSet {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for cell in iter {
            set.insert(cell);
        }
        set
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Change in cell index caused by one step.
    pub fn delta(self) -> i8 {
        match self {
            Direction::Up => -(COLS as i8),
            Direction::Down => COLS as i8,
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Shape {
    /// 2x2 block; the piece that has to reach the goal.
    Big,
    /// 1 row, 2 columns.
    HorizontalPair,
    /// 2 rows, 1 column.
    VerticalPair,
    Single,
}

impl Shape {
    pub const ALL: [Shape; 4] = [
        Shape::Big,
        Shape::HorizontalPair,
        Shape::VerticalPair,
        Shape::Single,
    ];

    pub fn width(self) -> u8 {
        match self {
            Shape::Big | Shape::HorizontalPair => 2,
            Shape::VerticalPair | Shape::Single => 1,
        }
    }

    pub fn height(self) -> u8 {
        match self {
            Shape::Big | Shape::VerticalPair => 2,
            Shape::HorizontalPair | Shape::Single => 1,
        }
    }

    /// How many pieces of this shape every board carries.
    pub fn expected_count(self) -> usize {
        match self {
            Shape::Big | Shape::HorizontalPair => 1,
            Shape::VerticalPair | Shape::Single => 4,
        }
    }

    pub fn label(self) -> char {
        match self {
            Shape::Big => 'B',
            Shape::HorizontalPair => 'H',
            Shape::VerticalPair => 'V',
            Shape::Single => 'S',
        }
    }

    pub fn from_label(label: char) -> Option<Self> {
        match label.to_ascii_uppercase() {
            'B' => Some(Shape::Big),
            'H' => Some(Shape::HorizontalPair),
            'V' => Some(Shape::VerticalPair),
            'S' | 'Y' => Some(Shape::Single),
            _ => None,
        }
    }

    /// Order in which directions are tried. Fixes which of several
    /// equally short solutions the search returns.
    pub fn probe_order(self) -> &'static [Direction; 4] {
        use Direction::*;
        match self {
            Shape::Big => &[Left, Up, Right, Down],
            Shape::HorizontalPair => &[Up, Down, Left, Right],
            Shape::VerticalPair => &[Left, Right, Up, Down],
            Shape::Single => &[Up, Down, Left, Right],
        }
    }

    pub fn fits(self, anchor: Cell) -> bool {
        anchor.col() + self.width() <= COLS && anchor.row() + self.height() <= ROWS
    }

    /// Cells covered when anchored at `anchor`. Only meaningful when
    /// [`Shape::fits`] holds.
    fn cover(self, anchor: Cell) -> CellSet {
        let a = anchor.index();
        let bits: u32 = match self {
            Shape::Big => 0b11 | (0b11 << COLS),
            Shape::HorizontalPair => 0b11,
            Shape::VerticalPair => 0b1 | (0b1 << COLS),
            Shape::Single => 0b1,
        };
        CellSet(bits << a).intersection(CellSet::FULL)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Shape::Big => "big",
            Shape::HorizontalPair => "horizontal",
            Shape::VerticalPair => "vertical",
            Shape::Single => "single",
        };
        f.write_str(s)
    }
}

/// A placed piece: a shape and its top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Piece {
    anchor: Cell,
    shape: Shape,
}

impl Piece {
    pub fn new(shape: Shape, anchor: u8) -> Result<Self, ConfigError> {
        match Cell::new(anchor) {
            Some(cell) if shape.fits(cell) => Ok(Self {
                anchor: cell,
                shape,
            }),
            _ => Err(ConfigError::OutOfBounds { shape, anchor }),
        }
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline]
    pub fn anchor(&self) -> Cell {
        self.anchor
    }

    pub fn footprint(&self) -> CellSet {
        self.shape.cover(self.anchor)
    }

    /// The same piece shifted one step, if it stays on the board.
    fn shifted(&self, dir: Direction) -> Option<Self> {
        let anchor = self.anchor.step(dir)?;
        self.shape.fits(anchor).then_some(Self {
            anchor,
            shape: self.shape,
        })
    }

    /// Cells the piece would newly cover by moving one step in `dir`.
    fn leading_edge(&self, dir: Direction) -> Option<CellSet> {
        let moved = self.shifted(dir)?;
        Some(moved.footprint().difference(self.footprint()))
    }

    /// A move is legal when every newly covered cell is currently empty.
    /// For the long side of a piece that means both cells of the empty pair
    /// have to line up; for the short side one empty cell is enough.
    pub fn can_move(&self, dir: Direction, empties: CellSet) -> bool {
        self.leading_edge(dir)
            .is_some_and(|edge| edge.is_subset(empties))
    }

    /// Legal directions, in the shape's probe order.
    pub fn legal_moves(&self, empties: CellSet) -> impl Iterator<Item = Direction> + '_ {
        self.shape
            .probe_order()
            .iter()
            .copied()
            .filter(move |&dir| self.can_move(dir, empties))
    }

    /// Moves the piece and returns it together with the new pair of empty
    /// cells, or `None` if the move is not legal.
    pub fn apply(&self, dir: Direction, empties: [Cell; 2]) -> Option<(Self, [Cell; 2])> {
        let empty_set: CellSet = empties.into_iter().collect();
        if !self.can_move(dir, empty_set) {
            return None;
        }
        let moved = self.shifted(dir)?;
        let vacated = self.footprint().difference(moved.footprint());
        let next = empty_set.difference(moved.footprint()).union(vacated);
        Some((moved, next.pair()?))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.shape, self.anchor)
    }
}
