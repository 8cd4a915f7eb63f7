use super::{
    board::Board,
    shape::{self, ShapeCells},
};

/// One of the seven piece kinds.
///
/// "No piece" (an empty held slot, a cleared cell) is `Option<PieceKind>` or
/// [`Block::Empty`](super::board::Block) at the use site, not a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    I = 0,
    O = 1,
    T = 2,
    J = 3,
    L = 4,
    S = 5,
    Z = 6,
}

impl PieceKind {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    /// All kinds, in a fixed order. Fresh bags start from this.
    pub const ALL: [Self; Self::LEN] = [
        Self::I,
        Self::O,
        Self::T,
        Self::J,
        Self::L,
        Self::S,
        Self::Z,
    ];

    /// Occupied cells at `rotation`, as offsets into the 4×4 bounding box.
    pub fn cells(self, rotation: PieceRotation) -> impl Iterator<Item = (u8, u8)> {
        shape::shape_cells(self, rotation).into_iter()
    }

    /// Whether the box cell at `(x, y)` is occupied at `rotation`.
    #[must_use]
    pub fn is_occupied(self, rotation: PieceRotation, cell: (u8, u8)) -> bool {
        shape::shape_cells(self, rotation).contains(&cell)
    }

    /// Width and height of the occupied part of the box at `rotation`.
    ///
    /// Preview renderers use this to size and center the piece.
    #[must_use]
    pub fn size(self, rotation: PieceRotation) -> (u8, u8) {
        let cells: ShapeCells = shape::shape_cells(self, rotation);
        let width = cells.iter().map(|&(x, _)| x).max().unwrap_or(0) + 1;
        let height = cells.iter().map(|&(_, y)| y).max().unwrap_or(0) + 1;
        (width, height)
    }
}

/// Rotation state of a piece.
///
/// `0` is the spawn orientation; each step is 90° clockwise. Rotation
/// advances by fixed-step modular arithmetic only, so an out-of-range state
/// cannot be constructed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PieceRotation(u8);

impl PieceRotation {
    #[must_use]
    pub fn rotated_right(self) -> Self {
        Self((self.0 + 1) % 4)
    }

    #[must_use]
    pub fn rotated_left(self) -> Self {
        Self((self.0 + 3) % 4)
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Position of a piece's 4×4 bounding box, in board coordinates.
///
/// (0, 0) is the board's top-left; x grows rightward, y downward.
/// Coordinates are signed because the box may legally hang past the board
/// edge as long as its occupied cells stay inside; the board's collision
/// check is what decides validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PiecePosition {
    x: i16,
    y: i16,
}

impl PiecePosition {
    /// Spawn placement: column 3 centers the box on a 10-wide board, row 0
    /// puts it in the hidden buffer.
    pub(crate) const SPAWN: Self = Self::new(3, 0);

    #[must_use]
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i16 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i16 {
        self.y
    }
}

/// A piece in flight: kind, rotation state, and bounding-box position.
///
/// Pieces are immutable; movement and rotation return new values. Whether a
/// candidate actually fits is [`Board::is_colliding`]'s call, not the
/// piece's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    rotation: PieceRotation,
    position: PiecePosition,
}

impl Piece {
    /// A fresh piece of `kind` at the spawn position and orientation.
    #[must_use]
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: PieceRotation::default(),
            position: PiecePosition::SPAWN,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    /// The board cells this piece occupies.
    pub fn cells(&self) -> impl Iterator<Item = (i16, i16)> + '_ {
        self.kind.cells(self.rotation).map(move |(dx, dy)| {
            (
                self.position.x + i16::from(dx),
                self.position.y + i16::from(dy),
            )
        })
    }

    #[must_use]
    pub fn translated(&self, dx: i16, dy: i16) -> Self {
        Self {
            position: PiecePosition::new(self.position.x + dx, self.position.y + dy),
            ..*self
        }
    }

    #[must_use]
    pub fn rotated_right(&self) -> Self {
        Self {
            rotation: self.rotation.rotated_right(),
            ..*self
        }
    }

    #[must_use]
    pub fn rotated_left(&self) -> Self {
        Self {
            rotation: self.rotation.rotated_left(),
            ..*self
        }
    }

    /// This piece dropped straight down to the last position that fits:
    /// the ghost projection, and the hard-drop landing spot.
    #[must_use]
    pub fn dropped(&self, board: &Board) -> Self {
        let mut dropped = *self;
        loop {
            let next = dropped.translated(0, 1);
            if board.is_colliding(next) {
                return dropped;
            }
            dropped = next;
        }
    }
}
