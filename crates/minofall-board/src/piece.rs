/// The seven tetromino kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PieceKind {
    I,
    O,
    S,
    Z,
    J,
    L,
    T,
}

impl PieceKind {
    pub const LEN: usize = 7;

    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// Cell offsets within a 4×4 box for every kind and rotation.
///
/// Rotation index increases clockwise. Symmetric kinds repeat their
/// distinct orientations so all four indices stay valid.
const SHAPES: [[[(i16, i16); 4]; 4]; PieceKind::LEN] = [
    // I
    [
        [(0, 1), (1, 1), (2, 1), (3, 1)],
        [(2, 0), (2, 1), (2, 2), (2, 3)],
        [(0, 1), (1, 1), (2, 1), (3, 1)],
        [(2, 0), (2, 1), (2, 2), (2, 3)],
    ],
    // O
    [
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
    ],
    // S
    [
        [(1, 0), (2, 0), (0, 1), (1, 1)],
        [(1, 0), (1, 1), (2, 1), (2, 2)],
        [(1, 0), (2, 0), (0, 1), (1, 1)],
        [(1, 0), (1, 1), (2, 1), (2, 2)],
    ],
    // Z
    [
        [(0, 0), (1, 0), (1, 1), (2, 1)],
        [(2, 0), (1, 1), (2, 1), (1, 2)],
        [(0, 0), (1, 0), (1, 1), (2, 1)],
        [(2, 0), (1, 1), (2, 1), (1, 2)],
    ],
    // J
    [
        [(0, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (2, 2)],
        [(1, 0), (1, 1), (0, 2), (1, 2)],
    ],
    // L
    [
        [(2, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (1, 2), (2, 2)],
        [(0, 1), (1, 1), (2, 1), (0, 2)],
        [(0, 0), (1, 0), (1, 1), (1, 2)],
    ],
    // T
    [
        [(1, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (2, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (1, 2)],
        [(1, 0), (0, 1), (1, 1), (1, 2)],
    ],
];

const ROTATIONS: u8 = 4;

/// A falling piece: kind, rotation, and position of its 4×4 box on the
/// board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    rotation: u8,
    x: i16,
    y: i16,
}

impl Piece {
    /// Spawn position at the top center of a standard-width board.
    pub const SPAWN_X: i16 = 3;
    pub const SPAWN_Y: i16 = 0;

    #[must_use]
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: 0,
            x: Self::SPAWN_X,
            y: Self::SPAWN_Y,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Absolute board coordinates of the four occupied cells.
    #[must_use]
    pub fn cells(&self) -> [(i16, i16); 4] {
        SHAPES[self.kind.index()][usize::from(self.rotation)]
            .map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    #[must_use]
    pub fn shifted(&self, dx: i16, dy: i16) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    #[must_use]
    pub fn rotated_cw(&self) -> Self {
        self.rotated(1)
    }

    #[must_use]
    pub fn rotated_ccw(&self) -> Self {
        self.rotated(ROTATIONS - 1)
    }

    fn rotated(&self, delta: u8) -> Self {
        Self {
            rotation: (self.rotation + delta) % ROTATIONS,
            ..*self
        }
    }
}
