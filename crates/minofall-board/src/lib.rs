pub use self::{
    bag::PieceBag,
    board::{GridBoard, HEIGHT, WIDTH},
    editor::GridEditor,
    piece::{Piece, PieceKind},
};

pub mod bag;
pub mod board;
pub mod editor;
pub mod piece;
