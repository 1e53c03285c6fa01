// This file is part of the chessrules library.
// Copyright (C) 2017-2024 Niklas Fiekas <niklas.fiekas@backscattering.de>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

//! Attack analysis: who attacks a square, and which squares a side
//! attacks.
//!
//! # Examples
//!
//! ```
//! use chessrules::{attacks, Board, Color, PieceKind, Position};
//!
//! let mut board = Board::empty();
//! let king = Position::new(7, 4);
//! board.place(Color::White, PieceKind::King, king);
//! board.place(Color::Black, PieceKind::Rook, Position::new(0, 4));
//!
//! let checkers = attacks::attacking_pieces(&board, king, Color::White);
//! assert_eq!(checkers.len(), 1);
//! ```

use arrayvec::ArrayVec;

use crate::{
    bitboard::Bitboard,
    board::Board,
    color::Color,
    kind::PieceKind,
    piece::{Piece, PieceId},
    position::Position,
};

pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, 1),
    (-2, -1),
    (2, -1),
    (2, 1),
    (-1, 2),
    (-1, -2),
    (1, -2),
    (1, 2),
];

pub(crate) const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub(crate) const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

pub(crate) const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, 1), (0, -1)];

pub(crate) const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, 1),
    (1, 1),
    (1, -1),
    (-1, -1),
];

/// Pieces attacking a square. A side never has more than 16 pieces.
pub type Attackers = ArrayVec<PieceId, 16>;

/// Pieces of color `by` that attack `target`, excluding the king of `by`.
///
/// Scans outward from `target`: pawn diagonals, knight offsets, then the
/// first piece on each diagonal and orthogonal ray.
fn scan(board: &Board, target: Position, by: Color) -> Attackers {
    let mut found = Attackers::new();
    let mut collect = |id: PieceId, kinds: &[PieceKind]| {
        let piece = board.get(id);
        if piece.color() == by && kinds.contains(&piece.kind()) {
            found.push(id);
        }
    };

    // A pawn of `by` attacks `target` from one row behind it, as seen
    // from `by`.
    for dcol in [-1, 1] {
        if let Some(id) = target
            .offset(-by.forward(), dcol)
            .and_then(|from| board.id_at(from))
        {
            collect(id, &[PieceKind::Pawn]);
        }
    }

    for &(drow, dcol) in &KNIGHT_OFFSETS {
        if let Some(id) = target.offset(drow, dcol).and_then(|from| board.id_at(from)) {
            collect(id, &[PieceKind::Knight]);
        }
    }

    for (directions, kinds) in [
        (&BISHOP_DIRECTIONS, [PieceKind::Bishop, PieceKind::Queen]),
        (&ROOK_DIRECTIONS, [PieceKind::Rook, PieceKind::Queen]),
    ] {
        for &(drow, dcol) in directions {
            if let Some(id) = first_on_ray(board, target, drow, dcol) {
                collect(id, &kinds);
            }
        }
    }

    found
}

fn first_on_ray(board: &Board, from: Position, drow: i8, dcol: i8) -> Option<PieceId> {
    let mut pos = from;
    while let Some(next) = pos.offset(drow, dcol) {
        if let Some(id) = board.id_at(next) {
            return Some(id);
        }
        pos = next;
    }
    None
}

/// Enemy pieces currently attacking the king of `king_color` standing on
/// `king`. An empty result means the king is not in check.
pub fn attacking_pieces(board: &Board, king: Position, king_color: Color) -> Attackers {
    scan(board, king, !king_color)
}

/// Checks if another piece of the same color covers the square of `piece`.
///
/// Used to stop a king from capturing a defended piece. Defense by the king
/// itself is not considered.
pub fn is_defended(board: &Board, piece: &Piece) -> bool {
    !scan(board, piece.position(), piece.color()).is_empty()
}

/// Union of the squares attacked by every piece of color `by`.
///
/// The king of `by` contributes its neighbouring squares directly.
pub fn attacked_squares(board: &Board, by: Color) -> Bitboard {
    board
        .pieces()
        .filter(|(_, piece)| piece.color() == by)
        .fold(Bitboard::EMPTY, |attacked, (_, piece)| {
            attacked | piece.attacks(board)
        })
}

/// Checks if any piece of color `by` attacks `target`.
pub fn is_attacked(board: &Board, target: Position, by: Color) -> bool {
    attacked_squares(board, by).contains(target)
}
