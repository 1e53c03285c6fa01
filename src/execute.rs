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

//! Applying categorized moves to a board.

use crate::{
    board::Board,
    game::MoveError,
    kind::PieceKind,
    m::{Move, MoveCategory},
    player::Player,
    position::Position,
};

/// The accompanying rook move of a castling king move.
///
/// ```
/// use chessrules::{execute::rook_move, Move, MoveCategory, Position};
///
/// let e1g1 = Move::new(Position::new(7, 4), Position::new(7, 6));
/// let h1f1 = Move::new(Position::new(7, 7), Position::new(7, 5));
/// assert_eq!(rook_move(e1g1, MoveCategory::KingsideCastle), Some(h1f1));
/// assert_eq!(rook_move(e1g1, MoveCategory::Standard), None);
/// ```
pub fn rook_move(king_move: Move, category: MoveCategory) -> Option<Move> {
    let row = king_move.from.row();
    let (from, to) = match category {
        MoveCategory::KingsideCastle => (7, 5),
        MoveCategory::QueensideCastle => (0, 3),
        _ => return None,
    };
    Some(Move::new(Position::new(row, from), Position::new(row, to)))
}

/// The position of the pawn taken by an en passant capture.
pub fn en_passant_victim(m: Move) -> Position {
    Position::new(m.from.row(), m.to.col())
}

/// Applies `m` to `board`, trusting `category`. Captured pieces are
/// credited to `player`, the owner of the moving piece.
///
/// `promotion` is required for promotions and ignored otherwise.
///
/// # Errors
///
/// Nothing is changed if there is no piece on the origin or the promotion
/// choice is missing or not one of Queen, Rook, Bishop or Knight.
pub fn execute(
    board: &mut Board,
    player: &mut Player,
    m: Move,
    category: MoveCategory,
    promotion: Option<PieceKind>,
) -> Result<(), MoveError> {
    if board.piece_at(m.from).is_none() {
        return Err(MoveError::NoPieceAtSquare { square: m.from });
    }

    match category {
        MoveCategory::Standard | MoveCategory::Capture => {
            if let Some(victim) = board.relocate(m.from, m.to) {
                player.capture(victim);
            }
            board.set_moved(m.to, true);
        }
        MoveCategory::KingsideCastle | MoveCategory::QueensideCastle => {
            board.relocate(m.from, m.to);
            board.set_moved(m.to, true);
            if let Some(rook) = rook_move(m, category) {
                board.relocate(rook.from, rook.to);
                board.set_moved(rook.to, true);
            }
        }
        MoveCategory::EnPassant => {
            if let Some(victim) = board.remove(en_passant_victim(m)) {
                player.capture(victim);
            }
            board.relocate(m.from, m.to);
            board.set_moved(m.to, true);
        }
        MoveCategory::Promotion => {
            let kind = promotion
                .filter(|kind| kind.is_promotable())
                .ok_or(MoveError::InvalidPromotionChoice { choice: promotion })?;
            if let Some(victim) = board.relocate(m.from, m.to) {
                player.capture(victim);
            }
            board.replace(m.to, kind);
        }
    }

    if m.from == player.king() {
        player.set_king(m.to);
    }

    Ok(())
}
