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

//! Legal move generation.
//!
//! The legal moves of a side are derived from the pseudo-legal moves of its
//! pieces, depending on how many enemy pieces attack the king:
//!
//! * none: every move that does not expose the king,
//! * one: king moves, and moves of other pieces that capture the checker or
//!   block its line,
//! * two or more: king moves only.
//!
//! Moves of pieces other than the king are always confirmed by playing them
//! on a scratch copy of the board.

use std::collections::{btree_map, BTreeMap};

use tracing::trace;

use crate::{
    attacks,
    board::Board,
    color::Color,
    execute::{en_passant_victim, rook_move},
    kind::PieceKind,
    m::{category_of, Move, MoveCategory, MoveSet, Target},
    piece::{Piece, PieceId},
    position::Position,
};

/// Legal moves of the side to move, keyed by origin.
///
/// Only origins with at least one legal move are present.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LegalMoves {
    moves: BTreeMap<Position, MoveSet>,
}

impl LegalMoves {
    /// Legal destinations of the piece on `from`.
    pub fn get(&self, from: Position) -> Option<&MoveSet> {
        self.moves.get(&from)
    }

    /// The category of the legal move `from` to `to`, or `None` if there is
    /// no such legal move.
    pub fn category(&self, from: Position, to: Position) -> Option<MoveCategory> {
        self.get(from).and_then(|set| category_of(set, to))
    }

    pub fn contains(&self, m: Move) -> bool {
        self.category(m.from, m.to).is_some()
    }

    /// Checks if there are no legal moves at all, i.e. the side to move is
    /// checkmated or stalemated.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Total number of legal moves. Promotions count once per destination.
    pub fn len(&self) -> usize {
        self.moves.values().map(|set| set.len()).sum()
    }

    /// Origins with at least one legal move, in position order.
    pub fn origins(&self) -> impl Iterator<Item = Position> + '_ {
        self.moves.keys().copied()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Position, MoveSet> {
        self.moves.iter()
    }

    /// Every legal move with its category.
    pub fn moves(&self) -> impl Iterator<Item = (Move, MoveCategory)> + '_ {
        self.moves.iter().flat_map(|(&from, set)| {
            set.iter()
                .map(move |target| (Move::new(from, target.to), target.category))
        })
    }

    fn insert(&mut self, from: Position, set: MoveSet) {
        if !set.is_empty() {
            self.moves.insert(from, set);
        }
    }
}

impl<'a> IntoIterator for &'a LegalMoves {
    type Item = (&'a Position, &'a MoveSet);
    type IntoIter = btree_map::Iter<'a, Position, MoveSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Computes the legal moves of `mover`, whose king stands on `king`.
///
/// `last_move` is the previous move of the game, if any, and enables en
/// passant.
pub fn legal_moves(
    board: &Board,
    mover: Color,
    king: Position,
    last_move: Option<Move>,
) -> LegalMoves {
    let checkers = attacks::attacking_pieces(board, king, mover);
    let mut legals = LegalMoves::default();

    match checkers.as_slice() {
        [] => {
            for (_, piece) in own_pieces(board, mover) {
                let set = piece
                    .pseudo_legal_moves(board, last_move)
                    .into_iter()
                    .filter(|t| !puts_king_in_check(board, mover, king, mv(piece, t), t.category))
                    .collect();
                legals.insert(piece.position(), set);
            }
        }
        &[checker] => {
            let checker = board.get(checker);
            let line = checker.line_of_attack(board, king);
            for (_, piece) in own_pieces(board, mover) {
                let pseudo = piece.pseudo_legal_moves(board, last_move);
                let set = if piece.kind() == PieceKind::King {
                    pseudo
                } else {
                    pseudo
                        .into_iter()
                        .filter(|t| answers_check(checker, &line, mv(piece, t), t.category))
                        .filter(|t| {
                            !puts_king_in_check(board, mover, king, mv(piece, t), t.category)
                        })
                        .collect()
                };
                legals.insert(piece.position(), set);
            }
        }
        _ => {
            if let Some(piece) = board.piece_at(king) {
                legals.insert(king, piece.pseudo_legal_moves(board, last_move));
            }
        }
    }

    trace!(
        %mover,
        checkers = checkers.len(),
        moves = legals.len(),
        "computed legal moves"
    );

    legals
}

fn own_pieces(board: &Board, color: Color) -> impl Iterator<Item = (PieceId, &Piece)> {
    board.pieces().filter(move |(_, piece)| piece.color() == color)
}

fn mv(piece: &Piece, target: &Target) -> Move {
    Move::new(piece.position(), target.to)
}

/// Checks if a non-king move lands on the line of attack of the only
/// checker. An en passant capture of a checking pawn also qualifies.
fn answers_check(checker: &Piece, line: &MoveSet, m: Move, category: MoveCategory) -> bool {
    category_of(line, m.to).is_some()
        || (category == MoveCategory::EnPassant
            && checker.position() == en_passant_victim(m))
}

/// Plays `m` on a scratch copy of the board and checks if the king of
/// `mover` ends up attacked. The live board is never touched.
pub fn puts_king_in_check(
    board: &Board,
    mover: Color,
    king: Position,
    m: Move,
    category: MoveCategory,
) -> bool {
    let mut scratch = board.snapshot();

    match category {
        MoveCategory::EnPassant => {
            scratch.remove(en_passant_victim(m));
        }
        MoveCategory::KingsideCastle | MoveCategory::QueensideCastle => {
            if let Some(rook) = rook_move(m, category) {
                scratch.relocate(rook.from, rook.to);
            }
        }
        MoveCategory::Standard | MoveCategory::Capture | MoveCategory::Promotion => (),
    }

    scratch.relocate(m.from, m.to);
    let king = if m.from == king { m.to } else { king };

    !attacks::attacking_pieces(&scratch, king, mover).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(name: &str) -> Position {
        name.parse().expect("valid square")
    }

    #[test]
    fn test_start_position() {
        let board = Board::new();
        let legals = legal_moves(&board, Color::White, pos("e1"), None);
        assert_eq!(legals.len(), 20);
        assert_eq!(legals.origins().count(), 10);
        assert!(legals.get(pos("e1")).is_none());
        assert_eq!(legals.category(pos("g1"), pos("f3")), Some(MoveCategory::Standard));
        assert!(!legals.contains(Move::new(pos("e2"), pos("e5"))));
    }

    #[test]
    fn test_pinned_piece_stays() {
        let mut board = Board::empty();
        board.place(Color::White, PieceKind::King, pos("e1"));
        board.place(Color::White, PieceKind::Knight, pos("e2"));
        board.place(Color::Black, PieceKind::Rook, pos("e8"));
        board.place(Color::Black, PieceKind::King, pos("a8"));
        let legals = legal_moves(&board, Color::White, pos("e1"), None);
        assert!(legals.get(pos("e2")).is_none());
    }

    #[test]
    fn test_single_check_block_or_capture() {
        let mut board = Board::empty();
        board.place(Color::White, PieceKind::King, pos("e1"));
        board.place(Color::White, PieceKind::Knight, pos("c3"));
        board.place(Color::White, PieceKind::Bishop, pos("g6"));
        board.place(Color::Black, PieceKind::Rook, pos("e8"));
        board.place(Color::Black, PieceKind::King, pos("a8"));
        let legals = legal_moves(&board, Color::White, pos("e1"), None);

        let knight: Vec<_> = legals.get(pos("c3")).unwrap().iter().map(|t| t.to).collect();
        assert_eq!(knight.len(), 2);
        assert!(knight.contains(&pos("e2")));
        assert!(knight.contains(&pos("e4")));

        let bishop = legals.get(pos("g6")).unwrap();
        assert_eq!(category_of(bishop, pos("e8")), Some(MoveCategory::Capture));
        assert_eq!(category_of(bishop, pos("e4")), Some(MoveCategory::Standard));
        assert_eq!(bishop.len(), 2);
    }

    #[test]
    fn test_double_check_only_king() {
        let mut board = Board::empty();
        board.place(Color::Black, PieceKind::King, pos("e8"));
        board.place(Color::Black, PieceKind::Queen, pos("a5"));
        board.place(Color::White, PieceKind::Rook, pos("e1"));
        board.place(Color::White, PieceKind::Knight, pos("d6"));
        board.place(Color::White, PieceKind::King, pos("a1"));
        let legals = legal_moves(&board, Color::Black, pos("e8"), None);
        assert_eq!(legals.origins().collect::<Vec<_>>(), vec![pos("e8")]);
    }

    #[test]
    fn test_en_passant_removes_checking_pawn() {
        let mut board = Board::empty();
        board.place(Color::Black, PieceKind::King, pos("f5"));
        board.place(Color::Black, PieceKind::Pawn, pos("d4"));
        board.place(Color::White, PieceKind::Pawn, pos("e4"));
        board.place(Color::White, PieceKind::King, pos("a1"));
        let last = Some(Move::new(pos("e2"), pos("e4")));
        let legals = legal_moves(&board, Color::Black, pos("f5"), last);
        assert_eq!(legals.category(pos("d4"), pos("e3")), Some(MoveCategory::EnPassant));
        assert_eq!(legals.category(pos("d4"), pos("d3")), None);
    }

    #[test]
    fn test_en_passant_discovered_check() {
        // Capturing en passant would clear the row between king and rook.
        let mut board = Board::empty();
        board.place(Color::White, PieceKind::King, pos("a5"));
        board.place(Color::White, PieceKind::Pawn, pos("b5"));
        board.place(Color::Black, PieceKind::Pawn, pos("c5"));
        board.place(Color::Black, PieceKind::Rook, pos("h5"));
        board.place(Color::Black, PieceKind::King, pos("h8"));
        let last = Some(Move::new(pos("c7"), pos("c5")));
        let legals = legal_moves(&board, Color::White, pos("a5"), last);
        assert_eq!(legals.category(pos("b5"), pos("c6")), None);
        assert_eq!(legals.category(pos("b5"), pos("b6")), Some(MoveCategory::Standard));
    }

    #[test]
    fn test_puts_king_in_check() {
        let mut board = Board::empty();
        board.place(Color::White, PieceKind::King, pos("e1"));
        board.place(Color::White, PieceKind::Bishop, pos("e2"));
        board.place(Color::Black, PieceKind::Queen, pos("e8"));
        let before = board.clone();
        assert!(puts_king_in_check(
            &board,
            Color::White,
            pos("e1"),
            Move::new(pos("e2"), pos("d3")),
            MoveCategory::Standard,
        ));
        assert_eq!(board, before);
    }
}
