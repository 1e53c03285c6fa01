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

//! Piece placement.
//!
//! # Examples
//!
//! ```
//! use chessrules::{Board, Color, PieceKind, Position};
//!
//! let board = Board::new();
//! let e1 = Position::new(7, 4);
//! let king = board.piece_at(e1).unwrap();
//! assert_eq!(king.kind(), PieceKind::King);
//! assert_eq!(king.color(), Color::White);
//! assert_eq!(board.king_of(Color::White), Some(e1));
//! ```

use std::{
    error::Error,
    fmt::{self, Write as _},
};

use crate::{
    bitboard::Bitboard,
    color::Color,
    kind::PieceKind,
    piece::{Piece, PieceId},
    position::Position,
};

const BACK_ROW: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// An 8x8 grid where each square holds at most one piece.
///
/// Piece records live in an arena owned by the board and squares refer to
/// them by [`PieceId`]. Removing a piece from the grid keeps its record, so
/// captured pieces can still be inspected through their handle.
///
/// Invariants: a handle is referenced by at most one square, and every
/// piece on the grid reports the position of its square.
///
/// Boards compare equal if the same pieces stand on the same squares.
/// Pieces that are off the grid are not compared.
#[derive(Clone)]
pub struct Board {
    pieces: Vec<Piece>,
    squares: [Option<PieceId>; 64],
}

impl Board {
    pub fn empty() -> Board {
        Board {
            pieces: Vec::with_capacity(32),
            squares: [None; 64],
        }
    }

    /// The standard starting position.
    pub fn new() -> Board {
        let mut board = Board::empty();
        for color in Color::ALL {
            for (col, kind) in (0..).zip(BACK_ROW) {
                board.place(color, kind, Position::new(color.back_row(), col));
            }
            for col in 0..8 {
                board.place(color, PieceKind::Pawn, Position::new(color.pawn_row(), col));
            }
        }
        board
    }

    /// Creates a new unmoved piece on `at`. A piece previously on `at` is
    /// taken off the grid.
    pub fn place(&mut self, color: Color, kind: PieceKind, at: Position) -> PieceId {
        let id = PieceId(self.pieces.len() as u16);
        self.pieces.push(Piece::new(color, kind, at));
        self.squares[at.index()] = Some(id);
        id
    }

    /// Gets the record of a piece, on the board or not.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not created by this board (or a board it was
    /// cloned from).
    #[inline]
    pub fn get(&self, id: PieceId) -> &Piece {
        &self.pieces[id.index()]
    }

    #[inline]
    pub fn id_at(&self, at: Position) -> Option<PieceId> {
        self.squares[at.index()]
    }

    #[inline]
    pub fn piece_at(&self, at: Position) -> Option<&Piece> {
        self.id_at(at).map(|id| self.get(id))
    }

    /// Takes the piece on `at` off the grid and returns its handle.
    pub fn remove(&mut self, at: Position) -> Option<PieceId> {
        self.squares[at.index()].take()
    }

    /// Moves the piece on `from` to `to` and returns the handle of a piece
    /// that was standing on `to`, which is now off the grid.
    ///
    /// Does nothing if `from` is empty. Does not touch the `moved` flag.
    pub fn relocate(&mut self, from: Position, to: Position) -> Option<PieceId> {
        let id = self.remove(from)?;
        let displaced = self.squares[to.index()].replace(id);
        self.pieces[id.index()].set_position(to);
        displaced
    }

    /// Puts a piece that is currently off the grid back onto `at`, for
    /// example a captured piece when taking back a move.
    pub fn restore(&mut self, id: PieceId, at: Position) -> Option<PieceId> {
        debug_assert!(!self.squares.contains(&Some(id)), "piece already on the board");
        let displaced = self.squares[at.index()].replace(id);
        self.pieces[id.index()].set_position(at);
        displaced
    }

    /// Replaces the piece on `at` by a new piece of `kind` and the same
    /// color. Returns the handles of the replaced and the new piece.
    ///
    /// The new piece counts as moved.
    pub fn replace(&mut self, at: Position, kind: PieceKind) -> Option<(PieceId, PieceId)> {
        let old = self.remove(at)?;
        let color = self.get(old).color();
        let new = self.place(color, kind, at);
        self.pieces[new.index()].set_moved(true);
        Some((old, new))
    }

    pub(crate) fn set_moved_by_id(&mut self, id: PieceId) {
        self.pieces[id.index()].set_moved(true);
    }

    /// Overrides the `moved` flag of the piece on `at`. Useful when setting
    /// up positions, for example to revoke castling with an unmoved rook.
    pub fn set_moved(&mut self, at: Position, moved: bool) -> bool {
        match self.id_at(at) {
            Some(id) => {
                self.pieces[id.index()].set_moved(moved);
                true
            }
            None => false,
        }
    }

    /// Pieces on the grid, in position order.
    pub fn pieces(&self) -> impl Iterator<Item = (PieceId, &Piece)> + '_ {
        self.squares
            .iter()
            .flatten()
            .map(move |&id| (id, self.get(id)))
    }

    pub fn occupied(&self) -> Bitboard {
        self.pieces().map(|(_, piece)| piece.position()).collect()
    }

    pub fn by_color(&self, color: Color) -> Bitboard {
        self.pieces()
            .filter(|(_, piece)| piece.color() == color)
            .map(|(_, piece)| piece.position())
            .collect()
    }

    /// Finds the king of `color`, the first one if there are several.
    pub fn king_of(&self, color: Color) -> Option<Position> {
        self.pieces()
            .map(|(_, piece)| piece)
            .find(|piece| piece.color() == color && piece.kind() == PieceKind::King)
            .map(Piece::position)
    }

    /// A disposable deep copy for simulations. Changes to the snapshot are
    /// never observed by `self`.
    pub fn snapshot(&self) -> Board {
        self.clone()
    }

    /// Renders the placement part of a FEN, starting with row 0.
    ///
    /// ```
    /// use chessrules::Board;
    ///
    /// assert_eq!(Board::new().board_fen(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR");
    /// ```
    pub fn board_fen(&self) -> String {
        let mut fen = String::with_capacity(64);
        for row in 0..8 {
            let mut empty = 0;
            for col in 0..8 {
                match self.piece_at(Position::new(row, col)) {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        fen.push(piece.symbol());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push(char::from(b'0' + empty));
            }
            if row < 7 {
                fen.push('/');
            }
        }
        fen
    }

    /// Parses the placement part of a FEN.
    ///
    /// Pieces that cannot be on their initial square are marked as moved:
    /// pawns off their start row, kings off their home square, and rooks off
    /// the corners of their back row.
    pub fn from_board_fen(fen: &str) -> Result<Board, ParseBoardError> {
        let mut board = Board::empty();
        let mut rows = fen.split('/');

        for row in 0..8 {
            let text = rows.next().ok_or(ParseBoardError)?;
            let mut col = 0u8;
            for ch in text.chars() {
                if let Some(empty) = ch.to_digit(10) {
                    if empty == 0 || empty > 8 {
                        return Err(ParseBoardError);
                    }
                    col += empty as u8;
                } else {
                    let kind = PieceKind::from_char(ch).ok_or(ParseBoardError)?;
                    if col >= 8 {
                        return Err(ParseBoardError);
                    }
                    let color = Color::from_white(ch.is_ascii_uppercase());
                    let at = Position::new(row, col);
                    let id = board.place(color, kind, at);
                    if !is_initial_square(color, kind, at) {
                        board.set_moved_by_id(id);
                    }
                    col += 1;
                }
                if col > 8 {
                    return Err(ParseBoardError);
                }
            }
            if col != 8 {
                return Err(ParseBoardError);
            }
        }

        if rows.next().is_some() {
            return Err(ParseBoardError);
        }

        Ok(board)
    }
}

fn is_initial_square(color: Color, kind: PieceKind, at: Position) -> bool {
    match kind {
        PieceKind::Pawn => at.row() == color.pawn_row(),
        PieceKind::King => at == Position::new(color.back_row(), 4),
        PieceKind::Rook => at.row() == color.back_row() && (at.col() == 0 || at.col() == 7),
        PieceKind::Knight | PieceKind::Bishop | PieceKind::Queen => true,
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Board) -> bool {
        Position::all().all(|pos| self.piece_at(pos) == other.piece_at(pos))
    }
}

impl Eq for Board {}

impl Default for Board {
    fn default() -> Board {
        Board::new()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pos in Position::all() {
            f.write_char(self.piece_at(pos).map_or('.', Piece::symbol))?;
            f.write_char(if pos.col() < 7 { ' ' } else { '\n' })?;
        }
        Ok(())
    }
}

/// Error when parsing an invalid board placement.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseBoardError;

impl fmt::Display for ParseBoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid board placement")
    }
}

impl Error for ParseBoardError {}
