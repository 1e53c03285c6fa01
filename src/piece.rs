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

use std::fmt;

use crate::{
    attacks::{self, BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, QUEEN_DIRECTIONS, ROOK_DIRECTIONS},
    bitboard::Bitboard,
    board::Board,
    color::Color,
    kind::PieceKind,
    m::{Move, MoveCategory, MoveSet, Target},
    position::Position,
};

/// Handle of a piece record in the arena of a [`Board`].
///
/// Handles stay valid for the lifetime of the board, also after the piece
/// was captured or promoted away.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct PieceId(pub(crate) u16);

impl PieceId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A piece with [`Color`] and [`PieceKind`], and the bookkeeping needed by
/// the rules: where it stands and whether it ever moved.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Piece {
    color: Color,
    kind: PieceKind,
    position: Position,
    moved: bool,
    ident: char,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceKind, position: Position) -> Piece {
        Piece {
            color,
            kind,
            position,
            moved: false,
            ident: kind.upper_char(),
        }
    }

    #[inline]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    /// The position of the piece, or its last position if it is no longer
    /// on the board.
    #[inline]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Checks if the piece has ever relocated.
    #[inline]
    pub const fn has_moved(&self) -> bool {
        self.moved
    }

    /// The display identifier, the English letter of the kind.
    #[inline]
    pub const fn ident(&self) -> char {
        self.ident
    }

    /// The identifier, uppercase for White and lowercase for Black.
    pub fn symbol(&self) -> char {
        self.color
            .fold_wb(self.ident, self.ident.to_ascii_lowercase())
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn set_moved(&mut self, moved: bool) {
        self.moved = moved;
    }

    fn directions(&self) -> &'static [(i8, i8)] {
        match self.kind {
            PieceKind::Bishop => &BISHOP_DIRECTIONS,
            PieceKind::Rook => &ROOK_DIRECTIONS,
            PieceKind::Queen => &QUEEN_DIRECTIONS,
            PieceKind::Pawn | PieceKind::Knight | PieceKind::King => &[],
        }
    }

    /// Generates the moves permitted by the movement rule of the piece,
    /// ignoring whether they leave the own king in check. King moves are
    /// the exception: they never step onto an attacked square.
    ///
    /// `last_move` is only consulted by pawns, for en passant.
    pub fn pseudo_legal_moves(&self, board: &Board, last_move: Option<Move>) -> MoveSet {
        let mut moves = MoveSet::new();
        match self.kind {
            PieceKind::Pawn => gen_pawn(self, board, last_move, &mut moves),
            PieceKind::Knight => gen_steps(self, board, &KNIGHT_OFFSETS, &mut moves),
            PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
                gen_slides(self, board, &mut moves)
            }
            PieceKind::King => gen_king(self, board, &mut moves),
        }
        moves
    }

    /// Squares on which a check given by this piece to the king at `king`
    /// can be answered: the squares strictly between a slider and the king
    /// (to block), and the own square (to capture).
    ///
    /// Contact pieces cannot be blocked, so only their own square is
    /// returned.
    pub fn line_of_attack(&self, board: &Board, king: Position) -> MoveSet {
        let mut line = MoveSet::new();
        line.push(Target::new(self.position, MoveCategory::Capture));

        if let Some(dir) = self.position.direction_to(king) {
            if self.directions().contains(&dir) {
                let mut pos = self.position;
                while let Some(next) = pos.offset(dir.0, dir.1) {
                    if next == king || board.piece_at(next).is_some() {
                        break;
                    }
                    line.push(Target::new(next, MoveCategory::Standard));
                    pos = next;
                }
            }
        }

        line
    }

    /// Squares attacked by the piece, whether empty or occupied by either
    /// color. Pawns attack diagonally forward only.
    pub fn attacks(&self, board: &Board) -> Bitboard {
        match self.kind {
            PieceKind::Pawn => [-1, 1]
                .into_iter()
                .filter_map(|dcol| self.position.offset(self.color.forward(), dcol))
                .collect(),
            PieceKind::Knight => offsets(self.position, &KNIGHT_OFFSETS),
            PieceKind::King => offsets(self.position, &KING_OFFSETS),
            PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
                let mut attacked = Bitboard::EMPTY;
                for &(drow, dcol) in self.directions() {
                    let mut pos = self.position;
                    while let Some(next) = pos.offset(drow, dcol) {
                        attacked.add(next);
                        if board.piece_at(next).is_some() {
                            break;
                        }
                        pos = next;
                    }
                }
                attacked
            }
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} on {}", self.color, self.kind, self.position)
    }
}

fn offsets(from: Position, deltas: &[(i8, i8)]) -> Bitboard {
    deltas
        .iter()
        .filter_map(|&(drow, dcol)| from.offset(drow, dcol))
        .collect()
}

fn gen_pawn(pawn: &Piece, board: &Board, last_move: Option<Move>, moves: &mut MoveSet) {
    let color = pawn.color;
    let from = pawn.position;
    let forward = color.forward();
    let arrival = |to: Position, otherwise: MoveCategory| {
        if to.row() == color.promotion_row() {
            MoveCategory::Promotion
        } else {
            otherwise
        }
    };

    if let Some(single) = from.offset(forward, 0) {
        if board.piece_at(single).is_none() {
            moves.push(Target::new(single, arrival(single, MoveCategory::Standard)));

            if !pawn.moved && from.row() == color.pawn_row() {
                if let Some(double) = single.offset(forward, 0) {
                    if board.piece_at(double).is_none() {
                        moves.push(Target::new(double, MoveCategory::Standard));
                    }
                }
            }
        }
    }

    for dcol in [-1, 1] {
        if let Some(to) = from.offset(forward, dcol) {
            if board.piece_at(to).is_some_and(|other| other.color != color) {
                moves.push(Target::new(to, arrival(to, MoveCategory::Capture)));
            }
        }
    }

    // En passant: the previous move must be an enemy double step ending
    // right next to us.
    if let Some(last) = last_move {
        if last.is_double_step()
            && last.to.row() == from.row()
            && last.to.col().abs_diff(from.col()) == 1
            && board
                .piece_at(last.to)
                .is_some_and(|victim| victim.kind == PieceKind::Pawn && victim.color != color)
        {
            if let Some(to) = Position::from_coords(from.row() as i8 + forward, last.to.col() as i8) {
                if board.piece_at(to).is_none() {
                    moves.push(Target::new(to, MoveCategory::EnPassant));
                }
            }
        }
    }
}

fn gen_steps(piece: &Piece, board: &Board, deltas: &[(i8, i8)], moves: &mut MoveSet) {
    for &(drow, dcol) in deltas {
        if let Some(to) = piece.position.offset(drow, dcol) {
            match board.piece_at(to) {
                None => moves.push(Target::new(to, MoveCategory::Standard)),
                Some(other) if other.color != piece.color => {
                    moves.push(Target::new(to, MoveCategory::Capture))
                }
                Some(_) => (),
            }
        }
    }
}

fn gen_slides(piece: &Piece, board: &Board, moves: &mut MoveSet) {
    for &(drow, dcol) in piece.directions() {
        let mut pos = piece.position;
        while let Some(to) = pos.offset(drow, dcol) {
            match board.piece_at(to) {
                None => moves.push(Target::new(to, MoveCategory::Standard)),
                Some(other) => {
                    if other.color != piece.color {
                        moves.push(Target::new(to, MoveCategory::Capture));
                    }
                    break;
                }
            }
            pos = to;
        }
    }
}

fn gen_king(king: &Piece, board: &Board, moves: &mut MoveSet) {
    // The king is lifted off the board, so that sliders checking it also
    // cover the squares behind it.
    let mut lifted = board.snapshot();
    lifted.remove(king.position);
    let attacked = attacks::attacked_squares(&lifted, !king.color);

    for &(drow, dcol) in &KING_OFFSETS {
        let Some(to) = king.position.offset(drow, dcol) else {
            continue;
        };
        if attacked.contains(to) {
            continue;
        }
        match board.piece_at(to) {
            None => moves.push(Target::new(to, MoveCategory::Standard)),
            Some(other) if other.color != king.color && !attacks::is_defended(board, other) => {
                moves.push(Target::new(to, MoveCategory::Capture))
            }
            Some(_) => (),
        }
    }

    gen_castling(king, board, attacked, moves);
}

fn gen_castling(king: &Piece, board: &Board, attacked: Bitboard, moves: &mut MoveSet) {
    let row = king.color.back_row();
    if king.moved || king.position != Position::new(row, 4) || attacked.contains(king.position) {
        return;
    }

    let sides: [(u8, &[u8], &[u8], MoveCategory); 2] = [
        (7, &[5, 6], &[5, 6], MoveCategory::KingsideCastle),
        (0, &[1, 2, 3], &[3, 2], MoveCategory::QueensideCastle),
    ];

    for (rook_col, between, crossed, category) in sides {
        let rook_ready = board.piece_at(Position::new(row, rook_col)).is_some_and(|rook| {
            rook.kind == PieceKind::Rook && rook.color == king.color && !rook.moved
        });
        if !rook_ready {
            continue;
        }
        if between
            .iter()
            .any(|&col| board.piece_at(Position::new(row, col)).is_some())
        {
            continue;
        }
        if crossed
            .iter()
            .any(|&col| attacked.contains(Position::new(row, col)))
        {
            continue;
        }
        let to = Position::new(row, crossed[crossed.len() - 1]);
        moves.push(Target::new(to, category));
    }
}
