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

use crate::{color::Color, piece::PieceId, position::Position};

/// Per-side bookkeeping: where the king stands and which enemy pieces were
/// taken.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Player {
    color: Color,
    king: Position,
    captured: Vec<PieceId>,
}

impl Player {
    pub fn new(color: Color, king: Position) -> Player {
        Player {
            color,
            king,
            captured: Vec::new(),
        }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// The position of the own king. Kept in sync by move execution.
    #[inline]
    pub fn king(&self) -> Position {
        self.king
    }

    /// Handles of the enemy pieces taken so far, in the order they were
    /// captured. Resolve them with [`Board::get()`](crate::Board::get).
    pub fn captured(&self) -> &[PieceId] {
        &self.captured
    }

    pub(crate) fn set_king(&mut self, king: Position) {
        self.king = king;
    }

    pub(crate) fn capture(&mut self, id: PieceId) {
        self.captured.push(id);
    }
}
