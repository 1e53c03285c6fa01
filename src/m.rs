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

use arrayvec::ArrayVec;

use crate::position::Position;

/// A proposed relocation from one position to another.
///
/// How the move is executed is decided by the [`MoveCategory`] that move
/// generation attached to it.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub const fn new(from: Position, to: Position) -> Move {
        Move { from, to }
    }

    /// Checks if this is a pawn-style double step along a column, i.e. the
    /// move spans two rows.
    pub const fn is_double_step(self) -> bool {
        self.from.col() == self.to.col() && self.from.row().abs_diff(self.to.row()) == 2
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// Tells move execution how to treat a [`Move`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveCategory {
    /// Relocation to an empty square.
    Standard,
    /// Relocation onto an enemy piece.
    Capture,
    /// King two squares toward the h-file rook, rook jumps over.
    KingsideCastle,
    /// King two squares toward the a-file rook, rook jumps over.
    QueensideCastle,
    /// Pawn capture of a pawn that just passed by with a double step.
    EnPassant,
    /// Pawn reaching the far row, with or without a capture.
    Promotion,
}

impl MoveCategory {
    pub const fn is_castle(self) -> bool {
        matches!(
            self,
            MoveCategory::KingsideCastle | MoveCategory::QueensideCastle
        )
    }

    /// Checks if the move always takes an enemy piece. Promotions may or
    /// may not capture.
    pub const fn is_capture(self) -> bool {
        matches!(self, MoveCategory::Capture | MoveCategory::EnPassant)
    }

    pub const ALL: [MoveCategory; 6] = [
        MoveCategory::Standard,
        MoveCategory::Capture,
        MoveCategory::KingsideCastle,
        MoveCategory::QueensideCastle,
        MoveCategory::EnPassant,
        MoveCategory::Promotion,
    ];
}

/// A destination together with its category.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Target {
    pub to: Position,
    pub category: MoveCategory,
}

impl Target {
    pub const fn new(to: Position, category: MoveCategory) -> Target {
        Target { to, category }
    }
}

/// The destinations of a single piece, stored inline on the stack.
///
/// The capacity is enough for a queen in the middle of an empty board
/// (27 squares) and for a king with both castling moves.
pub type MoveSet = ArrayVec<Target, 32>;

/// Looks up the category of a destination in a [`MoveSet`].
pub fn category_of(set: &MoveSet, to: Position) -> Option<MoveCategory> {
    set.iter().find(|t| t.to == to).map(|t| t.category)
}
