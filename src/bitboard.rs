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

//! Sets of positions.

use std::{
    fmt::{self, Write as _},
    ops,
};

use crate::position::Position;

/// A set of [`Position`]s, one bit per square, indexed by
/// [`Position::index()`].
///
/// Used for the attacked-squares map and for occupancy.
///
/// ```
/// use chessrules::{Bitboard, Position};
///
/// let bb = Bitboard::EMPTY.with(Position::new(7, 4));
/// assert!(bb.contains(Position::new(7, 4)));
/// assert_eq!(bb.count(), 1);
/// ```
#[derive(PartialEq, Eq, Copy, Clone, Default, Hash)]
pub struct Bitboard(pub u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);
    pub const FULL: Bitboard = Bitboard(!0);

    #[inline]
    pub const fn from_position(pos: Position) -> Bitboard {
        Bitboard(1 << pos.index())
    }

    /// All positions of a row.
    pub const fn row(row: u8) -> Bitboard {
        if row < 8 {
            Bitboard(0xff << (8 * row))
        } else {
            Bitboard(0)
        }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn contains(self, pos: Position) -> bool {
        self.0 & (1 << pos.index()) != 0
    }

    #[inline]
    pub fn add(&mut self, pos: Position) {
        self.0 |= 1 << pos.index();
    }

    #[inline]
    pub fn remove(&mut self, pos: Position) {
        self.0 &= !(1 << pos.index());
    }

    #[must_use]
    #[inline]
    pub const fn with(self, pos: Position) -> Bitboard {
        Bitboard(self.0 | 1 << pos.index())
    }

    #[must_use]
    #[inline]
    pub const fn without(self, pos: Position) -> Bitboard {
        Bitboard(self.0 & !(1 << pos.index()))
    }

    #[inline]
    pub const fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn first(self) -> Option<Position> {
        if self.is_empty() {
            None
        } else {
            Position::from_index(self.0.trailing_zeros() as usize)
        }
    }

    pub const fn more_than_one(self) -> bool {
        self.0 & self.0.wrapping_sub(1) != 0
    }

    pub const fn single(self) -> Option<Position> {
        if self.more_than_one() {
            None
        } else {
            self.first()
        }
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pos in Position::all() {
            f.write_char(if self.contains(pos) { '1' } else { '.' })?;
            f.write_char(if pos.col() < 7 { ' ' } else { '\n' })?;
        }
        Ok(())
    }
}

impl FromIterator<Position> for Bitboard {
    fn from_iter<I>(iter: I) -> Bitboard
    where
        I: IntoIterator<Item = Position>,
    {
        let mut result = Bitboard(0);
        for pos in iter {
            result.add(pos);
        }
        result
    }
}

impl Extend<Position> for Bitboard {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = Position>,
    {
        for pos in iter {
            self.add(pos);
        }
    }
}

impl ops::BitAnd for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn bitand(self, Bitboard(rhs): Bitboard) -> Bitboard {
        Bitboard(self.0 & rhs)
    }
}

impl ops::BitOr for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn bitor(self, Bitboard(rhs): Bitboard) -> Bitboard {
        Bitboard(self.0 | rhs)
    }
}

impl ops::BitOrAssign for Bitboard {
    #[inline]
    fn bitor_assign(&mut self, Bitboard(rhs): Bitboard) {
        self.0 |= rhs;
    }
}

impl ops::Not for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn not(self) -> Bitboard {
        Bitboard(!self.0)
    }
}

impl Iterator for Bitboard {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        let pos = self.first();
        self.0 &= self.0.wrapping_sub(1);
        pos
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = Bitboard::count(*self);
        (len, Some(len))
    }
}

impl ExactSizeIterator for Bitboard {}
