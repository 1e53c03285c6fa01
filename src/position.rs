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

use std::{
    cmp::max,
    error::Error,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

/// A square of the board, addressed by `row` and `col`.
///
/// Row 0 is the back rank of Black, row 7 is the back rank of White.
/// Column 0 is the a-file.
///
/// # Examples
///
/// ```
/// use chessrules::Position;
///
/// let e1 = Position::new(7, 4);
/// assert_eq!(e1.to_string(), "e1");
/// assert_eq!("e1".parse::<Position>(), Ok(e1));
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub struct Position {
    row: u8,
    col: u8,
}

impl Position {
    /// Creates a position.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is not in `0..8`.
    #[track_caller]
    pub const fn new(row: u8, col: u8) -> Position {
        assert!(row < 8 && col < 8, "position out of range");
        Position { row, col }
    }

    /// Creates a position from signed coordinates, or `None` if they are
    /// off the board.
    #[inline]
    pub const fn from_coords(row: i8, col: i8) -> Option<Position> {
        if 0 <= row && row < 8 && 0 <= col && col < 8 {
            Some(Position {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Gets the position with index `row * 8 + col`.
    #[inline]
    pub const fn from_index(index: usize) -> Option<Position> {
        if index < 64 {
            Some(Position {
                row: (index / 8) as u8,
                col: (index % 8) as u8,
            })
        } else {
            None
        }
    }

    #[inline]
    pub const fn row(self) -> u8 {
        self.row
    }

    #[inline]
    pub const fn col(self) -> u8 {
        self.col
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.row as usize * 8 + self.col as usize
    }

    /// Steps by the given row and column deltas.
    ///
    /// ```
    /// use chessrules::Position;
    ///
    /// assert_eq!(Position::new(6, 4).offset(-2, 0), Some(Position::new(4, 4)));
    /// assert_eq!(Position::new(0, 0).offset(-1, 0), None);
    /// ```
    #[inline]
    pub const fn offset(self, drow: i8, dcol: i8) -> Option<Position> {
        Position::from_coords(self.row as i8 + drow, self.col as i8 + dcol)
    }

    /// Chebyshev distance, i.e. the number of king steps.
    pub fn distance(self, other: Position) -> u8 {
        max(self.row.abs_diff(other.row), self.col.abs_diff(other.col))
    }

    /// Direction of a straight or diagonal line from `self` to `other`, or
    /// `None` if the positions are equal or not aligned.
    pub fn direction_to(self, other: Position) -> Option<(i8, i8)> {
        let drow = other.row as i8 - self.row as i8;
        let dcol = other.col as i8 - self.col as i8;
        if (drow, dcol) == (0, 0) || (drow != 0 && dcol != 0 && drow.abs() != dcol.abs()) {
            None
        } else {
            Some((drow.signum(), dcol.signum()))
        }
    }

    /// Parses a square name like `e4`.
    pub fn from_ascii(s: &[u8]) -> Result<Position, ParsePositionError> {
        match *s {
            [file @ b'a'..=b'h', rank @ b'1'..=b'8'] => Ok(Position {
                row: b'8' - rank,
                col: file - b'a',
            }),
            _ => Err(ParsePositionError),
        }
    }

    /// Iterates over all 64 positions, row by row.
    pub fn all() -> impl DoubleEndedIterator<Item = Position> + ExactSizeIterator {
        (0..64).map(|index| Position {
            row: (index / 8) as u8,
            col: (index % 8) as u8,
        })
    }

    pub fn file_char(self) -> char {
        char::from(b'a' + self.col)
    }

    pub fn rank_char(self) -> char {
        char::from(b'8' - self.row)
    }
}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // A single write, so that nohash-hasher can be used.
        state.write_u8(self.index() as u8);
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

/// Error when parsing an invalid square name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParsePositionError;

impl fmt::Display for ParsePositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid square name")
    }
}

impl Error for ParsePositionError {}

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Position, ParsePositionError> {
        Position::from_ascii(s.as_bytes())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Position {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Position {
    fn deserialize<D>(deserializer: D) -> Result<Position, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct PositionVisitor;

        impl serde::de::Visitor<'_> for PositionVisitor {
            type Value = Position;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("square name")
            }

            fn visit_str<E>(self, value: &str) -> Result<Position, E>
            where
                E: serde::de::Error,
            {
                value.parse().map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_str(PositionVisitor)
    }
}
