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

//! Starting positions other than the standard one.
//!
//! A [`Setup`] is not validated. Use
//! [`Game::from_setup()`](crate::Game::from_setup) to check it and start
//! a game from it.
//!
//! # Examples
//!
//! ```
//! use chessrules::{Color, Game, Setup};
//!
//! let setup: Setup = "4k3/8/8/8/8/8/4P3/4K3 b".parse()?;
//! assert_eq!(setup.turn, Color::Black);
//!
//! let game = Game::from_setup(setup)?;
//! assert_eq!(game.turn(), Some(Color::Black));
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```

use std::{error::Error, fmt, str::FromStr};

use bitflags::bitflags;

use crate::{
    attacks,
    board::{Board, ParseBoardError},
    color::{ByColor, Color},
    kind::PieceKind,
    m::Move,
    position::Position,
};

/// A not necessarily legal position to start a game from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Setup {
    pub board: Board,
    /// Side to move.
    pub turn: Color,
    /// The move that led to this position, if it was a pawn double step.
    /// Enables en passant on the first move.
    pub last_move: Option<Move>,
}

impl Setup {
    /// The standard starting position, White to move.
    pub fn initial() -> Setup {
        Setup {
            board: Board::new(),
            turn: Color::White,
            last_move: None,
        }
    }

    pub fn empty() -> Setup {
        Setup {
            board: Board::empty(),
            turn: Color::White,
            last_move: None,
        }
    }

    pub fn with_turn(mut self, turn: Color) -> Setup {
        self.turn = turn;
        self
    }

    pub fn with_last_move(mut self, last_move: Move) -> Setup {
        self.last_move = Some(last_move);
        self
    }

    /// Checks the setup for problems. Returns an empty set of kinds if it
    /// can be played.
    pub fn errors(&self) -> SetupErrorKinds {
        let mut errors = SetupErrorKinds::empty();
        let board = &self.board;

        if board.occupied().is_empty() {
            errors |= SetupErrorKinds::EMPTY_BOARD;
        }

        let kings = ByColor::new_with(|color| {
            board
                .pieces()
                .filter(|(_, piece)| piece.color() == color && piece.kind() == PieceKind::King)
                .count()
        });
        for count in kings.iter() {
            match count {
                0 => errors |= SetupErrorKinds::MISSING_KING,
                1 => (),
                _ => errors |= SetupErrorKinds::TOO_MANY_KINGS,
            }
        }

        if board.pieces().any(|(_, piece)| {
            piece.kind() == PieceKind::Pawn
                && (piece.position().row() == 0 || piece.position().row() == 7)
        }) {
            errors |= SetupErrorKinds::PAWNS_ON_BACKRANK;
        }

        if *kings.get(!self.turn) == 1 {
            if let Some(king) = board.king_of(!self.turn) {
                if !attacks::attacking_pieces(board, king, !self.turn).is_empty()
                    || is_adjacent_to_enemy_king(board, king, !self.turn)
                {
                    errors |= SetupErrorKinds::OPPOSITE_CHECK;
                }
            }
        }

        if let Some(last) = self.last_move {
            if !self.is_valid_double_step(last) {
                errors |= SetupErrorKinds::INVALID_LAST_MOVE;
            }
        }

        errors
    }

    fn is_valid_double_step(&self, last: Move) -> bool {
        let mover = !self.turn;
        let skipped = Position::from_coords(
            last.from.row() as i8 + mover.forward(),
            last.from.col() as i8,
        );
        last.is_double_step()
            && last.from.row() == mover.pawn_row()
            && skipped.is_some_and(|skipped| self.board.piece_at(skipped).is_none())
            && self.board.piece_at(last.from).is_none()
            && self
                .board
                .piece_at(last.to)
                .is_some_and(|pawn| pawn.kind() == PieceKind::Pawn && pawn.color() == mover)
    }
}

fn is_adjacent_to_enemy_king(board: &Board, king: Position, color: Color) -> bool {
    board
        .king_of(!color)
        .is_some_and(|other| other.distance(king) <= 1)
}

impl Default for Setup {
    fn default() -> Setup {
        Setup::initial()
    }
}

/// Parses a board placement, optionally followed by the side to move (`w`
/// or `b`, defaults to White) and the square skipped by a pawn double step
/// on the previous move (or `-`).
///
/// ```
/// use chessrules::{Move, Position, Setup};
///
/// let setup: Setup = "4k3/8/8/8/4P3/8/8/4K3 b e3".parse()?;
/// let e2e4 = Move::new(Position::new(6, 4), Position::new(4, 4));
/// assert_eq!(setup.last_move, Some(e2e4));
/// # Ok::<_, chessrules::ParseBoardError>(())
/// ```
impl FromStr for Setup {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Setup, ParseBoardError> {
        let mut parts = s.split_ascii_whitespace();
        let board = Board::from_board_fen(parts.next().ok_or(ParseBoardError)?)?;
        let turn = match parts.next() {
            Some(turn) => {
                let mut chars = turn.chars();
                match (chars.next().and_then(Color::from_char), chars.next()) {
                    (Some(color), None) => color,
                    _ => return Err(ParseBoardError),
                }
            }
            None => Color::White,
        };
        let last_move = match parts.next() {
            Some("-") | None => None,
            Some(skipped) => {
                let skipped: Position = skipped.parse().map_err(|_| ParseBoardError)?;
                Some(double_step_over(skipped, !turn).ok_or(ParseBoardError)?)
            }
        };
        if parts.next().is_some() {
            return Err(ParseBoardError);
        }
        Ok(Setup {
            board,
            turn,
            last_move,
        })
    }
}

/// The double step of `mover` that passed over `skipped`.
fn double_step_over(skipped: Position, mover: Color) -> Option<Move> {
    let forward = mover.forward();
    let from = skipped.offset(-forward, 0)?;
    let to = skipped.offset(forward, 0)?;
    Some(Move::new(from, to))
}

bitflags! {
    /// Reasons for a [`Setup`] to be rejected.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct SetupErrorKinds: u32 {
        /// There are no pieces on the board.
        const EMPTY_BOARD = 1 << 0;

        /// A side has no king.
        const MISSING_KING = 1 << 1;

        /// A side has more than one king.
        const TOO_MANY_KINGS = 1 << 2;

        /// There are pawns on the first or last row.
        const PAWNS_ON_BACKRANK = 1 << 3;

        /// The side that just moved left its king attacked.
        const OPPOSITE_CHECK = 1 << 4;

        /// The given last move is not a pawn double step of the side that
        /// just moved, consistent with the board.
        const INVALID_LAST_MOVE = 1 << 5;
    }
}

/// Error when trying to start a game from an invalid [`Setup`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SetupError {
    pub(crate) kinds: SetupErrorKinds,
}

impl SetupError {
    /// Every problem that was found.
    pub fn kinds(&self) -> SetupErrorKinds {
        self.kinds
    }
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut reasons = Vec::new();
        if self.kinds.contains(SetupErrorKinds::EMPTY_BOARD) {
            reasons.push("empty board");
        }
        if self.kinds.contains(SetupErrorKinds::MISSING_KING) {
            reasons.push("missing king");
        }
        if self.kinds.contains(SetupErrorKinds::TOO_MANY_KINGS) {
            reasons.push("too many kings");
        }
        if self.kinds.contains(SetupErrorKinds::PAWNS_ON_BACKRANK) {
            reasons.push("pawns on backrank");
        }
        if self.kinds.contains(SetupErrorKinds::OPPOSITE_CHECK) {
            reasons.push("opposite check");
        }
        if self.kinds.contains(SetupErrorKinds::INVALID_LAST_MOVE) {
            reasons.push("invalid last move");
        }

        f.write_str("illegal setup: ")?;
        if reasons.is_empty() {
            f.write_str("unknown reason")
        } else {
            f.write_str(&reasons.join(", "))
        }
    }
}

impl Error for SetupError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(name: &str) -> Position {
        name.parse().expect("valid square")
    }

    fn setup(fen: &str) -> Setup {
        fen.parse().expect("valid setup")
    }

    #[test]
    fn test_initial_is_valid() {
        assert!(Setup::initial().errors().is_empty());
        assert_eq!(setup("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w"), Setup::initial());
    }

    #[test]
    fn test_empty_board() {
        let errors = Setup::empty().errors();
        assert!(errors.contains(SetupErrorKinds::EMPTY_BOARD));
        assert!(errors.contains(SetupErrorKinds::MISSING_KING));
    }

    #[test]
    fn test_kings() {
        assert_eq!(setup("4k3/8/8/8/8/8/8/8").errors(), SetupErrorKinds::MISSING_KING);
        assert_eq!(
            setup("4k3/8/8/8/8/8/8/K3K3").errors(),
            SetupErrorKinds::TOO_MANY_KINGS
        );
    }

    #[test]
    fn test_pawns_on_backrank() {
        assert_eq!(
            setup("4k2P/8/8/8/8/8/8/4K3").errors(),
            SetupErrorKinds::PAWNS_ON_BACKRANK
        );
    }

    #[test]
    fn test_opposite_check() {
        // Black is in check, but White is to move.
        assert_eq!(
            setup("4k3/8/8/8/8/8/8/4K2R w").errors() & SetupErrorKinds::OPPOSITE_CHECK,
            SetupErrorKinds::empty()
        );
        assert_eq!(
            setup("4k3/8/8/8/8/8/8/4R1K1 w").errors(),
            SetupErrorKinds::OPPOSITE_CHECK
        );
        assert_eq!(setup("8/8/8/3kK3/8/8/8/8 b").errors(), SetupErrorKinds::OPPOSITE_CHECK);
    }

    #[test]
    fn test_last_move() {
        let base = setup("4k3/8/8/8/3pP3/8/8/4K3 b");
        let e2e4 = Move::new(pos("e2"), pos("e4"));
        assert!(base.clone().with_last_move(e2e4).errors().is_empty());

        let d7d5 = Move::new(pos("d7"), pos("d5"));
        assert_eq!(
            base.clone().with_last_move(d7d5).errors(),
            SetupErrorKinds::INVALID_LAST_MOVE
        );

        let e3e4 = Move::new(pos("e3"), pos("e4"));
        assert_eq!(
            base.with_last_move(e3e4).errors(),
            SetupErrorKinds::INVALID_LAST_MOVE
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!("8/8/8/8/8/8/8/8 x".parse::<Setup>(), Err(ParseBoardError));
        assert_eq!("8/8/8/8/8/8/8/8 w w".parse::<Setup>(), Err(ParseBoardError));
        assert_eq!("".parse::<Setup>(), Err(ParseBoardError));
        assert_eq!("8/8/8/8/8/8/8/8 b e9".parse::<Setup>(), Err(ParseBoardError));
        assert_eq!("8/8/8/8/8/8/8/8 w e8".parse::<Setup>(), Err(ParseBoardError));

        let setup: Setup = "4k3/8/8/3pP3/8/8/8/4K3 w d6".parse().unwrap();
        assert_eq!(setup.last_move, Some(Move::new(pos("d7"), pos("d5"))));
        assert!(setup.errors().is_empty());
    }

    #[test]
    fn test_display() {
        let err = SetupError {
            kinds: SetupErrorKinds::MISSING_KING | SetupErrorKinds::PAWNS_ON_BACKRANK,
        };
        assert_eq!(err.to_string(), "illegal setup: missing king, pawns on backrank");
    }
}
