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

//! A chess rules engine: legal move generation, move execution and game
//! end detection for two participants.
//!
//! # Examples
//!
//! Generate legal moves in the starting position:
//!
//! ```
//! use chessrules::{current_legal_moves, Color, Game};
//!
//! let game = Game::with_first_player(Color::White);
//! let legals = current_legal_moves(&game);
//! assert_eq!(legals.len(), 20);
//! ```
//!
//! Validate and play moves:
//!
//! ```
//! use chessrules::{Color, Game, Move, MoveCategory, Position};
//!
//! let mut game = Game::with_first_player(Color::White);
//! let e2 = Position::new(6, 4);
//! let e4 = Position::new(4, 4);
//!
//! // 1. e4
//! let category = game.attempt_move(e2, e4)?;
//! assert_eq!(category, MoveCategory::Standard);
//! game.apply_move(Move::new(e2, e4), category, None)?;
//! assert_eq!(game.turn(), Some(Color::Black));
//! # Ok::<_, chessrules::MoveError>(())
//! ```
//!
//! Detect game end conditions:
//!
//! ```
//! # use chessrules::{Color, Game};
//! # let game = Game::with_first_player(Color::White);
//! assert!(!game.is_checkmate());
//! assert!(!game.is_stalemate());
//! assert_eq!(game.outcome(), None); // no winner yet
//! ```
//!
//! Positions use `(row, col)` coordinates. Row 0 is the back rank of Black
//! and White moves toward it. Square names like `e4` are accepted and
//! printed as well.
//!
//! # Feature flags
//!
//! * `serde`: Implements [`serde::Serialize`](https://docs.rs/serde/1/serde/trait.Serialize.html)
//!   and [`serde::Deserialize`](https://docs.rs/serde/1/serde/trait.Deserialize.html) for
//!   types with unique natural representations.
//! * `nohash-hasher`: Implements
//!   [`nohash_hasher::IsEnabled`](https://docs.rs/nohash-hasher/0.2/nohash_hasher/trait.IsEnabled.html)
//!   for sensible types.
//!
//! # Logging
//!
//! Events are emitted with [`tracing`](https://docs.rs/tracing/0.1): applied
//! and rejected moves at debug level, legal move computations at trace
//! level, and the end of a game at info level.

#![doc(html_root_url = "https://docs.rs/chessrules/0.1.0")]
#![forbid(unsafe_code)]
#![warn(missing_debug_implementations)]
#![cfg_attr(docs_rs, feature(doc_auto_cfg))]

mod color;
mod game;
mod history;
mod kind;
mod m;
mod perft;
mod piece;
mod player;
mod position;

pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod execute;
pub mod legal;
pub mod setup;

pub use bitboard::Bitboard;
pub use board::{Board, ParseBoardError};
pub use color::{ByColor, Color, ParseColorError};
pub use game::{
    current_legal_moves, is_checkmate, is_stalemate, new_game, Game, GameState, MoveError,
    Outcome,
};
pub use history::History;
pub use kind::PieceKind;
pub use legal::LegalMoves;
pub use m::{category_of, Move, MoveCategory, MoveSet, Target};
pub use perft::{perft, perft_divide};
pub use piece::{Piece, PieceId};
pub use player::Player;
pub use position::{ParsePositionError, Position};
pub use setup::{Setup, SetupError, SetupErrorKinds};

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for Position {}

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for PieceId {}

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for PieceKind {}

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for Color {}
