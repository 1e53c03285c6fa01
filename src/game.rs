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

//! The game state machine.
//!
//! # Examples
//!
//! ```
//! use chessrules::{Color, Game, MoveCategory, Outcome, Position};
//!
//! let mut game = Game::with_first_player(Color::White);
//! let sq = |name: &str| name.parse::<Position>().unwrap();
//!
//! // Fool's mate.
//! game.play(sq("f2"), sq("f3"), None)?;
//! game.play(sq("e7"), sq("e5"), None)?;
//! game.play(sq("g2"), sq("g4"), None)?;
//! let category = game.play(sq("d8"), sq("h4"), None)?;
//! assert_eq!(category, MoveCategory::Standard);
//!
//! assert!(game.is_checkmate());
//! assert_eq!(game.outcome(), Some(Outcome::Decisive { winner: Color::Black }));
//! # Ok::<_, chessrules::MoveError>(())
//! ```

use std::{error::Error, fmt};

use rand::Rng;
use tracing::{debug, info};

use crate::{
    attacks::{self, Attackers},
    board::Board,
    color::{ByColor, Color},
    execute::execute,
    history::History,
    kind::PieceKind,
    legal::{legal_moves, LegalMoves},
    m::{Move, MoveCategory},
    piece::Piece,
    player::Player,
    position::Position,
    setup::{Setup, SetupError},
};

/// Where a game stands.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameState {
    /// The game is running and it is the turn of the given side.
    AwaitingMove(Color),
    /// The side to move has no legal moves and is in check.
    Checkmate { winner: Color },
    /// The given side is to move, has no legal moves and is not in check.
    Stalemate(Color),
}

impl GameState {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, GameState::AwaitingMove(_))
    }
}

/// Outcome of a finished game.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Decisive { winner: Color },
    Draw,
}

impl Outcome {
    pub const fn winner(self) -> Option<Color> {
        match self {
            Outcome::Decisive { winner } => Some(winner),
            Outcome::Draw => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            Outcome::Decisive {
                winner: Color::White,
            } => "1-0",
            Outcome::Decisive {
                winner: Color::Black,
            } => "0-1",
            Outcome::Draw => "1/2-1/2",
        })
    }
}

/// Error when a move is rejected. The game is left unchanged.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum MoveError {
    /// The origin square is empty.
    NoPieceAtSquare { square: Position },
    /// The piece on the origin square belongs to the side not to move.
    WrongTurn { square: Position },
    /// The piece cannot legally move to the destination.
    IllegalDestination { from: Position, to: Position },
    /// A promotion without a choice, or to a pawn or king.
    InvalidPromotionChoice { choice: Option<PieceKind> },
    /// The game has already ended.
    GameOver,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MoveError::NoPieceAtSquare { square } => write!(f, "no piece on {square}"),
            MoveError::WrongTurn { square } => {
                write!(f, "piece on {square} does not belong to the side to move")
            }
            MoveError::IllegalDestination { from, to } => write!(f, "illegal move {from}-{to}"),
            MoveError::InvalidPromotionChoice { choice: None } => {
                f.write_str("promotion requires a choice")
            }
            MoveError::InvalidPromotionChoice { choice: Some(kind) } => {
                write!(f, "cannot promote to {kind}")
            }
            MoveError::GameOver => f.write_str("game is over"),
        }
    }
}

impl Error for MoveError {}

/// A game of chess between two participants.
///
/// The legal moves of the side to move are computed once after every move
/// and cached, so that querying them is free.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    players: ByColor<Player>,
    history: History,
    prior_move: Option<Move>,
    state: GameState,
    legals: LegalMoves,
    first_player: Color,
}

impl Game {
    /// Starts a game from the standard position. The first participant is
    /// seated at random.
    pub fn new() -> Game {
        Game::with_rng(&mut rand::rng())
    }

    /// Like [`Game::new()`], with a given source of randomness.
    pub fn with_rng<R: Rng + ?Sized>(rng: &mut R) -> Game {
        Game::with_first_player(Color::from_white(rng.random()))
    }

    /// Starts a game from the standard position with the first participant
    /// playing `first_player`. White moves first either way.
    pub fn with_first_player(first_player: Color) -> Game {
        let mut game = Game::start(Setup::initial(), first_player);
        game.settle(Color::White);
        debug!(%first_player, "new game");
        game
    }

    /// Starts a game from a validated setup. The first participant plays
    /// the side to move.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] listing every problem of the setup.
    pub fn from_setup(setup: Setup) -> Result<Game, SetupError> {
        let kinds = setup.errors();
        if !kinds.is_empty() {
            return Err(SetupError { kinds });
        }
        let turn = setup.turn;
        let mut game = Game::start(setup, turn);
        game.settle(turn);
        debug!(%turn, state = ?game.state, "game from setup");
        Ok(game)
    }

    fn start(setup: Setup, first_player: Color) -> Game {
        let players = ByColor::new_with(|color| {
            let king = setup
                .board
                .king_of(color)
                .unwrap_or(Position::new(color.back_row(), 4));
            Player::new(color, king)
        });
        Game {
            board: setup.board,
            players,
            history: History::new(),
            prior_move: setup.last_move,
            state: GameState::AwaitingMove(setup.turn),
            legals: LegalMoves::default(),
            first_player,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self, color: Color) -> &Player {
        self.players.get(color)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// The color of the first participant.
    pub fn first_player(&self) -> Color {
        self.first_player
    }

    /// The side to move, or `None` if the game is over.
    pub fn turn(&self) -> Option<Color> {
        match self.state {
            GameState::AwaitingMove(color) => Some(color),
            GameState::Checkmate { .. } | GameState::Stalemate(_) => None,
        }
    }

    fn side_to_move(&self) -> Color {
        match self.state {
            GameState::AwaitingMove(color) | GameState::Stalemate(color) => color,
            GameState::Checkmate { winner } => !winner,
        }
    }

    /// The previous move, from history or the setup.
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().or(self.prior_move)
    }

    /// Legal moves of the side to move. Empty when the game is over.
    pub fn legal_moves(&self) -> &LegalMoves {
        &self.legals
    }

    /// Pieces of the side to move that attack its king.
    pub fn checkers(&self) -> Attackers {
        let side = self.side_to_move();
        attacks::attacking_pieces(&self.board, self.players.get(side).king(), side)
    }

    pub fn is_check(&self) -> bool {
        !self.checkers().is_empty()
    }

    pub fn is_checkmate(&self) -> bool {
        matches!(self.state, GameState::Checkmate { .. })
    }

    pub fn is_stalemate(&self) -> bool {
        matches!(self.state, GameState::Stalemate(_))
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            GameState::AwaitingMove(_) => None,
            GameState::Checkmate { winner } => Some(Outcome::Decisive { winner }),
            GameState::Stalemate(_) => Some(Outcome::Draw),
        }
    }

    /// Pieces captured by `by`, in capture order.
    pub fn captured(&self, by: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.players
            .get(by)
            .captured()
            .iter()
            .map(|&id| self.board.get(id))
    }

    /// Checks that the piece on `from` may move to `to` and tells how the
    /// move would be executed.
    ///
    /// # Errors
    ///
    /// See [`MoveError`]. Errors are checked in the order game over, empty
    /// origin, wrong color, illegal destination.
    pub fn attempt_move(&self, from: Position, to: Position) -> Result<MoveCategory, MoveError> {
        self.validate(from, to)
            .inspect_err(|err| debug!(%from, %to, %err, "rejected move"))
    }

    fn validate(&self, from: Position, to: Position) -> Result<MoveCategory, MoveError> {
        let GameState::AwaitingMove(turn) = self.state else {
            return Err(MoveError::GameOver);
        };
        let piece = self
            .board
            .piece_at(from)
            .ok_or(MoveError::NoPieceAtSquare { square: from })?;
        if piece.color() != turn {
            return Err(MoveError::WrongTurn { square: from });
        }
        self.legals
            .category(from, to)
            .ok_or(MoveError::IllegalDestination { from, to })
    }

    /// Executes a move with the category returned by
    /// [`Game::attempt_move()`], records it, and passes the turn.
    ///
    /// `promotion` must be one of Queen, Rook, Bishop or Knight for
    /// promotions and is ignored otherwise.
    ///
    /// # Errors
    ///
    /// Rejects moves that are not legal with the given category, and
    /// promotions without a valid choice. Nothing is changed on error.
    pub fn apply_move(
        &mut self,
        m: Move,
        category: MoveCategory,
        promotion: Option<PieceKind>,
    ) -> Result<(), MoveError> {
        let mover = self.side_to_move();
        self.validate(m.from, m.to)
            .and_then(|legal| {
                if legal == category {
                    Ok(())
                } else {
                    Err(MoveError::IllegalDestination {
                        from: m.from,
                        to: m.to,
                    })
                }
            })
            .and_then(|()| {
                execute(
                    &mut self.board,
                    self.players.get_mut(mover),
                    m,
                    category,
                    promotion,
                )
            })
            .inspect_err(|err| debug!(%m, ?category, %err, "rejected move"))?;

        self.history.push(m);
        debug!(%mover, %m, ?category, ?promotion, "applied move");
        self.settle(!mover);
        Ok(())
    }

    /// Attempts and applies a move in one go.
    pub fn play(
        &mut self,
        from: Position,
        to: Position,
        promotion: Option<PieceKind>,
    ) -> Result<MoveCategory, MoveError> {
        let category = self.attempt_move(from, to)?;
        self.apply_move(Move::new(from, to), category, promotion)?;
        Ok(category)
    }

    /// Computes the legal moves of `turn` and decides whether the game
    /// goes on.
    fn settle(&mut self, turn: Color) {
        let king = self.players.get(turn).king();
        self.legals = legal_moves(&self.board, turn, king, self.last_move());

        self.state = if !self.legals.is_empty() {
            GameState::AwaitingMove(turn)
        } else if attacks::attacking_pieces(&self.board, king, turn).is_empty() {
            GameState::Stalemate(turn)
        } else {
            GameState::Checkmate { winner: !turn }
        };

        if let Some(outcome) = self.outcome() {
            info!(
                %outcome,
                state = ?self.state,
                plies = self.history.len(),
                "game over"
            );
        }
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::new()
    }
}

/// Starts a game from the standard position with random seating.
pub fn new_game() -> Game {
    Game::new()
}

/// Legal moves of the side to move.
pub fn current_legal_moves(game: &Game) -> &LegalMoves {
    game.legal_moves()
}

pub fn is_checkmate(game: &Game) -> bool {
    game.is_checkmate()
}

pub fn is_stalemate(game: &Game) -> bool {
    game.is_stalemate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::SetupErrorKinds;

    fn pos(name: &str) -> Position {
        name.parse().expect("valid square")
    }

    #[test]
    fn test_new_game() {
        let game = Game::with_first_player(Color::Black);
        assert_eq!(game.first_player(), Color::Black);
        assert_eq!(game.turn(), Some(Color::White));
        assert_eq!(game.legal_moves().len(), 20);
        assert!(!game.is_check());
        assert_eq!(game.outcome(), None);
        assert_eq!(game.player(Color::Black).king(), pos("e8"));
    }

    #[test]
    fn test_random_seating() {
        let game = new_game();
        assert_eq!(game.turn(), Some(Color::White));
        assert!(Color::ALL.contains(&game.first_player()));
    }

    #[test]
    fn test_errors_in_order() {
        let game = Game::with_first_player(Color::White);
        assert_eq!(
            game.attempt_move(pos("e4"), pos("e5")),
            Err(MoveError::NoPieceAtSquare { square: pos("e4") })
        );
        assert_eq!(
            game.attempt_move(pos("e7"), pos("e5")),
            Err(MoveError::WrongTurn { square: pos("e7") })
        );
        assert_eq!(
            game.attempt_move(pos("e2"), pos("e5")),
            Err(MoveError::IllegalDestination {
                from: pos("e2"),
                to: pos("e5")
            })
        );
        assert_eq!(game.attempt_move(pos("e2"), pos("e4")), Ok(MoveCategory::Standard));
    }

    #[test]
    fn test_apply_checks_category() {
        let mut game = Game::with_first_player(Color::White);
        let e2e4 = Move::new(pos("e2"), pos("e4"));
        assert_eq!(
            game.apply_move(e2e4, MoveCategory::Capture, None),
            Err(MoveError::IllegalDestination {
                from: pos("e2"),
                to: pos("e4")
            })
        );
        assert!(game.history().is_empty());

        game.apply_move(e2e4, MoveCategory::Standard, None).unwrap();
        assert_eq!(game.turn(), Some(Color::Black));
        assert_eq!(game.last_move(), Some(e2e4));
        assert!(game.board().piece_at(pos("e4")).unwrap().has_moved());
    }

    #[test]
    fn test_game_over() {
        let mut game = Game::with_first_player(Color::White);
        for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
            game.play(pos(from), pos(to), None).unwrap();
        }
        assert!(game.is_checkmate());
        assert!(game.is_check());
        assert!(is_checkmate(&game));
        assert!(current_legal_moves(&game).is_empty());
        assert_eq!(game.turn(), None);
        assert_eq!(game.outcome().map(|o| o.to_string()), Some("0-1".to_owned()));
        assert_eq!(
            game.attempt_move(pos("a2"), pos("a3")),
            Err(MoveError::GameOver)
        );
    }

    #[test]
    fn test_stalemate_from_setup() {
        let setup: Setup = "7k/5Q2/6K1/8/8/8/8/8 b".parse().unwrap();
        let game = Game::from_setup(setup).unwrap();
        assert!(game.is_stalemate());
        assert!(!game.is_check());
        assert_eq!(game.outcome(), Some(Outcome::Draw));
    }

    #[test]
    fn test_invalid_setup() {
        let err = Game::from_setup(Setup::empty()).unwrap_err();
        assert!(err.kinds().contains(SetupErrorKinds::EMPTY_BOARD));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            MoveError::InvalidPromotionChoice {
                choice: Some(PieceKind::King)
            }
            .to_string(),
            "cannot promote to king"
        );
        assert_eq!(
            MoveError::IllegalDestination {
                from: pos("e2"),
                to: pos("e5")
            }
            .to_string(),
            "illegal move e2-e5"
        );
    }
}
