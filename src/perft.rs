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

//! Count legal move paths.
//!
//! # Examples
//!
//! ```
//! use chessrules::{perft, Color, Game};
//!
//! let game = Game::with_first_player(Color::White);
//! assert_eq!(perft(&game, 1), 20);
//! assert_eq!(perft(&game, 2), 400);
//! assert_eq!(perft(&game, 3), 8902);
//! ```

use crate::{
    game::Game,
    kind::PieceKind,
    m::{Move, MoveCategory},
};

fn choices(category: MoveCategory) -> &'static [Option<PieceKind>] {
    const PROMOTIONS: [Option<PieceKind>; 4] = [
        Some(PieceKind::PROMOTIONS[0]),
        Some(PieceKind::PROMOTIONS[1]),
        Some(PieceKind::PROMOTIONS[2]),
        Some(PieceKind::PROMOTIONS[3]),
    ];

    if category == MoveCategory::Promotion {
        &PROMOTIONS
    } else {
        &[None]
    }
}

/// Counts legal move paths of a given length.
///
/// Each promotion choice is a separate path. Paths ending early in mate or
/// stalemate are not counted. Useful for comparing, testing and debugging
/// move generation correctness and performance.
pub fn perft(game: &Game, depth: u32) -> u64 {
    if depth < 1 {
        1
    } else if depth == 1 {
        game.legal_moves()
            .moves()
            .map(|(_, category)| choices(category).len() as u64)
            .sum()
    } else {
        game.legal_moves()
            .moves()
            .flat_map(|(m, category)| {
                choices(category)
                    .iter()
                    .map(move |&promotion| (m, category, promotion))
            })
            .map(|(m, category, promotion)| child_perft(game, m, category, promotion, depth - 1))
            .sum()
    }
}

/// Like [`perft()`], but returns the count below each root move.
pub fn perft_divide(game: &Game, depth: u32) -> Vec<(Move, Option<PieceKind>, u64)> {
    if depth < 1 {
        return Vec::new();
    }
    game.legal_moves()
        .moves()
        .flat_map(|(m, category)| {
            choices(category)
                .iter()
                .map(move |&promotion| (m, category, promotion))
        })
        .map(|(m, category, promotion)| {
            let nodes = child_perft(game, m, category, promotion, depth - 1);
            (m, promotion, nodes)
        })
        .collect()
}

fn child_perft(
    game: &Game,
    m: Move,
    category: MoveCategory,
    promotion: Option<PieceKind>,
    depth: u32,
) -> u64 {
    let mut child = game.clone();
    child
        .apply_move(m, category, promotion)
        .map_or(0, |()| perft(&child, depth))
}
