/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Match, Position};
use crate::Result;

/// Perform a perft at the specified depth, collecting only data about the number of possible positions (nodes).
///
/// This performs bulk counting, meaning that, at depth 1, it returns the number of available moves,
/// rather than making them, recursing again, and returning 1 for each terminal case.
///
/// A finished match has no moves, since the side that was checkmated never gets a turn.
///
/// # Example
/// ```
/// # use gambit::{perft, Match};
/// let game = Match::new();
/// assert_eq!(perft(&game, 1)?, 20);
/// assert_eq!(perft(&game, 2)?, 400);
/// # Ok::<(), gambit::Error>(())
/// ```
pub fn perft(game: &Match, depth: usize) -> Result<u64> {
    // Recursion limit; return 1, since we're fathoming this node.
    if depth == 0 {
        return Ok(1);
    }
    if game.is_finished() {
        return Ok(0);
    }

    let mut scratch = game.clone();
    let moves = scratch.legal_moves()?;

    // Bulk counting; no need to recurse again just to apply a singular move and return 1.
    if depth == 1 {
        return Ok(moves.len() as u64);
    }

    // Recursively accumulate the nodes from the remaining depths
    moves.into_iter().try_fold(0, |nodes, (from, to)| -> Result<u64> {
        let mut next = game.clone();
        next.realize_move(from, to)?;
        Ok(nodes + perft(&next, depth - 1)?)
    })
}

/// Perform a splitperft at the specified depth, returning the number of nodes reachable after each root move.
pub fn splitperft(game: &Match, depth: usize) -> Result<Vec<((Position, Position), u64)>> {
    if depth == 0 || game.is_finished() {
        return Ok(Vec::new());
    }

    let mut scratch = game.clone();
    scratch
        .legal_moves()?
        .into_iter()
        .map(|(from, to)| -> Result<_> {
            let mut next = game.clone();
            next.realize_move(from, to)?;
            Ok(((from, to), perft(&next, depth - 1)?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splitperft_sums_to_perft() {
        let game = Match::new();
        let split = splitperft(&game, 2).unwrap();
        assert_eq!(split.len(), 20);
        assert!(split.iter().all(|&(_, nodes)| nodes == 20));
        assert_eq!(split.iter().map(|(_, n)| n).sum::<u64>(), perft(&game, 2).unwrap());
    }
}
