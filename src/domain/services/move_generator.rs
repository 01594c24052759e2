//! Move generation service
//!
//! Classic three-peg recursive transfer. `solve(n)` moves `n - 1` discs from
//! the source to the auxiliary rod, moves disc `n` to the destination, then
//! moves the `n - 1` discs from the auxiliary rod onto it. Roles are relabeled
//! at every level.

use crate::domain::value_objects::{DiscCount, InvalidSpec, Move, Rod};

/// Upper bound on the capacity reserved up front
const MAX_PREALLOCATED_MOVES: usize = 1 << 16;

/// Pure move generator
pub struct MoveGenerator;

impl MoveGenerator {
    /// Solve for a raw disc count, rejecting `discs <= 0`
    pub fn generate(discs: i64) -> Result<Vec<Move>, InvalidSpec> {
        Ok(Self::solve(DiscCount::new(discs)?))
    }

    /// Solve for an already validated disc count
    ///
    /// Rods are `A` (source), `C` (destination) and `B` (auxiliary).
    pub fn solve(discs: DiscCount) -> Vec<Move> {
        let capacity = usize::try_from(discs.move_count())
            .unwrap_or(usize::MAX)
            .min(MAX_PREALLOCATED_MOVES);
        let mut moves = Vec::with_capacity(capacity);
        transfer(
            discs.get(),
            Rod::SOURCE,
            Rod::DESTINATION,
            Rod::AUXILIARY,
            &mut moves,
        );
        moves
    }
}

fn transfer(n: u32, from: Rod, to: Rod, via: Rod, moves: &mut Vec<Move>) {
    if n == 0 {
        return;
    }
    transfer(n - 1, from, via, to, moves);
    moves.push(Move::new(n, from, to));
    transfer(n - 1, via, to, from, moves);
}
