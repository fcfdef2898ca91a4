//! Playout abstraction for the simulation step.
//!
//! The `Playout` trait lets the engine swap how a leaf is scored:
//! - `RandomPlayout` follows `GameRule::random_child` to an end state
//! - tests and hosts can plug in scripted or heuristic playouts

use mcgraph_core::GameRule;
use rand::Rng;

/// Strategy for finishing a game from a leaf state.
pub trait Playout<G: GameRule> {
    /// Play from `state` until no move remains and return the winner.
    ///
    /// `player` is the index of the player who moved into `state`. The
    /// returned index is expressed in the same rotation: it is the player
    /// who moved into the final state.
    fn play_out(&mut self, rule: &G, state: &G::State, player: usize) -> usize;
}

/// Playout that samples successors with `GameRule::random_child`.
///
/// There is no depth limit. A rule whose `random_child` never returns `None`
/// makes the playout run forever.
#[derive(Clone, Debug)]
pub struct RandomPlayout<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomPlayout<R> {
    /// Create a random playout driven by `rng`.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<G: GameRule, R: Rng> Playout<G> for RandomPlayout<R> {
    fn play_out(&mut self, rule: &G, state: &G::State, player: usize) -> usize {
        let mut player = player;
        let mut next = rule.random_child(state, &mut self.rng);

        while let Some(child) = next {
            player = rule.next_player(player);
            next = rule.random_child(&child, &mut self.rng);
        }

        player
    }
}
