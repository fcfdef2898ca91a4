use rand::Rng;
use std::fmt::Debug;
use std::hash::Hash;

/// Rules of a turn-based game, as seen by the search engine.
///
/// The engine never inspects states directly. Everything it knows about a
/// game comes through this trait: who moves next, which states follow a
/// state, when play stops, and which states are the same position.
///
/// Players are identified by indices in `[0, num_players())`. The engine
/// always counts players relative to a node: index 0 is the player who
/// moved into that node, and each ply advances the index with
/// [`next_player`](GameRule::next_player).
pub trait GameRule {
    /// A game position.
    type State: Clone;

    /// Canonical identity of a position. States with equal keys share one
    /// search node.
    type Key: Clone + Eq + Hash + Debug;

    /// Number of player slots tracked per node. Must be at least 1.
    fn num_players(&self) -> usize;

    /// Canonical key of a state.
    fn key(&self, state: &Self::State) -> Self::Key;

    /// Player who moves after `player`.
    fn next_player(&self, player: usize) -> usize {
        (player + 1) % self.num_players()
    }

    /// Player who moved before `player`. Inverse of `next_player`.
    fn prev_player(&self, player: usize) -> usize {
        let n = self.num_players();
        (player + n - 1) % n
    }

    /// Returns true iff no move is defined from `state`.
    fn is_end(&self, state: &Self::State) -> bool;

    /// All states reachable in one move, in a stable order.
    ///
    /// Empty only for end states.
    fn children(&self, state: &Self::State) -> Vec<Self::State>;

    /// One successor sampled with `rng`, or `None` at an end state.
    ///
    /// The default draws uniformly from [`children`](GameRule::children).
    fn random_child<R: Rng + ?Sized>(&self, state: &Self::State, rng: &mut R) -> Option<Self::State> {
        let mut children = self.children(state);
        if children.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..children.len());
        Some(children.swap_remove(idx))
    }
}
