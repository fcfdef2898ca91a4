//! Search node types for arena storage.
//!
//! Nodes live in the registry arena and are referenced by index, so one node
//! can be the child of several parents when positions transpose.

use mcgraph_core::{McGraphError, Result};

/// Index into the node arena.
///
/// This is a lightweight handle that references a node in the registry.
/// Parents hold these handles rather than owning their children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);

    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Accumulated simulation statistics for a single node.
///
/// Slot `i` of `win_count` counts simulations won by the player `i` plies
/// after the player who moved into this node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeStats {
    /// Number of simulations that passed through this node.
    pub visit_count: u32,

    /// Wins per player slot. Sums to `visit_count`.
    pub win_count: Vec<u32>,
}

impl NodeStats {
    /// Create empty stats with one slot per player.
    pub fn new(num_players: usize) -> Self {
        Self {
            visit_count: 0,
            win_count: vec![0; num_players],
        }
    }

    /// Credit one simulation to `player`.
    ///
    /// # Errors
    /// Returns `McGraphError::PlayerOutOfRange` if `player` has no slot.
    pub fn record(&mut self, player: usize) -> Result<()> {
        let num_players = self.win_count.len();
        let slot = self
            .win_count
            .get_mut(player)
            .ok_or(McGraphError::PlayerOutOfRange {
                player,
                num_players,
            })?;
        *slot += 1;
        self.visit_count += 1;
        Ok(())
    }

    /// Share of wins per player slot.
    ///
    /// # Errors
    /// Returns `McGraphError::UnvisitedNode` if no simulation has been
    /// recorded, since the rate would divide by zero.
    pub fn win_rate(&self) -> Result<Vec<f64>> {
        let total = self.total_wins();
        if total == 0 {
            return Err(McGraphError::UnvisitedNode);
        }
        Ok(self
            .win_count
            .iter()
            .map(|&wins| f64::from(wins) / f64::from(total))
            .collect())
    }

    /// Share of wins for a single slot, or `None` if the node is unvisited
    /// or the slot does not exist.
    pub fn win_rate_of(&self, player: usize) -> Option<f64> {
        let total = self.total_wins();
        if total == 0 {
            return None;
        }
        self.win_count
            .get(player)
            .map(|&wins| f64::from(wins) / f64::from(total))
    }

    fn total_wins(&self) -> u32 {
        self.win_count.iter().sum()
    }
}

/// A node in the search graph.
///
/// Each node holds one game state, the statistics gathered for it, and the
/// handles of its realized children.
#[derive(Clone, Debug)]
pub struct Node<S> {
    /// Game state this node stands for.
    pub state: S,

    /// Visit and win counts.
    pub stats: NodeStats,

    /// Children in the order the rule produced them. Empty until expanded,
    /// and forever empty for end states.
    pub children: Vec<NodeId>,
}

impl<S> Node<S> {
    /// Create an unexpanded, unvisited node.
    pub fn new(state: S, num_players: usize) -> Self {
        Self {
            state,
            stats: NodeStats::new(num_players),
            children: Vec::new(),
        }
    }

    /// A node without children: either an end state or not yet expanded.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
