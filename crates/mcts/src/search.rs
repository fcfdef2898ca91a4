//! Monte Carlo graph search with UCB1 selection.
//!
//! Each iteration runs selection, expansion, simulation and backpropagation:
//! 1. Selection: descend from the root through expanded nodes by UCB1 score
//! 2. Expansion: attach the children of the first leaf reached
//! 3. Simulation: play out from the leaf to an end state
//! 4. Backpropagation: credit the winner along the descended path
//!
//! Player indices are relative. At every node slot 0 is the player who moved
//! into that node. Going up one ply shifts the winner's index by
//! `next_player`, so every node on the path credits the winner in its own
//! frame.

use crate::{
    config::MctsConfig,
    node::{Node, NodeId, NodeStats},
    playout::Playout,
    tree::Tree,
};
use mcgraph_core::{GameRule, McGraphError, Result};
use tracing::{debug, trace};

/// Statistics of one child of the root after a search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChildStats<S> {
    /// Node holding the child.
    pub id: NodeId,

    /// Child game state.
    pub state: S,

    /// Accumulated visits and wins.
    pub stats: NodeStats,
}

/// Result of a full search run.
#[derive(Clone, Debug)]
pub struct SearchResult<S> {
    /// Recommended next state.
    pub best_state: S,

    /// Root children in the order the rule produced them.
    /// Empty when the root is an end state.
    pub children: Vec<ChildStats<S>>,

    /// Number of iterations performed.
    pub iterations: usize,
}

/// Monte Carlo search over a transposition-aware node graph.
///
/// Generic over:
/// - `G`: The game rule
/// - `P`: The playout strategy used to score new leaves
pub struct Mcts<G: GameRule, P: Playout<G>> {
    config: MctsConfig,
    rule: G,
    playout: P,
    tree: Tree<G::Key, G::State>,
}

impl<G, P> Mcts<G, P>
where
    G: GameRule,
    P: Playout<G>,
{
    /// Create an engine rooted at `initial_state`.
    ///
    /// # Errors
    /// Returns `McGraphError::NoPlayers` if the rule declares zero players.
    pub fn new(rule: G, initial_state: G::State, config: MctsConfig, playout: P) -> Result<Self> {
        let num_players = rule.num_players();
        if num_players == 0 {
            return Err(McGraphError::NoPlayers);
        }
        let root_key = rule.key(&initial_state);
        let tree = Tree::new(root_key, initial_state, num_players);

        Ok(Self {
            config,
            rule,
            playout,
            tree,
        })
    }

    /// The game rule being searched.
    pub fn rule(&self) -> &G {
        &self.rule
    }

    /// The engine configuration.
    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Id of the root node.
    pub fn root_id(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by id.
    ///
    /// # Panics
    /// Panics if the id did not come from this engine.
    pub fn node(&self, id: NodeId) -> &Node<G::State> {
        self.tree.get(id)
    }

    /// Id of the node registered under the key of `state`, if any.
    pub fn node_id(&self, state: &G::State) -> Option<NodeId> {
        self.tree.lookup(&self.rule.key(state))
    }

    /// The node registered under the key of `state`, if any.
    pub fn get_node(&self, state: &G::State) -> Option<&Node<G::State>> {
        self.node_id(state).map(|id| self.tree.get(id))
    }

    /// Number of nodes allocated so far.
    pub fn node_count(&self) -> usize {
        self.tree.len()
    }

    /// All nodes in allocation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node<G::State>)> {
        self.tree.iter()
    }

    /// Node for `state`: the registered node with the same key if there is
    /// one, otherwise a freshly allocated node.
    ///
    /// Under `Transpositions::Register` the fresh node is registered under its
    /// key. Under `Transpositions::Lookup` it is not, so a later call with the
    /// same key allocates another node.
    pub fn make_search_node(&mut self, state: G::State) -> NodeId {
        let key = self.rule.key(&state);
        let register = self.config.registers_children();
        self.tree.find_or_add(key, state, register)
    }

    /// Attach one child node per successor state, in rule order.
    ///
    /// Callers expand only unexpanded, non-terminal nodes; calling this on an
    /// expanded node appends the children a second time.
    pub fn append_children(&mut self, id: NodeId) {
        let children = self.rule.children(&self.tree.get(id).state);
        for child_state in children {
            let child_id = self.make_search_node(child_state);
            self.tree.get_mut(id).children.push(child_id);
        }
    }

    /// UCB1 score of `child` as seen from `parent`.
    pub fn ucb_score(&self, parent: NodeId, child: NodeId) -> f64 {
        let parent_visits = self.tree.get(parent).stats.visit_count;
        ucb1(parent_visits, &self.tree.get(child).stats)
    }

    /// Child of `parent` with the highest UCB1 score, or `None` for a leaf.
    ///
    /// Ties go to the earliest child.
    pub fn select_child(&self, parent: NodeId) -> Option<NodeId> {
        let node = self.tree.get(parent);
        let parent_visits = node.stats.visit_count;

        let mut best: Option<(NodeId, f64)> = None;
        for &child_id in &node.children {
            let score = ucb1(parent_visits, &self.tree.get(child_id).stats);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((child_id, score));
            }
        }

        best.map(|(id, _)| id)
    }

    /// Run one iteration from the root and return the winner index as seen
    /// from the root's parent.
    ///
    /// # Errors
    /// Returns `McGraphError::PlayerOutOfRange` if the rule's rotation or the
    /// playout yields a player index without a slot.
    pub fn simulate(&mut self) -> Result<usize> {
        let mut path = vec![NodeId::ROOT];
        let mut current = NodeId::ROOT;

        // SELECT: descend through expanded nodes
        while let Some(next) = self.select_child(current) {
            trace!(node = current.0, next = next.0, "selection");
            path.push(next);
            current = next;
        }

        let leaf = current;
        let winner = if self.rule.is_end(&self.tree.get(leaf).state) {
            trace!(node = leaf.0, "selection reached end");
            0
        } else {
            // EXPAND then SIMULATE
            self.append_children(leaf);
            trace!(
                node = leaf.0,
                key = ?self.rule.key(&self.tree.get(leaf).state),
                children = self.tree.get(leaf).children.len(),
                "expansion"
            );
            let winner = self.playout.play_out(&self.rule, &self.tree.get(leaf).state, 0);
            trace!(node = leaf.0, winner, "rollout");
            winner
        };

        // BACKPROPAGATE: credit in each node's frame, then shift one ply up
        let mut player = winner;
        for (depth, &id) in path.iter().enumerate().rev() {
            self.tree.get_mut(id).stats.record(player)?;
            if depth + 1 < path.len() {
                trace!(node = id.0, player, "backprop");
            }
            player = self.rule.next_player(player);
        }

        Ok(player)
    }

    /// Search for `max_iterations` iterations and return the recommended next
    /// state.
    ///
    /// An end-state root is returned unchanged without expansion. Otherwise
    /// the root child with the highest slot-0 win rate is returned; ties and
    /// an all-zero field go to the earliest child.
    ///
    /// # Errors
    /// Returns `McGraphError::NoChildren` if the root is not an end state but
    /// has no children, and propagates errors from [`simulate`](Self::simulate).
    pub fn search(&mut self, max_iterations: usize) -> Result<G::State> {
        let root = self.tree.get(NodeId::ROOT);
        if root.is_leaf() {
            if self.rule.is_end(&root.state) {
                debug!("root is an end state, nothing to search");
                return Ok(root.state.clone());
            }
            self.append_children(NodeId::ROOT);
        }

        for iteration in 0..max_iterations {
            trace!(iteration, "iteration start");
            self.simulate()?;
        }

        let best = self.best_child().ok_or(McGraphError::NoChildren)?;
        let node = self.tree.get(best);
        debug!(
            iterations = max_iterations,
            nodes = self.tree.len(),
            registered = self.tree.registered(),
            best = best.0,
            visits = node.stats.visit_count,
            "search complete"
        );

        Ok(node.state.clone())
    }

    /// Search with the configured iteration budget and collect root child
    /// statistics alongside the recommendation.
    pub fn run(&mut self) -> Result<SearchResult<G::State>> {
        let iterations = self.config.num_iterations;
        let best_state = self.search(iterations)?;

        Ok(SearchResult {
            best_state,
            children: self.root_child_stats(),
            iterations,
        })
    }

    /// Snapshot of the root's children.
    pub fn root_child_stats(&self) -> Vec<ChildStats<G::State>> {
        self.tree
            .get(NodeId::ROOT)
            .children
            .iter()
            .map(|&id| {
                let node = self.tree.get(id);
                ChildStats {
                    id,
                    state: node.state.clone(),
                    stats: node.stats.clone(),
                }
            })
            .collect()
    }

    /// Root child with the highest slot-0 win rate.
    fn best_child(&self) -> Option<NodeId> {
        let children = &self.tree.get(NodeId::ROOT).children;
        let mut best = *children.first()?;
        let mut best_rate = 0.0;

        for &child_id in children {
            // Unvisited children sit at the zero baseline
            let rate = self.tree.get(child_id).stats.win_rate_of(0).unwrap_or(0.0);
            if rate > best_rate {
                best = child_id;
                best_rate = rate;
            }
        }

        Some(best)
    }
}

/// UCB1 = W(child)[0] + sqrt(2 * log2(N_parent) / N_child)
///
/// Unvisited children score +inf so each is tried once before any revisit.
fn ucb1(parent_visits: u32, child: &NodeStats) -> f64 {
    if child.visit_count == 0 {
        return f64::INFINITY;
    }
    let parent_visits = f64::from(parent_visits.max(1));
    let confidence = (2.0 * parent_visits.log2() / f64::from(child.visit_count)).sqrt();
    // A visited node always has a recorded win
    let value = child.win_rate_of(0).unwrap_or(0.0);
    value + confidence
}
