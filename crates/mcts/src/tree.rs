//! Arena-allocated node registry.
//!
//! Nodes are stored in a contiguous vector and referenced by [`NodeId`]. A key
//! index maps canonical state keys to registered nodes, so positions reached
//! by different move orders can share one statistics record.

use crate::node::{Node, NodeId};
use std::collections::HashMap;
use std::hash::Hash;

/// Node arena plus transposition index.
///
/// The registry owns every node. Parents only hold ids, which keeps the
/// graph free of ownership cycles.
#[derive(Debug)]
pub struct Tree<K, S> {
    nodes: Vec<Node<S>>,
    index: HashMap<K, NodeId>,
    num_players: usize,
}

impl<K: Eq + Hash, S> Tree<K, S> {
    /// Create a registry holding only the root, registered under `root_key`.
    pub fn new(root_key: K, root_state: S, num_players: usize) -> Self {
        let mut index = HashMap::new();
        index.insert(root_key, NodeId::ROOT);
        Self {
            nodes: vec![Node::new(root_state, num_players)],
            index,
            num_players,
        }
    }

    /// Get a reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId did not come from this registry.
    pub fn get(&self, id: NodeId) -> &Node<S> {
        &self.nodes[id.0]
    }

    /// Get a mutable reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId did not come from this registry.
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<S> {
        &mut self.nodes[id.0]
    }

    /// Look up the node registered under `key`.
    pub fn lookup(&self, key: &K) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    /// Return the node registered under `key`, or allocate a fresh one.
    ///
    /// A fresh node is entered into the key index only when `register` is
    /// set. Unregistered nodes are still owned by the arena but cannot be
    /// found again by key.
    pub fn find_or_add(&mut self, key: K, state: S, register: bool) -> NodeId {
        if let Some(id) = self.lookup(&key) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(state, self.num_players));
        if register {
            self.index.insert(key, id);
        }
        id
    }

    /// Number of nodes in the arena, registered or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root exists from construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of keys in the transposition index.
    pub fn registered(&self) -> usize {
        self.index.len()
    }

    /// Iterate over all nodes in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<S>)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }
}
