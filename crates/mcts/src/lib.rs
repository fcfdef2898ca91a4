//! Monte Carlo graph search over abstract game rules.
//!
//! This crate provides a generic search engine that can be used with any game
//! implementing the `mcgraph_core::GameRule` trait.
//!
//! # Features
//!
//! - **Generic**: Works with any `GameRule`, for any number of players
//! - **UCB1 Selection**: Unvisited children first, then win rate plus a
//!   log-based confidence term
//! - **Transpositions**: Nodes are keyed by canonical state, so different move
//!   orders can share one statistics record
//! - **Playout Abstraction**: Random playouts by default, pluggable for tests
//!   and heuristics
//! - **Iterative**: Neither selection nor playout recurses, so deep games do
//!   not exhaust the stack
//!
//! # Example
//!
//! ```
//! use mcgraph_mcts::{games::{Nim, NimState}, Mcts, MctsConfig, RandomPlayout};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let game = Nim::two_player();
//! let state = NimState::new(vec![1, 2]);
//!
//! let config = MctsConfig::with_iterations(500);
//! let playout = RandomPlayout::new(ChaCha8Rng::seed_from_u64(42));
//! let mut mcts = Mcts::new(game, state, config, playout).expect("two players");
//!
//! let result = mcts.run().expect("non-terminal root");
//! assert_eq!(result.best_state, NimState::new(vec![1, 1]));
//! ```

pub mod config;
pub mod games;
mod node;
pub mod playout;
pub mod search;
mod tree;

pub use config::{MctsConfig, Transpositions};
pub use node::{Node, NodeId, NodeStats};
pub use playout::{Playout, RandomPlayout};
pub use search::{ChildStats, Mcts, SearchResult};
