//! mcgraph core - game rule contract and common types
//!
//! This crate provides the [`GameRule`] trait that a game must implement to be
//! searched by the `mcgraph-mcts` engine, plus the error type shared by the
//! workspace.
//!
//! # Types
//!
//! - [`GameRule`] - Trait for turn-based, possibly multi-player game rules
//! - [`McGraphError`] - Failure modes surfaced by the engine

mod error;
mod game;

pub use error::{McGraphError, Result};
pub use game::GameRule;
