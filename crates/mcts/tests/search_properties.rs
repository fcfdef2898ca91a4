//! Property-based tests for the search engine.
//!
//! These tests verify the invariants the engine promises:
//! - Win counts of every node sum to its visit count, after every iteration
//! - The recommendation is always a child of the root
//! - Same seed, same search
//! - Registered transpositions never leave two nodes with one key

use mcgraph_core::GameRule;
use mcgraph_mcts::{
    games::{Nim, NimState},
    Mcts, MctsConfig, RandomPlayout, Transpositions,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

// =============================================================================
// Strategies for generating test inputs
// =============================================================================

/// Generate a random seed for playouts
fn arb_seed() -> impl Strategy<Value = u64> {
    any::<u64>()
}

/// Generate a small iteration budget (fast tests)
fn arb_iterations() -> impl Strategy<Value = usize> {
    1usize..150
}

/// Generate a player count
fn arb_players() -> impl Strategy<Value = usize> {
    1usize..5
}

/// Generate a small Nim position with at least one object left
fn arb_position() -> impl Strategy<Value = NimState> {
    prop::collection::vec(0u32..5, 1..4)
        .prop_filter("position must not be an end state", |heaps| {
            heaps.iter().any(|&h| h > 0)
        })
        .prop_map(NimState::new)
}

/// Generate a transposition mode
fn arb_transpositions() -> impl Strategy<Value = Transpositions> {
    prop_oneof![Just(Transpositions::Lookup), Just(Transpositions::Register)]
}

fn create_mcts(
    players: usize,
    state: NimState,
    transpositions: Transpositions,
    iterations: usize,
    seed: u64,
) -> Mcts<Nim, RandomPlayout<ChaCha8Rng>> {
    let config = MctsConfig {
        num_iterations: iterations,
        transpositions,
    };
    let playout = RandomPlayout::new(ChaCha8Rng::seed_from_u64(seed));
    Mcts::new(Nim::new(players), state, config, playout).unwrap()
}

// =============================================================================
// Statistics invariant
// =============================================================================

proptest! {
    /// sum(win_count) == visit_count for every node after every iteration
    #[test]
    fn prop_win_counts_sum_to_visits(
        seed in arb_seed(),
        iterations in arb_iterations(),
        players in arb_players(),
        state in arb_position(),
        transpositions in arb_transpositions(),
    ) {
        let mut mcts = create_mcts(players, state, transpositions, iterations, seed);
        mcts.search(0).unwrap();

        for iteration in 0..iterations {
            mcts.simulate().unwrap();

            for (id, node) in mcts.nodes() {
                let wins: u32 = node.stats.win_count.iter().sum();
                prop_assert_eq!(
                    wins,
                    node.stats.visit_count,
                    "node {} after iteration {}",
                    id.index(),
                    iteration
                );
                prop_assert_eq!(node.stats.win_count.len(), players);
            }
        }

        // Every iteration passes through the root exactly once
        let root = mcts.node(mcts.root_id());
        prop_assert_eq!(root.stats.visit_count as usize, iterations);
    }

    /// The recommended state is one of the root's children
    #[test]
    fn prop_best_state_is_root_child(
        seed in arb_seed(),
        iterations in arb_iterations(),
        players in arb_players(),
        state in arb_position(),
        transpositions in arb_transpositions(),
    ) {
        let mut mcts = create_mcts(players, state.clone(), transpositions, iterations, seed);
        let result = mcts.run().unwrap();

        let children = Nim::new(players).children(&state);
        prop_assert!(children.contains(&result.best_state));
        prop_assert_eq!(result.children.len(), children.len());
    }
}

// =============================================================================
// Determinism
// =============================================================================

proptest! {
    /// Same seed should produce identical statistics
    #[test]
    fn prop_deterministic(
        seed in arb_seed(),
        iterations in arb_iterations(),
        players in arb_players(),
        state in arb_position(),
        transpositions in arb_transpositions(),
    ) {
        let run = || {
            let mut mcts = create_mcts(players, state.clone(), transpositions, iterations, seed);
            mcts.run().unwrap()
        };

        let result1 = run();
        let result2 = run();

        prop_assert_eq!(result1.best_state, result2.best_state);
        prop_assert_eq!(result1.children, result2.children);
    }
}

// =============================================================================
// Transpositions
// =============================================================================

proptest! {
    /// With registration on, no two nodes share a canonical key
    #[test]
    fn prop_registered_keys_are_unique(
        seed in arb_seed(),
        iterations in arb_iterations(),
        state in arb_position(),
    ) {
        let mut mcts = create_mcts(2, state, Transpositions::Register, iterations, seed);
        mcts.run().unwrap();

        let mut seen = HashSet::new();
        for (id, node) in mcts.nodes() {
            let key = mcts.rule().key(&node.state);
            prop_assert!(seen.insert(key), "duplicate key at node {}", id.index());
            prop_assert_eq!(mcts.node_id(&node.state), Some(id));
        }
    }
}

/// Two move orders reaching the same heaps accumulate into one record.
#[test]
fn test_move_orders_share_one_node() {
    // [1, 1, 2] -> [0, 1, 2] and [1, 0, 2] both canonicalize to [1, 2]
    let mut mcts = create_mcts(2, NimState::new(vec![1, 1, 2]), Transpositions::Register, 200, 7);
    mcts.run().unwrap();

    let root = mcts.node(mcts.root_id());
    assert_eq!(root.children[0], root.children[1]);

    let shared = mcts.get_node(&NimState::new(vec![2, 1])).unwrap();
    let through_first = mcts.node(root.children[0]).stats.visit_count;
    assert_eq!(shared.stats.visit_count, through_first);
    assert!(shared.stats.visit_count > 0);
}

/// Without registration the same move orders keep separate records.
#[test]
fn test_lookup_mode_splits_transpositions() {
    let mut mcts = create_mcts(2, NimState::new(vec![1, 1, 2]), Transpositions::Lookup, 200, 7);
    mcts.run().unwrap();

    let root = mcts.node(mcts.root_id());
    assert_ne!(root.children[0], root.children[1]);
    assert!(mcts.get_node(&NimState::new(vec![2, 1])).is_none());
    // Only the root is registered
    assert!(mcts.get_node(&NimState::new(vec![2, 1, 1])).is_some());
}
