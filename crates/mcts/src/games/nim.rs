//! Nim implementation for search validation.
//!
//! Normal-play Nim: players take turns removing one or more objects from a
//! single heap, and whoever takes the last object wins. The game is solved
//! (for two players a position is lost for the mover iff the XOR of the heap
//! sizes is zero), which makes it a good yardstick for the engine. Any number
//! of players is supported; turns rotate in index order.

use mcgraph_core::GameRule;
use rand::Rng;
use std::fmt;

/// Nim heap sizes.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct NimState {
    heaps: Vec<u32>,
}

/// A single Nim move: remove `count` objects from heap `heap`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct NimMove {
    pub heap: usize,
    pub count: u32,
}

impl NimState {
    /// Create a position from heap sizes.
    pub fn new(heaps: Vec<u32>) -> Self {
        Self { heaps }
    }

    /// Heap sizes in their original positions.
    pub fn heaps(&self) -> &[u32] {
        &self.heaps
    }

    /// Total number of objects left.
    pub fn remaining(&self) -> u32 {
        self.heaps.iter().sum()
    }

    /// XOR of all heap sizes. Zero means the player to move loses against
    /// perfect two-player play.
    pub fn nim_sum(&self) -> u32 {
        self.heaps.iter().fold(0, |acc, &h| acc ^ h)
    }

    /// Apply a move, or `None` if it removes nothing or more than the heap holds.
    pub fn apply(&self, mv: NimMove) -> Option<Self> {
        let size = *self.heaps.get(mv.heap)?;
        if mv.count == 0 || mv.count > size {
            return None;
        }
        let mut heaps = self.heaps.clone();
        heaps[mv.heap] -= mv.count;
        Some(Self { heaps })
    }

    /// Recover the move that turns `self` into `next`.
    pub fn move_to(&self, next: &NimState) -> Option<NimMove> {
        if self.heaps.len() != next.heaps.len() {
            return None;
        }
        let mut found = None;
        for (heap, (&before, &after)) in self.heaps.iter().zip(&next.heaps).enumerate() {
            if before == after {
                continue;
            }
            if after > before || found.is_some() {
                return None;
            }
            found = Some(NimMove {
                heap,
                count: before - after,
            });
        }
        found
    }

    /// Sorted non-empty heap sizes. Heap order and empty heaps do not matter
    /// to the game, so this is the canonical identity of a position.
    pub fn canonical(&self) -> Vec<u32> {
        let mut heaps: Vec<u32> = self.heaps.iter().copied().filter(|&h| h > 0).collect();
        heaps.sort_unstable();
        heaps
    }
}

impl fmt::Display for NimState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, heap) in self.heaps.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", heap)?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for NimMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "take {} from heap {}", self.count, self.heap)
    }
}

/// Nim rules for a fixed number of players.
#[derive(Clone, Debug)]
pub struct Nim {
    num_players: usize,
}

impl Nim {
    /// Nim for `num_players` players.
    pub fn new(num_players: usize) -> Self {
        Self { num_players }
    }

    /// Classic two-player Nim.
    pub fn two_player() -> Self {
        Self::new(2)
    }
}

impl Default for Nim {
    fn default() -> Self {
        Self::two_player()
    }
}

impl GameRule for Nim {
    type State = NimState;
    type Key = Vec<u32>;

    fn num_players(&self) -> usize {
        self.num_players
    }

    fn key(&self, state: &NimState) -> Vec<u32> {
        state.canonical()
    }

    fn is_end(&self, state: &NimState) -> bool {
        state.heaps.iter().all(|&h| h == 0)
    }

    fn children(&self, state: &NimState) -> Vec<NimState> {
        let mut children = Vec::with_capacity(state.remaining() as usize);
        for (heap, &size) in state.heaps.iter().enumerate() {
            for count in 1..=size {
                let mut heaps = state.heaps.clone();
                heaps[heap] -= count;
                children.push(NimState { heaps });
            }
        }
        children
    }

    // One draw per move instead of building every child.
    fn random_child<R: Rng + ?Sized>(&self, state: &NimState, rng: &mut R) -> Option<NimState> {
        let total = state.remaining();
        if total == 0 {
            return None;
        }
        let mut pick = rng.gen_range(0..total);
        for (heap, &size) in state.heaps.iter().enumerate() {
            if pick < size {
                return state.apply(NimMove {
                    heap,
                    count: pick + 1,
                });
            }
            pick -= size;
        }
        None
    }
}
