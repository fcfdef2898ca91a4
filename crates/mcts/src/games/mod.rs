//! Reference games for engine validation.
//!
//! These games are small enough to solve by hand, so search results can be
//! checked against known answers.

pub mod nim;

pub use nim::{Nim, NimMove, NimState};
