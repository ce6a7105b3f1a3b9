//! A cycle-based simulator for synchronous circuits described as named integer signals.
//!
//! Signals are defined by expressions over other signals, either combinationally (recomputed every
//! cycle from the committed state) or registered (committed at the end of the cycle).
//! See [CircuitBuilder] to get started.
#[macro_use]
pub mod graph;
pub mod circuits;
pub mod data_structures;
pub use circuits::*;
pub use graph::*;
