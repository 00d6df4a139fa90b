//! Graph data structures and simulation state.
//!
//! The core structure stores topology in petgraph's StableGraph and keeps
//! positions and velocities in Structure of Arrays (SoA) layout for
//! cache-friendly force accumulation and zero-copy host readback.

mod engine;

pub use engine::{ForceGraph, edge_pairs_from_flat};
