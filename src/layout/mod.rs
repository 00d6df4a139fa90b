//! Layout math for the force simulation.
//!
//! This module holds the CPU-side force kernels as pure functions over the
//! engine's position/velocity slices, so the physics can be tested in
//! isolation from the engine's bookkeeping.

pub mod forces;

pub use forces::{MIN_REPEL_DISTANCE, apply_attraction, apply_gravity, apply_repulsion, polar};
