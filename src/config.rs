//! Simulation parameters.
//!
//! All force coefficients are instance-level configuration so hosts can
//! tune the layout per graph. Field names serialize as camelCase so the
//! JS host can pass a plain `{ repelConst: 200, ... }` object.

use serde::{Deserialize, Serialize};

/// Parameters of the force simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationConfig {
    /// Repulsion strength between every pair of nodes (inverse-square).
    pub repel_const: f64,
    /// Attraction strength along edges (linear in distance).
    pub attract_const: f64,
    /// Pull toward the origin (linear in distance), applied only while
    /// gravity is enabled.
    pub gravity_const: f64,
    /// Whether gravity starts enabled. Toggleable at runtime.
    pub gravity_enabled: bool,
    /// Total velocity below which the system counts as settled.
    pub equilibrium_threshold: f64,
    /// Fixed timestep used by the equilibrium loop, independent of the
    /// host's wall-clock delta.
    pub equilibrium_timestep: f64,
    /// Upper bound on equilibrium-loop steps. `None` runs until the
    /// threshold is reached, which can spin forever on topologies that
    /// oscillate rather than settle.
    pub max_equilibrium_steps: Option<u32>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            repel_const: 150.0,
            attract_const: 15.0,
            gravity_const: 2.0,
            gravity_enabled: false,
            equilibrium_threshold: 0.1,
            equilibrium_timestep: 0.005,
            max_equilibrium_steps: None,
        }
    }
}
