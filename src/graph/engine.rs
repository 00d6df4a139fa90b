//! ForceGraph - the core simulation engine.
//!
//! The ForceGraph stores the graph topology using petgraph's StableGraph
//! and maintains SoA (Structure of Arrays) buffers for positions and
//! velocities. Each `update(dt)` advances the simulation one step:
//! velocity decay, force accumulation, then explicit Euler integration.

use petgraph::Directed;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SimulationConfig;
use crate::error::GraphError;
use crate::layout::{apply_attraction, apply_gravity, apply_repulsion};

/// Per-step velocity attenuation coefficient.
///
/// Applied as `v *= VELOCITY_DECAY * dt` before forces accumulate, so the
/// decay strength scales with the timestep rather than acting as a fixed
/// damping factor. This is part of the model's contract; hosts feeding
/// wall-clock deltas rely on the resulting trajectories.
const VELOCITY_DECAY: f64 = 0.99;

/// Half-width of the square that initial positions are drawn from.
const INITIAL_SPREAD: f64 = 2.0;

/// Convert a flat `[src0, tgt0, src1, tgt1, ...]` array into edge pairs.
///
/// Fails if the array length is odd.
pub fn edge_pairs_from_flat(flat: &[u32]) -> Result<Vec<(u32, u32)>, GraphError> {
    if flat.len() % 2 != 0 {
        return Err(GraphError::UnpairedEdgeData { len: flat.len() });
    }

    Ok(flat.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect())
}

/// The force-directed layout engine.
///
/// This struct manages:
/// - Graph topology via petgraph (fixed after construction)
/// - Position/velocity buffers in SoA layout, read back by the host
/// - Simulation parameters, with gravity toggleable at runtime
/// - A seedable RNG for initial placement and reset
///
/// Node indices are `0..node_count` and stay stable for the lifetime of
/// the instance. Duplicate edges and self-loops are kept as-is; each
/// stored edge contributes its own attraction force.
#[derive(Debug)]
pub struct ForceGraph {
    /// The underlying topology. Nodes are inserted in index order so
    /// petgraph indices coincide with the public 0-based node indices.
    graph: StableGraph<(), (), Directed>,

    /// Whether edges carry direction. Only meaningful to the host's
    /// arrow rendering; forces are symmetric either way.
    directed: bool,

    /// X positions (SoA layout)
    pos_x: Vec<f64>,

    /// Y positions (SoA layout)
    pos_y: Vec<f64>,

    /// X velocities (SoA layout)
    vel_x: Vec<f64>,

    /// Y velocities (SoA layout)
    vel_y: Vec<f64>,

    /// Simulation parameters.
    config: SimulationConfig,

    /// Source of initial placement, reused by `reset`.
    rng: StdRng,
}

impl ForceGraph {
    /// Create a graph with entropy-seeded random initial positions.
    pub fn new(
        node_count: usize,
        edges: &[(u32, u32)],
        directed: bool,
    ) -> Result<Self, GraphError> {
        Self::with_config(
            node_count,
            edges,
            directed,
            SimulationConfig::default(),
            StdRng::from_entropy(),
        )
    }

    /// Create a graph with a deterministic initial placement.
    ///
    /// The same seed yields the same initial positions, and therefore the
    /// same trajectory for any fixed sequence of `update` calls.
    pub fn with_seed(
        node_count: usize,
        edges: &[(u32, u32)],
        directed: bool,
        seed: u64,
    ) -> Result<Self, GraphError> {
        Self::with_config(
            node_count,
            edges,
            directed,
            SimulationConfig::default(),
            StdRng::seed_from_u64(seed),
        )
    }

    /// Create a graph with explicit parameters and RNG.
    ///
    /// Fails with [`GraphError::EdgeEndpointOutOfRange`] if any edge
    /// endpoint is not in `0..node_count`; nothing is constructed in
    /// that case.
    pub fn with_config(
        node_count: usize,
        edges: &[(u32, u32)],
        directed: bool,
        config: SimulationConfig,
        mut rng: StdRng,
    ) -> Result<Self, GraphError> {
        for (i, &(source, target)) in edges.iter().enumerate() {
            for endpoint in [source, target] {
                if endpoint as usize >= node_count {
                    return Err(GraphError::EdgeEndpointOutOfRange {
                        edge: i,
                        endpoint,
                        node_count,
                    });
                }
            }
        }

        let mut graph = StableGraph::with_capacity(node_count, edges.len());
        for _ in 0..node_count {
            graph.add_node(());
        }
        for &(source, target) in edges {
            graph.add_edge(
                NodeIndex::new(source as usize),
                NodeIndex::new(target as usize),
                (),
            );
        }

        let mut pos_x = Vec::with_capacity(node_count);
        let mut pos_y = Vec::with_capacity(node_count);
        for _ in 0..node_count {
            pos_x.push(rng.gen_range(-INITIAL_SPREAD..=INITIAL_SPREAD));
            pos_y.push(rng.gen_range(-INITIAL_SPREAD..=INITIAL_SPREAD));
        }

        Ok(Self {
            graph,
            directed,
            pos_x,
            pos_y,
            vel_x: vec![0.0; node_count],
            vel_y: vec![0.0; node_count],
            config,
            rng,
        })
    }

    // =========================================================================
    // Simulation
    // =========================================================================

    /// Advance the simulation by one step of `dt` seconds.
    ///
    /// Order matters: decay runs first and attenuates the previous step's
    /// velocity, then forces accumulate directly into velocity, then
    /// positions move by `velocity * dt` (explicit Euler). With `dt = 0`
    /// positions stay put but velocities still change.
    pub fn update(&mut self, dt: f64) {
        // velocity decay
        for i in 0..self.node_count() {
            self.vel_x[i] *= VELOCITY_DECAY * dt;
            self.vel_y[i] *= VELOCITY_DECAY * dt;
        }

        self.accumulate_forces();

        // move nodes by their velocity
        for i in 0..self.node_count() {
            self.pos_x[i] += self.vel_x[i] * dt;
            self.pos_y[i] += self.vel_y[i] * dt;
        }
    }

    /// Add all force contributions for the current positions into the
    /// velocity buffers. Forces are impulses: `dt` touches positions at
    /// integration time only, never the force application itself.
    fn accumulate_forces(&mut self) {
        apply_repulsion(
            &self.pos_x,
            &self.pos_y,
            &mut self.vel_x,
            &mut self.vel_y,
            self.config.repel_const,
        );

        apply_attraction(
            &self.pos_x,
            &self.pos_y,
            &mut self.vel_x,
            &mut self.vel_y,
            self.graph
                .edge_references()
                .map(|e| (e.source().index(), e.target().index())),
            self.config.attract_const,
        );

        if self.config.gravity_enabled {
            apply_gravity(
                &self.pos_x,
                &self.pos_y,
                &mut self.vel_x,
                &mut self.vel_y,
                self.config.gravity_const,
            );
        }
    }

    /// Sum of per-node speeds: Σ sqrt(vx² + vy²).
    ///
    /// An L1 sum of L2 speeds, not a norm of the whole system; the
    /// equilibrium criterion is defined against this exact quantity.
    pub fn total_velocity(&self) -> f64 {
        self.vel_x
            .iter()
            .zip(&self.vel_y)
            .map(|(vx, vy)| (vx * vx + vy * vy).sqrt())
            .sum()
    }

    /// Whether the system currently counts as settled.
    pub fn is_settled(&self) -> bool {
        self.total_velocity() < self.config.equilibrium_threshold
    }

    /// Step the simulation with a fixed small timestep until the total
    /// velocity drops below the equilibrium threshold.
    ///
    /// Returns the number of steps run. With no step cap configured this
    /// blocks until the system settles, which may be forever for
    /// topologies that oscillate; hosts wanting a bound set
    /// `max_equilibrium_steps`. Check [`Self::is_settled`] afterwards to
    /// distinguish convergence from hitting the cap.
    pub fn compute_equilibrium(&mut self) -> u32 {
        let mut steps: u32 = 0;

        loop {
            self.update(self.config.equilibrium_timestep);
            steps = steps.saturating_add(1);

            if self.total_velocity() < self.config.equilibrium_threshold {
                break;
            }

            if let Some(cap) = self.config.max_equilibrium_steps {
                if steps >= cap {
                    break;
                }
            }
        }

        steps
    }

    /// Discard all accumulated motion: re-randomize positions from the
    /// engine's RNG and zero velocities. Topology and parameters keep
    /// their current values.
    pub fn reset(&mut self) {
        for i in 0..self.node_count() {
            self.pos_x[i] = self.rng.gen_range(-INITIAL_SPREAD..=INITIAL_SPREAD);
            self.pos_y[i] = self.rng.gen_range(-INITIAL_SPREAD..=INITIAL_SPREAD);
            self.vel_x[i] = 0.0;
            self.vel_y[i] = 0.0;
        }
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// Current simulation parameters.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Whether gravity is currently applied.
    pub fn gravity_enabled(&self) -> bool {
        self.config.gravity_enabled
    }

    /// Enable or disable the pull toward the origin. Takes effect on the
    /// next `update`; a parameter change, not a phase transition.
    pub fn set_gravity_enabled(&mut self, enabled: bool) {
        self.config.gravity_enabled = enabled;
    }

    // =========================================================================
    // Topology Access
    // =========================================================================

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.pos_x.len()
    }

    /// Number of edges, duplicates included.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether the host should draw direction indicators.
    pub fn directed(&self) -> bool {
        self.directed
    }

    /// Edge list as flat `[src0, tgt0, src1, tgt1, ...]` pairs, in
    /// insertion order, for the host's edge and arrow drawing.
    pub fn edge_pairs(&self) -> Vec<u32> {
        let mut pairs = Vec::with_capacity(self.graph.edge_count() * 2);
        for edge in self.graph.edge_references() {
            pairs.push(edge.source().index() as u32);
            pairs.push(edge.target().index() as u32);
        }
        pairs
    }

    // =========================================================================
    // Buffer Access
    // =========================================================================

    /// Get X positions slice.
    pub fn positions_x(&self) -> &[f64] {
        &self.pos_x
    }

    /// Get Y positions slice.
    pub fn positions_y(&self) -> &[f64] {
        &self.pos_y
    }

    /// Get X velocities slice.
    pub fn velocities_x(&self) -> &[f64] {
        &self.vel_x
    }

    /// Get Y velocities slice.
    pub fn velocities_y(&self) -> &[f64] {
        &self.vel_y
    }

    /// Get a node's position.
    pub fn position(&self, index: usize) -> Option<(f64, f64)> {
        if index < self.node_count() {
            Some((self.pos_x[index], self.pos_y[index]))
        } else {
            None
        }
    }

    /// Get a node's velocity.
    pub fn velocity(&self, index: usize) -> Option<(f64, f64)> {
        if index < self.node_count() {
            Some((self.vel_x[index], self.vel_y[index]))
        } else {
            None
        }
    }

    /// Set a node's position (host drag, or scripted starting layouts).
    ///
    /// Returns false if the index is out of range.
    pub fn set_position(&mut self, index: usize, x: f64, y: f64) -> bool {
        if index < self.node_count() {
            self.pos_x[index] = x;
            self.pos_y[index] = y;
            true
        } else {
            false
        }
    }

    /// Get the bounding box of all nodes as `(min_x, min_y, max_x, max_y)`,
    /// or None for an empty graph. Used by hosts for zoom-to-fit.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        if self.node_count() == 0 {
            return None;
        }

        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for i in 0..self.node_count() {
            let x = self.pos_x[i];
            let y = self.pos_y[i];
            if x < min_x {
                min_x = x;
            }
            if x > max_x {
                max_x = x;
            }
            if y < min_y {
                min_y = y;
            }
            if y > max_y {
                max_y = y;
            }
        }

        Some((min_x, min_y, max_x, max_y))
    }
}
