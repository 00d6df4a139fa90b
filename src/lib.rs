//! Force Graph - WASM Module
//!
//! Force-directed graph layout engine. The core simulates pairwise forces
//! between nodes (inverse-square repulsion, per-edge linear attraction,
//! optional gravity toward the origin) and integrates them with a simple
//! explicit Euler step until the layout settles. It is compiled to
//! WebAssembly and exposes a JavaScript-friendly API via wasm-bindgen;
//! the host owns the timing loop, feeds `update(dt)` a wall-clock delta
//! each frame, and reads node positions back for drawing.
//!
//! # Architecture
//!
//! - `graph`: simulation state (petgraph topology + SoA kinematic buffers)
//! - `layout`: the force kernels (polar math, repulsion/attraction/gravity)
//! - `config`: tunable simulation parameters
//! - `error`: construction-time validation errors

use js_sys::Float64Array;
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod graph;
pub mod layout;

pub use config::SimulationConfig;
pub use error::GraphError;
pub use graph::{ForceGraph, edge_pairs_from_flat};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Main entry point for the layout engine.
///
/// This struct wraps the internal ForceGraph and provides the public API
/// exposed to JavaScript. Topology is fixed at construction; the host
/// drives the simulation frame by frame and reads positions back.
#[wasm_bindgen]
pub struct ForceGraphWasm {
    engine: ForceGraph,
}

#[wasm_bindgen]
impl ForceGraphWasm {
    /// Create a graph with random initial positions.
    ///
    /// # Arguments
    ///
    /// * `node_count` - Number of nodes, indexed 0..node_count
    /// * `edges` - Flat Uint32Array of pairs [src0, tgt0, src1, tgt1, ...]
    /// * `directed` - Whether the host should draw direction arrows
    #[wasm_bindgen(constructor)]
    pub fn new(node_count: usize, edges: &[u32], directed: bool) -> Result<ForceGraphWasm, JsError> {
        let pairs = edge_pairs_from_flat(edges)?;
        Ok(Self {
            engine: ForceGraph::new(node_count, &pairs, directed)?,
        })
    }

    /// Create a graph with a deterministic initial placement.
    ///
    /// The same seed always produces the same layout trajectory.
    #[wasm_bindgen(js_name = withSeed)]
    pub fn with_seed(
        node_count: usize,
        edges: &[u32],
        directed: bool,
        seed: u64,
    ) -> Result<ForceGraphWasm, JsError> {
        let pairs = edge_pairs_from_flat(edges)?;
        Ok(Self {
            engine: ForceGraph::with_seed(node_count, &pairs, directed, seed)?,
        })
    }

    /// Create a graph with custom simulation parameters.
    ///
    /// `config` is a plain object with camelCase keys, e.g.
    /// `{ repelConst: 200, attractConst: 10, gravityEnabled: true }`;
    /// missing keys take their defaults.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(
        node_count: usize,
        edges: &[u32],
        directed: bool,
        config: JsValue,
        seed: u64,
    ) -> Result<ForceGraphWasm, JsError> {
        let config: SimulationConfig = serde_wasm_bindgen::from_value(config)?;
        let pairs = edge_pairs_from_flat(edges)?;
        Ok(Self {
            engine: ForceGraph::with_config(
                node_count,
                &pairs,
                directed,
                config,
                StdRng::seed_from_u64(seed),
            )?,
        })
    }

    // =========================================================================
    // Simulation
    // =========================================================================

    /// Advance the simulation by one step of `dt` seconds.
    pub fn update(&mut self, dt: f64) {
        self.engine.update(dt);
    }

    /// Run fixed-timestep updates until the total velocity falls below
    /// the equilibrium threshold (or the configured step cap is hit).
    ///
    /// Returns the number of steps run. This blocks the calling thread;
    /// hosts should call it before starting the interactive loop, not
    /// during it.
    #[wasm_bindgen(js_name = computeEquilibrium)]
    pub fn compute_equilibrium(&mut self) -> u32 {
        let steps = self.engine.compute_equilibrium();

        #[cfg(target_arch = "wasm32")]
        if !self.engine.is_settled() {
            web_sys::console::warn_1(
                &format!("computeEquilibrium stopped after {steps} steps without settling").into(),
            );
        }

        steps
    }

    /// Sum of per-node speeds; the equilibrium criterion compares this
    /// against the configured threshold.
    #[wasm_bindgen(js_name = totalVelocity)]
    pub fn total_velocity(&self) -> f64 {
        self.engine.total_velocity()
    }

    /// Whether the layout currently counts as settled.
    #[wasm_bindgen(js_name = isSettled)]
    pub fn is_settled(&self) -> bool {
        self.engine.is_settled()
    }

    /// Re-randomize positions and zero velocities, keeping topology and
    /// parameters. Bound to the host's "reset" input.
    pub fn reset(&mut self) {
        self.engine.reset();
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// Whether gravity is currently applied.
    #[wasm_bindgen(js_name = gravityEnabled)]
    pub fn gravity_enabled(&self) -> bool {
        self.engine.gravity_enabled()
    }

    /// Enable or disable the pull toward the origin. Bound to the host's
    /// gravity-toggle input.
    #[wasm_bindgen(js_name = setGravityEnabled)]
    pub fn set_gravity_enabled(&mut self, enabled: bool) {
        self.engine.set_gravity_enabled(enabled);
    }

    // =========================================================================
    // Topology Access
    // =========================================================================

    /// Get the number of nodes.
    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> usize {
        self.engine.node_count()
    }

    /// Get the number of edges (duplicates included).
    #[wasm_bindgen(js_name = edgeCount)]
    pub fn edge_count(&self) -> usize {
        self.engine.edge_count()
    }

    /// Whether the host should draw direction indicators.
    #[wasm_bindgen(js_name = isDirected)]
    pub fn is_directed(&self) -> bool {
        self.engine.directed()
    }

    /// Get the edge list as a flat Uint32Array [src0, tgt0, src1, tgt1, ...]
    /// for the host's edge and arrow drawing.
    #[wasm_bindgen(js_name = getEdgePairs)]
    pub fn get_edge_pairs(&self) -> Vec<u32> {
        self.engine.edge_pairs()
    }

    // =========================================================================
    // Position Buffer Access (Zero-Copy)
    // =========================================================================

    /// Get a zero-copy view of X positions.
    ///
    /// # Safety
    ///
    /// The returned view is invalidated if any Rust allocation occurs.
    /// Use immediately for drawing, do not store.
    #[wasm_bindgen(js_name = getPositionsXView)]
    pub fn get_positions_x_view(&self) -> Float64Array {
        unsafe { Float64Array::view(self.engine.positions_x()) }
    }

    /// Get a zero-copy view of Y positions.
    ///
    /// # Safety
    ///
    /// The returned view is invalidated if any Rust allocation occurs.
    /// Use immediately for drawing, do not store.
    #[wasm_bindgen(js_name = getPositionsYView)]
    pub fn get_positions_y_view(&self) -> Float64Array {
        unsafe { Float64Array::view(self.engine.positions_y()) }
    }

    /// Get a pointer to the X positions buffer.
    ///
    /// Used for creating views after WASM memory growth.
    #[wasm_bindgen(js_name = positionsXPtr)]
    pub fn positions_x_ptr(&self) -> *const f64 {
        self.engine.positions_x().as_ptr()
    }

    /// Get a pointer to the Y positions buffer.
    #[wasm_bindgen(js_name = positionsYPtr)]
    pub fn positions_y_ptr(&self) -> *const f64 {
        self.engine.positions_y().as_ptr()
    }

    /// Get the length of the position buffers.
    #[wasm_bindgen(js_name = positionsLen)]
    pub fn positions_len(&self) -> usize {
        self.engine.positions_x().len()
    }

    /// Get a node's X position.
    #[wasm_bindgen(js_name = getNodeX)]
    pub fn get_node_x(&self, index: usize) -> Option<f64> {
        self.engine.position(index).map(|(x, _)| x)
    }

    /// Get a node's Y position.
    #[wasm_bindgen(js_name = getNodeY)]
    pub fn get_node_y(&self, index: usize) -> Option<f64> {
        self.engine.position(index).map(|(_, y)| y)
    }

    /// Set a node's position (e.g. host-side dragging).
    ///
    /// Returns false if the index is out of range.
    #[wasm_bindgen(js_name = setNodePosition)]
    pub fn set_node_position(&mut self, index: usize, x: f64, y: f64) -> bool {
        self.engine.set_position(index, x, y)
    }

    /// Get the bounding box of all nodes.
    ///
    /// Returns [min_x, min_y, max_x, max_y], or None if the graph is
    /// empty. Used by hosts for zoom-to-fit.
    #[wasm_bindgen(js_name = getBounds)]
    pub fn get_bounds(&self) -> Option<Vec<f64>> {
        self.engine
            .bounds()
            .map(|(min_x, min_y, max_x, max_y)| vec![min_x, min_y, max_x, max_y])
    }
}
