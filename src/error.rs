//! Error types for graph construction.

use thiserror::Error;

/// Errors produced while building a [`crate::graph::ForceGraph`].
///
/// The simulation itself is total: once a graph is constructed, `update`
/// and `total_velocity` cannot fail. Validation happens up front.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// An edge refers to a node index outside `0..node_count`.
    #[error("edge {edge} endpoint {endpoint} is out of range (graph has {node_count} nodes)")]
    EdgeEndpointOutOfRange {
        /// Index of the offending edge in the input edge list.
        edge: usize,
        /// The out-of-range node index.
        endpoint: u32,
        /// Number of nodes in the graph.
        node_count: usize,
    },

    /// The flat edge-pair array from the host has an odd length.
    #[error("edge pair array has odd length {len}; expected [src0, tgt0, src1, tgt1, ...]")]
    UnpairedEdgeData {
        /// Length of the flat array.
        len: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GraphError::EdgeEndpointOutOfRange {
            edge: 3,
            endpoint: 7,
            node_count: 5,
        };
        assert_eq!(
            err.to_string(),
            "edge 3 endpoint 7 is out of range (graph has 5 nodes)"
        );
    }
}
