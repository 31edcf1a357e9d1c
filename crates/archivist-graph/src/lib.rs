//! Archivist Graph — layered synthetic neighbor graphs.
//!
//! There is no relationship store behind the graph view yet, so the gateway
//! fabricates a bounded tree of random tokens around the requested root.

pub mod neighbors;

pub use neighbors::{
    expand_layer, synthesize, synthesize_with, GraphLink, GraphNode, GraphResult, Layer,
    CHILDREN_PER_LAYER, ITERATIONS,
};
