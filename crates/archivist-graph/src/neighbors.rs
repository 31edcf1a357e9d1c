//! Layer-by-layer neighbor synthesis.
//!
//! Each layer expands every node introduced by the previous one. Candidate
//! child ids that already exist in the graph (or earlier in the same layer)
//! are dropped, so node ids stay unique and every non-root node has exactly
//! one inbound link.

use std::collections::HashSet;
use std::f64::consts::PI;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of expansion layers below the root.
pub const ITERATIONS: usize = 2;

/// Children generated per parent, indexed by `layer - 1`.
pub const CHILDREN_PER_LAYER: [usize; ITERATIONS] = [5, 3];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub depth: usize,
    /// Position around the parent ring, in radians.
    pub angle: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    /// Visual edge weight, `1 / depth` of the target.
    pub length: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphResult {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
    pub root: String,
}

/// Nodes and links introduced by one expansion step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layer {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

/// Expand `previous` into the next layer.
///
/// `layer_index` is zero-based: index 0 produces depth-1 nodes. Candidates
/// found in `known_ids` or already emitted in this layer are skipped.
/// Indices past [`ITERATIONS`] yield an empty layer.
pub fn expand_layer<F>(
    previous: &[GraphNode],
    known_ids: &HashSet<String>,
    layer_index: usize,
    next_token: &mut F,
) -> Layer
where
    F: FnMut() -> String,
{
    let Some(&children) = CHILDREN_PER_LAYER.get(layer_index) else {
        return Layer::default();
    };
    let depth = layer_index + 1;
    let length = 1.0 / depth as f64;

    let mut layer = Layer::default();
    let mut emitted: HashSet<String> = HashSet::new();

    for parent in previous {
        for _ in 0..children {
            let candidate = next_token();
            if known_ids.contains(&candidate) || emitted.contains(&candidate) {
                continue;
            }
            emitted.insert(candidate.clone());
            layer.links.push(GraphLink {
                source: parent.id.clone(),
                target: candidate.clone(),
                length,
            });
            layer.nodes.push(GraphNode {
                id: candidate,
                depth,
                angle: 0.0,
            });
        }
    }

    let count = layer.nodes.len();
    for (i, node) in layer.nodes.iter_mut().enumerate() {
        node.angle = 2.0 * PI * i as f64 / count as f64;
    }

    layer
}

/// Build a full graph around `root`, drawing ids from `next_token`.
///
/// The root itself comes from `next_token` when not supplied.
pub fn synthesize_with<F>(root: Option<String>, next_token: &mut F) -> GraphResult
where
    F: FnMut() -> String,
{
    let root = root.unwrap_or_else(|| next_token());
    let root_node = GraphNode {
        id: root.clone(),
        depth: 0,
        angle: 0.0,
    };

    let mut known_ids: HashSet<String> = HashSet::from([root.clone()]);
    let mut nodes = vec![root_node.clone()];
    let mut links = Vec::new();
    let mut previous = vec![root_node];

    for layer_index in 0..ITERATIONS {
        let layer = expand_layer(&previous, &known_ids, layer_index, next_token);
        known_ids.extend(layer.nodes.iter().map(|n| n.id.clone()));
        nodes.extend(layer.nodes.iter().cloned());
        links.extend(layer.links);
        previous = layer.nodes;
    }

    debug!(
        "Synthesized neighbor graph for {}: {} nodes, {} links",
        root,
        nodes.len(),
        links.len()
    );

    GraphResult { nodes, links, root }
}

/// Build a graph around `root` using random tokens from the thread RNG.
pub fn synthesize(root: Option<String>) -> GraphResult {
    let mut rng = rand::thread_rng();
    synthesize_with(root, &mut || rng.gen::<f64>().to_string())
}
