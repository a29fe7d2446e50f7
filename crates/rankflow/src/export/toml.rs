//! TOML exporter: one `[[nodes]]` table per node with its rank and position.
//!
//! ```toml
//! direction = "TB"
//!
//! [[nodes]]
//! id = "planner"
//! label = "Planner Agent"
//! rank = 0
//! x = 0.0
//! y = 0.0
//!
//! [[edges]]
//! source = "planner"
//! target = "critic"
//! ```

use log::info;
use serde::Serialize;

use rankflow_core::graph::{Direction, Placeable};

use crate::{
    export::{self, Exporter},
    layout::LaidOutGraph,
};

#[derive(Debug, Serialize)]
struct Document<'a> {
    direction: Direction,
    nodes: Vec<NodeEntry<'a>>,
    edges: Vec<EdgeEntry>,
}

#[derive(Debug, Serialize)]
struct NodeEntry<'a> {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<&'a str>,
    rank: usize,
    x: f32,
    y: f32,
}

#[derive(Debug, Serialize)]
struct EdgeEntry {
    source: String,
    target: String,
}

/// TOML exporter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Toml;

impl Toml {
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for Toml {
    fn export(&self, graph: &LaidOutGraph) -> Result<String, export::Error> {
        let nodes = graph
            .nodes()
            .iter()
            .map(|node| NodeEntry {
                id: node.id().to_owned_string(),
                label: node.label(),
                rank: graph.rank(node.id()).unwrap_or_default(),
                x: node.position().x(),
                y: node.position().y(),
            })
            .collect();

        // Edges touching an unplaced node are left out, as in the SVG output
        let edges = graph
            .edges()
            .iter()
            .filter(|edge| {
                graph.node(edge.source()).is_some() && graph.node(edge.target()).is_some()
            })
            .map(|edge| EdgeEntry {
                source: edge.source().to_owned_string(),
                target: edge.target().to_owned_string(),
            })
            .collect();

        let document = Document {
            direction: graph.direction(),
            nodes,
            edges,
        };

        let output = ::toml::to_string(&document)?;
        info!(nodes = graph.nodes().len(); "TOML document rendered");
        Ok(output)
    }
}
