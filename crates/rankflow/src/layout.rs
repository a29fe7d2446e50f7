//! Layered auto-layout for directed graphs.
//!
//! The engine ranks every node by the longest path from a source, lines up
//! each rank side by side, then runs a few passes that pull nodes toward the
//! mean position of their predecessors while keeping neighbors apart.
//!
//! Steps:
//!
//! 1. **Rank** - `1 + max(rank of predecessors)`, 0 for sources. A
//!    predecessor still being ranked (a cycle) counts as rank 0.
//! 2. **Group** - one layer per rank, ascending.
//! 3. **Place** - each layer is centered on the origin along the cross axis.
//! 4. **Refine** - three passes of centering plus overlap removal.
//!
//! Positions are node centers. Edges whose endpoints are missing from the
//! node list are ignored, and nothing in here can fail.
//!
//! # Example
//!
//! ```
//! use rankflow::{
//!     config::LayoutConfig,
//!     graph::{Edge, Node},
//!     identifier::Id,
//!     layout::layout,
//! };
//!
//! let nodes = vec![Node::new(Id::new("a")), Node::new(Id::new("b"))];
//! let edges = vec![Edge::new(Id::new("a"), Id::new("b"))];
//!
//! let nodes = layout(nodes, &edges, &LayoutConfig::default());
//! assert_eq!(nodes[0].position().y(), 0.0);
//! assert_eq!(nodes[1].position().y(), 220.0);
//! ```

mod placement;
mod rank;

use indexmap::IndexMap;
use log::{debug, info, trace};
use petgraph::graph::NodeIndex;

use rankflow_core::{
    geometry::{Bounds, Point, Size},
    graph::{Direction, Edge, Graph, Node, Placeable},
    identifier::Id,
};

use crate::config::LayoutConfig;

use placement::{Axes, Placement};
use rank::DependencyGraph;

pub use placement::{PARENT_PULL, REFINEMENT_PASSES};

/// Rank and position computed for one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePlacement {
    rank: usize,
    position: Point,
}

impl NodePlacement {
    /// Layer index, 0 for nodes without predecessors.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Center of the node.
    pub fn position(&self) -> Point {
        self.position
    }
}

/// Result of one layout run, keyed by node id in first-appearance order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    placements: IndexMap<Id, NodePlacement>,
}

impl Layout {
    pub fn get(&self, id: Id) -> Option<&NodePlacement> {
        self.placements.get(&id)
    }

    pub fn rank(&self, id: Id) -> Option<usize> {
        self.get(id).map(NodePlacement::rank)
    }

    pub fn position(&self, id: Id) -> Option<Point> {
        self.get(id).map(NodePlacement::position)
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Id, &NodePlacement)> {
        self.placements.iter().map(|(id, placement)| (*id, placement))
    }

    /// Number of distinct ranks in use.
    pub fn layer_count(&self) -> usize {
        let mut ranks: Vec<usize> = self.placements.values().map(NodePlacement::rank).collect();
        ranks.sort_unstable();
        ranks.dedup();
        ranks.len()
    }
}

/// The layered layout engine.
///
/// Holds the configuration only; every call to [`LayoutEngine::compute`] is
/// independent.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Overrides the configured direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.config = self.config.with_direction(direction);
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Computes ranks and positions for `ids`.
    ///
    /// Repeated ids share a single placement.
    pub fn compute(&self, ids: impl IntoIterator<Item = Id>, edges: &[Edge]) -> Layout {
        let graph = DependencyGraph::new(ids, edges);
        if graph.node_count() == 0 {
            debug!("Empty graph, skipping layout");
            return Layout::default();
        }

        let direction = self.config.direction();
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            direction:%;
            "Computing layout"
        );
        if graph.has_cycle() {
            debug!("Graph contains cycles, ranks inside them are approximate");
        }

        // Step 1: Rank every node
        let ranking = rank::assign_ranks(&graph);

        // Step 2: Group ranks into layers
        let layers = ranking.layers();
        debug!(layers = layers.len(); "Nodes grouped into layers");

        // Step 3: Initial side-by-side placement
        let axes = Axes::new(&self.config, direction);
        let mut placement = Placement::initial(graph.node_count(), &layers, &axes);

        // Step 4: Centering and overlap passes
        placement.refine(&graph, &layers, &axes);

        // Node indices follow first appearance, which is the output order
        let layout = Layout {
            placements: (0..graph.node_count())
                .map(NodeIndex::new)
                .map(|idx| {
                    let rank = ranking.rank(idx);
                    let position = placement.point(idx, rank, &axes);
                    (graph.id(idx), NodePlacement { rank, position })
                })
                .collect(),
        };

        trace!(layout:?; "Layout computed");
        layout
    }

    /// Computes a layout for `nodes` and writes each position back.
    ///
    /// Nodes keep their order and every other field.
    pub fn apply<N: Placeable>(&self, nodes: &mut [N], edges: &[Edge]) -> Layout {
        let layout = self.compute(nodes.iter().map(Placeable::id), edges);

        for node in nodes.iter_mut() {
            if let Some(position) = layout.position(node.id()) {
                node.set_position(position);
            }
        }

        layout
    }
}

/// Lays out `nodes` and returns them with their positions replaced.
///
/// `edges` and `config` are only read. An empty node list is returned as is.
pub fn layout<N: Placeable>(mut nodes: Vec<N>, edges: &[Edge], config: &LayoutConfig) -> Vec<N> {
    LayoutEngine::new(config.clone()).apply(&mut nodes, edges);
    nodes
}

/// A graph whose nodes carry their computed positions.
///
/// Produced by [`GraphBuilder::layout`](crate::GraphBuilder::layout) and
/// consumed by the exporters.
#[derive(Debug, Clone)]
pub struct LaidOutGraph {
    direction: Direction,
    node_size: Size,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    layout: Layout,
}

impl LaidOutGraph {
    /// Lays out `graph`, letting its header direction override the configured one.
    pub fn new(graph: &Graph, config: &LayoutConfig) -> Self {
        let direction = graph.direction().unwrap_or(config.direction());
        let engine = LayoutEngine::new(config.clone()).with_direction(direction);

        let mut nodes = graph.nodes().to_vec();
        let edges = graph.edges().to_vec();
        let layout = engine.apply(&mut nodes, &edges);

        Self {
            direction,
            node_size: config.node_size(),
            nodes,
            edges,
            layout,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Footprint every node was laid out with.
    pub fn node_size(&self) -> Size {
        self.node_size
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn node(&self, id: Id) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    pub fn rank(&self, id: Id) -> Option<usize> {
        self.layout.rank(id)
    }

    /// Box enclosing every node footprint, or `None` for an empty graph.
    pub fn bounds(&self) -> Option<Bounds> {
        self.nodes
            .iter()
            .map(|node| node.position().to_bounds(self.node_size))
            .reduce(|acc, bounds| acc.merge(&bounds))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn nodes(names: &[&str]) -> Vec<Node> {
        names.iter().map(|name| Node::new(Id::new(name))).collect()
    }

    fn edges(pairs: &[(&str, &str)]) -> Vec<Edge> {
        pairs
            .iter()
            .map(|(source, target)| Edge::new(Id::new(source), Id::new(target)))
            .collect()
    }

    fn diamond() -> (Vec<Node>, Vec<Edge>) {
        (
            nodes(&["A", "B", "C", "D"]),
            edges(&[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")]),
        )
    }

    fn engine() -> LayoutEngine {
        LayoutEngine::default()
    }

    #[test]
    fn test_empty_graph() {
        let result: Vec<Node> = layout(Vec::new(), &[], &LayoutConfig::default());
        assert!(result.is_empty());
        assert!(engine().compute(std::iter::empty(), &[]).is_empty());
    }

    #[test]
    fn test_single_node_at_origin() {
        let result = layout(nodes(&["solo"]), &[], &LayoutConfig::default());
        assert_eq!(result[0].position(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_single_node_at_origin_left_to_right() {
        let config = LayoutConfig::default().with_direction(Direction::LeftToRight);
        let result = layout(nodes(&["solo"]), &[], &config);
        assert_eq!(result[0].position(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_diamond_ranks() {
        let (nodes, edges) = diamond();
        let layout = engine().compute(nodes.iter().map(Placeable::id), &edges);

        assert_eq!(layout.rank(Id::new("A")), Some(0));
        assert_eq!(layout.rank(Id::new("B")), Some(1));
        assert_eq!(layout.rank(Id::new("C")), Some(1));
        assert_eq!(layout.rank(Id::new("D")), Some(2));
        assert_eq!(layout.layer_count(), 3);
    }

    #[test]
    fn test_diamond_positions() {
        let (nodes, edges) = diamond();
        let result = layout(nodes, &edges, &LayoutConfig::default());
        let [a, b, c, d] = [0usize, 1, 2, 3].map(|i| result[i].position());

        assert_approx_eq!(f32, a.y(), 0.0);
        assert_approx_eq!(f32, b.y(), 220.0);
        assert_approx_eq!(f32, c.y(), 220.0);
        assert_approx_eq!(f32, d.y(), 440.0);

        assert!((c.x() - b.x()).abs() >= 340.0 - 1e-3);

        // D ends up between its parents, much closer to their mean than B and C are to each other
        let mean = (b.x() + c.x()) / 2.0;
        assert!(d.x() > b.x() && d.x() < c.x());
        assert!((d.x() - mean).abs() < (c.x() - b.x()) / 4.0);
    }

    #[test]
    fn test_diamond_left_to_right_swaps_axes() {
        let (nodes, edges) = diamond();
        let config = LayoutConfig::default().with_direction(Direction::LeftToRight);
        let result = layout(nodes, &edges, &config);
        let [a, b, c, d] = [0usize, 1, 2, 3].map(|i| result[i].position());

        assert_approx_eq!(f32, a.x(), 0.0);
        assert_approx_eq!(f32, b.x(), 340.0);
        assert_approx_eq!(f32, d.x(), 680.0);
        assert!((c.y() - b.y()).abs() >= 220.0 - 1e-3);
    }

    #[test]
    fn test_two_node_cycle_terminates() {
        let result = engine().compute(
            [Id::new("X"), Id::new("Y")],
            &edges(&[("X", "Y"), ("Y", "X")]),
        );

        assert_eq!(result.len(), 2);
        assert!(result.rank(Id::new("X")).is_some());
        assert!(result.rank(Id::new("Y")).is_some());
    }

    #[test]
    fn test_unknown_endpoints_ignored() {
        let result = layout(
            nodes(&["a", "b"]),
            &edges(&[("a", "ghost"), ("ghost", "b")]),
            &LayoutConfig::default(),
        );

        // Both remain sources side by side on rank 0
        assert_approx_eq!(f32, result[0].position().y(), 0.0);
        assert_approx_eq!(f32, result[1].position().y(), 0.0);
        assert!((result[1].position().x() - result[0].position().x()).abs() >= 340.0 - 1e-3);
    }

    #[test]
    fn test_disconnected_components_do_not_overlap() {
        let result = engine().compute(
            ["a1", "a2", "b1", "b2"].map(Id::new),
            &edges(&[("a1", "a2"), ("b1", "b2")]),
        );

        let a2 = result.get(Id::new("a2")).unwrap();
        let b2 = result.get(Id::new("b2")).unwrap();
        assert_eq!(a2.rank(), 1);
        assert_eq!(b2.rank(), 1);
        assert!((a2.position().x() - b2.position().x()).abs() >= 340.0 - 1e-3);
    }

    #[test]
    fn test_duplicate_ids_share_position() {
        let result = layout(nodes(&["a", "b", "a"]), &[], &LayoutConfig::default());

        assert_eq!(result.len(), 3);
        assert_eq!(result[0].position(), result[2].position());
        assert_ne!(result[0].position(), result[1].position());
    }

    #[test]
    fn test_labels_survive_layout() {
        let input = vec![Node::new(Id::new("a")).with_label("Alpha")];
        let result = layout(input, &[], &LayoutConfig::default());
        assert_eq!(result[0].label(), Some("Alpha"));
    }

    #[test]
    fn test_header_direction_overrides_config() {
        let graph = Graph::new(
            Some(Direction::LeftToRight),
            nodes(&["a", "b"]),
            edges(&[("a", "b")]),
        );
        let laid_out = LaidOutGraph::new(&graph, &LayoutConfig::default());

        assert_eq!(laid_out.direction(), Direction::LeftToRight);
        let b = laid_out.node(Id::new("b")).unwrap().position();
        assert_approx_eq!(f32, b.x(), 340.0);
        assert_approx_eq!(f32, b.y(), 0.0);
    }

    #[test]
    fn test_laid_out_bounds() {
        let graph = Graph::new(None, nodes(&["a", "b"]), edges(&[("a", "b")]));
        let laid_out = LaidOutGraph::new(&graph, &LayoutConfig::default());
        let bounds = laid_out.bounds().unwrap();

        assert_approx_eq!(f32, bounds.min_x(), -130.0);
        assert_approx_eq!(f32, bounds.min_y(), -60.0);
        assert_approx_eq!(f32, bounds.max_y(), 280.0);
        assert!(LaidOutGraph::new(&Graph::default(), &LayoutConfig::default()).bounds().is_none());
    }

    fn graph_strategy() -> impl Strategy<Value = (Vec<String>, Vec<(usize, usize)>)> {
        (1usize..24).prop_flat_map(|count| {
            let names = (0..count).map(|i| format!("n{i}")).collect::<Vec<_>>();
            (
                Just(names),
                prop::collection::vec((0..count, 0..count), 0..48),
            )
        })
    }

    fn build(names: &[String], pairs: &[(usize, usize)]) -> (Vec<Id>, Vec<Edge>) {
        let ids: Vec<Id> = names.iter().map(|name| Id::new(name)).collect();
        let edges = pairs
            .iter()
            .map(|&(s, t)| Edge::new(ids[s], ids[t]))
            .collect();
        (ids, edges)
    }

    /// Keeps only forward edges between distinct nodes, which cannot form a cycle.
    fn forward_only(pairs: &[(usize, usize)]) -> Vec<(usize, usize)> {
        pairs
            .iter()
            .filter(|(s, t)| s != t)
            .map(|&(s, t)| (s.min(t), s.max(t)))
            .collect()
    }

    proptest! {
        #[test]
        fn every_node_is_placed_in_order((names, pairs) in graph_strategy()) {
            let (ids, edges) = build(&names, &pairs);
            let input: Vec<Node> = ids.iter().map(|&id| Node::new(id)).collect();

            let output = layout(input, &edges, &LayoutConfig::default());

            let out_ids: Vec<Id> = output.iter().map(Placeable::id).collect();
            prop_assert_eq!(out_ids, ids);
        }

        #[test]
        fn ranks_respect_acyclic_edges((names, pairs) in graph_strategy()) {
            let (ids, edges) = build(&names, &forward_only(&pairs));

            let layout = engine().compute(ids.iter().copied(), &edges);
            for edge in &edges {
                let source = layout.rank(edge.source()).unwrap();
                let target = layout.rank(edge.target()).unwrap();
                prop_assert!(target >= source + 1);
            }
        }

        #[test]
        fn sources_have_rank_zero((names, pairs) in graph_strategy()) {
            let (ids, edges) = build(&names, &pairs);
            let layout = engine().compute(ids.iter().copied(), &edges);

            for id in &ids {
                if edges.iter().all(|edge| edge.target() != *id) {
                    prop_assert_eq!(layout.rank(*id), Some(0));
                }
            }
        }

        #[test]
        fn layers_never_overlap((names, pairs) in graph_strategy(), vertical in any::<bool>()) {
            let (ids, edges) = build(&names, &pairs);
            let direction = if vertical { Direction::TopToBottom } else { Direction::LeftToRight };
            let config = LayoutConfig::default().with_direction(direction);
            let gap = if vertical { 340.0 } else { 220.0 };

            let layout = LayoutEngine::new(config).compute(ids.iter().copied(), &edges);

            let mut layers: HashMap<usize, Vec<f32>> = HashMap::new();
            for (_, placement) in layout.iter() {
                let cross = if vertical { placement.position().x() } else { placement.position().y() };
                layers.entry(placement.rank()).or_default().push(cross);
            }
            for coords in layers.values_mut() {
                coords.sort_by(f32::total_cmp);
                for pair in coords.windows(2) {
                    prop_assert!(pair[1] - pair[0] >= gap - 0.05);
                }
            }
        }

        #[test]
        fn layout_is_deterministic((names, pairs) in graph_strategy()) {
            let (ids, edges) = build(&names, &pairs);
            let first = engine().compute(ids.iter().copied(), &edges);
            let second = engine().compute(ids.iter().copied(), &edges);
            prop_assert_eq!(first, second);
        }
    }
}
