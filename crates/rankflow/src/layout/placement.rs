//! Coordinate assignment: initial layer placement and centering refinement.

use std::collections::BTreeMap;

use petgraph::graph::NodeIndex;

use rankflow_core::{geometry::Point, graph::Direction};

use super::rank::DependencyGraph;
use crate::config::LayoutConfig;

/// Number of centering passes over all layers.
pub const REFINEMENT_PASSES: usize = 3;

/// Weight of the predecessor mean when a node is re-centered.
pub const PARENT_PULL: f32 = 0.7;

/// Weight of the node's previous coordinate when it is re-centered.
const POSITION_KEEP: f32 = 0.3;

/// Footprint and spacing along the two layout axes.
///
/// The rank axis is the one ranks advance along (Y for top-to-bottom, X for
/// left-to-right); nodes of one rank spread along the cross axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Axes {
    direction: Direction,
    rank_size: f32,
    rank_spacing: f32,
    cross_size: f32,
    cross_spacing: f32,
}

impl Axes {
    pub(super) fn new(config: &LayoutConfig, direction: Direction) -> Self {
        let (width, height) = (config.node_width(), config.node_height());
        let (horizontal, vertical) = (config.horizontal_spacing(), config.vertical_spacing());

        match direction {
            Direction::TopToBottom => Self {
                direction,
                rank_size: height,
                rank_spacing: vertical,
                cross_size: width,
                cross_spacing: horizontal,
            },
            Direction::LeftToRight => Self {
                direction,
                rank_size: width,
                rank_spacing: horizontal,
                cross_size: height,
                cross_spacing: vertical,
            },
        }
    }

    /// Distance between the centers of two neighbors in one layer.
    pub(super) fn min_gap(&self) -> f32 {
        self.cross_size + self.cross_spacing
    }

    fn rank_coordinate(&self, rank: usize) -> f32 {
        rank as f32 * (self.rank_size + self.rank_spacing)
    }

    /// Maps a (rank, cross) pair back to X/Y.
    fn to_point(self, rank: usize, cross: f32) -> Point {
        let along = self.rank_coordinate(rank);
        match self.direction {
            Direction::TopToBottom => Point::new(cross, along),
            Direction::LeftToRight => Point::new(along, cross),
        }
    }
}

/// Cross-axis coordinates of every node, indexed by node index.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Placement {
    cross: Vec<f32>,
}

impl Placement {
    /// Lines each layer up side by side, centered on the origin.
    pub(super) fn initial(
        node_count: usize,
        layers: &BTreeMap<usize, Vec<NodeIndex>>,
        axes: &Axes,
    ) -> Self {
        let mut cross = vec![0.0; node_count];

        for layer in layers.values() {
            let count = layer.len() as f32;
            let total = count * axes.cross_size + (count - 1.0) * axes.cross_spacing;
            // Center of the first footprint
            let start = -total / 2.0 + axes.cross_size / 2.0;

            for (i, idx) in layer.iter().enumerate() {
                cross[idx.index()] = start + i as f32 * axes.min_gap();
            }
        }

        Self { cross }
    }

    pub(super) fn cross(&self, idx: NodeIndex) -> f32 {
        self.cross[idx.index()]
    }

    /// Runs the centering and overlap passes.
    pub(super) fn refine(
        &mut self,
        graph: &DependencyGraph,
        layers: &BTreeMap<usize, Vec<NodeIndex>>,
        axes: &Axes,
    ) {
        for _ in 0..REFINEMENT_PASSES {
            for layer in layers.values() {
                self.center_on_predecessors(graph, layer);
                self.resolve_overlaps(layer, axes.min_gap());
            }
        }
    }

    /// Pulls each node with predecessors toward their mean cross coordinate.
    ///
    /// Updates happen in place, so a node sees the moves already made to
    /// earlier nodes of the same layer.
    fn center_on_predecessors(&mut self, graph: &DependencyGraph, layer: &[NodeIndex]) {
        for &idx in layer {
            let predecessors = graph.predecessors(idx);
            if predecessors.is_empty() {
                continue;
            }

            let sum: f32 = predecessors.iter().map(|&pred| self.cross(pred)).sum();
            let mean = sum / predecessors.len() as f32;

            let slot = &mut self.cross[idx.index()];
            *slot = *slot * POSITION_KEEP + mean * PARENT_PULL;
        }
    }

    /// Sweeps the layer in cross order, pushing crowded nodes forward.
    fn resolve_overlaps(&mut self, layer: &[NodeIndex], min_gap: f32) {
        let mut sorted = layer.to_vec();
        sorted.sort_by(|a, b| self.cross(*a).total_cmp(&self.cross(*b)));

        for pair in sorted.windows(2) {
            let (prev, curr) = (self.cross(pair[0]), self.cross(pair[1]));
            if curr - prev < min_gap {
                self.cross[pair[1].index()] = prev + min_gap;
            }
        }
    }

    /// Final X/Y for one node.
    pub(super) fn point(&self, idx: NodeIndex, rank: usize, axes: &Axes) -> Point {
        axes.to_point(rank, self.cross(idx))
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use rankflow_core::{graph::Edge, identifier::Id};

    use super::*;
    use crate::layout::rank::assign_ranks;

    fn setup(
        names: &[&str],
        pairs: &[(&str, &str)],
    ) -> (DependencyGraph, BTreeMap<usize, Vec<NodeIndex>>) {
        let edges: Vec<Edge> = pairs
            .iter()
            .map(|(s, t)| Edge::new(Id::new(s), Id::new(t)))
            .collect();
        let graph = DependencyGraph::new(names.iter().map(|name| Id::new(name)), &edges);
        let layers = assign_ranks(&graph).layers();
        (graph, layers)
    }

    #[test]
    fn test_axes_swap_with_direction() {
        let config = LayoutConfig::default();

        let tb = Axes::new(&config, Direction::TopToBottom);
        assert_approx_eq!(f32, tb.min_gap(), 340.0);
        assert_eq!(tb.to_point(2, 5.0), Point::new(5.0, 440.0));

        let lr = Axes::new(&config, Direction::LeftToRight);
        assert_approx_eq!(f32, lr.min_gap(), 220.0);
        assert_eq!(lr.to_point(2, 5.0), Point::new(680.0, 5.0));
    }

    #[test]
    fn test_initial_layer_is_centered() {
        let (graph, layers) = setup(&["a", "b", "c"], &[]);
        let axes = Axes::new(&LayoutConfig::default(), Direction::TopToBottom);
        let placement = Placement::initial(graph.node_count(), &layers, &axes);

        let xs: Vec<f32> = (0..3).map(|i| placement.cross(NodeIndex::new(i))).collect();
        assert_approx_eq!(f32, xs[0], -340.0);
        assert_approx_eq!(f32, xs[1], 0.0);
        assert_approx_eq!(f32, xs[2], 340.0);
    }

    #[test]
    fn test_layer_stays_separated_after_refine() {
        // The self-loop puts b in layer 1 next to c
        let (graph, layers) = setup(&["a", "b", "c"], &[("a", "c"), ("b", "b")]);
        let axes = Axes::new(&LayoutConfig::default(), Direction::TopToBottom);
        let mut placement = Placement::initial(graph.node_count(), &layers, &axes);
        placement.refine(&graph, &layers, &axes);

        let b = placement.cross(NodeIndex::new(1));
        let c = placement.cross(NodeIndex::new(2));
        assert!((c - b).abs() >= axes.min_gap() - 1e-3);
    }

    #[test]
    fn test_resolve_overlaps_pushes_forward() {
        let (graph, layers) = setup(&["a", "b"], &[]);
        let axes = Axes::new(&LayoutConfig::default(), Direction::TopToBottom);
        let mut placement = Placement::initial(graph.node_count(), &layers, &axes);
        placement.cross = vec![10.0, 0.0];

        placement.resolve_overlaps(&[NodeIndex::new(0), NodeIndex::new(1)], 340.0);

        assert_approx_eq!(f32, placement.cross(NodeIndex::new(1)), 0.0);
        assert_approx_eq!(f32, placement.cross(NodeIndex::new(0)), 340.0);
    }

    #[test]
    fn test_center_blend() {
        let (graph, _) = setup(&["p", "q", "child"], &[("p", "child"), ("q", "child")]);
        let mut placement = Placement {
            cross: vec![-100.0, 300.0, 50.0],
        };

        placement.center_on_predecessors(&graph, &[NodeIndex::new(2)]);

        // 0.3 * 50 + 0.7 * 100
        assert_approx_eq!(f32, placement.cross(NodeIndex::new(2)), 85.0, epsilon = 1e-4);
    }
}
