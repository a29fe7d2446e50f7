//! Longest-path rank assignment.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use log::debug;
use petgraph::{
    Direction,
    algo::is_cyclic_directed,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use rankflow_core::{graph::Edge, identifier::Id};

/// The node ids and the edges between them, with unknown endpoints removed.
#[derive(Debug)]
pub(super) struct DependencyGraph {
    graph: DiGraph<Id, ()>,
    /// Predecessors of every node, in edge order.
    predecessors: Vec<Vec<NodeIndex>>,
}

impl DependencyGraph {
    /// Builds the graph. Repeated ids collapse into the first occurrence.
    pub(super) fn new(ids: impl IntoIterator<Item = Id>, edges: &[Edge]) -> Self {
        let mut graph = DiGraph::new();
        let mut indices: IndexMap<Id, NodeIndex> = IndexMap::new();

        for id in ids {
            indices.entry(id).or_insert_with(|| graph.add_node(id));
        }

        let mut dropped = 0usize;
        for edge in edges {
            match (indices.get(&edge.source()), indices.get(&edge.target())) {
                (Some(&source), Some(&target)) => {
                    graph.add_edge(source, target, ());
                }
                _ => dropped += 1,
            }
        }
        if dropped > 0 {
            debug!(dropped; "Ignoring edges with unknown endpoints");
        }

        // petgraph walks incoming edges newest first, so restore insertion order
        let predecessors = graph
            .node_indices()
            .map(|idx| {
                let mut incoming: Vec<_> = graph.edges_directed(idx, Direction::Incoming).collect();
                incoming.sort_by_key(|edge| edge.id());
                incoming.into_iter().map(|edge| edge.source()).collect()
            })
            .collect();

        Self {
            graph,
            predecessors,
        }
    }

    pub(super) fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub(super) fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub(super) fn id(&self, idx: NodeIndex) -> Id {
        self.graph[idx]
    }

    pub(super) fn predecessors(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.predecessors[idx.index()]
    }

    pub(super) fn has_cycle(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    InProgress,
    Done(usize),
}

/// One pending rank computation on the explicit traversal stack.
struct Frame {
    node: NodeIndex,
    next_predecessor: usize,
    max_predecessor_rank: Option<usize>,
}

impl Frame {
    fn new(node: NodeIndex) -> Self {
        Self {
            node,
            next_predecessor: 0,
            max_predecessor_rank: None,
        }
    }

    fn observe(&mut self, rank: usize) {
        self.max_predecessor_rank = Some(self.max_predecessor_rank.map_or(rank, |max| max.max(rank)));
    }
}

/// Ranks of every node plus the order in which they were settled.
#[derive(Debug)]
pub(super) struct Ranking {
    ranks: Vec<usize>,
    settled: Vec<NodeIndex>,
}

impl Ranking {
    pub(super) fn rank(&self, idx: NodeIndex) -> usize {
        self.ranks[idx.index()]
    }

    /// Groups nodes into layers keyed by rank, ascending.
    ///
    /// Nodes inside a layer keep the order in which their rank was settled.
    pub(super) fn layers(&self) -> BTreeMap<usize, Vec<NodeIndex>> {
        let mut layers: BTreeMap<usize, Vec<NodeIndex>> = BTreeMap::new();
        for &idx in &self.settled {
            layers.entry(self.rank(idx)).or_default().push(idx);
        }
        layers
    }
}

/// Assigns every node `1 + max(rank of predecessors)`, or 0 without any.
///
/// Nodes are visited in insertion order and predecessors in edge order. A
/// predecessor that is still being ranked, which only happens on a cycle,
/// counts as rank 0.
pub(super) fn assign_ranks(graph: &DependencyGraph) -> Ranking {
    let count = graph.node_count();
    let mut state = vec![VisitState::Unvisited; count];
    let mut settled = Vec::with_capacity(count);
    let mut stack: Vec<Frame> = Vec::new();

    for root in (0..count).map(NodeIndex::new) {
        if state[root.index()] != VisitState::Unvisited {
            continue;
        }
        state[root.index()] = VisitState::InProgress;
        stack.push(Frame::new(root));

        while let Some(frame) = stack.last_mut() {
            let predecessors = graph.predecessors(frame.node);

            if let Some(&pred) = predecessors.get(frame.next_predecessor) {
                frame.next_predecessor += 1;
                match state[pred.index()] {
                    VisitState::Done(rank) => frame.observe(rank),
                    VisitState::InProgress => frame.observe(0),
                    VisitState::Unvisited => {
                        state[pred.index()] = VisitState::InProgress;
                        stack.push(Frame::new(pred));
                    }
                }
                continue;
            }

            let rank = frame.max_predecessor_rank.map_or(0, |max| max + 1);
            let node = frame.node;
            state[node.index()] = VisitState::Done(rank);
            settled.push(node);
            stack.pop();

            if let Some(parent) = stack.last_mut() {
                parent.observe(rank);
            }
        }
    }

    let ranks = state
        .into_iter()
        .map(|visit| match visit {
            VisitState::Done(rank) => rank,
            VisitState::Unvisited | VisitState::InProgress => 0,
        })
        .collect();

    Ranking { ranks, settled }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<Id> {
        names.iter().map(|name| Id::new(name)).collect()
    }

    fn edges(pairs: &[(&str, &str)]) -> Vec<Edge> {
        pairs
            .iter()
            .map(|(source, target)| Edge::new(Id::new(source), Id::new(target)))
            .collect()
    }

    fn ranks_of(names: &[&str], pairs: &[(&str, &str)]) -> Vec<usize> {
        let graph = DependencyGraph::new(ids(names), &edges(pairs));
        let ranking = assign_ranks(&graph);
        (0..graph.node_count())
            .map(|i| ranking.rank(NodeIndex::new(i)))
            .collect()
    }

    #[test]
    fn test_chain() {
        assert_eq!(ranks_of(&["c", "b", "a"], &[("a", "b"), ("b", "c")]), vec![2, 1, 0]);
    }

    #[test]
    fn test_longest_path_wins() {
        // a -> d directly and a -> b -> c -> d
        let ranks = ranks_of(
            &["a", "b", "c", "d"],
            &[("a", "d"), ("a", "b"), ("b", "c"), ("c", "d")],
        );
        assert_eq!(ranks, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_unknown_endpoints_are_dropped() {
        let graph = DependencyGraph::new(ids(&["a", "b"]), &edges(&[("a", "b"), ("a", "zz")]));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_duplicate_ids_collapse() {
        let graph = DependencyGraph::new(ids(&["a", "b", "a"]), &[]);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.id(NodeIndex::new(0)), "a");
    }

    #[test]
    fn test_two_node_cycle() {
        // x settles after y; y sees x in progress and counts it as rank 0
        assert_eq!(ranks_of(&["x", "y"], &[("x", "y"), ("y", "x")]), vec![2, 1]);
    }

    #[test]
    fn test_self_loop() {
        assert_eq!(ranks_of(&["x"], &[("x", "x")]), vec![1]);
    }

    #[test]
    fn test_predecessors_keep_edge_order() {
        let graph = DependencyGraph::new(ids(&["a", "b", "c"]), &edges(&[("b", "c"), ("a", "c")]));
        let preds: Vec<Id> = graph
            .predecessors(NodeIndex::new(2))
            .iter()
            .map(|&idx| graph.id(idx))
            .collect();
        assert_eq!(preds, ids(&["b", "a"]));
    }

    #[test]
    fn test_layers_follow_settle_order() {
        // d is listed first but settles after its predecessors
        let graph = DependencyGraph::new(
            ids(&["d", "b", "c", "a"]),
            &edges(&[("b", "d"), ("c", "d"), ("a", "b"), ("a", "c")]),
        );
        let ranking = assign_ranks(&graph);
        let layers: Vec<Vec<Id>> = ranking
            .layers()
            .into_values()
            .map(|layer| layer.into_iter().map(|idx| graph.id(idx)).collect())
            .collect();

        assert_eq!(layers, vec![ids(&["a"]), ids(&["b", "c"]), ids(&["d"])]);
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let names: Vec<String> = (0..50_000).map(|i| format!("n{i}")).collect();
        let node_ids: Vec<Id> = names.iter().map(|name| Id::new(name)).collect();
        let chain: Vec<Edge> = node_ids.windows(2).map(|w| Edge::new(w[0], w[1])).collect();

        // Deepest node first so the whole chain sits on the stack at once
        let graph = DependencyGraph::new(node_ids.iter().rev().copied(), &chain);
        let ranking = assign_ranks(&graph);

        assert_eq!(ranking.rank(NodeIndex::new(0)), 49_999);
    }
}
