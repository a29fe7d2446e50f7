//! Graph model shared by the parser, the layout engine and the exporters.
//!
//! A [`Graph`] is plain data: an ordered node list, an ordered edge list and
//! an optional flow [`Direction`]. Nothing here validates the edges; an edge
//! may name a node that does not exist and the layout engine simply skips it.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{geometry::Point, identifier::Id};

/// Axis along which ranks grow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Direction {
    /// Ranks grow downward (Y); nodes of one rank spread along X.
    #[default]
    #[serde(rename = "TB")]
    TopToBottom,
    /// Ranks grow rightward (X); nodes of one rank spread along Y.
    #[serde(rename = "LR")]
    LeftToRight,
}

impl Direction {
    /// Returns `true` when ranks are stacked vertically.
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::TopToBottom)
    }
}

impl FromStr for Direction {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TB" => Ok(Self::TopToBottom),
            "LR" => Ok(Self::LeftToRight),
            _ => Err("Unsupported direction"),
        }
    }
}

impl From<Direction> for &'static str {
    fn from(val: Direction) -> Self {
        match val {
            Direction::TopToBottom => "TB",
            Direction::LeftToRight => "LR",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name: &'static str = (*self).into();
        write!(f, "{name}")
    }
}

/// Anything the layout engine can position.
///
/// The engine only reads the identifier and writes the position, so callers
/// keep whatever other data their nodes carry.
pub trait Placeable {
    /// Identifier used to match edges against this node.
    fn id(&self) -> Id;

    /// Replaces the node's position with the computed one.
    fn set_position(&mut self, position: Point);
}

/// A graph node with an optional display label.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: Id,
    label: Option<String>,
    position: Point,
}

impl Node {
    /// Creates a node at the origin without a label.
    pub fn new(id: Id) -> Self {
        Self {
            id,
            label: None,
            position: Point::default(),
        }
    }

    /// Sets the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Text to render for the node: the label when present, the id otherwise.
    pub fn display_text(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| self.id.to_owned_string())
    }

    /// Center of the node footprint.
    pub fn position(&self) -> Point {
        self.position
    }
}

impl Placeable for Node {
    fn id(&self) -> Id {
        self.id
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// A directed dependency from `source` to `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    source: Id,
    target: Id,
}

impl Edge {
    pub fn new(source: Id, target: Id) -> Self {
        Self { source, target }
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// A parsed graph: nodes and edges in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    direction: Option<Direction>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new(direction: Option<Direction>, nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self {
            direction,
            nodes,
            edges,
        }
    }

    /// Direction requested by the graph source, if any.
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_str() {
        assert_eq!("TB".parse::<Direction>(), Ok(Direction::TopToBottom));
        assert_eq!("LR".parse::<Direction>(), Ok(Direction::LeftToRight));
        assert!("BT".parse::<Direction>().is_err());
        assert_eq!(Direction::default(), Direction::TopToBottom);
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(Direction::LeftToRight.to_string(), "LR");
        assert!(Direction::TopToBottom.is_vertical());
        assert!(!Direction::LeftToRight.is_vertical());
    }

    #[test]
    fn test_node_display_text_falls_back_to_id() {
        let plain = Node::new(Id::new("ingest"));
        let labeled = Node::new(Id::new("ingest")).with_label("Data Ingest");

        assert_eq!(plain.display_text(), "ingest");
        assert_eq!(labeled.display_text(), "Data Ingest");
        assert_eq!(labeled.label(), Some("Data Ingest"));
    }

    #[test]
    fn test_set_position_keeps_other_fields() {
        let mut node = Node::new(Id::new("n")).with_label("N");
        node.set_position(Point::new(3.0, 4.0));

        assert_eq!(node.position(), Point::new(3.0, 4.0));
        assert_eq!(node.label(), Some("N"));
        assert_eq!(Placeable::id(&node), "n");
    }

    #[test]
    fn test_edge_display() {
        let edge = Edge::new(Id::new("a"), Id::new("b"));
        assert_eq!(edge.to_string(), "a -> b");
    }
}
