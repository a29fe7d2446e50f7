//! SVG exporter: rounded boxes joined by straight arrows.

use indexmap::IndexSet;
use log::{debug, info};
use svg::{
    Document,
    node::element::{self as svg_element, Definitions, Group, Marker, Path, Rectangle},
};

use rankflow_core::{
    color::Color,
    geometry::{Point, Size},
    graph::{Direction, Node, Placeable},
};

use crate::{
    config::StyleConfig,
    export::{self, Exporter},
    layout::LaidOutGraph,
};

const MARGIN: f32 = 50.0;
const CORNER_RADIUS: f32 = 8.0;
const FONT_SIZE: u32 = 14;
const FONT_FAMILY: &str = "Arial";
const SELF_LOOP_REACH: f32 = 40.0;

/// Colors resolved from a [`StyleConfig`], with renderer defaults filled in.
#[derive(Debug, Clone)]
struct Palette {
    background: Option<Color>,
    node_fill: Color,
    node_line: Color,
    edge: Color,
    text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: None,
            node_fill: Color::new("white").unwrap_or_default(),
            node_line: Color::default(),
            edge: Color::new("#555555").unwrap_or_default(),
            text: Color::default(),
        }
    }
}

/// One side of a node footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    fn anchor(self, center: Point, size: Size) -> Point {
        let (half_w, half_h) = (size.width() / 2.0, size.height() / 2.0);
        match self {
            Side::Top => center.with_y(center.y() - half_h),
            Side::Bottom => center.with_y(center.y() + half_h),
            Side::Left => center.with_x(center.x() - half_w),
            Side::Right => center.with_x(center.x() + half_w),
        }
    }
}

/// Picks the facing sides for an edge between two distinct centers.
///
/// Edges leave through the side facing the target along the rank axis;
/// nodes sharing a rank coordinate connect through their cross-axis sides.
fn facing_sides(source: Point, target: Point, direction: Direction) -> (Side, Side) {
    let (along, cross) = match direction {
        Direction::TopToBottom => (target.y() - source.y(), target.x() - source.x()),
        Direction::LeftToRight => (target.x() - source.x(), target.y() - source.y()),
    };

    let forward = if along != 0.0 { along > 0.0 } else { cross >= 0.0 };
    let along_rank_axis = along != 0.0;

    match (direction.is_vertical() == along_rank_axis, forward) {
        (true, true) => (Side::Bottom, Side::Top),
        (true, false) => (Side::Top, Side::Bottom),
        (false, true) => (Side::Right, Side::Left),
        (false, false) => (Side::Left, Side::Right),
    }
}

/// SVG exporter.
#[derive(Debug, Clone, Default)]
pub struct Svg {
    palette: Palette,
}

impl Svg {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the colors configured in `style`.
    ///
    /// # Errors
    ///
    /// Returns the message of the first color that fails to parse.
    pub fn with_style(mut self, style: &StyleConfig) -> Result<Self, String> {
        self.palette.background = style.background_color()?;
        if let Some(color) = style.node_fill_color()? {
            self.palette.node_fill = color;
        }
        if let Some(color) = style.node_line_color()? {
            self.palette.node_line = color;
        }
        if let Some(color) = style.edge_color()? {
            self.palette.edge = color;
        }
        Ok(self)
    }

    fn marker_id(&self) -> String {
        format!("arrow-{}", self.palette.edge.to_id_safe_string())
    }

    fn create_marker_definitions(&self) -> Definitions {
        let arrow = Marker::new()
            .set("id", self.marker_id())
            .set("viewBox", "0 0 10 10")
            .set("refX", 9)
            .set("refY", 5)
            .set("markerWidth", 6)
            .set("markerHeight", 6)
            .set("orient", "auto")
            .add(
                Path::new()
                    .set("d", "M 0 0 L 10 5 L 0 10 z")
                    .set("fill", self.palette.edge.to_string()),
            );

        Definitions::new().add(arrow)
    }

    /// Adds a margin on every side of the content.
    fn calculate_svg_dimensions(&self, content_size: Size) -> Size {
        let width = MARGIN.mul_add(2.0, content_size.width());
        let height = MARGIN.mul_add(2.0, content_size.height());

        debug!("Final SVG dimensions: {width}x{height}");

        Size::new(width, height)
    }

    fn render_node(&self, node: &Node, size: Size) -> Group {
        let bounds = node.position().to_bounds(size);
        let top_left = bounds.min_point();
        let center = bounds.center();

        let rect = Rectangle::new()
            .set("x", top_left.x())
            .set("y", top_left.y())
            .set("width", size.width())
            .set("height", size.height())
            .set("rx", CORNER_RADIUS)
            .set("fill", self.palette.node_fill.to_string())
            .set("fill-opacity", self.palette.node_fill.alpha())
            .set("stroke", self.palette.node_line.to_string())
            .set("stroke-width", 1.5);

        let text = svg_element::Text::new(node.display_text())
            .set("x", center.x())
            .set("y", center.y())
            .set("text-anchor", "middle")
            .set("dominant-baseline", "middle")
            .set("font-family", FONT_FAMILY)
            .set("font-size", FONT_SIZE)
            .set("fill", self.palette.text.to_string());

        Group::new()
            .set("id", format!("node-{}", node.id()))
            .add(rect)
            .add(text)
    }

    fn edge_path_data(&self, source: Point, target: Point, size: Size, direction: Direction) -> String {
        if source == target {
            // Self-loop: arc out of the right side and back in
            let right = Side::Right.anchor(source, size);
            let (start, end) = (
                right.with_y(right.y() - size.height() / 4.0),
                right.with_y(right.y() + size.height() / 4.0),
            );
            let reach = start.x() + SELF_LOOP_REACH;
            return format!(
                "M {} {} C {} {}, {} {}, {} {}",
                start.x(),
                start.y(),
                reach,
                start.y(),
                reach,
                end.y(),
                end.x(),
                end.y()
            );
        }

        let (from, to) = facing_sides(source, target, direction);
        let start = from.anchor(source, size);
        let end = to.anchor(target, size);
        format!("M {} {} L {} {}", start.x(), start.y(), end.x(), end.y())
    }

    fn render_edge(&self, source: &Node, target: &Node, graph: &LaidOutGraph) -> Path {
        let data = self.edge_path_data(
            source.position(),
            target.position(),
            graph.node_size(),
            graph.direction(),
        );

        Path::new()
            .set("d", data)
            .set("fill", "none")
            .set("stroke", self.palette.edge.to_string())
            .set("stroke-width", 1.5)
            .set("marker-end", format!("url(#{})", self.marker_id()))
    }

    /// Builds the SVG document for `graph`.
    ///
    /// # Errors
    ///
    /// Fails when a node position is not finite.
    pub fn render(&self, graph: &LaidOutGraph) -> Result<Document, export::Error> {
        if let Some(node) = graph
            .nodes()
            .iter()
            .find(|node| !(node.position().x().is_finite() && node.position().y().is_finite()))
        {
            return Err(export::Error::Render(format!(
                "node `{node}` has no finite position"
            )));
        }

        let content_bounds = graph.bounds().unwrap_or_default();
        let content_size = content_bounds.to_size();
        let svg_size = self.calculate_svg_dimensions(content_size);

        let mut doc = Document::new()
            .set(
                "viewBox",
                format!("0 0 {} {}", svg_size.width(), svg_size.height()),
            )
            .set("width", svg_size.width())
            .set("height", svg_size.height());

        if let Some(background) = &self.palette.background {
            doc = doc.add(
                Rectangle::new()
                    .set("width", "100%")
                    .set("height", "100%")
                    .set("fill", background.to_string())
                    .set("fill-opacity", background.alpha()),
            );
        }

        doc = doc.add(self.create_marker_definitions());

        // Shift the content so its top-left corner sits on the margin
        let mut main_group = Group::new().set(
            "transform",
            format!(
                "translate({}, {})",
                MARGIN - content_bounds.min_x(),
                MARGIN - content_bounds.min_y()
            ),
        );

        let mut edges_group = Group::new().set("class", "edges");
        for edge in graph.edges() {
            match (graph.node(edge.source()), graph.node(edge.target())) {
                (Some(source), Some(target)) => {
                    edges_group = edges_group.add(self.render_edge(source, target, graph));
                }
                _ => debug!(edge:% = edge; "Skipping edge with unknown endpoint"),
            }
        }

        let mut nodes_group = Group::new().set("class", "nodes");
        let mut seen = IndexSet::new();
        for node in graph.nodes() {
            // Repeated ids share one box
            if !seen.insert(node.id()) {
                continue;
            }
            nodes_group = nodes_group.add(self.render_node(node, graph.node_size()));
        }

        main_group = main_group.add(edges_group).add(nodes_group);
        Ok(doc.add(main_group))
    }
}

impl Exporter for Svg {
    fn export(&self, graph: &LaidOutGraph) -> Result<String, export::Error> {
        let doc = self.render(graph)?;
        info!(nodes = graph.nodes().len(); "SVG document rendered");
        Ok(doc.to_string())
    }
}
