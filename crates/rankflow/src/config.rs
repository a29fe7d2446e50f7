//! Configuration types for Rankflow layout and rendering.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file. Every field is optional in the file and falls back to its
//! default.
//!
//! - [`AppConfig`] - Top-level configuration combining layout and style settings.
//! - [`LayoutConfig`] - Direction, node footprint and spacing used by the layout engine.
//! - [`StyleConfig`] - Colors used by the SVG exporter.
//!
//! # Example
//!
//! ```
//! # use rankflow::config::AppConfig;
//! let config: AppConfig = toml::from_str(
//!     r#"
//!     [layout]
//!     direction = "LR"
//!     node_width = 200
//!
//!     [style]
//!     edge_color = "steelblue"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.layout().node_width(), 200.0);
//! assert_eq!(config.layout().node_height(), 120.0);
//! ```

use serde::Deserialize;

use rankflow_core::{color::Color, geometry::Size, graph::Direction};

/// Top-level application configuration combining layout and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and style configurations.
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Options for the layered layout engine.
///
/// Node width and height are the footprint reserved for every node; the
/// spacings are the gaps added between adjacent footprints. Horizontal
/// values apply along X and vertical values along Y whatever the direction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    direction: Direction,
    node_width: f32,
    node_height: f32,
    horizontal_spacing: f32,
    vertical_spacing: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            direction: Direction::TopToBottom,
            node_width: 260.0,
            node_height: 120.0,
            horizontal_spacing: 80.0,
            vertical_spacing: 100.0,
        }
    }
}

impl LayoutConfig {
    /// Returns a copy with the direction replaced.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Returns a copy with the node footprint replaced.
    pub fn with_node_size(mut self, width: f32, height: f32) -> Self {
        self.node_width = width;
        self.node_height = height;
        self
    }

    /// Returns a copy with both spacings replaced.
    pub fn with_spacing(mut self, horizontal: f32, vertical: f32) -> Self {
        self.horizontal_spacing = horizontal;
        self.vertical_spacing = vertical;
        self
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn node_width(&self) -> f32 {
        self.node_width
    }

    pub fn node_height(&self) -> f32 {
        self.node_height
    }

    /// Footprint reserved for each node.
    pub fn node_size(&self) -> Size {
        Size::new(self.node_width, self.node_height)
    }

    pub fn horizontal_spacing(&self) -> f32 {
        self.horizontal_spacing
    }

    pub fn vertical_spacing(&self) -> f32 {
        self.vertical_spacing
    }
}

/// Visual styling configuration for rendered graphs.
///
/// Colors are kept as the strings found in the file and parsed on access,
/// so a bad color only fails the export that uses it. Unset fields fall back
/// to renderer defaults.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    background_color: Option<String>,

    #[serde(default)]
    node_fill_color: Option<String>,

    #[serde(default)]
    node_line_color: Option<String>,

    #[serde(default)]
    edge_color: Option<String>,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        parse_color("background", self.background_color.as_deref())
    }

    /// Returns the parsed node fill [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn node_fill_color(&self) -> Result<Option<Color>, String> {
        parse_color("node fill", self.node_fill_color.as_deref())
    }

    /// Returns the parsed node outline [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn node_line_color(&self) -> Result<Option<Color>, String> {
        parse_color("node line", self.node_line_color.as_deref())
    }

    /// Returns the parsed edge [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn edge_color(&self) -> Result<Option<Color>, String> {
        parse_color("edge", self.edge_color.as_deref())
    }
}

fn parse_color(field: &str, value: Option<&str>) -> Result<Option<Color>, String> {
    value
        .map(Color::new)
        .transpose()
        .map_err(|err| format!("Invalid {field} color in config: {err}"))
}
