//! Rankflow - layered auto-layout for directed graphs.
//!
//! Parsing, layout, and rendering for Rankflow graph files. Every node gets
//! a rank from the longest path leading to it, ranks become layers, and the
//! result can be exported as SVG or as a TOML list of positions.

pub mod config;
pub mod export;
pub mod layout;

mod error;

pub use rankflow_core::{color, geometry, graph, identifier};

pub use error::RankflowError;

use log::{debug, info, trace};

use config::AppConfig;
use export::Exporter;
use graph::Graph;
use layout::LaidOutGraph;

/// Builder for parsing, laying out and rendering Rankflow graphs.
///
/// # Examples
///
/// ```rust
/// use rankflow::{GraphBuilder, config::AppConfig};
///
/// let source = "graph LR; planner; critic; planner -> critic;";
///
/// let builder = GraphBuilder::new(AppConfig::default());
///
/// let graph = builder.parse(source).expect("Failed to parse");
/// let laid_out = builder.layout(&graph);
/// let svg = builder.render_svg(&laid_out).expect("Failed to render");
///
/// assert!(svg.contains("<svg"));
/// ```
#[derive(Debug, Default)]
pub struct GraphBuilder {
    config: AppConfig,
}

impl GraphBuilder {
    /// Create a new graph builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including layout and style settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse source code into a [`Graph`].
    ///
    /// # Errors
    ///
    /// Returns [`RankflowError::Parse`] with every diagnostic found, and the
    /// source text for rendering them.
    pub fn parse(&self, source: &str) -> Result<Graph, RankflowError> {
        info!("Parsing graph");

        let graph = rankflow_parser::parse(source)
            .map_err(|err| RankflowError::new_parse_error(err, source))?;

        debug!(
            nodes = graph.nodes().len(),
            edges = graph.edges().len();
            "Graph parsed successfully"
        );
        trace!(graph:?; "Parsed graph");

        Ok(graph)
    }

    /// Compute node positions for `graph`.
    ///
    /// A direction given in the graph header wins over the configured one.
    pub fn layout(&self, graph: &Graph) -> LaidOutGraph {
        info!("Laying out graph");
        LaidOutGraph::new(graph, self.config.layout())
    }

    /// Render a laid-out graph to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`RankflowError::Config`] for an invalid style color and
    /// [`RankflowError::Export`] when rendering fails.
    pub fn render_svg(&self, graph: &LaidOutGraph) -> Result<String, RankflowError> {
        let exporter = export::svg::Svg::new()
            .with_style(self.config.style())
            .map_err(RankflowError::Config)?;

        let svg = exporter.export(graph)?;
        info!("SVG rendered successfully");
        Ok(svg)
    }

    /// Render a laid-out graph to a TOML document of ranks and positions.
    ///
    /// # Errors
    ///
    /// Returns [`RankflowError::Export`] when serialization fails.
    pub fn render_toml(&self, graph: &LaidOutGraph) -> Result<String, RankflowError> {
        let toml = export::toml::Toml::new().export(graph)?;
        info!("TOML rendered successfully");
        Ok(toml)
    }
}
