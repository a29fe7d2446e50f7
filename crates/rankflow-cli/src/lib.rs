//! CLI logic for the Rankflow layout tool.
//!
//! Reads a `.rfl` graph, lays it out, and writes the result as SVG or TOML.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Format};

use std::fs;

use log::info;

use rankflow::{GraphBuilder, RankflowError};

/// Run the Rankflow CLI application
///
/// This function processes the input file through the Rankflow pipeline
/// and writes the rendered output file.
///
/// # Errors
///
/// Returns `RankflowError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), RankflowError> {
    let format = args.output_format();
    info!(
        input_path = args.input,
        output_path = args.output,
        format:?;
        "Processing graph"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let builder = GraphBuilder::new(app_config);
    let graph = builder.parse(&source)?;
    let laid_out = builder.layout(&graph);
    let output = match format {
        Format::Svg => builder.render_svg(&laid_out)?,
        Format::Toml => builder.render_toml(&laid_out)?,
    };

    fs::write(&args.output, output)?;

    info!(output_file = args.output; "Output written successfully");

    Ok(())
}
