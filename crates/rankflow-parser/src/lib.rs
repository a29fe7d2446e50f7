//! # Rankflow Parser
//!
//! Parser for the Rankflow graph description format. A source file lists
//! nodes and the edges between them:
//!
//! ```text
//! graph LR;
//! planner: "Planner Agent";
//! critic;
//! writer;
//! planner -> critic -> writer;
//! ```
//!
//! ## Usage
//!
//! ```
//! # use rankflow_parser::{parse, error::ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let graph = parse("a; b; a -> b;")?;
//!     assert_eq!(graph.nodes().len(), 2);
//!     assert_eq!(graph.edges().len(), 1);
//!     Ok(())
//! }
//! ```

mod builder;
pub mod error;
mod lexer;
mod parser;
mod span;
mod tokens;

pub use span::Span;

use log::{debug, warn};

use rankflow_core::graph::Graph;

use builder::GraphBuilder;
use error::ParseError;

/// Parse source text into a [`Graph`].
///
/// The pipeline runs in three steps:
///
/// 1. **Tokenize** - Convert source text to tokens
/// 2. **Parse** - Group tokens into statements
/// 3. **Build** - Validate statements and assemble the graph
///
/// Warnings, such as edges that name undeclared nodes, do not fail the parse
/// and are logged instead.
///
/// # Errors
///
/// Returns a [`ParseError`] carrying every diagnostic of the first step
/// that failed.
pub fn parse(source: &str) -> Result<Graph, ParseError> {
    let tokens = lexer::tokenize(source)?;
    debug!(tokens = tokens.len(); "Tokenized source");

    let statements = parser::build_statements(&tokens)?;
    debug!(statements = statements.len(); "Parsed statements");

    let (graph, warnings) = GraphBuilder::new().build(statements)?;
    for warning in &warnings {
        warn!(span:% = warning.primary_span().unwrap_or_default(); "{}", warning.message());
    }

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use rankflow_core::graph::Direction;

    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_parse_full_graph() {
        let source = r#"
            // Research pipeline
            graph LR;
            planner: "Planner Agent";
            researcher: "Research Agent";
            critic;
            writer;

            planner -> researcher -> critic -> writer;
            planner -> critic;
        "#;

        let graph = parse(source).unwrap();

        assert_eq!(graph.direction(), Some(Direction::LeftToRight));
        assert_eq!(graph.nodes().len(), 4);
        assert_eq!(graph.edges().len(), 4);
        assert_eq!(graph.nodes()[0].display_text(), "Planner Agent");
        assert_eq!(graph.nodes()[2].display_text(), "critic");
    }

    #[test]
    fn test_lexer_errors_stop_the_pipeline() {
        let err = parse("a: \"open;\nb $;").unwrap_err();
        let codes: Vec<_> = err.diagnostics().iter().filter_map(|d| d.code()).collect();

        assert_eq!(codes, vec![ErrorCode::E001, ErrorCode::E002]);
    }

    #[test]
    fn test_warnings_do_not_fail() {
        let graph = parse("a; a -> missing;").unwrap();
        assert_eq!(graph.edges().len(), 1);
    }

    #[test]
    fn test_empty_source_is_empty_graph() {
        let graph = parse("").unwrap();
        assert!(graph.nodes().is_empty());
        assert!(graph.edges().is_empty());
        assert_eq!(graph.direction(), None);
    }
}
