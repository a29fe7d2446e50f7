//! Turns parsed statements into a [`Graph`], checking the rules the grammar
//! alone cannot express.

use indexmap::IndexMap;

use rankflow_core::{
    graph::{Direction, Edge, Graph, Node},
    identifier::Id,
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    parser::Statement,
    span::{Span, Spanned},
};

/// Collects nodes, edges and the header while validating them.
#[derive(Debug, Default)]
pub(crate) struct GraphBuilder {
    header: Option<(Span, Option<Direction>)>,
    nodes: IndexMap<Id, (Node, Span)>,
    edges: Vec<Edge>,
    /// First mention of every edge endpoint, used for undeclared-node warnings.
    endpoints: IndexMap<Id, Span>,
    diagnostics: DiagnosticCollector,
}

impl GraphBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Consumes the statements and returns the graph plus any warnings.
    ///
    /// # Errors
    ///
    /// Returns every validation error found across all statements.
    pub(crate) fn build(
        mut self,
        statements: Vec<Spanned<Statement<'_>>>,
    ) -> Result<(Graph, Vec<Diagnostic>), ParseError> {
        for statement in statements {
            match statement.into_inner() {
                Statement::Header { keyword, direction } => self.add_header(keyword, direction),
                Statement::Node { id, label } => self.add_node(id, label),
                Statement::Edges { chain } => self.add_edges(&chain),
            }
        }

        self.warn_undeclared();

        let direction = self.header.and_then(|(_, direction)| direction);
        let nodes = self.nodes.into_values().map(|(node, _)| node).collect();
        let graph = Graph::new(direction, nodes, self.edges);

        self.diagnostics.finish().map(|warnings| (graph, warnings))
    }

    fn add_header(&mut self, keyword: Span, direction: Spanned<&str>) {
        if let Some((first, _)) = self.header {
            self.diagnostics.emit(
                Diagnostic::error("graph header declared more than once")
                    .with_code(ErrorCode::E201)
                    .with_label(keyword, "duplicate header")
                    .with_secondary_label(first, "first declared here")
                    .with_help("keep a single `graph <direction>;` line"),
            );
            return;
        }

        let parsed = match direction.inner().parse::<Direction>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                self.diagnostics.emit(
                    Diagnostic::error(format!("unknown direction `{}`", direction.inner()))
                        .with_code(ErrorCode::E102)
                        .with_label(direction.span(), ErrorCode::E102.description())
                        .with_help("use `TB` or `LR`"),
                );
                None
            }
        };

        self.header = Some((keyword, parsed));
    }

    fn add_node(&mut self, id: Spanned<&str>, label: Option<Spanned<String>>) {
        let key = Id::new(id.inner());

        if let Some((_, first)) = self.nodes.get(&key) {
            self.diagnostics.emit(
                Diagnostic::error(format!("node `{}` is declared more than once", id.inner()))
                    .with_code(ErrorCode::E200)
                    .with_label(id.span(), "duplicate declaration")
                    .with_secondary_label(*first, "first declared here"),
            );
            return;
        }

        let mut node = Node::new(key);
        if let Some(label) = label {
            node = node.with_label(label.into_inner());
        }
        self.nodes.insert(key, (node, id.span()));
    }

    fn add_edges(&mut self, chain: &[Spanned<&str>]) {
        for endpoint in chain {
            self.endpoints
                .entry(Id::new(endpoint.inner()))
                .or_insert(endpoint.span());
        }

        self.edges.extend(
            chain
                .windows(2)
                .map(|pair| Edge::new(Id::new(pair[0].inner()), Id::new(pair[1].inner()))),
        );
    }

    fn warn_undeclared(&mut self) {
        let undeclared: Vec<(Id, Span)> = self
            .endpoints
            .iter()
            .filter(|(id, _)| !self.nodes.contains_key(*id))
            .map(|(id, span)| (*id, *span))
            .collect();

        for (id, span) in undeclared {
            self.diagnostics.emit(
                Diagnostic::warning(format!("edge endpoint `{id}` is not a declared node"))
                    .with_label(span, "undeclared node")
                    .with_help(format!("declare it with `{id};` or the edge is ignored")),
            );
        }
    }
}
