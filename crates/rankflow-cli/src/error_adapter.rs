//! Bridge from [`RankflowError`] to miette reports.
//!
//! A [`rankflow_parser::error::ParseError`] can carry several diagnostics,
//! warnings included; each one becomes its own report so they render
//! independently. Every other error variant becomes a single report without
//! source snippets.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, Severity as MietteSeverity, SourceSpan};

use rankflow::RankflowError;
use rankflow_parser::{
    Span,
    error::{Diagnostic, Severity},
};

/// One parser [`Diagnostic`] paired with the source it points into.
pub struct DiagnosticAdapter<'a> {
    diag: &'a Diagnostic,
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|code| Box::new(code) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<MietteSeverity> {
        Some(match self.diag.severity() {
            Severity::Error => MietteSeverity::Error,
            Severity::Warning => MietteSeverity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|help| Box::new(help) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = to_source_span(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Any [`RankflowError`] that has no source location: I/O, configuration
/// and export failures.
pub struct ErrorAdapter<'a>(pub &'a RankflowError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            RankflowError::Io(_) => "rankflow::io",
            RankflowError::Parse { .. } => return None,
            RankflowError::Config(_) => "rankflow::config",
            RankflowError::Export(_) => "rankflow::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            RankflowError::Config(_) => Some(Box::new(
                "check the configuration file passed with `--config` or found in `rankflow/config.toml`",
            )),
            _ => None,
        }
    }
}

/// A single renderable report.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A parser diagnostic with labelled source spans.
    Diagnostic(DiagnosticAdapter<'a>),
    /// Any other error.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<MietteSeverity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Error(e) => e.severity(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

fn to_source_span(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Split a [`RankflowError`] into the reports the CLI prints.
///
/// A parse error yields one [`Reportable`] per diagnostic, in source order.
/// Anything else yields exactly one.
pub fn to_reportables(err: &RankflowError) -> Vec<Reportable<'_>> {
    match err {
        RankflowError::Parse {
            err: parse_err,
            src,
        } => parse_err
            .diagnostics()
            .iter()
            .map(|diag| Reportable::Diagnostic(DiagnosticAdapter::new(diag, src)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

#[cfg(test)]
mod tests {
    use rankflow_parser::error::{ErrorCode, ParseError};

    use super::*;

    #[test]
    fn test_each_diagnostic_reported() {
        let src = "a -> ;\nb -> ;";
        let err = rankflow_parser::parse(src).unwrap_err();
        let count = err.diagnostics().len();
        let err = RankflowError::new_parse_error(err, src);

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), count);
        assert!(count >= 2);
        assert!(
            reportables
                .iter()
                .all(|r| matches!(r, Reportable::Diagnostic(_)))
        );
    }

    #[test]
    fn test_code_and_help_forwarded() {
        let diag = Diagnostic::error("unknown direction `UP`")
            .with_code(ErrorCode::E102)
            .with_label(Span::new(6..8), "not a direction")
            .with_help("use `TB` or `LR`");
        let err = RankflowError::new_parse_error(ParseError::from(diag), "graph UP;");

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);
        let report = &reportables[0];

        assert_eq!(report.to_string(), "unknown direction `UP`");
        assert_eq!(report.code().unwrap().to_string(), "E102");
        assert_eq!(report.help().unwrap().to_string(), "use `TB` or `LR`");
        assert_eq!(report.severity(), Some(MietteSeverity::Error));
    }

    #[test]
    fn test_warning_severity() {
        let diag = Diagnostic::warning("edge to undeclared node `x`");
        let adapter = DiagnosticAdapter::new(&diag, "a -> x;");
        assert_eq!(adapter.severity(), Some(MietteSeverity::Warning));
        assert!(adapter.labels().is_none());
    }

    #[test]
    fn test_labels_keep_primary_flag() {
        let diag = Diagnostic::error("node `a` declared twice")
            .with_label(Span::new(3..4), "second declaration")
            .with_secondary_label(Span::new(0..1), "first declared here");
        let adapter = DiagnosticAdapter::new(&diag, "a; a;");

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].label(), Some("second declaration"));
        assert!(labels[0].primary());
        assert_eq!(labels[0].offset(), 3);
        assert!(!labels[1].primary());
    }

    #[test]
    fn test_non_parse_errors() {
        let err = RankflowError::Config("bad color".to_string());
        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(e.to_string(), "Configuration error: bad color");
                assert_eq!(e.code().unwrap().to_string(), "rankflow::config");
                assert!(e.help().is_some());
            }
            Reportable::Diagnostic(_) => panic!("Expected Error"),
        }

        let io = RankflowError::Io(std::io::Error::other("gone"));
        let reportables = to_reportables(&io);
        assert_eq!(
            reportables[0].code().unwrap().to_string(),
            "rankflow::io"
        );
        assert!(reportables[0].help().is_none());
    }
}
