//! Error and diagnostic system for the Rankflow parser.
//!
//! Lexing, parsing and validation all report problems as [`Diagnostic`]s:
//! a message with an optional [`ErrorCode`], labeled source spans and help
//! text. Every diagnostic produced by one parse is returned together inside
//! a [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use rankflow_parser::error::{Diagnostic, ErrorCode};
//! # use rankflow_parser::Span;
//! let diag = Diagnostic::error("node `planner` is declared more than once")
//!     .with_code(ErrorCode::E200)
//!     .with_label(Span::new(40..47), "duplicate declaration")
//!     .with_secondary_label(Span::new(0..7), "first declared here")
//!     .with_help("remove one of the declarations");
//! assert_eq!(diag.labels().len(), 2);
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod parse_error;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use parse_error::ParseError;
