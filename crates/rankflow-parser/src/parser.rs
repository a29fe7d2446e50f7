//! Statement parser over the token stream.
//!
//! The grammar has three statement forms, each terminated by `;`:
//!
//! ```text
//! graph LR;                      header
//! planner: "Planner Agent";      node declaration, label optional
//! planner -> critic -> writer;   edge chain
//! ```
//!
//! Statements are parsed one at a time. When a statement is malformed the
//! parser records a diagnostic, skips past the next `;` and carries on.

use winnow::{
    Parser as _,
    combinator::{cut_err, opt, preceded, repeat},
    error::{ContextError, ErrMode, ModalResult},
    token::any,
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// A parsed statement, before validation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Statement<'src> {
    Header {
        keyword: Span,
        direction: Spanned<&'src str>,
    },
    Node {
        id: Spanned<&'src str>,
        label: Option<Spanned<String>>,
    },
    Edges {
        chain: Vec<Spanned<&'src str>>,
    },
}

type Input<'t, 'src> = &'t [PositionedToken<'src>];
type IResult<O> = ModalResult<O, ContextError<&'static str>>;

fn graph_keyword<'src>(input: &mut Input<'_, 'src>) -> IResult<Span> {
    any.verify(|token: &PositionedToken<'src>| matches!(token.token, Token::Graph))
        .map(|token: PositionedToken<'src>| token.span)
        .context("`graph`")
        .parse_next(input)
}

fn semicolon<'src>(input: &mut Input<'_, 'src>) -> IResult<Span> {
    any.verify(|token: &PositionedToken<'src>| matches!(token.token, Token::Semicolon))
        .map(|token: PositionedToken<'src>| token.span)
        .context("`;`")
        .parse_next(input)
}

fn arrow<'src>(input: &mut Input<'_, 'src>) -> IResult<Span> {
    any.verify(|token: &PositionedToken<'src>| matches!(token.token, Token::Arrow))
        .map(|token: PositionedToken<'src>| token.span)
        .context("`->`")
        .parse_next(input)
}

fn colon<'src>(input: &mut Input<'_, 'src>) -> IResult<Span> {
    any.verify(|token: &PositionedToken<'src>| matches!(token.token, Token::Colon))
        .map(|token: PositionedToken<'src>| token.span)
        .context("`:`")
        .parse_next(input)
}

fn identifier<'src>(input: &mut Input<'_, 'src>) -> IResult<Spanned<&'src str>> {
    any.verify_map(|token: PositionedToken<'src>| match token.token {
        Token::Identifier(name) => Some(Spanned::new(name, token.span)),
        _ => None,
    })
    .context("identifier")
    .parse_next(input)
}

fn string_literal<'src>(input: &mut Input<'_, 'src>) -> IResult<Spanned<String>> {
    any.verify_map(|token: PositionedToken<'src>| match token.token {
        Token::StringLiteral(value) => Some(Spanned::new(value, token.span)),
        _ => None,
    })
    .context("string literal")
    .parse_next(input)
}

/// `graph <direction>;`
fn header<'src>(input: &mut Input<'_, 'src>) -> IResult<Statement<'src>> {
    let keyword = graph_keyword(input)?;
    let direction = identifier(input)?;
    semicolon(input)?;

    Ok(Statement::Header { keyword, direction })
}

/// `<id> [: "label"];` or `<id> -> <id> [-> <id>]*;`
fn node_or_edges<'src>(input: &mut Input<'_, 'src>) -> IResult<Statement<'src>> {
    let first = identifier(input)?;

    // An arrow commits to another identifier
    let rest: Vec<Spanned<&'src str>> =
        repeat(0.., preceded(arrow, cut_err(identifier))).parse_next(input)?;

    let statement = if rest.is_empty() {
        let label = opt(preceded(colon, string_literal)).parse_next(input)?;
        Statement::Node { id: first, label }
    } else {
        let mut chain = Vec::with_capacity(rest.len() + 1);
        chain.push(first);
        chain.extend(rest);
        Statement::Edges { chain }
    };

    semicolon(input)?;
    Ok(statement)
}

fn statement<'src>(input: &mut Input<'_, 'src>) -> IResult<Statement<'src>> {
    match input.first().map(|token| &token.token) {
        Some(Token::Graph) => header(input),
        _ => node_or_edges(input),
    }
}

/// Turn a failed statement into a diagnostic pointing at the offending token.
fn statement_error(
    err: ErrMode<ContextError<&'static str>>,
    remaining: Input<'_, '_>,
    end_of_input: usize,
) -> Diagnostic {
    let expected = match &err {
        ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx.context().next().copied(),
        ErrMode::Incomplete(_) => None,
    }
    .unwrap_or("a statement");

    match remaining.first() {
        Some(found) => Diagnostic::error(format!("expected {expected}, found {}", found.token))
            .with_code(ErrorCode::E100)
            .with_label(found.span, format!("expected {expected}")),
        None => Diagnostic::error(format!("expected {expected}, found end of input"))
            .with_code(ErrorCode::E101)
            .with_label(
                Span::new(end_of_input..end_of_input),
                ErrorCode::E101.description(),
            )
            .with_help("terminate every statement with `;`"),
    }
}

/// Parse the whole token stream into statements.
///
/// Whitespace and comment tokens are dropped first.
///
/// # Errors
///
/// Returns every syntax error found; parsing resumes after the next `;`
/// following each error.
pub(crate) fn build_statements<'src>(
    tokens: &[PositionedToken<'src>],
) -> Result<Vec<Spanned<Statement<'src>>>, ParseError> {
    let significant: Vec<PositionedToken<'src>> = tokens
        .iter()
        .filter(|token| !token.token.is_trivia())
        .cloned()
        .collect();
    let end_of_input = tokens.last().map_or(0, |token| token.span.end());

    let mut input: Input<'_, 'src> = &significant;
    let mut statements = Vec::new();
    let mut diagnostics = DiagnosticCollector::new();

    while let Some(first) = input.first() {
        let start = first.span;
        let before = input;

        match statement(&mut input) {
            Ok(statement) => {
                let consumed = before.len() - input.len();
                let span = before[..consumed]
                    .iter()
                    .fold(start, |acc, token| acc.union(token.span));
                statements.push(Spanned::new(statement, span));
            }
            Err(err) => {
                diagnostics.emit(statement_error(err, input, end_of_input));

                // Resume after the `;` that ends the broken statement
                let skip = input
                    .iter()
                    .position(|token| token.token == Token::Semicolon)
                    .map_or(input.len(), |idx| idx + 1);
                input = &input[skip.max(1).min(input.len())..];
            }
        }
    }

    diagnostics.finish().map(|_| statements)
}
