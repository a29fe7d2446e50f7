//! Token definitions produced by the [`lexer`](super::lexer).

use std::fmt;

use crate::span::Span;

/// Tokens of the graph description format
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'src> {
    // Keywords
    Graph,

    // Literals
    StringLiteral(String),
    Identifier(&'src str),

    // Operators
    Arrow, // ->
    Colon, // :

    // Punctuation
    Semicolon, // ;

    // Comments
    LineComment(&'src str), // // comment

    // Whitespace
    Whitespace,
    Newline,
}

impl Token<'_> {
    /// Returns `true` for tokens the parser skips between meaningful tokens.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            Token::Whitespace | Token::Newline | Token::LineComment(_)
        )
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Graph => write!(f, "`graph`"),
            Token::StringLiteral(s) => write!(f, "string \"{s}\""),
            Token::Identifier(name) => write!(f, "identifier `{name}`"),
            Token::Arrow => write!(f, "`->`"),
            Token::Colon => write!(f, "`:`"),
            Token::Semicolon => write!(f, "`;`"),
            Token::LineComment(_) => write!(f, "comment"),
            Token::Whitespace => write!(f, "whitespace"),
            Token::Newline => write!(f, "newline"),
        }
    }
}

/// A token with its source span
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }
}
