//! Token types produced by the [`lexer`](crate::lexer).

use std::fmt;

use crate::span::{CodeRange, Span};

/// Token types for the Wireloom language.
///
/// Literal variants keep their raw source text; quote stripping, unescaping
/// and numeric coercion happen during lowering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'src> {
    // Keywords
    Project,
    Screen,
    Layout,
    Cell,
    Component,
    Define,
    /// `Component`, as in `define Component "Name"`
    DefinedComponent,
    /// `Layout`, as in `define Layout "name"`
    DefinedLayout,
    Style,
    Mocks,
    Colors,

    // Literals
    StringLiteral(&'src str),
    NumberLiteral(&'src str),
    HexColor(&'src str),
    Identifier(&'src str),

    // Punctuation
    LeftBrace,  // {
    RightBrace, // }
    LeftParen,  // (
    RightParen, // )
    Colon,      // :
    Comma,      // ,
}

impl Token<'_> {
    /// Returns `true` for tokens that may appear where an identifier is
    /// expected: plain identifiers and the capitalised definition keywords.
    pub fn is_identifier_like(&self) -> bool {
        matches!(
            self,
            Token::Identifier(_) | Token::DefinedComponent | Token::DefinedLayout
        )
    }
}

/// A token with its byte span and line/column range.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
    pub range: CodeRange,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span, range: CodeRange) -> Self {
        Self { token, span, range }
    }

    /// The token's source text, as written.
    pub fn text(&self) -> &'src str {
        match self.token {
            Token::StringLiteral(raw)
            | Token::NumberLiteral(raw)
            | Token::HexColor(raw)
            | Token::Identifier(raw) => raw,
            Token::Project => "project",
            Token::Screen => "screen",
            Token::Layout => "layout",
            Token::Cell => "cell",
            Token::Component => "component",
            Token::Define => "define",
            Token::DefinedComponent => "Component",
            Token::DefinedLayout => "Layout",
            Token::Style => "style",
            Token::Mocks => "mocks",
            Token::Colors => "colors",
            Token::LeftBrace => "{",
            Token::RightBrace => "}",
            Token::LeftParen => "(",
            Token::RightParen => ")",
            Token::Colon => ":",
            Token::Comma => ",",
        }
    }
}

impl<'src> std::ops::Deref for PositionedToken<'src> {
    type Target = Token<'src>;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

impl fmt::Display for PositionedToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.token.fmt(f)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Project => write!(f, "project"),
            Token::Screen => write!(f, "screen"),
            Token::Layout => write!(f, "layout"),
            Token::Cell => write!(f, "cell"),
            Token::Component => write!(f, "component"),
            Token::Define => write!(f, "define"),
            Token::DefinedComponent => write!(f, "Component"),
            Token::DefinedLayout => write!(f, "Layout"),
            Token::Style => write!(f, "style"),
            Token::Mocks => write!(f, "mocks"),
            Token::Colors => write!(f, "colors"),

            Token::StringLiteral(raw) => write!(f, "{raw}"),
            Token::NumberLiteral(raw) => write!(f, "{raw}"),
            Token::HexColor(raw) => write!(f, "{raw}"),
            Token::Identifier(name) => write!(f, "{name}"),

            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::Colon => write!(f, ":"),
            Token::Comma => write!(f, ","),
        }
    }
}
