//! Lexical analyzer for Wireloom source text.
//!
//! The lexer converts source text into a stream of [`PositionedToken`]s.
//! Whitespace, `//` line comments and `/* */` block comments are recognised
//! and dropped; they never reach the parser.
//!
//! Lexing never stops at the first problem. Unknown characters are skipped
//! (consecutive ones are reported as a single diagnostic), an unterminated
//! string skips to the end of its line, and an unterminated block comment
//! swallows the rest of the input.

use log::debug;
use winnow::{
    Parser as _,
    ascii::{digit1, multispace1},
    combinator::{alt, cut_err, not, opt, peek, preceded, repeat, terminated},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{literal, none_of, one_of, take_until, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::{LineIndex, Span},
    tokens::{PositionedToken, Token},
};

/// Diagnostic context attached to committed lexer failures.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: &'static str,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<'a, O> = ModalResult<O, ContextError<LexerDiagnostic>>;

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Ensures the previous token is not immediately followed by an identifier
/// character (word boundary).
fn boundary<'a>(input: &mut Input<'a>) -> IResult<'a, ()> {
    peek(not(one_of(is_identifier_char))).parse_next(input)
}

/// Body of a string literal: plain runs and backslash escapes.
fn string_body<'a>(input: &mut Input<'a>) -> IResult<'a, ()> {
    repeat(
        0..,
        alt((
            take_while(1.., |c: char| !matches!(c, '"' | '\\' | '\n' | '\r')).void(),
            preceded('\\', none_of(['\n', '\r'])).void(),
        )),
    )
    .parse_next(input)
}

/// Parse a double-quoted string literal on a single line, keeping its raw
/// text (quotes and escapes included).
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    preceded(
        '"',
        cut_err(terminated(string_body, '"')).context(LexerDiagnostic {
            code: ErrorCode::LexerUnterminatedString,
            message: "unterminated string literal",
            help: "add a closing `\"` on the same line",
        }),
    )
    .take()
    .map(Token::StringLiteral)
    .parse_next(input)
}

/// Parse a hex color such as `#3B82F6`
fn hex_color<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    terminated(
        ('#', take_while(1.., |c: char| c.is_ascii_hexdigit())),
        boundary,
    )
    .take()
    .map(Token::HexColor)
    .parse_next(input)
}

/// Parse a number: `-?[0-9]+(\.[0-9]+)?`, not followed by an identifier
/// character (so `2xl` stays an identifier).
fn number_literal<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    terminated((opt('-'), digit1, opt(('.', digit1))), boundary)
        .take()
        .map(Token::NumberLiteral)
        .parse_next(input)
}

/// Parse keywords with word boundary checking
fn keyword<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    terminated(
        alt((
            literal("project"),
            literal("screen"),
            literal("layout"),
            literal("cell"),
            literal("component"),
            literal("define"),
            literal("Component"),
            literal("Layout"),
            literal("style"),
            literal("mocks"),
            literal("colors"),
        )),
        boundary,
    )
    .map(|keyword: &str| match keyword {
        "project" => Token::Project,
        "screen" => Token::Screen,
        "layout" => Token::Layout,
        "cell" => Token::Cell,
        "component" => Token::Component,
        "define" => Token::Define,
        "Component" => Token::DefinedComponent,
        "Layout" => Token::DefinedLayout,
        "style" => Token::Style,
        "mocks" => Token::Mocks,
        "colors" => Token::Colors,
        _ => unreachable!(),
    })
    .parse_next(input)
}

/// Parse identifiers: `[A-Za-z0-9_][A-Za-z0-9_-]*`
fn identifier<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    take_while(1.., is_identifier_char)
        .verify(|s: &str| !s.starts_with('-'))
        .map(Token::Identifier)
        .parse_next(input)
}

/// Parse single character tokens
fn punctuation<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    alt((
        '{'.value(Token::LeftBrace),
        '}'.value(Token::RightBrace),
        '('.value(Token::LeftParen),
        ')'.value(Token::RightParen),
        ':'.value(Token::Colon),
        ','.value(Token::Comma),
    ))
    .parse_next(input)
}

fn line_comment<'a>(input: &mut Input<'a>) -> IResult<'a, ()> {
    preceded("//", take_while(0.., |c| c != '\n'))
        .void()
        .parse_next(input)
}

/// Parse a block comment. It ends at the first `*/`, so a later comment is
/// never swallowed.
fn block_comment<'a>(input: &mut Input<'a>) -> IResult<'a, ()> {
    preceded(
        "/*",
        cut_err(terminated(take_until(0.., "*/"), "*/")).context(LexerDiagnostic {
            code: ErrorCode::LexerUnterminatedComment,
            message: "unterminated block comment",
            help: "close the comment with `*/`",
        }),
    )
    .void()
    .parse_next(input)
}

/// Parse one piece of trivia (whitespace or a comment)
fn trivia<'a>(input: &mut Input<'a>) -> IResult<'a, ()> {
    alt((multispace1.void(), line_comment, block_comment)).parse_next(input)
}

/// Parse a single token, returning it with its byte span.
fn spanned_token<'a>(input: &mut Input<'a>) -> IResult<'a, (Token<'a>, Span)> {
    let start_pos = input.current_token_start();

    let token = alt((
        string_literal, // Must come before any single char
        hex_color,
        keyword,        // Must come before identifier
        number_literal, // Must come before identifier
        identifier,
        punctuation,
    ))
    .parse_next(input)?;

    let end_pos = input.current_token_start();
    Ok((token, Span::new(start_pos..end_pos)))
}

/// One step of the lexer: either trivia or a token.
fn lex_item<'a>(input: &mut Input<'a>) -> IResult<'a, Option<(Token<'a>, Span)>> {
    alt((trivia.value(None), spanned_token.map(Some))).parse_next(input)
}

/// Lexer that accumulates tokens and diagnostics during tokenization.
struct Lexer<'a> {
    source: &'a str,
    index: LineIndex<'a>,
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: DiagnosticCollector,
    /// Span of unexpected characters not yet reported, so that a run of
    /// them becomes a single diagnostic.
    pending_unexpected: Option<Span>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            index: LineIndex::new(source),
            tokens: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
            pending_unexpected: None,
        }
    }

    /// Tokenize the input, collecting tokens and errors.
    fn tokenize(&mut self) {
        let mut input = LocatingSlice::new(self.source);

        while !input.is_empty() {
            let start = input.current_token_start();
            let checkpoint = input.checkpoint();

            match lex_item(&mut input) {
                Ok(item) => {
                    self.flush_unexpected();
                    if let Some((token, span)) = item {
                        let range = self.index.range(span);
                        self.tokens.push(PositionedToken::new(token, span, range));
                    }
                }
                Err(ErrMode::Cut(ctx)) | Err(ErrMode::Backtrack(ctx)) => {
                    input.reset(&checkpoint);
                    match ctx.context().next().cloned() {
                        Some(context) => {
                            self.flush_unexpected();
                            self.recover_committed(&mut input, start, context);
                        }
                        None => {
                            input.next_token();
                            self.push_unexpected(Span::new(start..input.current_token_start()));
                        }
                    }
                }
                Err(ErrMode::Incomplete(_)) => {
                    // Not reachable for complete input; skip a character.
                    input.reset(&checkpoint);
                    input.next_token();
                    self.push_unexpected(Span::new(start..input.current_token_start()));
                }
            }
        }

        self.flush_unexpected();
    }

    /// Skip past a committed failure and report it.
    fn recover_committed(&mut self, input: &mut Input<'a>, start: usize, context: LexerDiagnostic) {
        let rest = input.eof_offset();
        let skip = match context.code {
            // Everything up to (not including) the end of the line.
            ErrorCode::LexerUnterminatedString => input
                .peek_slice(rest)
                .find(|c: char| c == '\n' || c == '\r')
                .unwrap_or(rest),
            _ => rest,
        };
        input.next_slice(skip);

        let span = Span::new(start..input.current_token_start());
        self.diagnostics.emit(
            Diagnostic::error(context.code, context.message)
                .with_range(self.index.range(span))
                .with_suggestion(context.help),
        );
    }

    fn push_unexpected(&mut self, span: Span) {
        self.pending_unexpected = Some(match self.pending_unexpected {
            Some(pending) if pending.end() == span.start() => pending.union(span),
            Some(pending) => {
                self.emit_unexpected(pending);
                span
            }
            None => span,
        });
    }

    fn flush_unexpected(&mut self) {
        if let Some(span) = self.pending_unexpected.take() {
            self.emit_unexpected(span);
        }
    }

    fn emit_unexpected(&mut self, span: Span) {
        let text = &self.source[span.start()..span.end()];
        let message = if text.chars().count() > 1 {
            format!("unexpected characters `{text}`")
        } else {
            format!("unexpected character `{text}`")
        };
        self.diagnostics.emit(
            Diagnostic::error(ErrorCode::LexerUnexpectedCharacter, message)
                .with_range(self.index.range(span))
                .with_suggestion("remove it, or quote it inside a string literal"),
        );
    }

    fn finish(self) -> (Vec<PositionedToken<'a>>, Vec<Diagnostic>) {
        debug!(
            tokens = self.tokens.len(),
            diagnostics = self.diagnostics.len();
            "Lexing complete"
        );
        (self.tokens, self.diagnostics.into_diagnostics())
    }
}

/// Tokenize source text, recovering from errors.
///
/// Always returns every token that could be recognised, together with all
/// lexer diagnostics (possibly empty).
pub fn tokenize_recovering(source: &str) -> (Vec<PositionedToken<'_>>, Vec<Diagnostic>) {
    let mut lexer = Lexer::new(source);
    lexer.tokenize();
    lexer.finish()
}

/// Tokenize source text, failing if any lexer error was found.
///
/// # Returns
///
/// - `Ok(tokens)` - All input was tokenized
/// - `Err(ParseError)` - One or more errors occurred; contains all diagnostics
pub fn tokenize(source: &str) -> Result<Vec<PositionedToken<'_>>, ParseError> {
    let (tokens, diagnostics) = tokenize_recovering(source);
    if diagnostics.is_empty() {
        Ok(tokens)
    } else {
        Err(ParseError::new(diagnostics))
    }
}
