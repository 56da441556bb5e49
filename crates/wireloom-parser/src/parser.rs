//! Parser for Wireloom source tokens.
//!
//! This module transforms a token stream from the [`lexer`](super::lexer)
//! into the concrete syntax tree defined in [`cst`](super::cst). The public
//! entry point is [`build_project`].
//!
//! Every rule commits (`cut`) once its leading keyword has matched, so a
//! failure is reported at the token that broke the rule rather than at the
//! start of the enclosing block.
//!
//! Rules recurse once per block, so brace depth is checked up front and
//! capped at [`MAX_NESTING_DEPTH`].

use log::trace;
use winnow::{
    Parser as _,
    combinator::{alt, opt, repeat, separated},
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use crate::{
    cst::{
        CellNode, ComponentNode, DefinedBodyNode, DefinedComponentNode, DefinedLayoutNode,
        LayoutNode, MapDeclNode,
        ParamListNode, ProjectNode, PropertyNode, ScreenNode, Tok,
    },
    error::{Diagnostic, ErrorCode},
    tokens::{PositionedToken, Token},
};

/// Deepest `{` nesting accepted. The project, a screen and its root layout
/// already use three levels.
pub(crate) const MAX_NESTING_DEPTH: usize = 64;

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what the parser expected at the failure point
    Expected(&'static str),
}

type Input<'src> = TokenSlice<'src, PositionedToken<'src>>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;

/// Commit to the rule: any backtrack inside `f` becomes a cut error.
fn cut_err<'src, O, F>(input: &mut Input<'src>, f: F) -> IResult<O>
where
    F: FnOnce(&mut Input<'src>) -> IResult<O>,
{
    match f(input) {
        Err(ErrMode::Backtrack(e)) => Err(ErrMode::Cut(e)),
        other => other,
    }
}

/// Match one token of the given kind.
fn token<'src>(expected: Token<'static>) -> impl FnMut(&mut Input<'src>) -> IResult<Tok<'src>> {
    move |input: &mut Input<'src>| {
        any.verify(|t: &PositionedToken<'_>| t.token == expected)
            .parse_next(input)
    }
}

/// Parse an identifier; the capitalised definition keywords count too.
fn identifier<'src>(input: &mut Input<'src>) -> IResult<Tok<'src>> {
    any.verify(|t: &PositionedToken<'_>| t.is_identifier_like())
        .parse_next(input)
}

fn string_literal<'src>(input: &mut Input<'src>) -> IResult<Tok<'src>> {
    any.verify(|t: &PositionedToken<'_>| matches!(t.token, Token::StringLiteral(_)))
        .parse_next(input)
}

/// Parse a property value: string, number, hex color or identifier.
fn value<'src>(input: &mut Input<'src>) -> IResult<Tok<'src>> {
    any.verify(|t: &PositionedToken<'_>| {
        t.is_identifier_like()
            || matches!(
                t.token,
                Token::StringLiteral(_) | Token::NumberLiteral(_) | Token::HexColor(_)
            )
    })
    .parse_next(input)
}

/// Parse `name: value`
fn property<'src>(input: &mut Input<'src>) -> IResult<PropertyNode<'src>> {
    let name = identifier.parse_next(input)?;

    cut_err(input, |input| {
        token(Token::Colon)
            .context(Context::Expected("`:` after property name"))
            .parse_next(input)?;
        let value = value
            .context(Context::Expected("a string, number, color or identifier value"))
            .parse_next(input)?;
        Ok(PropertyNode { name, value })
    })
}

fn properties<'src>(input: &mut Input<'src>) -> IResult<Vec<PropertyNode<'src>>> {
    repeat(0.., property).parse_next(input)
}

/// Parse `( name: value, ... )`
fn param_list<'src>(input: &mut Input<'src>) -> IResult<ParamListNode<'src>> {
    let open = token(Token::LeftParen).parse_next(input)?;

    cut_err(input, |input| {
        let properties = separated(0.., property, token(Token::Comma)).parse_next(input)?;
        let close = token(Token::RightParen)
            .context(Context::Expected("`,` or `)`"))
            .parse_next(input)?;
        Ok(ParamListNode {
            open,
            properties,
            close,
        })
    })
}

/// Parse `component Type prop: value ...`
fn component<'src>(input: &mut Input<'src>) -> IResult<ComponentNode<'src>> {
    let keyword = token(Token::Component).parse_next(input)?;

    cut_err(input, |input| {
        let kind = identifier
            .context(Context::Expected("component type"))
            .parse_next(input)?;
        let properties = properties.parse_next(input)?;
        Ok(ComponentNode {
            keyword,
            kind,
            properties,
        })
    })
}

enum LayoutItem<'src> {
    Component(ComponentNode<'src>),
    Layout(LayoutNode<'src>),
    Cell(CellNode<'src>),
}

/// Parse `layout type (params)? { (component|layout|cell)* }`
fn layout<'src>(input: &mut Input<'src>) -> IResult<LayoutNode<'src>> {
    let keyword = token(Token::Layout).parse_next(input)?;

    cut_err(input, |input| {
        let kind = identifier
            .context(Context::Expected("layout type"))
            .parse_next(input)?;
        let params = opt(param_list).parse_next(input)?;
        let open = token(Token::LeftBrace)
            .context(Context::Expected("`{`"))
            .parse_next(input)?;

        let items: Vec<LayoutItem<'src>> = repeat(
            0..,
            alt((
                component.map(LayoutItem::Component),
                layout.map(LayoutItem::Layout),
                cell.map(LayoutItem::Cell),
            )),
        )
        .parse_next(input)?;

        let close = token(Token::RightBrace)
            .context(Context::Expected("`component`, `layout`, `cell` or `}`"))
            .parse_next(input)?;

        let mut node = LayoutNode {
            keyword,
            kind,
            params,
            open,
            components: Vec::new(),
            layouts: Vec::new(),
            cells: Vec::new(),
            close,
        };
        for item in items {
            match item {
                LayoutItem::Component(c) => node.components.push(c),
                LayoutItem::Layout(l) => node.layouts.push(l),
                LayoutItem::Cell(c) => node.cells.push(c),
            }
        }
        Ok(node)
    })
}

enum CellItem<'src> {
    Component(ComponentNode<'src>),
    Layout(LayoutNode<'src>),
}

/// Parse `cell prop: value ... { (component|layout)* }`
fn cell<'src>(input: &mut Input<'src>) -> IResult<CellNode<'src>> {
    let keyword = token(Token::Cell).parse_next(input)?;

    cut_err(input, |input| {
        let properties = properties.parse_next(input)?;
        let open = token(Token::LeftBrace)
            .context(Context::Expected("cell property or `{`"))
            .parse_next(input)?;

        let items: Vec<CellItem<'src>> = repeat(
            0..,
            alt((
                component.map(CellItem::Component),
                layout.map(CellItem::Layout),
            )),
        )
        .parse_next(input)?;

        let close = token(Token::RightBrace)
            .context(Context::Expected("`component`, `layout` or `}`"))
            .parse_next(input)?;

        let mut node = CellNode {
            keyword,
            properties,
            open,
            components: Vec::new(),
            layouts: Vec::new(),
            close,
        };
        for item in items {
            match item {
                CellItem::Component(c) => node.components.push(c),
                CellItem::Layout(l) => node.layouts.push(l),
            }
        }
        Ok(node)
    })
}

/// Parse `screen Name (params)? { layout }`
fn screen<'src>(input: &mut Input<'src>) -> IResult<ScreenNode<'src>> {
    let keyword = token(Token::Screen).parse_next(input)?;

    cut_err(input, |input| {
        let name = identifier
            .context(Context::Expected("screen name"))
            .parse_next(input)?;
        let params = opt(param_list).parse_next(input)?;
        let open = token(Token::LeftBrace)
            .context(Context::Expected("`{`"))
            .parse_next(input)?;
        let layout = layout
            .context(Context::Expected("`layout`"))
            .parse_next(input)?;
        let close = token(Token::RightBrace)
            .context(Context::Expected("`}` (a screen holds exactly one layout)"))
            .parse_next(input)?;
        Ok(ScreenNode {
            keyword,
            name,
            params,
            open,
            layout,
            close,
        })
    })
}

/// Parse `style { ... }`, `mocks { ... }` or `colors { ... }`
fn map_decl<'src>(input: &mut Input<'src>) -> IResult<MapDeclNode<'src>> {
    let keyword = alt((
        token(Token::Style),
        token(Token::Mocks),
        token(Token::Colors),
    ))
    .parse_next(input)?;

    cut_err(input, |input| {
        let open = token(Token::LeftBrace)
            .context(Context::Expected("`{`"))
            .parse_next(input)?;
        let properties = properties.parse_next(input)?;
        let close = token(Token::RightBrace)
            .context(Context::Expected("property or `}`"))
            .parse_next(input)?;
        Ok(MapDeclNode {
            keyword,
            open,
            properties,
            close,
        })
    })
}

enum Definition<'src> {
    Component(DefinedComponentNode<'src>),
    Layout(DefinedLayoutNode<'src>),
}

/// Parse `define Component "Name" { ... }` or `define Layout "name" { ... }`
fn definition<'src>(input: &mut Input<'src>) -> IResult<Definition<'src>> {
    let define = token(Token::Define).parse_next(input)?;

    cut_err(input, |input| {
        let kind = alt((token(Token::DefinedComponent), token(Token::DefinedLayout)))
            .context(Context::Expected("`Component` or `Layout`"))
            .parse_next(input)?;
        let name = string_literal
            .context(Context::Expected("definition name string"))
            .parse_next(input)?;
        let open = token(Token::LeftBrace)
            .context(Context::Expected("`{`"))
            .parse_next(input)?;

        if kind.token == Token::DefinedLayout {
            let layout = layout
                .context(Context::Expected("`layout`"))
                .parse_next(input)?;
            let close = token(Token::RightBrace)
                .context(Context::Expected("`}` (a layout definition holds exactly one layout)"))
                .parse_next(input)?;
            return Ok(Definition::Layout(DefinedLayoutNode {
                define,
                kind,
                name,
                open,
                layout,
                close,
            }));
        }

        let body = alt((
            layout.map(DefinedBodyNode::Layout),
            component.map(DefinedBodyNode::Component),
        ))
        .context(Context::Expected("`layout` or `component`"))
        .parse_next(input)?;
        let close = token(Token::RightBrace)
            .context(Context::Expected(
                "`}` (a component definition holds exactly one layout or component)",
            ))
            .parse_next(input)?;

        Ok(Definition::Component(DefinedComponentNode {
            define,
            kind,
            name,
            open,
            body,
            close,
        }))
    })
}

enum ProjectItem<'src> {
    Map(MapDeclNode<'src>),
    Definition(Definition<'src>),
    Screen(ScreenNode<'src>),
}

/// Parse the complete project
fn project<'src>(input: &mut Input<'src>) -> IResult<ProjectNode<'src>> {
    let keyword = token(Token::Project)
        .context(Context::Expected("`project`"))
        .parse_next(input)?;

    cut_err(input, |input| {
        let name = string_literal
            .context(Context::Expected("project name string"))
            .parse_next(input)?;
        let open = token(Token::LeftBrace)
            .context(Context::Expected("`{`"))
            .parse_next(input)?;

        let items: Vec<ProjectItem<'src>> = repeat(
            0..,
            alt((
                map_decl.map(ProjectItem::Map),
                definition.map(ProjectItem::Definition),
                screen.map(ProjectItem::Screen),
            )),
        )
        .parse_next(input)?;

        let close = token(Token::RightBrace)
            .context(Context::Expected(
                "`screen`, `define`, `style`, `mocks`, `colors` or `}`",
            ))
            .parse_next(input)?;

        // Nothing may follow the project block
        if input.eof_offset() != 0 {
            let mut e = ContextError::new();
            e.push(Context::Expected("end of input after the project block"));
            return Err(ErrMode::Cut(e));
        }

        let mut node = ProjectNode {
            keyword,
            name,
            open,
            close,
            styles: Vec::new(),
            mocks: Vec::new(),
            colors: Vec::new(),
            defined_components: Vec::new(),
            defined_layouts: Vec::new(),
            screens: Vec::new(),
        };
        for item in items {
            match item {
                ProjectItem::Map(decl) => match decl.keyword.token {
                    Token::Style => node.styles.push(decl),
                    Token::Mocks => node.mocks.push(decl),
                    _ => node.colors.push(decl),
                },
                ProjectItem::Definition(Definition::Component(def)) => {
                    node.defined_components.push(def)
                }
                ProjectItem::Definition(Definition::Layout(def)) => node.defined_layouts.push(def),
                ProjectItem::Screen(screen) => node.screens.push(screen),
            }
        }
        Ok(node)
    })
}

/// Convert a winnow error into a single parser diagnostic.
///
/// The diagnostic is anchored at the token the parser stopped on. When that
/// token is a closing brace the nearest preceding token is used instead,
/// since the mistake usually sits just before it.
fn convert_error(
    error: ErrMode<ContextError<Context>>,
    tokens: &[PositionedToken],
    current_remaining: usize,
) -> Diagnostic {
    let expected = match &error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e.context().find_map(|ctx| match ctx {
            Context::Expected(label) => Some(*label),
        }),
        ErrMode::Incomplete(_) => None,
    };
    let position = tokens.len() - current_remaining;

    let Some(offending) = tokens.get(position) else {
        let message = match expected {
            Some(label) => format!("unexpected end of input, expected {label}"),
            None => "unexpected end of input".to_string(),
        };
        let mut diag = Diagnostic::error(ErrorCode::ParserUnexpectedEof, message)
            .with_suggestion("check for a missing closing `}`");
        if let Some(last) = tokens.last() {
            diag = diag.with_range(last.range);
        }
        return diag;
    };

    let anchor = match (offending.token, position.checked_sub(1)) {
        (Token::RightBrace, Some(previous)) => &tokens[previous],
        _ => offending,
    };
    let message = match expected {
        Some(label) => format!("unexpected `{offending}`, expected {label}"),
        None => format!("unexpected `{offending}`"),
    };

    Diagnostic::error(ErrorCode::ParserUnexpectedToken, message)
        .with_range(anchor.range)
        .with_suggestion("check the syntax near this token")
}

/// Reject input whose blocks nest deeper than [`MAX_NESTING_DEPTH`],
/// anchored at the first brace past the limit.
fn check_nesting(tokens: &[PositionedToken<'_>]) -> Result<(), Diagnostic> {
    let mut depth = 0usize;
    for token in tokens {
        match token.token {
            Token::LeftBrace => {
                depth += 1;
                if depth > MAX_NESTING_DEPTH {
                    return Err(Diagnostic::error(
                        ErrorCode::ParserNestingTooDeep,
                        format!("blocks are nested more than {MAX_NESTING_DEPTH} levels deep"),
                    )
                    .with_range(token.range)
                    .with_suggestion("flatten the layout or move part of it into a `define Layout`"));
                }
            }
            Token::RightBrace => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

/// Build the concrete syntax tree for a project from tokens.
pub(crate) fn build_project<'src>(
    tokens: &'src [PositionedToken<'src>],
) -> Result<ProjectNode<'src>, Diagnostic> {
    check_nesting(tokens)?;

    let mut token_slice = TokenSlice::new(tokens);

    match project.parse_next(&mut token_slice) {
        Ok(node) => {
            trace!(screens = node.screens.len(); "Built project CST");
            Ok(node)
        }
        Err(e) => {
            let current_remaining = token_slice.eof_offset();
            Err(convert_error(e, tokens, current_remaining))
        }
    }
}

/// Diagnostic for a project that declares no screen.
pub(crate) fn missing_screen(node: &ProjectNode<'_>) -> Diagnostic {
    Diagnostic::error(
        ErrorCode::ParserMissingScreen,
        format!("project {} declares no screen", node.name.text()),
    )
    .with_range(node.keyword.range.union(node.name.range))
    .with_suggestion("add `screen Main { layout stack { } }` inside the project")
}
