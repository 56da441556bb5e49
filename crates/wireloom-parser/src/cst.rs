//! Concrete syntax tree.
//!
//! Nodes mirror the grammar rules and hold references to the tokens they
//! consumed. Containers keep every child kind in its own collection, the
//! way a rule-keyed grammar engine groups matches; true source order is
//! recovered during lowering from token offsets.
//!
//! The CST never leaves the crate.

use crate::{span::CodeRange, tokens::PositionedToken};

pub(crate) type Tok<'src> = &'src PositionedToken<'src>;

/// `project "Name" { ... }`
#[derive(Debug)]
pub(crate) struct ProjectNode<'src> {
    pub keyword: Tok<'src>,
    pub name: Tok<'src>,
    pub open: Tok<'src>,
    pub close: Tok<'src>,
    pub styles: Vec<MapDeclNode<'src>>,
    pub mocks: Vec<MapDeclNode<'src>>,
    pub colors: Vec<MapDeclNode<'src>>,
    pub defined_components: Vec<DefinedComponentNode<'src>>,
    pub defined_layouts: Vec<DefinedLayoutNode<'src>>,
    pub screens: Vec<ScreenNode<'src>>,
}

/// `style { ... }`, `mocks { ... }` or `colors { ... }`
#[derive(Debug)]
pub(crate) struct MapDeclNode<'src> {
    pub keyword: Tok<'src>,
    pub open: Tok<'src>,
    pub properties: Vec<PropertyNode<'src>>,
    pub close: Tok<'src>,
}

/// `define Component "Name" { layout ... | component ... }`
#[derive(Debug)]
pub(crate) struct DefinedComponentNode<'src> {
    pub define: Tok<'src>,
    pub kind: Tok<'src>,
    pub name: Tok<'src>,
    pub open: Tok<'src>,
    pub body: DefinedBodyNode<'src>,
    pub close: Tok<'src>,
}

/// The single node inside a component definition.
#[derive(Debug)]
pub(crate) enum DefinedBodyNode<'src> {
    Layout(LayoutNode<'src>),
    Component(ComponentNode<'src>),
}

/// `define Layout "name" { layout ... }`
#[derive(Debug)]
pub(crate) struct DefinedLayoutNode<'src> {
    pub define: Tok<'src>,
    pub kind: Tok<'src>,
    pub name: Tok<'src>,
    pub open: Tok<'src>,
    pub layout: LayoutNode<'src>,
    pub close: Tok<'src>,
}

/// `screen Name (params)? { layout ... }`
#[derive(Debug)]
pub(crate) struct ScreenNode<'src> {
    pub keyword: Tok<'src>,
    pub name: Tok<'src>,
    pub params: Option<ParamListNode<'src>>,
    pub open: Tok<'src>,
    pub layout: LayoutNode<'src>,
    pub close: Tok<'src>,
}

/// `layout type (params)? { ... }`
#[derive(Debug)]
pub(crate) struct LayoutNode<'src> {
    pub keyword: Tok<'src>,
    pub kind: Tok<'src>,
    pub params: Option<ParamListNode<'src>>,
    pub open: Tok<'src>,
    pub components: Vec<ComponentNode<'src>>,
    pub layouts: Vec<LayoutNode<'src>>,
    pub cells: Vec<CellNode<'src>>,
    pub close: Tok<'src>,
}

/// `cell prop: value ... { ... }`
#[derive(Debug)]
pub(crate) struct CellNode<'src> {
    pub keyword: Tok<'src>,
    pub properties: Vec<PropertyNode<'src>>,
    pub open: Tok<'src>,
    pub components: Vec<ComponentNode<'src>>,
    pub layouts: Vec<LayoutNode<'src>>,
    pub close: Tok<'src>,
}

/// `component Type prop: value ...`
#[derive(Debug)]
pub(crate) struct ComponentNode<'src> {
    pub keyword: Tok<'src>,
    pub kind: Tok<'src>,
    pub properties: Vec<PropertyNode<'src>>,
}

/// `name: value`
#[derive(Debug)]
pub(crate) struct PropertyNode<'src> {
    pub name: Tok<'src>,
    pub value: Tok<'src>,
}

impl PropertyNode<'_> {
    pub fn range(&self) -> CodeRange {
        self.name.range.union(self.value.range)
    }
}

/// `( prop: value, ... )`
#[derive(Debug)]
pub(crate) struct ParamListNode<'src> {
    pub open: Tok<'src>,
    pub properties: Vec<PropertyNode<'src>>,
    pub close: Tok<'src>,
}

impl LayoutNode<'_> {
    /// Byte offset of the first token, used to restore source order.
    pub fn start_offset(&self) -> usize {
        self.keyword.span.start()
    }
}

impl ComponentNode<'_> {
    pub fn start_offset(&self) -> usize {
        self.keyword.span.start()
    }
}

impl CellNode<'_> {
    pub fn start_offset(&self) -> usize {
        self.keyword.span.start()
    }
}
