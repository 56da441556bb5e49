//! Error codes for the Wireloom diagnostic system.
//!
//! Codes are machine-stable strings consumed by editor tooling. Their meaning
//! must never change; new codes may be added.
//!
//! Codes are grouped by phase:
//! - `LEXER_*` - Lexer errors
//! - `PARSER_*` - Parser errors
//! - everything else - Semantic checks

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::Phase;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer
    // =========================================================================
    /// One or more characters that start no valid token.
    LexerUnexpectedCharacter,

    /// A string was opened with a quote but never closed on the same line.
    LexerUnterminatedString,

    /// A `/*` block comment with no closing `*/`.
    LexerUnterminatedComment,

    // =========================================================================
    // Parser
    // =========================================================================
    /// The parser encountered a token it did not expect at this position.
    ParserUnexpectedToken,

    /// The input ended before a complete construct was parsed.
    ParserUnexpectedEof,

    /// The project declares no screen.
    ParserMissingScreen,

    /// Blocks nested deeper than the parser accepts.
    ParserNestingTooDeep,

    // =========================================================================
    // Semantic: registry checks
    // =========================================================================
    /// Component type is neither built in nor locally defined.
    ComponentUnknownType,

    /// Layout type is neither built in nor locally defined.
    LayoutUnknownType,

    /// A component omits one or more required properties.
    ComponentMissingRequiredProperty,

    /// A component sets a property its type does not accept.
    ComponentUnknownProperty,

    /// A layout sets a parameter its type does not accept.
    LayoutUnknownParameter,

    /// A cell sets a property cells do not accept.
    CellUnknownProperty,

    /// Component property value outside its closed set.
    ComponentInvalidEnumValue,

    /// Layout parameter value outside its closed set.
    LayoutInvalidEnumValue,

    /// Cell property value outside its closed set.
    CellInvalidEnumValue,

    /// Component property expects a boolean-like literal.
    ComponentInvalidBooleanValue,

    /// Layout parameter expects a boolean-like literal.
    LayoutInvalidBooleanValue,

    // =========================================================================
    // Semantic: layout rules
    // =========================================================================
    /// A `grid` layout without a `columns` parameter.
    LayoutGridMissingColumns,

    /// A `grid` column count outside `1..=12`.
    LayoutGridColumnsOutOfRange,

    /// A sizing parameter that is not a positive number.
    LayoutInvalidSize,

    /// A layout with no children.
    LayoutEmpty,

    /// A `split` layout with neither `left` nor `right`.
    LayoutSplitMissingSide,

    /// A `split` layout with both `left` and `right`.
    LayoutSplitSideConflict,

    /// A `split` layout using the removed `sidebar` parameter.
    LayoutSplitDeprecatedSidebar,

    /// A `split` layout without exactly two children.
    LayoutSplitChildrenCount,

    // =========================================================================
    // Semantic: definitions
    // =========================================================================
    /// A defined-layout invocation without exactly one child.
    DefinedLayoutChildrenCount,

    /// The `Children` placeholder used outside a layout definition.
    ChildrenSlotOutsideLayoutDefinition,

    /// A layout definition with no `Children` placeholder.
    LayoutDefinitionMissingChildrenSlot,

    /// A layout definition with more than one `Children` placeholder.
    LayoutDefinitionMultipleChildrenSlots,

    /// A defined layout whose name does not start with a lowercase letter.
    LayoutDefinitionInvalidName,

    /// A defined component whose name is not capitalised.
    ComponentDefinitionNameNotPascalCase,

    /// Two definitions share one name.
    DefinitionDuplicateName,

    /// User-defined components or layouts reference each other in a loop.
    DefinitionCycle,
}

impl ErrorCode {
    /// Returns the wire-stable code string (e.g. `"LAYOUT_EMPTY"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexer
            ErrorCode::LexerUnexpectedCharacter => "LEXER_UNEXPECTED_CHARACTER",
            ErrorCode::LexerUnterminatedString => "LEXER_UNTERMINATED_STRING",
            ErrorCode::LexerUnterminatedComment => "LEXER_UNTERMINATED_COMMENT",
            // Parser
            ErrorCode::ParserUnexpectedToken => "PARSER_UNEXPECTED_TOKEN",
            ErrorCode::ParserUnexpectedEof => "PARSER_UNEXPECTED_EOF",
            ErrorCode::ParserMissingScreen => "PARSER_MISSING_SCREEN",
            ErrorCode::ParserNestingTooDeep => "PARSER_NESTING_TOO_DEEP",
            // Registry checks
            ErrorCode::ComponentUnknownType => "COMPONENT_UNKNOWN_TYPE",
            ErrorCode::LayoutUnknownType => "LAYOUT_UNKNOWN_TYPE",
            ErrorCode::ComponentMissingRequiredProperty => "COMPONENT_MISSING_REQUIRED_PROPERTY",
            ErrorCode::ComponentUnknownProperty => "COMPONENT_UNKNOWN_PROPERTY",
            ErrorCode::LayoutUnknownParameter => "LAYOUT_UNKNOWN_PARAMETER",
            ErrorCode::CellUnknownProperty => "CELL_UNKNOWN_PROPERTY",
            ErrorCode::ComponentInvalidEnumValue => "COMPONENT_INVALID_ENUM_VALUE",
            ErrorCode::LayoutInvalidEnumValue => "LAYOUT_INVALID_ENUM_VALUE",
            ErrorCode::CellInvalidEnumValue => "CELL_INVALID_ENUM_VALUE",
            ErrorCode::ComponentInvalidBooleanValue => "COMPONENT_INVALID_BOOLEAN_VALUE",
            ErrorCode::LayoutInvalidBooleanValue => "LAYOUT_INVALID_BOOLEAN_VALUE",
            // Layout rules
            ErrorCode::LayoutGridMissingColumns => "LAYOUT_GRID_MISSING_COLUMNS",
            ErrorCode::LayoutGridColumnsOutOfRange => "LAYOUT_GRID_COLUMNS_OUT_OF_RANGE",
            ErrorCode::LayoutInvalidSize => "LAYOUT_INVALID_SIZE",
            ErrorCode::LayoutEmpty => "LAYOUT_EMPTY",
            ErrorCode::LayoutSplitMissingSide => "LAYOUT_SPLIT_MISSING_SIDE",
            ErrorCode::LayoutSplitSideConflict => "LAYOUT_SPLIT_SIDE_CONFLICT",
            ErrorCode::LayoutSplitDeprecatedSidebar => "LAYOUT_SPLIT_DEPRECATED_SIDEBAR",
            ErrorCode::LayoutSplitChildrenCount => "LAYOUT_SPLIT_CHILDREN_COUNT",
            // Definitions
            ErrorCode::DefinedLayoutChildrenCount => "DEFINED_LAYOUT_CHILDREN_COUNT",
            ErrorCode::ChildrenSlotOutsideLayoutDefinition => {
                "CHILDREN_SLOT_OUTSIDE_LAYOUT_DEFINITION"
            }
            ErrorCode::LayoutDefinitionMissingChildrenSlot => {
                "LAYOUT_DEFINITION_MISSING_CHILDREN_SLOT"
            }
            ErrorCode::LayoutDefinitionMultipleChildrenSlots => {
                "LAYOUT_DEFINITION_MULTIPLE_CHILDREN_SLOTS"
            }
            ErrorCode::LayoutDefinitionInvalidName => "LAYOUT_DEFINITION_INVALID_NAME",
            ErrorCode::ComponentDefinitionNameNotPascalCase => {
                "COMPONENT_DEFINITION_NAME_NOT_PASCAL_CASE"
            }
            ErrorCode::DefinitionDuplicateName => "DEFINITION_DUPLICATE_NAME",
            ErrorCode::DefinitionCycle => "DEFINITION_CYCLE",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::LexerUnexpectedCharacter => "unexpected character",
            ErrorCode::LexerUnterminatedString => "unterminated string literal",
            ErrorCode::LexerUnterminatedComment => "unterminated block comment",
            ErrorCode::ParserUnexpectedToken => "unexpected token",
            ErrorCode::ParserUnexpectedEof => "unexpected end of input",
            ErrorCode::ParserMissingScreen => "project has no screen",
            ErrorCode::ParserNestingTooDeep => "nesting too deep",
            ErrorCode::ComponentUnknownType => "unknown component type",
            ErrorCode::LayoutUnknownType => "unknown layout type",
            ErrorCode::ComponentMissingRequiredProperty => "missing required property",
            ErrorCode::ComponentUnknownProperty => "unknown property",
            ErrorCode::LayoutUnknownParameter => "unknown parameter",
            ErrorCode::CellUnknownProperty => "unknown cell property",
            ErrorCode::ComponentInvalidEnumValue
            | ErrorCode::LayoutInvalidEnumValue
            | ErrorCode::CellInvalidEnumValue => "value not in the accepted set",
            ErrorCode::ComponentInvalidBooleanValue | ErrorCode::LayoutInvalidBooleanValue => {
                "expected a boolean"
            }
            ErrorCode::LayoutGridMissingColumns => "grid without columns",
            ErrorCode::LayoutGridColumnsOutOfRange => "grid columns out of range",
            ErrorCode::LayoutInvalidSize => "non-positive size",
            ErrorCode::LayoutEmpty => "empty layout",
            ErrorCode::LayoutSplitMissingSide => "split without a side",
            ErrorCode::LayoutSplitSideConflict => "split with both sides",
            ErrorCode::LayoutSplitDeprecatedSidebar => "deprecated sidebar parameter",
            ErrorCode::LayoutSplitChildrenCount => "split needs two children",
            ErrorCode::DefinedLayoutChildrenCount => "defined layout needs one child",
            ErrorCode::ChildrenSlotOutsideLayoutDefinition => "children slot outside definition",
            ErrorCode::LayoutDefinitionMissingChildrenSlot => "missing children slot",
            ErrorCode::LayoutDefinitionMultipleChildrenSlots => "multiple children slots",
            ErrorCode::LayoutDefinitionInvalidName => "invalid layout name",
            ErrorCode::ComponentDefinitionNameNotPascalCase => "component name not capitalised",
            ErrorCode::DefinitionDuplicateName => "duplicate definition",
            ErrorCode::DefinitionCycle => "circular definition",
        }
    }

    /// Returns the pipeline phase that emits this code.
    pub fn phase(&self) -> Phase {
        match self {
            ErrorCode::LexerUnexpectedCharacter
            | ErrorCode::LexerUnterminatedString
            | ErrorCode::LexerUnterminatedComment => Phase::Lexer,
            ErrorCode::ParserUnexpectedToken
            | ErrorCode::ParserUnexpectedEof
            | ErrorCode::ParserMissingScreen
            | ErrorCode::ParserNestingTooDeep => Phase::Parser,
            _ => Phase::Semantic,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(
            ErrorCode::LexerUnexpectedCharacter.to_string(),
            "LEXER_UNEXPECTED_CHARACTER"
        );
        assert_eq!(
            ErrorCode::ChildrenSlotOutsideLayoutDefinition.to_string(),
            "CHILDREN_SLOT_OUTSIDE_LAYOUT_DEFINITION"
        );
    }

    #[test]
    fn test_error_code_phase() {
        assert_eq!(ErrorCode::LexerUnterminatedString.phase(), Phase::Lexer);
        assert_eq!(ErrorCode::ParserMissingScreen.phase(), Phase::Parser);
        assert_eq!(ErrorCode::ParserNestingTooDeep.phase(), Phase::Parser);
        assert_eq!(ErrorCode::DefinitionCycle.phase(), Phase::Semantic);
        assert_eq!(ErrorCode::LayoutEmpty.phase(), Phase::Semantic);
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::LayoutEmpty.description(), "empty layout");
        assert_eq!(
            ErrorCode::DefinitionDuplicateName.description(),
            "duplicate definition"
        );
    }
}
