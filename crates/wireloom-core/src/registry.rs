//! Built-in component and layout metadata.
//!
//! The registry is the declarative source of truth the semantic validator
//! derives its rules from. It is built once per process and is read-only
//! afterwards, so it can be shared freely between concurrent parses.

use std::sync::OnceLock;

use indexmap::IndexMap;
use log::debug;

/// Reserved component type marking where a defined layout's invocation body
/// is substituted.
pub const CHILDREN_SLOT: &str = "Children";

const SPACING: &[&str] = &["none", "xs", "sm", "md", "lg", "xl"];
const SIZES: &[&str] = &["sm", "md", "lg"];
const BUTTON_VARIANTS: &[&str] = &["default", "primary", "secondary", "ghost", "danger"];
const TONES: &[&str] = &["default", "primary", "success", "warning", "danger", "info"];
const ALIGNMENTS: &[&str] = &["start", "center", "end"];

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// The value shape a property accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyKind {
    String,
    Number,
    /// Boolean-like literal: `"true"`, `"false"`, `0` or `1`.
    Boolean,
    /// Closed set of accepted string values.
    Enum(&'static [&'static str]),
    /// Numeric size that must be positive; non-positive values fall back to
    /// the given width.
    Size { fallback: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertySpec {
    pub name: &'static str,
    pub kind: PropertyKind,
    pub required: bool,
    pub default: Option<&'static str>,
}

impl PropertySpec {
    const fn new(name: &'static str, kind: PropertyKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: None,
        }
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    /// A property must be written at a use site when it is required and
    /// the registry supplies no default for it.
    pub fn must_be_supplied(&self) -> bool {
        self.required && self.default.is_none()
    }
}

/// Metadata for one built-in component or layout type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub properties: Vec<PropertySpec>,
}

impl TypeSpec {
    pub fn property(&self, name: &str) -> Option<&PropertySpec> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Process-wide registry of built-in components, layouts and cell properties.
#[derive(Debug)]
pub struct Registry {
    components: IndexMap<&'static str, TypeSpec>,
    layouts: IndexMap<&'static str, TypeSpec>,
    cell_properties: Vec<PropertySpec>,
}

impl Registry {
    pub fn component(&self, name: &str) -> Option<&TypeSpec> {
        self.components.get(name)
    }

    pub fn layout(&self, name: &str) -> Option<&TypeSpec> {
        self.layouts.get(name)
    }

    /// Built-in components in registration order.
    pub fn components(&self) -> impl Iterator<Item = &TypeSpec> {
        self.components.values()
    }

    /// Built-in layouts in registration order.
    pub fn layouts(&self) -> impl Iterator<Item = &TypeSpec> {
        self.layouts.values()
    }

    pub fn cell_properties(&self) -> &[PropertySpec] {
        &self.cell_properties
    }
}

/// Returns the shared registry, building it on first use.
pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(build_registry)
}

fn build_registry() -> Registry {
    use PropertyKind::*;

    let text = || PropertySpec::new("text", String).required();
    let label = || PropertySpec::new("label", String);
    let disabled = || PropertySpec::new("disabled", Boolean).with_default("false");

    let components = [
        spec(
            "Heading",
            "Section or page title",
            vec![
                text(),
                PropertySpec::new("level", Number).with_default("1"),
            ],
        ),
        spec(
            "Text",
            "Paragraph of body copy",
            vec![
                text(),
                PropertySpec::new("variant", Enum(&["default", "muted", "small", "lead"]))
                    .with_default("default"),
            ],
        ),
        spec("Label", "Inline form label", vec![text()]),
        spec(
            "Button",
            "Clickable action",
            vec![
                text(),
                PropertySpec::new("variant", Enum(BUTTON_VARIANTS)).with_default("default"),
                PropertySpec::new("size", Enum(SIZES)).with_default("md"),
                PropertySpec::new("icon", String),
                disabled(),
            ],
        ),
        spec(
            "IconButton",
            "Button showing only an icon",
            vec![
                PropertySpec::new("icon", String).required(),
                PropertySpec::new("variant", Enum(BUTTON_VARIANTS)).with_default("default"),
                PropertySpec::new("size", Enum(SIZES)).with_default("md"),
                disabled(),
            ],
        ),
        spec(
            "Link",
            "Inline navigation link",
            vec![
                text(),
                PropertySpec::new("variant", Enum(&["default", "primary", "muted"]))
                    .with_default("default"),
            ],
        ),
        spec(
            "Input",
            "Single-line text field",
            vec![
                label(),
                PropertySpec::new("placeholder", String),
                PropertySpec::new(
                    "type",
                    Enum(&[
                        "text", "email", "password", "number", "search", "tel", "url", "date",
                    ]),
                )
                .with_default("text"),
                PropertySpec::new("required", Boolean).with_default("false"),
                disabled(),
            ],
        ),
        spec(
            "Textarea",
            "Multi-line text field",
            vec![
                label(),
                PropertySpec::new("placeholder", String),
                PropertySpec::new("rows", Number).with_default("3"),
                disabled(),
            ],
        ),
        spec(
            "Select",
            "Dropdown picker",
            vec![
                label(),
                PropertySpec::new("placeholder", String),
                PropertySpec::new("items", String),
                disabled(),
            ],
        ),
        spec(
            "Checkbox",
            "Labelled checkbox",
            vec![
                label().required(),
                PropertySpec::new("checked", Boolean).with_default("false"),
                disabled(),
            ],
        ),
        spec(
            "Radio",
            "Labelled radio option",
            vec![
                label().required(),
                PropertySpec::new("group", String),
                PropertySpec::new("checked", Boolean).with_default("false"),
                disabled(),
            ],
        ),
        spec(
            "Toggle",
            "On/off switch",
            vec![
                label(),
                PropertySpec::new("enabled", Boolean).with_default("false"),
                disabled(),
            ],
        ),
        spec(
            "Image",
            "Image placeholder",
            vec![
                PropertySpec::new(
                    "placeholder",
                    Enum(&["landscape", "portrait", "square", "avatar", "icon"]),
                )
                .with_default("landscape"),
                PropertySpec::new("height", Number),
            ],
        ),
        spec(
            "Icon",
            "Standalone icon",
            vec![
                PropertySpec::new("type", String).required(),
                PropertySpec::new("size", Enum(SIZES)).with_default("md"),
            ],
        ),
        spec(
            "Badge",
            "Small status pill",
            vec![
                text(),
                PropertySpec::new("variant", Enum(TONES)).with_default("default"),
            ],
        ),
        spec(
            "Alert",
            "Inline notice",
            vec![
                text(),
                PropertySpec::new("title", String),
                PropertySpec::new("variant", Enum(&["info", "success", "warning", "danger"]))
                    .with_default("info"),
            ],
        ),
        spec(
            "Topbar",
            "Application header bar",
            vec![
                PropertySpec::new("title", String).required(),
                PropertySpec::new("subtitle", String),
                PropertySpec::new("actions", String),
                PropertySpec::new("user", String),
            ],
        ),
        spec(
            "SidebarMenu",
            "Vertical navigation menu",
            vec![
                PropertySpec::new("items", String).required(),
                PropertySpec::new("active", Number).with_default("0"),
            ],
        ),
        spec(
            "Breadcrumbs",
            "Navigation trail",
            vec![PropertySpec::new("items", String).required()],
        ),
        spec(
            "Tabs",
            "Tab strip",
            vec![
                PropertySpec::new("items", String).required(),
                PropertySpec::new("active", Number).with_default("0"),
            ],
        ),
        spec(
            "Table",
            "Data table",
            vec![
                PropertySpec::new("title", String),
                PropertySpec::new("mock", String),
                PropertySpec::new("rows", Number).with_default("5"),
                PropertySpec::new("actions", String),
                PropertySpec::new("pagination", Boolean).with_default("false"),
            ],
        ),
        spec(
            "List",
            "Simple list of items",
            vec![
                PropertySpec::new("title", String),
                PropertySpec::new("items", String),
                PropertySpec::new("mock", String),
                PropertySpec::new("rows", Number).with_default("5"),
            ],
        ),
        spec(
            "StatCard",
            "Metric summary card",
            vec![
                PropertySpec::new("title", String).required(),
                PropertySpec::new("value", String).required(),
                PropertySpec::new("caption", String),
                PropertySpec::new("icon", String),
            ],
        ),
        spec(
            "Chart",
            "Chart placeholder",
            vec![
                PropertySpec::new("type", Enum(&["bar", "line", "pie", "area"])).with_default("bar"),
                PropertySpec::new("height", Number),
            ],
        ),
        spec(
            "Modal",
            "Dialog overlay",
            vec![
                PropertySpec::new("title", String).required(),
                PropertySpec::new("visible", Boolean).with_default("true"),
            ],
        ),
        spec(
            "Code",
            "Monospaced code block",
            vec![PropertySpec::new("code", String).required()],
        ),
        spec(
            "Spinner",
            "Loading indicator",
            vec![PropertySpec::new("size", Enum(SIZES)).with_default("md")],
        ),
        spec("Divider", "Horizontal rule", Vec::new()),
    ];

    let layouts = [
        spec(
            "stack",
            "Children laid out along one axis",
            vec![
                PropertySpec::new("direction", Enum(&["vertical", "horizontal"]))
                    .with_default("vertical"),
                PropertySpec::new("gap", Enum(SPACING)).with_default("md"),
                PropertySpec::new("padding", Enum(SPACING)).with_default("none"),
                PropertySpec::new("align", Enum(&["start", "center", "end", "justify"]))
                    .with_default("start"),
            ],
        ),
        spec(
            "grid",
            "Twelve-column grid of cells",
            vec![
                PropertySpec::new("columns", Number),
                PropertySpec::new("gap", Enum(SPACING)).with_default("md"),
            ],
        ),
        spec(
            "split",
            "Fixed side panel next to a flexible one",
            vec![
                PropertySpec::new("left", Size { fallback: 250.0 }),
                PropertySpec::new("right", Size { fallback: 250.0 }),
                PropertySpec::new("sidebar", Size { fallback: 250.0 }),
                PropertySpec::new("gap", Enum(SPACING)).with_default("none"),
                PropertySpec::new("border", Boolean).with_default("false"),
            ],
        ),
        spec(
            "panel",
            "Padded region with a background",
            vec![
                PropertySpec::new("padding", Enum(SPACING)).with_default("md"),
                PropertySpec::new("background", String),
            ],
        ),
        spec(
            "card",
            "Bordered, rounded container",
            vec![
                PropertySpec::new("padding", Enum(SPACING)).with_default("md"),
                PropertySpec::new("gap", Enum(SPACING)).with_default("md"),
                PropertySpec::new("radius", Enum(&["none", "sm", "md", "lg"])).with_default("md"),
                PropertySpec::new("border", Boolean).with_default("true"),
            ],
        ),
    ];

    debug!(
        components = components.len(),
        layouts = layouts.len();
        "Building component registry"
    );

    Registry {
        components: components.into_iter().map(|s| (s.name, s)).collect(),
        layouts: layouts.into_iter().map(|s| (s.name, s)).collect(),
        cell_properties: vec![
            PropertySpec::new("span", Number).with_default("1"),
            PropertySpec::new("align", Enum(ALIGNMENTS)).with_default("start"),
        ],
    }
}

fn spec(name: &'static str, description: &'static str, properties: Vec<PropertySpec>) -> TypeSpec {
    TypeSpec {
        name,
        description,
        properties,
    }
}
