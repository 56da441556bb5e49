//! Validation rules derived from the component registry.
//!
//! The registry describes every built-in type declaratively. Checking a use
//! site needs the same information grouped differently (which names are
//! allowed, which must be supplied, which are enums or booleans), so the
//! registry is folded into [`TypeRules`] once per process.

use std::{
    collections::{HashMap, HashSet},
    sync::OnceLock,
};

use log::debug;

use wireloom_core::{
    ast::PropertyValue,
    registry::{PropertyKind, PropertySpec, registry},
};

static RULES: OnceLock<Rules> = OnceLock::new();

/// Checks that apply to one component type, layout type or to cells.
#[derive(Debug, Default)]
pub(crate) struct TypeRules {
    /// Accepted property names, in registry order.
    pub allowed: Vec<&'static str>,
    /// Properties that must be written at every use site.
    pub required: Vec<&'static str>,
    pub enums: HashMap<&'static str, &'static [&'static str]>,
    pub booleans: HashSet<&'static str>,
    /// Sizing properties and the width used when their value is unusable.
    pub sizes: Vec<(&'static str, f64)>,
}

impl TypeRules {
    fn from_properties(properties: &[PropertySpec]) -> Self {
        let mut rules = TypeRules::default();
        for property in properties {
            rules.allowed.push(property.name);
            if property.must_be_supplied() {
                rules.required.push(property.name);
            }
            match property.kind {
                PropertyKind::Enum(values) => {
                    rules.enums.insert(property.name, values);
                }
                PropertyKind::Boolean => {
                    rules.booleans.insert(property.name);
                }
                PropertyKind::Size { fallback } => rules.sizes.push((property.name, fallback)),
                PropertyKind::String | PropertyKind::Number => {}
            }
        }
        rules
    }

    pub fn allows(&self, name: &str) -> bool {
        self.allowed.iter().any(|allowed| *allowed == name)
    }

    /// Comma separated list of accepted names, for messages.
    pub fn allowed_list(&self) -> String {
        if self.allowed.is_empty() {
            "none".to_string()
        } else {
            self.allowed.join(", ")
        }
    }
}

#[derive(Debug)]
pub(crate) struct Rules {
    components: HashMap<&'static str, TypeRules>,
    layouts: HashMap<&'static str, TypeRules>,
    cell: TypeRules,
}

impl Rules {
    pub fn component(&self, name: &str) -> Option<&TypeRules> {
        self.components.get(name)
    }

    pub fn layout(&self, name: &str) -> Option<&TypeRules> {
        self.layouts.get(name)
    }

    pub fn cell(&self) -> &TypeRules {
        &self.cell
    }
}

/// The shared rule set, derived on first use.
pub(crate) fn rules() -> &'static Rules {
    RULES.get_or_init(|| {
        let registry = registry();
        let rules = Rules {
            components: registry
                .components()
                .map(|spec| (spec.name, TypeRules::from_properties(&spec.properties)))
                .collect(),
            layouts: registry
                .layouts()
                .map(|spec| (spec.name, TypeRules::from_properties(&spec.properties)))
                .collect(),
            cell: TypeRules::from_properties(registry.cell_properties()),
        };
        debug!(
            components = rules.components.len(),
            layouts = rules.layouts.len();
            "Derived validation rules"
        );
        rules
    })
}

/// Accepts `"true"`, `"false"`, `0` and `1`.
pub(crate) fn is_boolean_like(value: &PropertyValue) -> bool {
    match value {
        PropertyValue::String(s) => s == "true" || s == "false",
        PropertyValue::Number(n) => *n == 0.0 || *n == 1.0,
    }
}
