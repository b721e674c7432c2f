//! Domain entities.

use serde_json::{Map, Value};

use super::{error::ValueObjectError, value_object::ScreenNumber};

/// One content item assigned to a screen.
///
/// The item's own fields (title, url, ...) belong to the catalog and are
/// passed through untouched. `screen` is `None` when the item applies to
/// every screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Demo {
    pub fields: Map<String, Value>,
    pub screen: Option<ScreenNumber>,
}

impl Demo {
    pub fn new(fields: Map<String, Value>, screen: Option<ScreenNumber>) -> Self {
        Self { fields, screen }
    }

    /// Title of the item, if the catalog gave it one.
    pub fn title(&self) -> Option<&str> {
        self.fields.get("title").and_then(Value::as_str)
    }

    /// Whether this item is meant for `screen`.
    pub fn applies_to(&self, screen: ScreenNumber) -> bool {
        self.screen.is_none_or(|target| target == screen)
    }
}

/// A broadcast selection: a named content set plus its screen assignments.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub name: String,
    pub demos: Vec<Demo>,
}

impl Selection {
    pub fn new(name: String, demos: Vec<Demo>) -> Self {
        Self { name, demos }
    }

    /// Items routed to `screen`: every unset-target item plus the items
    /// targeted at `screen`, in selection order. Overlaps are kept.
    pub fn for_screen(&self, screen: ScreenNumber) -> Vec<Demo> {
        self.demos
            .iter()
            .filter(|demo| demo.applies_to(screen))
            .cloned()
            .collect()
    }
}

/// The preset/demo catalog document.
///
/// Opaque to the core apart from `presetOrder`, which is derived from the
/// preset keys when the document does not carry one.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog(Value);

impl Catalog {
    /// An empty catalog: no presets, no demos.
    pub fn empty() -> Self {
        let mut document = Map::new();
        document.insert("presets".to_string(), Value::Object(Map::new()));
        document.insert("demos".to_string(), Value::Object(Map::new()));
        document.insert("presetOrder".to_string(), Value::Array(Vec::new()));
        Self(Value::Object(document))
    }

    pub fn from_value(value: Value) -> Result<Self, ValueObjectError> {
        let Value::Object(mut document) = value else {
            return Err(ValueObjectError::CatalogNotObject);
        };

        if !document.get("presetOrder").is_some_and(Value::is_array) {
            let order: Vec<Value> = document
                .get("presets")
                .and_then(Value::as_object)
                .map(|presets| presets.keys().cloned().map(Value::String).collect())
                .unwrap_or_default();
            document.insert("presetOrder".to_string(), Value::Array(order));
        }

        Ok(Self(Value::Object(document)))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}
