//! Menu item data model.
//!
//! An item is a typed record for the fields the rendering pipeline depends
//! on (`title`, `url`, `route`, `name`, `order`, `visible`, `attributes`)
//! plus an open `extra` map for arbitrary additional properties. Item kind
//! (plain link, dropdown, header, divider) is structural: derived from the
//! `name` marker and the presence of children, never from a type tag.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MenuError, MenuResult};
use crate::presenter::html_escape;

use super::visibility::Visibility;

/// A named route: a path pattern with `:param` segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Path pattern (e.g., "/blog/:slug").
    pub name: String,
    /// Values substituted into `:param` segments.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl Route {
    pub fn new<K, V, I>(name: impl Into<String>, params: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            name: name.into(),
            params: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Build the destination path by substituting `:param` segments.
    ///
    /// Segments without a matching param are left as-is.
    pub fn href(&self) -> String {
        self.name
            .split('/')
            .map(|segment| match segment.strip_prefix(':') {
                Some(param) => self
                    .params
                    .get(param)
                    .cloned()
                    .unwrap_or_else(|| segment.to_string()),
                None => segment.to_string(),
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// HTML-attribute map with deterministic iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, String>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render as an HTML attribute string with a leading space per entry.
    pub fn to_html(&self) -> String {
        self.0
            .iter()
            .map(|(key, value)| format!(" {key}=\"{}\"", html_escape(value)))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A node in a menu tree.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MenuItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,

    /// Kind marker; `"divider"` and `"header"` are special.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Sort weight (lower = higher priority).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,

    pub visible: Visibility,

    #[serde(skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,

    /// Open extension properties, flattened alongside the typed fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this item renders as a dropdown (has children).
    pub fn has_submenu(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_header(&self) -> bool {
        self.name.as_deref() == Some("header")
    }

    pub fn is_divider(&self) -> bool {
        self.name.as_deref() == Some("divider")
    }

    /// Structural kind label, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        if self.has_submenu() {
            "dropdown"
        } else if self.is_header() {
            "header"
        } else if self.is_divider() {
            "divider"
        } else {
            "link"
        }
    }

    /// Link destination: the explicit url, or the route pattern with params
    /// substituted.
    pub fn href(&self) -> Option<String> {
        self.url
            .clone()
            .or_else(|| self.route.as_ref().map(Route::href))
    }

    /// The item's value properties as a mapping.
    ///
    /// The `visible` predicate and the child list are structural rather
    /// than value properties and are not included; `extra` entries are.
    pub fn properties(&self) -> serde_json::Map<String, Value> {
        let mut props = serde_json::Map::new();

        if let Some(title) = &self.title {
            props.insert("title".to_string(), Value::String(title.clone()));
        }
        if let Some(url) = &self.url {
            props.insert("url".to_string(), Value::String(url.clone()));
        }
        if let Some(route) = &self.route {
            props.insert(
                "route".to_string(),
                serde_json::to_value(route).unwrap_or(Value::Null),
            );
        }
        if let Some(name) = &self.name {
            props.insert("name".to_string(), Value::String(name.clone()));
        }
        if let Some(order) = self.order {
            props.insert("order".to_string(), Value::from(order));
        }
        if !self.attributes.is_empty() {
            props.insert(
                "attributes".to_string(),
                serde_json::to_value(&self.attributes).unwrap_or(Value::Null),
            );
        }

        // Extension entries shadow typed fields of the same name in the
        // flat view; fill() routes them back to the typed field.
        for (key, value) in &self.extra {
            props.insert(key.clone(), value.clone());
        }

        props
    }

    /// Merge named properties into the item, overwriting existing values.
    ///
    /// Known keys land in the typed fields (scalar values coerced to their
    /// textual form where the field is a string); unknown keys land in
    /// `extra`.
    pub fn fill(&mut self, props: serde_json::Map<String, Value>) {
        for (key, value) in props {
            // A typed field is the single source of truth for its name:
            // drop any shadowing extension entry.
            if matches!(
                key.as_str(),
                "title" | "url" | "name" | "order" | "route" | "attributes"
            ) {
                self.extra.remove(&key);
            }
            match key.as_str() {
                "title" => self.title = text_property(value),
                "url" => self.url = text_property(value),
                "name" => self.name = text_property(value),
                "order" => {
                    self.order = match value {
                        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
                        Value::Null => None,
                        _ => self.order,
                    };
                }
                "route" => match value {
                    Value::Null => self.route = None,
                    other => {
                        if let Ok(route) = serde_json::from_value(other) {
                            self.route = Some(route);
                        }
                    }
                },
                "attributes" => {
                    if let Ok(attributes) = serde_json::from_value(value) {
                        self.attributes = attributes;
                    }
                }
                _ => {
                    self.extra.insert(key, value);
                }
            }
        }
    }

    /// Check the shape invariants of the item's kind.
    ///
    /// Dividers and headers carry no children and no destination; a
    /// dropdown carries no url of its own.
    pub fn validate(&self) -> MenuResult<()> {
        if self.is_divider() || self.is_header() {
            if !self.children.is_empty() {
                return Err(MenuError::MalformedItem(format!(
                    "a {} cannot have children",
                    self.kind()
                )));
            }
            if self.url.is_some() || self.route.is_some() {
                return Err(MenuError::MalformedItem(format!(
                    "a {} cannot have a destination",
                    self.kind()
                )));
            }
        } else if self.has_submenu() && self.url.is_some() {
            return Err(MenuError::MalformedItem(
                "a dropdown cannot carry a url of its own".to_string(),
            ));
        }

        for child in &self.children {
            child.validate()?;
        }
        Ok(())
    }

    /// Append a child built from a free-form definition.
    pub fn add_child(&mut self, definition: ItemDefinition) -> MenuResult<&mut MenuItem> {
        let item = MenuItem::from(definition);
        item.validate()?;
        self.children.push(item);
        let index = self.children.len() - 1;
        Ok(&mut self.children[index])
    }

    /// Append a plain child link.
    pub fn link(&mut self, url: impl Into<String>, title: impl Into<String>, order: i32) -> &mut MenuItem {
        self.children.push(MenuItem {
            title: Some(title.into()),
            url: Some(url.into()),
            order: Some(order),
            ..MenuItem::new()
        });
        let index = self.children.len() - 1;
        &mut self.children[index]
    }

    /// Append a nested dropdown populated by the given closure.
    ///
    /// Returns [`MenuError::MalformedItem`] when the closure adds no
    /// children.
    pub fn dropdown<F>(&mut self, title: impl Into<String>, order: i32, f: F) -> MenuResult<&mut Self>
    where
        F: FnOnce(&mut MenuItem),
    {
        let mut item = MenuItem {
            title: Some(title.into()),
            order: Some(order),
            ..MenuItem::new()
        };
        f(&mut item);

        if item.children.is_empty() {
            return Err(MenuError::MalformedItem(
                "a dropdown needs at least one child".to_string(),
            ));
        }

        self.children.push(item);
        Ok(self)
    }

    /// Append a child header.
    pub fn header(&mut self, title: impl Into<String>) -> &mut Self {
        self.children.push(MenuItem {
            name: Some("header".to_string()),
            title: Some(title.into()),
            ..MenuItem::new()
        });
        self
    }

    /// Append a child divider.
    pub fn divider(&mut self) -> &mut Self {
        self.children.push(MenuItem {
            name: Some("divider".to_string()),
            ..MenuItem::new()
        });
        self
    }
}

/// Declarative item definition, deserializable from JSON.
///
/// Unknown keys are collected into `extra`; `visible` here is a literal
/// (predicates are attached in code, not in data).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemDefinition {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    /// Route path pattern (e.g., "/blog/:slug").
    #[serde(default)]
    pub route: Option<String>,

    /// Params substituted into the route pattern.
    #[serde(default)]
    pub params: BTreeMap<String, String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub order: Option<i32>,

    #[serde(default = "default_true")]
    pub visible: bool,

    #[serde(default)]
    pub attributes: Attributes,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,

    #[serde(default)]
    pub children: Vec<ItemDefinition>,
}

fn default_true() -> bool {
    true
}

impl From<ItemDefinition> for MenuItem {
    fn from(def: ItemDefinition) -> Self {
        MenuItem {
            title: def.title,
            url: def.url,
            route: def.route.map(|name| Route {
                name,
                params: def.params,
            }),
            name: def.name,
            order: def.order,
            visible: Visibility::from(def.visible),
            attributes: def.attributes,
            extra: def.extra,
            children: def.children.into_iter().map(MenuItem::from).collect(),
        }
    }
}

/// Coerce a property value into its textual form for a string field.
fn text_property(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}
