//! Runtime bindings and placeholder resolution.
//!
//! Bindings are named values supplied by the host before a render pass.
//! String properties may embed `{ name }` placeholders; dotted identifiers
//! (`{ user.email }`) traverse object attributes. Exact-key placeholders
//! substitute textually in place, while dotted-path placeholders replace
//! the entire host value with the referenced attribute.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::error::{MenuError, MenuResult};
use crate::menu::MenuItem;

/// Placeholder pattern: open brace, optional whitespace, an identifier run,
/// optional whitespace, close brace.
///
/// # Panics
///
/// Panics if the hard-coded regex literal is invalid (impossible in practice).
#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\s*([^\s{}]+)\s*\}").expect("valid regex literal"));

/// Named runtime values used to fill item placeholders.
///
/// Values are arbitrary JSON; objects support dotted-path attribute lookup.
/// The map is treated as immutable for the duration of one render pass.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    values: HashMap<String, Value>,
}

impl Bindings {
    /// Create an empty bindings map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a binding, replacing any previous value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Look up a binding by exact name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Whether a binding with the exact name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Resolve a dotted path (`user.address.city`) against the bindings.
    ///
    /// The first segment names a binding; each remaining segment accesses an
    /// object attribute. A missing attribute is a contract violation and
    /// returns [`MenuError::BindingLookup`] rather than an empty value.
    pub fn lookup_path(&self, path: &str) -> MenuResult<&Value> {
        let mut segments = path.split('.');
        let root = segments.next().unwrap_or_default();

        let mut current = self.get(root).ok_or_else(|| MenuError::BindingLookup {
            path: path.to_string(),
            segment: root.to_string(),
        })?;

        for segment in segments {
            current = current
                .get(segment)
                .ok_or_else(|| MenuError::BindingLookup {
                    path: path.to_string(),
                    segment: segment.to_string(),
                })?;
        }

        Ok(current)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Expands `{ identifier }` placeholders inside property values.
pub struct BindingResolver<'a> {
    bindings: &'a Bindings,
}

impl<'a> BindingResolver<'a> {
    pub fn new(bindings: &'a Bindings) -> Self {
        Self { bindings }
    }

    /// Resolve a single value.
    ///
    /// Sequences and mappings are resolved recursively with structure and
    /// key order preserved; strings are scanned for placeholders; all other
    /// values pass through unchanged.
    pub fn resolve_value(&self, value: &Value) -> MenuResult<Value> {
        match value {
            Value::String(text) => self.resolve_text(text),
            Value::Array(values) => values
                .iter()
                .map(|v| self.resolve_value(v))
                .collect::<MenuResult<Vec<_>>>()
                .map(Value::Array),
            Value::Object(map) => self.resolve_map(map).map(Value::Object),
            _ => Ok(value.clone()),
        }
    }

    /// Resolve every value of a mapping, keys preserved.
    pub fn resolve_map(
        &self,
        map: &serde_json::Map<String, Value>,
    ) -> MenuResult<serde_json::Map<String, Value>> {
        map.iter()
            .map(|(key, value)| Ok((key.clone(), self.resolve_value(value)?)))
            .collect()
    }

    /// Resolve every item's properties in place, recursively through
    /// children.
    ///
    /// Each item's property mapping is resolved and merged back; the
    /// stored structure is otherwise untouched.
    pub fn resolve_items(&self, items: &mut [MenuItem]) -> MenuResult<()> {
        for item in items {
            let resolved = self.resolve_map(&item.properties())?;
            item.fill(resolved);
            self.resolve_items(&mut item.children)?;
        }
        Ok(())
    }

    /// Resolve placeholders inside one string.
    ///
    /// Matches are processed left to right. An identifier matching a binding
    /// key exactly replaces the first remaining occurrence of the full
    /// placeholder text. A dotted identifier whose first segment is bound
    /// replaces the entire working value with the referenced attribute,
    /// which may be of any type. Unmatched identifiers are left as literal
    /// placeholder text.
    fn resolve_text(&self, input: &str) -> MenuResult<Value> {
        let mut current = Value::String(input.to_string());

        for caps in PLACEHOLDER.captures_iter(input) {
            let placeholder = &caps[0];
            let identifier = &caps[1];

            if let Some(bound) = self.bindings.get(identifier) {
                if let Value::String(working) = &current {
                    current =
                        Value::String(working.replacen(placeholder, &scalar_text(bound), 1));
                }
            } else if let Some((root, _)) = identifier.split_once('.') {
                if self.bindings.contains(root) {
                    // Dotted path: the whole value becomes the attribute.
                    current = self.bindings.lookup_path(identifier)?.clone();
                } else {
                    debug!(placeholder, "unmatched placeholder left untouched");
                }
            } else {
                debug!(placeholder, "unmatched placeholder left untouched");
            }
        }

        Ok(current)
    }
}

/// Textual form of a binding value for in-place substitution.
///
/// Strings substitute verbatim, null as the empty string, everything else
/// through its JSON display form.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
