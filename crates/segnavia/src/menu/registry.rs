//! Named-menu collection.
//!
//! Holds every menu of an application ("main", "footer", "admin", …), all
//! sharing one presenter registry.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{MenuError, MenuResult};
use crate::presenter::PresenterRegistry;

use super::builder::MenuBuilder;

/// Collection of named menus sharing a presenter registry.
#[derive(Debug)]
pub struct Menus {
    menus: HashMap<String, MenuBuilder>,
    registry: Arc<PresenterRegistry>,
}

impl Menus {
    /// Create an empty collection using the given presenter registry.
    pub fn new(registry: Arc<PresenterRegistry>) -> Self {
        Self {
            menus: HashMap::new(),
            registry,
        }
    }

    /// Create an empty collection with the built-in presenter suite.
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(PresenterRegistry::default()))
    }

    /// Register a menu under a name, populated by the given closure.
    ///
    /// A previously registered menu under the same name is replaced.
    pub fn create<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: FnOnce(&mut MenuBuilder),
    {
        let name = name.into();
        let mut builder = MenuBuilder::new(name.clone(), Arc::clone(&self.registry));
        f(&mut builder);

        debug!(menu = %name, items = builder.count(), "registered menu");
        self.menus.insert(name, builder);
        self
    }

    pub fn get(&self, name: &str) -> Option<&MenuBuilder> {
        self.menus.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut MenuBuilder> {
        self.menus.get_mut(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.menus.contains_key(name)
    }

    /// Render a named menu.
    pub fn render(&self, name: &str, selector: Option<&str>) -> MenuResult<String> {
        self.get(name)
            .ok_or_else(|| MenuError::UnknownMenu(name.to_string()))?
            .render(selector)
    }

    /// Remove a named menu. Returns whether it existed.
    pub fn destroy(&mut self, name: &str) -> bool {
        let removed = self.menus.remove(name).is_some();
        if removed {
            debug!(menu = %name, "destroyed menu");
        }
        removed
    }

    /// Remove every menu.
    pub fn clear(&mut self) {
        self.menus.clear();
    }

    pub fn len(&self) -> usize {
        self.menus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }

    /// Iterate over all menus by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MenuBuilder)> {
        self.menus.iter().map(|(name, menu)| (name.as_str(), menu))
    }
}

impl Default for Menus {
    fn default() -> Self {
        Self::with_defaults()
    }
}
