//! Menu construction and the render pipeline.
//!
//! The builder owns its item list and composes the render pipeline in a
//! fixed order: visibility filtering, then binding resolution, then
//! ordering. The order is load-bearing — visibility predicates must see
//! unresolved properties, resolution runs only over surviving items, and
//! ordering uses final resolved `order` values. Each render works on a
//! cloned snapshot, so the stored items are never mutated and repeated
//! renders are idempotent.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::bindings::{BindingResolver, Bindings};
use crate::error::{MenuError, MenuResult};
use crate::presenter::{Presenter, PresenterRegistry};
use crate::view::MenuView;

use super::item::{ItemDefinition, MenuItem, Route};
use super::ordering::sort_items;
use super::visibility::retain_visible;

/// Builds one named menu and renders it through a presenter or template.
#[derive(Debug)]
pub struct MenuBuilder {
    /// Menu name.
    name: String,

    /// Top-level items in insertion order.
    items: Vec<MenuItem>,

    /// Injected presenter implementations, style aliases, and defaults.
    registry: Arc<PresenterRegistry>,

    /// Currently configured presenter identifier.
    presenter: String,

    /// Per-instance style map; falls back to the registry's map when unset.
    styles: Option<HashMap<String, String>>,

    /// Prefix applied by [`MenuBuilder::url`].
    prefix_url: Option<String>,

    /// Optional template path; when set, rendering delegates entirely.
    view: Option<MenuView>,

    /// Whether sibling ordering is applied for this menu.
    ordering: bool,

    /// Runtime bindings for placeholder resolution and predicates.
    bindings: Bindings,
}

impl MenuBuilder {
    /// Create an empty menu using the given presenter registry.
    pub fn new(name: impl Into<String>, registry: Arc<PresenterRegistry>) -> Self {
        let presenter = registry.default_presenter().to_string();
        Self {
            name: name.into(),
            items: Vec::new(),
            registry,
            presenter,
            styles: None,
            prefix_url: None,
            view: None,
            ordering: false,
            bindings: Bindings::new(),
        }
    }

    /// Create an empty menu with the built-in presenter suite.
    pub fn with_defaults(name: impl Into<String>) -> Self {
        Self::new(name, Arc::new(PresenterRegistry::default()))
    }

    /// Menu name.
    pub fn name(&self) -> &str {
        &self.name
    }

    // ---- construction ----

    /// Append an item from a free-form definition.
    ///
    /// The definition's shape is validated against its kind invariants.
    pub fn add(&mut self, definition: ItemDefinition) -> MenuResult<&mut MenuItem> {
        let item = MenuItem::from(definition);
        item.validate()?;
        self.items.push(item);
        let index = self.items.len() - 1;
        Ok(&mut self.items[index])
    }

    /// Append items parsed from a JSON array of definitions.
    pub fn extend_from_json(&mut self, json: &str) -> MenuResult<&mut Self> {
        let definitions: Vec<ItemDefinition> = serde_json::from_str(json)?;
        for definition in definitions {
            self.add(definition)?;
        }
        Ok(self)
    }

    /// Append a link item, applying the configured URL prefix.
    pub fn url(&mut self, url: &str, title: impl Into<String>, order: i32) -> &mut MenuItem {
        let formatted = self.format_url(url);
        self.raw_url(formatted, title, order)
    }

    /// Append a link item with the URL taken verbatim.
    pub fn raw_url(
        &mut self,
        url: impl Into<String>,
        title: impl Into<String>,
        order: i32,
    ) -> &mut MenuItem {
        self.items.push(MenuItem {
            title: Some(title.into()),
            url: Some(url.into()),
            order: Some(order),
            ..MenuItem::new()
        });
        let index = self.items.len() - 1;
        &mut self.items[index]
    }

    /// Append a link item addressed by route pattern and params.
    pub fn route<K, V, I>(
        &mut self,
        pattern: impl Into<String>,
        title: impl Into<String>,
        params: I,
        order: i32,
    ) -> &mut MenuItem
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.items.push(MenuItem {
            title: Some(title.into()),
            route: Some(Route::new(pattern, params)),
            order: Some(order),
            ..MenuItem::new()
        });
        let index = self.items.len() - 1;
        &mut self.items[index]
    }

    /// Append a dropdown populated by the given closure.
    ///
    /// Returns [`MenuError::MalformedItem`] when the closure adds no
    /// children.
    pub fn dropdown<F>(
        &mut self,
        title: impl Into<String>,
        order: i32,
        f: F,
    ) -> MenuResult<&mut Self>
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

        self.items.push(item);
        Ok(self)
    }

    /// Append a section header.
    pub fn add_header(&mut self, title: impl Into<String>, order: Option<i32>) -> &mut Self {
        self.items.push(MenuItem {
            name: Some("header".to_string()),
            title: Some(title.into()),
            order,
            ..MenuItem::new()
        });
        self
    }

    /// Append a divider.
    pub fn add_divider(&mut self, order: Option<i32>) -> &mut Self {
        self.items.push(MenuItem {
            name: Some("divider".to_string()),
            order,
            ..MenuItem::new()
        });
        self
    }

    // ---- lookups and maintenance ----

    /// Find the first top-level item whose property equals the given value.
    pub fn find_by(&self, key: &str, value: &Value) -> Option<&MenuItem> {
        self.items
            .iter()
            .find(|item| item.properties().get(key) == Some(value))
    }

    /// Find the first top-level item with the given title.
    pub fn where_title(&self, title: &str) -> Option<&MenuItem> {
        self.find_by("title", &Value::String(title.to_string()))
    }

    /// Number of top-level items, unfiltered.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The raw item list, unfiltered and unresolved.
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Raw items as a JSON value.
    pub fn to_json(&self) -> MenuResult<Value> {
        Ok(serde_json::to_value(&self.items)?)
    }

    /// Remove every item. The builder stays reusable.
    pub fn destroy(&mut self) -> &mut Self {
        self.items.clear();
        self
    }

    // ---- configuration ----

    /// Set the bindings used by placeholder resolution and predicates.
    pub fn set_bindings(&mut self, bindings: Bindings) -> &mut Self {
        self.bindings = bindings;
        self
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Set the prefix applied by [`MenuBuilder::url`].
    pub fn set_prefix_url(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.prefix_url = Some(prefix.into());
        self
    }

    /// Override the style map for this menu only.
    pub fn set_styles(&mut self, styles: HashMap<String, String>) -> &mut Self {
        self.styles = Some(styles);
        self
    }

    /// Set the configured presenter by identifier.
    pub fn set_presenter(&mut self, id: impl Into<String>) -> &mut Self {
        self.presenter = id.into();
        self
    }

    /// Set the configured presenter from a style alias, when known.
    pub fn style(&mut self, name: &str) -> &mut Self {
        if let Some(id) = self.styles().get(name).cloned() {
            self.presenter = id;
        }
        self
    }

    /// Delegate rendering to a template instead of a presenter.
    pub fn set_view(&mut self, view: MenuView) -> &mut Self {
        self.view = Some(view);
        self
    }

    pub fn enable_ordering(&mut self) -> &mut Self {
        self.ordering = true;
        self
    }

    pub fn disable_ordering(&mut self) -> &mut Self {
        self.ordering = false;
        self
    }

    /// Effective ordering flag: per-menu, or the registry default.
    pub fn ordering_enabled(&self) -> bool {
        self.ordering || self.registry.default_ordering()
    }

    /// The effective style map: per-instance when set, the registry's
    /// otherwise.
    fn styles(&self) -> &HashMap<String, String> {
        match &self.styles {
            Some(styles) => styles,
            None => self.registry.styles(),
        }
    }

    // ---- render pipeline ----

    /// The item list with the render pipeline applied, in fixed order:
    /// visibility filtering, binding resolution, ordering.
    ///
    /// Works on a clone of the stored items; calling this repeatedly with
    /// identical bindings yields identical results.
    pub fn filtered_items(&self) -> MenuResult<Vec<MenuItem>> {
        let mut items = self.items.clone();

        retain_visible(&mut items, &self.bindings);
        BindingResolver::new(&self.bindings).resolve_items(&mut items)?;
        if self.ordering_enabled() {
            sort_items(&mut items);
        }

        debug!(
            menu = %self.name,
            count = items.len(),
            "filtered menu items"
        );
        Ok(items)
    }

    /// Render the menu.
    ///
    /// With a view configured, delegates to the template (the selector, if
    /// given, names an alternative template). Otherwise the selector is
    /// resolved style-alias-first to a presenter identifier, falling back
    /// to the configured default, and the filtered items are walked with
    /// per-kind dispatch.
    pub fn render(&self, selector: Option<&str>) -> MenuResult<String> {
        if let Some(view) = &self.view {
            let items = self.filtered_items()?;
            return match selector {
                Some(template) => view.render_template(template, &items),
                None => view.render(&items),
            };
        }

        let presenter = self.select_presenter(selector)?;
        let items = self.filtered_items()?;

        let mut output = presenter.open_wrapper();
        for item in &items {
            output.push_str(&presenter.item(item));
        }
        output.push_str(&presenter.close_wrapper());

        Ok(output)
    }

    fn select_presenter(&self, selector: Option<&str>) -> MenuResult<Arc<dyn Presenter>> {
        let id = match selector {
            Some(name) => match &self.styles {
                Some(styles) => styles.get(name).map(String::as_str).unwrap_or(name),
                None => self.registry.resolve_style(name),
            },
            None => self.presenter.as_str(),
        };
        self.registry
            .get(id)
            .ok_or_else(|| MenuError::UnknownPresenter(id.to_string()))
    }

    fn format_url(&self, url: &str) -> String {
        let Some(prefix) = &self.prefix_url else {
            return url.to_string();
        };

        let joined = format!(
            "{}/{}",
            prefix.trim_end_matches('/'),
            url.trim_start_matches('/')
        );
        if joined.len() > 1 {
            joined.trim_end_matches('/').to_string()
        } else {
            joined
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn url_applies_prefix() {
        let mut menu = MenuBuilder::with_defaults("main");
        menu.set_prefix_url("/app/");
        menu.url("/dashboard", "Dashboard", 0);
        menu.url("/", "Home", 1);

        assert_eq!(menu.items()[0].url.as_deref(), Some("/app/dashboard"));
        assert_eq!(menu.items()[1].url.as_deref(), Some("/app"));
    }

    #[test]
    fn raw_url_skips_prefix() {
        let mut menu = MenuBuilder::with_defaults("main");
        menu.set_prefix_url("/app");
        menu.raw_url("https://example.com", "External", 0);
        assert_eq!(
            menu.items()[0].url.as_deref(),
            Some("https://example.com")
        );
    }

    #[test]
    fn count_ignores_visibility() {
        let mut menu = MenuBuilder::with_defaults("main");
        menu.url("/a", "A", 0);
        menu.url("/b", "B", 1).visible = false.into();
        assert_eq!(menu.count(), 2);
        assert_eq!(menu.filtered_items().unwrap().len(), 1);
    }

    #[test]
    fn destroy_leaves_builder_reusable() {
        let mut menu = MenuBuilder::with_defaults("main");
        menu.url("/a", "A", 0);
        menu.destroy();
        assert!(menu.is_empty());

        menu.url("/b", "B", 0);
        assert_eq!(menu.count(), 1);
        assert_eq!(
            menu.where_title("B").and_then(|i| i.url.as_deref()),
            Some("/b")
        );
    }

    #[test]
    fn dropdown_requires_children() {
        let mut menu = MenuBuilder::with_defaults("main");
        let err = menu.dropdown("Empty", 0, |_| {}).unwrap_err();
        assert!(matches!(err, MenuError::MalformedItem(_)));
        assert_eq!(menu.count(), 0);
    }

    #[test]
    fn add_validates_definition_shape() {
        let mut menu = MenuBuilder::with_defaults("main");
        let definition: ItemDefinition = serde_json::from_value(json!({
            "name": "divider",
            "url": "/nope"
        }))
        .unwrap();
        assert!(matches!(
            menu.add(definition),
            Err(MenuError::MalformedItem(_))
        ));
    }

    #[test]
    fn find_by_matches_extra_properties() {
        let mut menu = MenuBuilder::with_defaults("main");
        menu.url("/a", "A", 0)
            .extra
            .insert("icon".to_string(), json!("home"));
        menu.url("/b", "B", 1);

        let found = menu.find_by("icon", &json!("home")).unwrap();
        assert_eq!(found.title.as_deref(), Some("A"));
        assert!(menu.find_by("icon", &json!("missing")).is_none());
    }

    #[test]
    fn unknown_presenter_is_an_error() {
        let mut menu = MenuBuilder::with_defaults("main");
        menu.url("/a", "A", 0);
        assert!(matches!(
            menu.render(Some("no-such-presenter")),
            Err(MenuError::UnknownPresenter(_))
        ));
    }

    #[test]
    fn style_alias_selects_presenter_for_render() {
        let mut menu = MenuBuilder::with_defaults("main");
        menu.url("/a", "A", 0);

        let html = menu.render(Some("nav-pills")).unwrap();
        assert!(html.starts_with("<ul class=\"nav nav-pills\">"));
        assert!(html.ends_with("</ul>"));
    }

    #[test]
    fn style_sets_default_presenter() {
        let mut menu = MenuBuilder::with_defaults("main");
        menu.url("/a", "A", 0);
        menu.style("sidebar");

        let html = menu.render(None).unwrap();
        assert!(html.starts_with("<ul class=\"sidebar-menu\">"));
    }

    #[test]
    fn instance_styles_shadow_registry_styles() {
        let mut menu = MenuBuilder::with_defaults("main");
        menu.url("/a", "A", 0);
        menu.set_styles(HashMap::from([(
            "navbar".to_string(),
            "bootstrap-sidebar".to_string(),
        )]));

        let html = menu.render(Some("navbar")).unwrap();
        assert!(html.starts_with("<ul class=\"sidebar-menu\">"));
    }

    #[test]
    fn extend_from_json_appends_definitions() {
        let mut menu = MenuBuilder::with_defaults("main");
        menu.extend_from_json(
            r#"[
                {"title": "Home", "url": "/", "order": 1},
                {"title": "Blog", "route": "/blog/:slug", "params": {"slug": "news"}, "order": 2}
            ]"#,
        )
        .unwrap();

        assert_eq!(menu.count(), 2);
        assert_eq!(
            menu.items()[1].href().as_deref(),
            Some("/blog/news")
        );
    }

    #[test]
    fn extend_from_json_rejects_invalid_json() {
        let mut menu = MenuBuilder::with_defaults("main");
        assert!(matches!(
            menu.extend_from_json("not json"),
            Err(MenuError::Definition(_))
        ));
    }
}
