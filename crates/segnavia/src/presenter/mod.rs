//! Presenters: pluggable renderers over filtered item sequences.
//!
//! A presenter converts items into output markup, one wrapper per item
//! kind. Builders are polymorphic over the [`Presenter`] trait and select
//! implementations through an injected [`PresenterRegistry`] — by explicit
//! identifier, by style alias, or by the registry's configured default.

mod bootstrap;

pub use bootstrap::{BootstrapPresenter, SidebarMenuPresenter};

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::menu::MenuItem;

/// Renders a filtered item sequence into output markup.
///
/// Implementations provide the wrapper set; kind dispatch is shared via
/// the provided [`Presenter::item`] method and must not be special-cased
/// per implementation.
pub trait Presenter: Send + Sync {
    /// Opening wrapper emitted before the first item.
    fn open_wrapper(&self) -> String;

    /// Closing wrapper emitted after the last item.
    fn close_wrapper(&self) -> String;

    /// A plain link item.
    fn plain_item(&self, item: &MenuItem) -> String;

    /// A dropdown item; implementations render the item's already-filtered
    /// children through [`Presenter::item`], recursively.
    fn dropdown_item(&self, item: &MenuItem) -> String;

    /// A section header item.
    fn header_item(&self, item: &MenuItem) -> String;

    /// A divider item.
    fn divider(&self) -> String;

    /// Kind dispatch for one item: submenu, then header, then divider,
    /// then plain link.
    fn item(&self, item: &MenuItem) -> String {
        if item.has_submenu() {
            self.dropdown_item(item)
        } else if item.is_header() {
            self.header_item(item)
        } else if item.is_divider() {
            self.divider()
        } else {
            self.plain_item(item)
        }
    }
}

/// Escape text for HTML output.
pub fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Presenter implementations and style aliases, injected into builders.
///
/// Styles map short aliases (e.g., "navbar") to presenter identifiers; the
/// registry also carries the global defaults a builder falls back to when
/// it has no per-instance configuration.
#[derive(Clone)]
pub struct PresenterRegistry {
    presenters: HashMap<String, Arc<dyn Presenter>>,
    styles: HashMap<String, String>,
    default_presenter: String,
    default_ordering: bool,
}

impl PresenterRegistry {
    /// Create an empty registry with the given default presenter id.
    pub fn new(default_presenter: impl Into<String>) -> Self {
        Self {
            presenters: HashMap::new(),
            styles: HashMap::new(),
            default_presenter: default_presenter.into(),
            default_ordering: false,
        }
    }

    /// Registry pre-populated with the built-in presenter suite and its
    /// style aliases.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new("bootstrap-navbar");

        registry.register("bootstrap-navbar", Arc::new(BootstrapPresenter::navbar()));
        registry.register(
            "bootstrap-navbar-right",
            Arc::new(BootstrapPresenter::navbar_right()),
        );
        registry.register(
            "bootstrap-nav-pills",
            Arc::new(BootstrapPresenter::nav_pills()),
        );
        registry.register(
            "bootstrap-nav-tabs",
            Arc::new(BootstrapPresenter::nav_tabs()),
        );
        registry.register("bootstrap-sidebar", Arc::new(SidebarMenuPresenter));

        registry.style("navbar", "bootstrap-navbar");
        registry.style("navbar-right", "bootstrap-navbar-right");
        registry.style("nav-pills", "bootstrap-nav-pills");
        registry.style("nav-tab", "bootstrap-nav-tabs");
        registry.style("sidebar", "bootstrap-sidebar");

        registry
    }

    /// Register a presenter under an identifier.
    pub fn register(&mut self, id: impl Into<String>, presenter: Arc<dyn Presenter>) -> &mut Self {
        self.presenters.insert(id.into(), presenter);
        self
    }

    /// Map a style alias to a presenter identifier.
    pub fn style(&mut self, alias: impl Into<String>, id: impl Into<String>) -> &mut Self {
        self.styles.insert(alias.into(), id.into());
        self
    }

    /// Look up a presenter by identifier.
    pub fn get(&self, id: &str) -> Option<Arc<dyn Presenter>> {
        self.presenters.get(id).cloned()
    }

    /// The style alias map.
    pub fn styles(&self) -> &HashMap<String, String> {
        &self.styles
    }

    /// Resolve a style alias to a presenter identifier.
    ///
    /// An unknown alias is not an error: the name itself is treated as a
    /// presenter identifier.
    pub fn resolve_style<'a>(&'a self, name: &'a str) -> &'a str {
        match self.styles.get(name) {
            Some(id) => id,
            None => {
                debug!(style = name, "style alias not mapped, using as presenter id");
                name
            }
        }
    }

    pub fn default_presenter(&self) -> &str {
        &self.default_presenter
    }

    pub fn set_default_presenter(&mut self, id: impl Into<String>) -> &mut Self {
        self.default_presenter = id.into();
        self
    }

    /// Global ordering default applied when a builder has not enabled
    /// ordering itself.
    pub fn default_ordering(&self) -> bool {
        self.default_ordering
    }

    pub fn set_default_ordering(&mut self, ordering: bool) -> &mut Self {
        self.default_ordering = ordering;
        self
    }
}

impl Default for PresenterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for PresenterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenterRegistry")
            .field("presenters", &self.presenters.keys())
            .field("styles", &self.styles)
            .field("default_presenter", &self.default_presenter)
            .field("default_ordering", &self.default_ordering)
            .finish()
    }
}
