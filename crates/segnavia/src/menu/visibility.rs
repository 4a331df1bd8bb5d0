//! Item visibility evaluation.
//!
//! An item's `visible` property is either a literal boolean or a predicate
//! invoked with the item and the current bindings. Context the host wants
//! predicates to see (the authenticated user, feature flags, …) travels as
//! ordinary binding entries rather than through any ambient state.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::bindings::Bindings;

use super::item::MenuItem;

/// Capability interface for dynamic visibility decisions.
pub trait VisibilityPredicate: Send + Sync {
    fn check(&self, item: &MenuItem, bindings: &Bindings) -> bool;
}

impl<F> VisibilityPredicate for F
where
    F: Fn(&MenuItem, &Bindings) -> bool + Send + Sync,
{
    fn check(&self, item: &MenuItem, bindings: &Bindings) -> bool {
        self(item, bindings)
    }
}

/// Whether an item appears in rendering.
#[derive(Clone)]
pub enum Visibility {
    /// Fixed decision.
    Literal(bool),
    /// Decided per render by a predicate.
    When(Arc<dyn VisibilityPredicate>),
}

impl Visibility {
    /// Wrap a predicate.
    pub fn when<P: VisibilityPredicate + 'static>(predicate: P) -> Self {
        Self::When(Arc::new(predicate))
    }

    /// Evaluate against an item and the current bindings.
    pub fn evaluate(&self, item: &MenuItem, bindings: &Bindings) -> bool {
        match self {
            Self::Literal(visible) => *visible,
            Self::When(predicate) => predicate.check(item, bindings),
        }
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Self::Literal(true)
    }
}

impl From<bool> for Visibility {
    fn from(visible: bool) -> Self {
        Self::Literal(visible)
    }
}

impl fmt::Debug for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(visible) => f.debug_tuple("Literal").field(visible).finish(),
            Self::When(_) => f.write_str("When(<predicate>)"),
        }
    }
}

impl Serialize for Visibility {
    /// Serialized snapshots carry the literal value; predicates serialize
    /// as `true` (serialization happens after filtering, where every
    /// surviving predicate has already passed).
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let visible = match self {
            Self::Literal(v) => *v,
            Self::When(_) => true,
        };
        serializer.serialize_bool(visible)
    }
}

/// Remove items failing their visibility evaluation, recursively.
///
/// Survivor relative order is preserved; children of removed items are
/// never evaluated.
pub(crate) fn retain_visible(items: &mut Vec<MenuItem>, bindings: &Bindings) {
    items.retain(|item| item.visible.evaluate(item, bindings));
    for item in items.iter_mut() {
        retain_visible(&mut item.children, bindings);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn link(title: &str) -> MenuItem {
        MenuItem {
            title: Some(title.to_string()),
            url: Some(format!("/{}", title.to_lowercase())),
            ..MenuItem::new()
        }
    }

    #[test]
    fn literal_false_is_removed() {
        let mut items = vec![link("A"), link("B")];
        items[1].visible = Visibility::Literal(false);

        retain_visible(&mut items, &Bindings::new());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title.as_deref(), Some("A"));
    }

    #[test]
    fn predicate_receives_item_and_bindings() {
        let mut bindings = Bindings::new();
        bindings.insert("auth", json!({"role": "admin"}));

        let mut item = link("Admin");
        item.visible = Visibility::when(|_item: &MenuItem, bindings: &Bindings| {
            bindings
                .lookup_path("auth.role")
                .map(|role| role == &json!("admin"))
                .unwrap_or(false)
        });

        let mut items = vec![item];
        retain_visible(&mut items, &bindings);
        assert_eq!(items.len(), 1);

        let mut bindings = Bindings::new();
        bindings.insert("auth", json!({"role": "guest"}));
        retain_visible(&mut items, &bindings);
        assert!(items.is_empty());
    }

    #[test]
    fn survivor_order_is_preserved() {
        let mut items = vec![link("A"), link("B"), link("C"), link("D")];
        items[0].visible = Visibility::Literal(false);
        items[2].visible = Visibility::Literal(false);

        retain_visible(&mut items, &Bindings::new());
        let titles: Vec<_> = items.iter().filter_map(|i| i.title.as_deref()).collect();
        assert_eq!(titles, ["B", "D"]);
    }

    #[test]
    fn hidden_children_are_filtered_recursively() {
        let mut parent = link("Parent");
        parent.url = None;
        parent.link("/a", "A", 0);
        parent.link("/b", "B", 1).visible = Visibility::Literal(false);
        parent.link("/c", "C", 2);

        let mut items = vec![parent];
        retain_visible(&mut items, &Bindings::new());
        assert_eq!(items[0].children.len(), 2);
        let titles: Vec<_> = items[0]
            .children
            .iter()
            .filter_map(|i| i.title.as_deref())
            .collect();
        assert_eq!(titles, ["A", "C"]);
    }

    #[test]
    fn visibility_serializes_as_bool() {
        assert_eq!(
            serde_json::to_value(Visibility::Literal(false)).unwrap(),
            json!(false)
        );
        assert_eq!(
            serde_json::to_value(Visibility::when(|_: &MenuItem, _: &Bindings| false)).unwrap(),
            json!(true)
        );
    }
}
