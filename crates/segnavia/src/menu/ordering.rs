//! Sibling ordering by sort weight.

use super::item::MenuItem;

/// Stable-sort siblings ascending by `order`, recursively.
///
/// Items without an explicit order sort as 0; the sort is stable, so items
/// with equal keys keep their insertion order. Only invoked when ordering
/// is enabled for the render — otherwise insertion order is preserved
/// untouched.
pub(crate) fn sort_items(items: &mut [MenuItem]) {
    items.sort_by_key(|item| item.order.unwrap_or(0));
    for item in items {
        sort_items(&mut item.children);
    }
}
