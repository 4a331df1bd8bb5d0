//! Tera-backed view rendering.
//!
//! The template path bypasses presenter dispatch entirely: the filtered
//! item list is handed to a named template as the `items` context value
//! and the template owns the markup.

use std::sync::Arc;

use tera::Tera;

use crate::error::MenuResult;
use crate::menu::MenuItem;

/// A template engine plus the template a menu renders through.
#[derive(Clone)]
pub struct MenuView {
    tera: Arc<Tera>,
    template: String,
}

impl MenuView {
    pub fn new(tera: Arc<Tera>, template: impl Into<String>) -> Self {
        Self {
            tera,
            template: template.into(),
        }
    }

    /// The configured template name.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Render the configured template with the given filtered items.
    pub fn render(&self, items: &[MenuItem]) -> MenuResult<String> {
        self.render_template(&self.template, items)
    }

    /// Render a specific template, overriding the configured one.
    pub fn render_template(&self, template: &str, items: &[MenuItem]) -> MenuResult<String> {
        let mut context = tera::Context::new();
        context.insert("items", items);
        Ok(self.tera.render(template, &context)?)
    }
}

impl std::fmt::Debug for MenuView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuView")
            .field("template", &self.template)
            .field("template_count", &self.tera.get_template_names().count())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn renders_items_into_template() {
        let mut tera = Tera::default();
        tera.add_raw_template(
            "menus/main.html",
            "<nav>{% for item in items %}<a href=\"{{ item.url }}\">{{ item.title }}</a>{% endfor %}</nav>",
        )
        .unwrap();

        let items = vec![MenuItem {
            title: Some("Home".to_string()),
            url: Some("/".to_string()),
            ..MenuItem::new()
        }];

        let view = MenuView::new(Arc::new(tera), "menus/main.html");
        let html = view.render(&items).unwrap();
        assert_eq!(html, "<nav><a href=\"/\">Home</a></nav>");
    }

    #[test]
    fn missing_template_is_a_template_error() {
        let view = MenuView::new(Arc::new(Tera::default()), "missing.html");
        assert!(view.render(&[]).is_err());
    }

    #[test]
    fn extra_properties_reach_the_template() {
        let mut tera = Tera::default();
        tera.add_raw_template("badge.html", "{{ items.0.badge }}")
            .unwrap();

        let mut item = MenuItem {
            title: Some("Inbox".to_string()),
            ..MenuItem::new()
        };
        item.extra
            .insert("badge".to_string(), serde_json::Value::from(12));

        let view = MenuView::new(Arc::new(tera), "badge.html");
        assert_eq!(view.render(&[item]).unwrap(), "12");
    }
}
