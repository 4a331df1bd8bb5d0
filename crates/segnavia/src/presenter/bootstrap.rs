//! Built-in Bootstrap-flavored presenters.

use crate::menu::MenuItem;

use super::{Presenter, html_escape};

/// Bootstrap `<ul>`/`<li>` navigation presenter.
///
/// One implementation covers the navbar, right-aligned navbar, nav-pills,
/// and nav-tabs variants — they differ only in the wrapper class.
#[derive(Debug, Clone)]
pub struct BootstrapPresenter {
    wrapper_class: &'static str,
}

impl BootstrapPresenter {
    pub fn navbar() -> Self {
        Self {
            wrapper_class: "nav navbar-nav",
        }
    }

    pub fn navbar_right() -> Self {
        Self {
            wrapper_class: "nav navbar-nav navbar-right",
        }
    }

    pub fn nav_pills() -> Self {
        Self {
            wrapper_class: "nav nav-pills",
        }
    }

    pub fn nav_tabs() -> Self {
        Self {
            wrapper_class: "nav nav-tabs",
        }
    }
}

impl Presenter for BootstrapPresenter {
    fn open_wrapper(&self) -> String {
        format!("<ul class=\"{}\">", self.wrapper_class)
    }

    fn close_wrapper(&self) -> String {
        "</ul>".to_string()
    }

    fn plain_item(&self, item: &MenuItem) -> String {
        format!(
            "<li{}><a href=\"{}\">{}</a></li>",
            item.attributes.to_html(),
            item.href().unwrap_or_else(|| "#".to_string()),
            escaped_title(item),
        )
    }

    fn dropdown_item(&self, item: &MenuItem) -> String {
        let mut children = String::new();
        for child in &item.children {
            children.push_str(&self.item(child));
        }

        format!(
            concat!(
                "<li class=\"dropdown\">",
                "<a href=\"#\" class=\"dropdown-toggle\" data-toggle=\"dropdown\">",
                "{} <b class=\"caret\"></b></a>",
                "<ul class=\"dropdown-menu\">{}</ul>",
                "</li>"
            ),
            escaped_title(item),
            children,
        )
    }

    fn header_item(&self, item: &MenuItem) -> String {
        format!("<li class=\"dropdown-header\">{}</li>", escaped_title(item))
    }

    fn divider(&self) -> String {
        "<li class=\"divider\"></li>".to_string()
    }
}

/// Sidebar-menu presenter with treeview submenus.
#[derive(Debug, Clone)]
pub struct SidebarMenuPresenter;

impl Presenter for SidebarMenuPresenter {
    fn open_wrapper(&self) -> String {
        "<ul class=\"sidebar-menu\">".to_string()
    }

    fn close_wrapper(&self) -> String {
        "</ul>".to_string()
    }

    fn plain_item(&self, item: &MenuItem) -> String {
        format!(
            "<li{}><a href=\"{}\"><span>{}</span></a></li>",
            item.attributes.to_html(),
            item.href().unwrap_or_else(|| "#".to_string()),
            escaped_title(item),
        )
    }

    fn dropdown_item(&self, item: &MenuItem) -> String {
        let mut children = String::new();
        for child in &item.children {
            children.push_str(&self.item(child));
        }

        format!(
            concat!(
                "<li class=\"treeview\">",
                "<a href=\"#\"><span>{}</span> ",
                "<i class=\"fa fa-angle-left pull-right\"></i></a>",
                "<ul class=\"treeview-menu\">{}</ul>",
                "</li>"
            ),
            escaped_title(item),
            children,
        )
    }

    fn header_item(&self, item: &MenuItem) -> String {
        format!("<li class=\"header\">{}</li>", escaped_title(item))
    }

    fn divider(&self) -> String {
        "<li class=\"divider\"></li>".to_string()
    }
}

fn escaped_title(item: &MenuItem) -> String {
    item.title.as_deref().map(html_escape).unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn link(title: &str, url: &str) -> MenuItem {
        MenuItem {
            title: Some(title.to_string()),
            url: Some(url.to_string()),
            ..MenuItem::new()
        }
    }

    #[test]
    fn plain_item_markup() {
        let presenter = BootstrapPresenter::navbar();
        let mut item = link("Home", "/");
        item.attributes.insert("class", "active");

        assert_eq!(
            presenter.plain_item(&item),
            "<li class=\"active\"><a href=\"/\">Home</a></li>"
        );
    }

    #[test]
    fn titles_are_escaped() {
        let presenter = BootstrapPresenter::navbar();
        let item = link("Fish & Chips <small>", "/menu");
        let html = presenter.plain_item(&item);
        assert!(html.contains("Fish &amp; Chips &lt;small&gt;"));
    }

    #[test]
    fn missing_href_falls_back_to_hash() {
        let presenter = BootstrapPresenter::navbar();
        let item = MenuItem {
            title: Some("Nowhere".to_string()),
            ..MenuItem::new()
        };
        assert!(presenter.plain_item(&item).contains("href=\"#\""));
    }

    #[test]
    fn dropdown_renders_children_recursively() {
        let presenter = BootstrapPresenter::navbar();
        let mut item = MenuItem {
            title: Some("More".to_string()),
            ..MenuItem::new()
        };
        item.header("Pages");
        item.link("/about", "About", 0);
        item.divider();
        item.dropdown("Nested", 0, |sub| {
            sub.link("/deep", "Deep", 0);
        })
        .unwrap();

        let html = presenter.dropdown_item(&item);
        assert!(html.contains("<ul class=\"dropdown-menu\">"));
        assert!(html.contains("<li class=\"dropdown-header\">Pages</li>"));
        assert!(html.contains("<li class=\"divider\"></li>"));
        // Nested dropdown dispatched through the same wrapper.
        assert_eq!(html.matches("<li class=\"dropdown\">").count(), 2);
        assert!(html.contains("Deep"));
    }

    #[test]
    fn wrapper_classes_differ_per_variant() {
        assert!(BootstrapPresenter::navbar().open_wrapper().contains("navbar-nav"));
        assert!(
            BootstrapPresenter::navbar_right()
                .open_wrapper()
                .contains("navbar-right")
        );
        assert!(BootstrapPresenter::nav_pills().open_wrapper().contains("nav-pills"));
        assert!(BootstrapPresenter::nav_tabs().open_wrapper().contains("nav-tabs"));
        assert!(SidebarMenuPresenter.open_wrapper().contains("sidebar-menu"));
    }

    #[test]
    fn sidebar_dropdown_uses_treeview() {
        let mut item = MenuItem {
            title: Some("Reports".to_string()),
            ..MenuItem::new()
        };
        item.link("/daily", "Daily", 0);

        let html = SidebarMenuPresenter.dropdown_item(&item);
        assert!(html.contains("treeview-menu"));
        assert!(html.contains("Daily"));
    }
}
