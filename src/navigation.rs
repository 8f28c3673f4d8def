//! Level-gated menu.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub name: &'static str,
    pub path: &'static str,
    /// Lowest user level that may see the item.
    pub min_level: u8,
    pub items: &'static [MenuItem],
}

const fn leaf(name: &'static str, path: &'static str, min_level: u8) -> MenuItem {
    MenuItem {
        name,
        path,
        min_level,
        items: &[],
    }
}

pub static MENU: &[MenuItem] = &[
    MenuItem {
        name: "General Setup",
        path: "/setup",
        min_level: 5,
        items: &[
            leaf("User Setup", "/setup/users", 5),
            leaf("Branch Setup", "/setup/branches", 5),
            leaf("Language Setup", "/setup/languages", 5),
            leaf("Account Setup", "/setup/accounts", 5),
        ],
    },
    leaf("Journal Overview", "/journal", 1),
    leaf("New Transaction", "/transaction/new", 2),
    leaf("Analysis Corner", "/analysis", 3),
    leaf("General Reports", "/reports", 4),
];

/// A menu entry as shown to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleItem {
    pub name: &'static str,
    pub path: &'static str,
    pub items: Vec<VisibleItem>,
}

impl MenuItem {
    pub fn is_visible_to(&self, level: u8) -> bool {
        level >= self.min_level
    }
}

/// The entries of `items` visible at `level`, sub-items filtered alike.
pub fn visible_items(items: &[MenuItem], level: u8) -> Vec<VisibleItem> {
    items
        .iter()
        .filter(|item| item.is_visible_to(level))
        .map(|item| VisibleItem {
            name: item.name,
            path: item.path,
            items: visible_items(item.items, level),
        })
        .collect()
}

/// The main menu for `level`.
pub fn menu_for(level: u8) -> Vec<VisibleItem> {
    visible_items(MENU, level)
}

/// Whether the page at `path` is reachable at `level`.
pub fn can_open(path: &str, level: u8) -> bool {
    fn walk(items: &[VisibleItem], path: &str) -> bool {
        items.iter().any(|i| i.path == path || walk(&i.items, path))
    }
    walk(&menu_for(level), path)
}
