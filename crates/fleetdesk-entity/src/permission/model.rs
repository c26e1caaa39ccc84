//! Permission catalog entry model.
//!
//! Permissions are declared statically (fixed catalog); the database only
//! stores the role ↔ permission-code join. These types describe catalog
//! entries, not table rows.

use serde::{Deserialize, Serialize};

/// Whether a permission grants a navigable menu or an in-page action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionKind {
    /// A navigable menu entry with a display path.
    Menu,
    /// A button/action, associated with a parent menu.
    Button,
}

/// A single entry of the static permission catalog.
#[derive(Debug, Clone, Serialize)]
pub struct Permission {
    /// Stable permission code (e.g. `"menu.customer"`, `"btn.receipt.export"`).
    pub code: &'static str,
    /// Menu or button.
    pub kind: PermissionKind,
    /// Parent menu code for button permissions.
    pub parent_code: Option<&'static str>,
    /// Display path for menu permissions (e.g. `"/customer"`).
    pub path: Option<&'static str>,
    /// Display title.
    pub title: &'static str,
    /// Ordering of menus in navigation.
    pub display_order: u32,
}

impl Permission {
    /// Whether this entry is a menu.
    pub fn is_menu(&self) -> bool {
        self.kind == PermissionKind::Menu
    }
}
