//! The fixed permission catalog.
//!
//! Permissions are declared here as read-only configuration; the
//! database stores only which roles hold which codes. Changing the
//! catalog is a deploy, not a runtime operation.

use fleetdesk_entity::permission::{Permission, PermissionKind};

/// Menu code of the universally accessible home entry.
pub const HOME_MENU_CODE: &str = "menu.home";

/// Path of the home entry, accessible without any explicit grant.
pub const HOME_PATH: &str = "/home";

static CATALOG: &[Permission] = &[
    Permission {
        code: HOME_MENU_CODE,
        kind: PermissionKind::Menu,
        parent_code: None,
        path: Some(HOME_PATH),
        title: "Home",
        display_order: 0,
    },
    Permission {
        code: "menu.customer",
        kind: PermissionKind::Menu,
        parent_code: None,
        path: Some("/customer"),
        title: "Customers",
        display_order: 10,
    },
    Permission {
        code: "btn.customer.create",
        kind: PermissionKind::Button,
        parent_code: Some("menu.customer"),
        path: None,
        title: "Create customer",
        display_order: 11,
    },
    Permission {
        code: "btn.customer.export",
        kind: PermissionKind::Button,
        parent_code: Some("menu.customer"),
        path: None,
        title: "Export customers",
        display_order: 12,
    },
    Permission {
        code: "menu.receipt",
        kind: PermissionKind::Menu,
        parent_code: None,
        path: Some("/receipt"),
        title: "Receipts",
        display_order: 20,
    },
    Permission {
        code: "btn.receipt.create",
        kind: PermissionKind::Button,
        parent_code: Some("menu.receipt"),
        path: None,
        title: "Create receipt",
        display_order: 21,
    },
    Permission {
        code: "btn.receipt.export",
        kind: PermissionKind::Button,
        parent_code: Some("menu.receipt"),
        path: None,
        title: "Export receipts",
        display_order: 22,
    },
    Permission {
        code: "menu.driver",
        kind: PermissionKind::Menu,
        parent_code: None,
        path: Some("/driver"),
        title: "Drivers",
        display_order: 30,
    },
    Permission {
        code: "btn.driver.assign",
        kind: PermissionKind::Button,
        parent_code: Some("menu.driver"),
        path: None,
        title: "Assign driver",
        display_order: 31,
    },
    Permission {
        code: "menu.users",
        kind: PermissionKind::Menu,
        parent_code: None,
        path: Some("/users"),
        title: "User management",
        display_order: 40,
    },
    Permission {
        code: "btn.users.manage",
        kind: PermissionKind::Button,
        parent_code: Some("menu.users"),
        path: None,
        title: "Manage users",
        display_order: 41,
    },
    Permission {
        code: "menu.settings",
        kind: PermissionKind::Menu,
        parent_code: None,
        path: Some("/settings"),
        title: "Settings",
        display_order: 50,
    },
];

/// The complete catalog.
pub fn all() -> &'static [Permission] {
    CATALOG
}

/// All menu entries, in display order.
pub fn menus() -> Vec<&'static Permission> {
    let mut menus: Vec<&'static Permission> = CATALOG.iter().filter(|p| p.is_menu()).collect();
    menus.sort_by_key(|p| p.display_order);
    menus
}

/// Looks up the menu entry serving a display path.
pub fn menu_for_path(path: &str) -> Option<&'static Permission> {
    CATALOG
        .iter()
        .find(|p| p.is_menu() && p.path == Some(path))
}
