//! Role-filtered navigation.
//!
//! Navigation items carry an explicit allow-list of roles; filtering is
//! exact matching against that list, with no hierarchy ("admin" does not
//! implicitly gain "manager"-only items). The role itself is a closed
//! enumeration with an explicit escape hatch for unrecognized strings, so
//! default-deny is a total function rather than a string-equality accident:
//! an unknown role sees the empty set.
//!
//! A parent whose submenu filters to empty is hidden entirely.

use serde::{Deserialize, Serialize};

/// A user role, parsed from the stored role string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Full administrative access.
    Admin,
    /// User-management access.
    Manager,
    /// Regular viewer access.
    User,
    /// Anything the client does not recognize. Matches no allow-list.
    Unknown(String),
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        match value {
            "admin" => Self::Admin,
            "manager" => Self::Manager,
            "user" => Self::User,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl Role {
    /// The wire/storage representation of this role.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::User => "user",
            Self::Unknown(other) => other,
        }
    }

    /// Whether this role belongs to the closed set the client knows.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of the navigation tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavItem {
    /// Display label.
    pub name: String,
    /// Route path; absent for pure submenu containers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Icon name for the renderer.
    pub icon: String,
    /// Roles allowed to see this item.
    pub roles: Vec<Role>,
    /// Nested entries, independently filtered.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub submenu: Vec<NavItem>,
}

impl NavItem {
    /// Create a leaf item.
    #[must_use]
    pub fn new(name: &str, path: Option<&str>, icon: &str, roles: Vec<Role>) -> Self {
        Self {
            name: name.to_string(),
            path: path.map(ToString::to_string),
            icon: icon.to_string(),
            roles,
            submenu: Vec::new(),
        }
    }

    /// Attach a submenu to this item.
    #[must_use]
    pub fn with_submenu(mut self, submenu: Vec<NavItem>) -> Self {
        self.submenu = submenu;
        self
    }
}

/// Produce the subset of `items` visible to `role`.
///
/// Recursive: submenus are filtered independently, and a parent whose
/// submenu becomes empty is dropped. An unrecognized role sees nothing.
#[must_use]
pub fn filter_nav(items: &[NavItem], role: &Role) -> Vec<NavItem> {
    items
        .iter()
        .filter_map(|item| {
            if !item.roles.contains(role) {
                return None;
            }
            if item.submenu.is_empty() {
                return Some(item.clone());
            }
            let submenu = filter_nav(&item.submenu, role);
            if submenu.is_empty() {
                None
            } else {
                Some(NavItem {
                    submenu,
                    ..item.clone()
                })
            }
        })
        .collect()
}

/// The static dashboard navigation tree.
#[must_use]
pub fn default_nav() -> Vec<NavItem> {
    vec![
        NavItem::new(
            "Dashboard",
            Some("/dashboard"),
            "home",
            vec![Role::Admin, Role::User],
        ),
        NavItem::new("User Management", Some("/users"), "users", vec![Role::Admin])
            .with_submenu(vec![
                NavItem::new(
                    "All Users",
                    Some("/users/all"),
                    "users",
                    vec![Role::Admin, Role::Manager],
                ),
                NavItem::new("Add Users", Some("/users"), "settings", vec![Role::Admin]),
            ]),
        NavItem::new("Media Center", None, "video", vec![Role::Admin, Role::User])
            .with_submenu(vec![
                NavItem::new(
                    "Recordings",
                    Some("/recordings"),
                    "video",
                    vec![Role::Admin, Role::User],
                ),
                NavItem::new(
                    "Live Streams",
                    Some("/streams"),
                    "live",
                    vec![Role::Admin, Role::User],
                ),
            ]),
        NavItem::new("Scheduler", Some("/scheduler"), "calendar", vec![Role::Admin]),
        NavItem::new(
            "Alerts",
            Some("/notifications"),
            "alert",
            vec![Role::Admin, Role::User],
        ),
        NavItem::new("Device Hub", Some("/devices"), "drive", vec![Role::Admin]),
        NavItem::new(
            "System Settings",
            Some("/settings"),
            "settings",
            vec![Role::Admin, Role::User],
        ),
    ]
}
