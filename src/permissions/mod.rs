//! Permission predicates over a per-session evaluator.
//!
//! The evaluator is passed in rather than looked up globally, so several
//! identities can be checked side by side.

pub mod session;

pub use session::{Role, Session};

use std::fmt;

/// Grants every permission when held.
pub const WILDCARD_PERMISSION: &str = "all";
pub const ADMIN_ROLE: &str = "admin";

pub trait PermissionEvaluator {
    fn has_permission(&self, name: &str) -> bool;
    fn has_role(&self, name: &str) -> bool;
}

impl<E: PermissionEvaluator + ?Sized> PermissionEvaluator for &E {
    fn has_permission(&self, name: &str) -> bool {
        (**self).has_permission(name)
    }

    fn has_role(&self, name: &str) -> bool {
        (**self).has_role(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permission name for `action` on `resource`, e.g. `parts:create`.
pub fn permission_name(resource: &str, action: Action) -> String {
    format!("{resource}:{action}")
}

pub struct Permissions<'a, E: ?Sized> {
    evaluator: &'a E,
}

impl<'a, E: PermissionEvaluator + ?Sized> Permissions<'a, E> {
    pub fn new(evaluator: &'a E) -> Self {
        Self { evaluator }
    }

    pub fn has_permission(&self, name: &str) -> bool {
        self.evaluator.has_permission(name)
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.evaluator.has_role(name)
    }

    pub fn can(&self, resource: &str, action: Action) -> bool {
        self.has_permission(&permission_name(resource, action))
            || self.has_permission(WILDCARD_PERMISSION)
    }

    pub fn can_create(&self, resource: &str) -> bool {
        self.can(resource, Action::Create)
    }

    pub fn can_read(&self, resource: &str) -> bool {
        self.can(resource, Action::Read)
    }

    pub fn can_update(&self, resource: &str) -> bool {
        self.can(resource, Action::Update)
    }

    pub fn can_delete(&self, resource: &str) -> bool {
        self.can(resource, Action::Delete)
    }

    pub fn has_any_permission<'n>(&self, names: impl IntoIterator<Item = &'n str>) -> bool {
        names.into_iter().any(|name| self.has_permission(name))
    }

    pub fn has_all_permissions<'n>(&self, names: impl IntoIterator<Item = &'n str>) -> bool {
        names.into_iter().all(|name| self.has_permission(name))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }
}
