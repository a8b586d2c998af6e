use crate::error::Result;
use crate::permissions::PermissionEvaluator;
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Role {
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Authenticated identity as returned by the user endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "SessionPayload")]
pub struct Session {
    username: Option<String>,
    roles: HashSet<String>,
    permissions: HashSet<String>,
}

#[derive(Debug, Deserialize)]
struct SessionPayload {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    roles: Vec<Role>,
}

impl From<SessionPayload> for Session {
    fn from(payload: SessionPayload) -> Self {
        let mut session = Session {
            username: payload.username,
            ..Session::default()
        };
        for role in payload.roles {
            session.add_role(role);
        }
        session
    }
}

impl Session {
    /// No user; every check fails.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn builder(username: impl Into<String>) -> SessionBuilder {
        SessionBuilder {
            session: Session {
                username: Some(username.into()),
                ..Session::default()
            },
        }
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.username.is_some()
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(String::as_str)
    }

    fn add_role(&mut self, role: Role) {
        self.permissions.extend(role.permissions);
        self.roles.insert(role.name);
    }
}

impl PermissionEvaluator for Session {
    fn has_permission(&self, name: &str) -> bool {
        self.permissions.contains(name)
    }

    fn has_role(&self, name: &str) -> bool {
        self.roles.contains(name)
    }
}

pub struct SessionBuilder {
    session: Session,
}

impl SessionBuilder {
    pub fn role<'a>(mut self, name: impl Into<String>, permissions: impl IntoIterator<Item = &'a str>) -> Self {
        self.session.add_role(Role {
            name: name.into(),
            permissions: permissions.into_iter().map(str::to_string).collect(),
        });
        self
    }

    pub fn build(self) -> Session {
        self.session
    }
}
