use serde::{Deserialize, Serialize};

/// Viewer/actor roles. The engine trusts the role it is handed; deriving and
/// verifying it is the authentication collaborator's job.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Admin,
    SubAdmin,
    Committee,
    Resident,
    Guest,
}

impl Role {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "admin" => Some(Role::Admin),
            "subAdmin" => Some(Role::SubAdmin),
            "committee" => Some(Role::Committee),
            "resident" => Some(Role::Resident),
            "guest" => Some(Role::Guest),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::SubAdmin => "subAdmin",
            Role::Committee => "committee",
            Role::Resident => "resident",
            Role::Guest => "guest",
        }
    }

    pub fn is_administrative(&self) -> bool {
        matches!(self, Role::Admin | Role::SubAdmin)
    }
}

/// Identity attached to a request before the engine is invoked. Guests carry
/// a caller-supplied anonymous id instead of an account id.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoleContext {
    pub role: Role,
    pub id: Option<String>,
}

impl RoleContext {
    pub fn new(role: Role, id: Option<String>) -> Self {
        Self { role, id }
    }
}
