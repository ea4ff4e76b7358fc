// file: src/models/session.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// A lawyer working their own matters.
    FieldWorker,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Parses the role claim carried by the identity token.
    pub fn from_claim(claim: &str) -> Result<Self, String> {
        match claim {
            "LAWYER" => Ok(Role::FieldWorker),
            "ADMIN" => Ok(Role::Admin),
            "SUPERADMIN" => Ok(Role::SuperAdmin),
            _ => Err(format!("Unknown role claim: {}", claim)),
        }
    }

    pub fn as_claim(&self) -> &'static str {
        match self {
            Role::FieldWorker => "LAWYER",
            Role::Admin => "ADMIN",
            Role::SuperAdmin => "SUPERADMIN",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

/// The signed-in user, passed explicitly to every operation that needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub role: Role,
}

impl Session {
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            email: None,
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_claims() {
        assert_eq!(Role::from_claim("LAWYER").unwrap(), Role::FieldWorker);
        assert_eq!(Role::from_claim("SUPERADMIN").unwrap(), Role::SuperAdmin);
        assert!(Role::from_claim("lawyer").is_err());
        assert!(Role::Admin.is_admin());
        assert!(!Role::FieldWorker.is_admin());
        assert_eq!(Role::Admin.as_claim(), "ADMIN");
    }
}
