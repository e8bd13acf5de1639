use serde::{Deserialize, Serialize};

use crate::domain::Role;
use crate::SessionError;

/// The signed-in account as recorded by the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Option<Role>,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        full_name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            full_name: full_name.into(),
            role: Some(role),
        }
    }

    /// Names of the fields that are blank or unset.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.id.trim().is_empty() {
            missing.push("id");
        }
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        if self.full_name.trim().is_empty() {
            missing.push("fullName");
        }
        if self.role.is_none() {
            missing.push("role");
        }
        missing
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SessionError::InvalidUserRecord { missing })
        }
    }
}
