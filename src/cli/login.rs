use clap::Args;

use crate::cli::status::print_state;
use crate::config::Initializer;
use crate::core::User;
use crate::domain::Role;
use crate::validate::{is_valid_email, sanitize};
use crate::{Result, SessionError};

/// Record a user authenticated elsewhere
#[derive(Args, Debug)]
pub struct LoginCommand {
    /// User id issued by the gateway
    #[arg(long)]
    id: String,
    /// Account email
    #[arg(long)]
    email: String,
    /// Display name
    #[arg(long)]
    full_name: String,
    /// Account role (student, organizer, sponsor)
    #[arg(long)]
    role: Role,
    /// Bearer token returned with the user
    #[arg(long, env = "TAKATHON_ACCESS_TOKEN")]
    access_token: Option<String>,
}

impl LoginCommand {
    pub fn run(self, initializer: &Initializer) -> Result<()> {
        let user = self.user()?;
        let store = initializer.build_store()?;

        store.login(user)?;
        if let Some(token) = self.access_token {
            store.set_access_token(Some(token));
        }

        print_state(&store.state())
    }

    fn user(&self) -> Result<User> {
        let email = self.email.trim();
        if !is_valid_email(email) {
            return Err(SessionError::InvalidEmail {
                email: email.to_owned(),
            });
        }
        let user = User::new(
            self.id.trim(),
            email,
            sanitize(&self.full_name),
            self.role,
        );
        user.validate()?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(email: &str, full_name: &str) -> LoginCommand {
        LoginCommand {
            id: "u1".into(),
            email: email.into(),
            full_name: full_name.into(),
            role: Role::Student,
            access_token: None,
        }
    }

    #[test]
    fn builds_sanitized_user() {
        let user = command(" a@b.com ", " <Ada> Lovelace ").user().unwrap();
        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.full_name, "Ada Lovelace");
        assert_eq!(user.role, Some(Role::Student));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            command("not-an-email", "Ada").user(),
            Err(SessionError::InvalidEmail { .. })
        ));
        assert!(matches!(
            command("a@b.com", "<>").user(),
            Err(SessionError::InvalidUserRecord { .. })
        ));
    }
}
