//! Where each front-end lives and where a signed-in user should land.

use serde::Deserialize;

use crate::domain::Role;

pub mod env {
    pub const LANDING_URL: &str = "TAKATHON_LANDING_URL";
    pub const STUDENT_URL: &str = "TAKATHON_STUDENT_URL";
    pub const ORGANIZER_URL: &str = "TAKATHON_ORGANIZER_URL";
    pub const SPONSOR_URL: &str = "TAKATHON_SPONSOR_URL";
}

pub const DEFAULT_LANDING_URL: &str = "http://localhost:3000";
pub const DEFAULT_STUDENT_URL: &str = "http://localhost:3001";
pub const DEFAULT_ORGANIZER_URL: &str = "http://localhost:3002";
pub const DEFAULT_SPONSOR_URL: &str = "http://localhost:3003";

/// Base URLs of the sibling applications.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppUrls {
    pub landing: String,
    pub student: String,
    pub organizer: String,
    pub sponsor: String,
}

impl Default for AppUrls {
    fn default() -> Self {
        Self {
            landing: DEFAULT_LANDING_URL.to_owned(),
            student: DEFAULT_STUDENT_URL.to_owned(),
            organizer: DEFAULT_ORGANIZER_URL.to_owned(),
            sponsor: DEFAULT_SPONSOR_URL.to_owned(),
        }
    }
}

impl AppUrls {
    /// Defaults overridden by any of the `TAKATHON_*_URL` variables.
    pub fn from_env() -> Self {
        Self::default().override_with(|name| std::env::var(name).ok())
    }

    /// Replace each URL for which `lookup` yields a non-empty value.
    pub fn override_with<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        for (name, url) in [
            (env::LANDING_URL, &mut self.landing),
            (env::STUDENT_URL, &mut self.student),
            (env::ORGANIZER_URL, &mut self.organizer),
            (env::SPONSOR_URL, &mut self.sponsor),
        ] {
            if let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) {
                *url = value;
            }
        }
        self
    }

    pub fn landing(&self) -> &str {
        trim_base(&self.landing)
    }

    pub fn student(&self) -> &str {
        trim_base(&self.student)
    }

    pub fn organizer(&self) -> &str {
        trim_base(&self.organizer)
    }

    pub fn sponsor(&self) -> &str {
        trim_base(&self.sponsor)
    }

    /// Canonical login page every application's login entry forwards to.
    pub fn login_url(&self) -> String {
        format!("{}/login", self.landing())
    }

    /// Landing page for `role` after signing in. Without a role the user is
    /// sent to log in.
    pub fn redirect_url(&self, role: Option<Role>) -> String {
        match role {
            Some(Role::Student) => format!("{}/", self.student()),
            Some(Role::Organizer) => format!("{}/", self.organizer()),
            Some(Role::Sponsor) => format!("{}/dashboard", self.sponsor()),
            None => self.login_url(),
        }
    }
}

fn trim_base(url: &str) -> &str {
    url.trim().trim_end_matches('/')
}
