pub mod app {
    pub const NAME: &str = "TAkathon";
    pub const DESCRIPTION: &str = "AI-powered hackathon team formation platform";
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}

pub mod auth {
    pub const PASSWORD_MIN_LENGTH: usize = 8;
    pub const PASSWORD_MAX_LENGTH: usize = 128;
    pub const USERNAME_MIN_LENGTH: usize = 3;
    pub const USERNAME_MAX_LENGTH: usize = 30;
    pub const ACCESS_TOKEN_EXPIRY_DAYS: i64 = 7;
    pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 30;
}

pub mod team {
    pub const DEFAULT_MAX_SIZE: usize = 5;
    pub const DEFAULT_MIN_SIZE: usize = 2;
    pub const MAX_SIZE_LIMIT: usize = 10;
    pub const INVITATION_EXPIRY_DAYS: i64 = 7;
}

pub mod hackathon {
    pub const MIN_DURATION_HOURS: i64 = 12;
    pub const MAX_DURATION_DAYS: i64 = 7;
    pub const REGISTRATION_ADVANCE_MIN_DAYS: i64 = 1;
}

pub mod pagination {
    pub const DEFAULT_PAGE_SIZE: usize = 20;
    pub const MAX_PAGE_SIZE: usize = 100;

    /// Clamp a requested page size into the accepted range.
    pub fn page_size(requested: Option<usize>) -> usize {
        match requested {
            Some(0) | None => DEFAULT_PAGE_SIZE,
            Some(n) => n.min(MAX_PAGE_SIZE),
        }
    }
}
