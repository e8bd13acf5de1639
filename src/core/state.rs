use serde::{Deserialize, Serialize};

use crate::common::{debug, warn, Error, ErrorKind, Result};
use crate::core::User;

/// Fixed key the session record lives under.
pub const STORAGE_KEY: &str = "auth-storage";

/// Schema version written next to the state. Records carrying another
/// version are not adopted.
pub const STORAGE_VERSION: u32 = 0;

/// Immutable snapshot of who is signed in.
///
/// Authentication is derived from the presence of a user, so a snapshot can
/// never claim to be authenticated without one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    user: Option<User>,
    access_token: Option<String>,
}

impl SessionState {
    pub(crate) fn authenticated(user: User, access_token: Option<String>) -> Self {
        Self {
            user: Some(user),
            access_token,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn role(&self) -> Option<crate::Role> {
        self.user.as_ref().and_then(|u| u.role)
    }

    pub(crate) fn with_access_token(&self, access_token: Option<String>) -> Self {
        Self {
            user: self.user.clone(),
            access_token,
        }
    }

    /// Encode as the persisted record.
    pub fn encode(&self) -> Result<String> {
        let record = Record {
            state: RecordState {
                user: self.user.clone(),
                is_authenticated: self.is_authenticated(),
                access_token: self.access_token.clone(),
            },
            version: STORAGE_VERSION,
        };
        serde_json::to_string(&record).map_err(Error::encode)
    }

    /// Decode a persisted record, rejecting anything that would not be a
    /// reachable state.
    pub fn decode(raw: &str) -> Result<Self> {
        let Record { state, version } = serde_json::from_str::<Record>(raw)?;

        if version != STORAGE_VERSION {
            return Err(decode_error(format!(
                "unsupported version {} (expected {})",
                version, STORAGE_VERSION
            )));
        }
        if state.is_authenticated != state.user.is_some() {
            return Err(decode_error(format!(
                "isAuthenticated={} disagrees with user presence",
                state.is_authenticated
            )));
        }
        if let Some(user) = &state.user {
            let missing = user.missing_fields();
            if !missing.is_empty() {
                return Err(decode_error(format!(
                    "stored user misses {}",
                    missing.join(", ")
                )));
            }
        }

        Ok(Self {
            user: state.user,
            access_token: state.access_token,
        })
    }
}

fn decode_error(description: String) -> Error {
    ErrorKind::Decode { description }.into()
}

#[derive(Serialize, Deserialize)]
struct Record {
    state: RecordState,
    #[serde(default)]
    version: u32,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordState {
    #[serde(default)]
    user: Option<User>,
    is_authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
}

/// How the initial state of a store was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hydration {
    /// A persisted record was decoded and adopted.
    Restored,
    /// Nothing was persisted under the key.
    Empty,
    /// A record was present but could not be decoded.
    Discarded,
}

/// Turn whatever was read from the medium into an initial state.
///
/// Never fails: absent or undecodable input yields the signed-out state.
pub fn hydrate(raw: Option<&str>) -> (SessionState, Hydration) {
    let raw = match raw {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return (SessionState::default(), Hydration::Empty),
    };

    match SessionState::decode(raw) {
        Ok(state) => {
            debug!(authenticated = state.is_authenticated(), "Hydrated session");
            (state, Hydration::Restored)
        }
        Err(err) => {
            warn!("Discard persisted session. {}", err);
            (SessionState::default(), Hydration::Discarded)
        }
    }
}
