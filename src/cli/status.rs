use clap::Args;
use serde::Serialize;

use crate::config::Initializer;
use crate::core::{SessionState, User};
use crate::{Result, SessionError};

/// Print the current session
#[derive(Args, Debug)]
pub struct StatusCommand {}

impl StatusCommand {
    pub fn run(self, initializer: &Initializer) -> Result<()> {
        let store = initializer.build_store()?;
        print_state(&store.state())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusView<'a> {
    user: Option<&'a User>,
    is_authenticated: bool,
    has_access_token: bool,
}

pub(super) fn render_state(state: &SessionState) -> Result<String> {
    let view = StatusView {
        user: state.user(),
        is_authenticated: state.is_authenticated(),
        has_access_token: state.access_token().is_some(),
    };
    serde_json::to_string_pretty(&view)
        .map_err(|err| SessionError::from(crate::error::Error::encode(err)))
}

pub(super) fn print_state(state: &SessionState) -> Result<()> {
    println!("{}", render_state(state)?);
    Ok(())
}
