use clap::{Args, Subcommand};

use crate::config::Initializer;
use crate::Result;

#[derive(Args, Debug)]
pub struct TokenCommand {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Store a bearer token for the session
    Set {
        #[arg(value_name = "TOKEN")]
        token: String,
    },
    /// Drop the bearer token
    Clear,
}

impl TokenCommand {
    pub fn run(self, initializer: &Initializer) -> Result<()> {
        let TokenCommand { command } = self;
        let store = initializer.build_store()?;

        match command {
            Command::Set { token } => store.set_access_token(Some(token)),
            Command::Clear => store.set_access_token(None),
        }
        println!("OK");
        Ok(())
    }
}
