use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::cli::{login, logout, redirect, status, token};
use crate::common::warn;
use crate::config::{env, Initializer};
use crate::storage::Backend;
use crate::Result;

/// Takathon session command
#[derive(Parser, Debug)]
#[command(version, propagate_version = true, subcommand_required = true)]
pub struct TakathonCommand {
    /// Store options
    #[command(flatten)]
    pub store: StoreOptions,
    /// Subcommand
    #[command(subcommand)]
    pub command: Command,
}

/// Options locating the persisted session
#[derive(Args, Debug, Default)]
pub struct StoreOptions {
    /// Configuration file path
    #[arg(long, short = 'C', env = env::CONFIG_PATH, global = true)]
    pub config: Option<PathBuf>,
    /// Root directory where sessions are stored
    #[arg(long, env = env::DIR, global = true)]
    pub dir: Option<PathBuf>,
    /// Origin (scheme://host:port) the session belongs to
    #[arg(long, env = env::ORIGIN, global = true)]
    pub origin: Option<String>,
    /// Storage backend (file, memory, cookie). Only file keeps the session
    /// between runs; memory and cookie do not persist once the command exits
    #[arg(long, global = true)]
    pub backend: Option<Backend>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record a signed-in user
    Login(login::LoginCommand),
    /// Sign out
    Logout(logout::LogoutCommand),
    /// Print the current session
    Status(status::StatusCommand),
    /// Manage the access token
    Token(token::TokenCommand),
    /// Print where to send the user
    Redirect(redirect::RedirectCommand),
}

/// Parse command line args
pub fn parse() -> TakathonCommand {
    TakathonCommand::parse()
}

impl StoreOptions {
    /// Configuration file, if any, overridden by command line flags.
    pub fn initializer(&self) -> Result<Initializer> {
        let mut initializer = match &self.config {
            Some(path) => Initializer::load_config_file(path)?,
            None => Initializer::default(),
        };
        initializer.set_backend(self.backend);
        initializer.set_root_dir(self.dir.clone());
        initializer.set_origin(self.origin.clone());
        initializer.apply_url_env();

        let backend = initializer.config.storage.backend;
        if !backend.outlives_process() {
            warn!(
                ?backend,
                "Session will not persist after this command exits"
            );
        }

        Ok(initializer)
    }
}

impl TakathonCommand {
    pub fn run(self) -> Result<()> {
        let TakathonCommand { store, command } = self;
        let initializer = store.initializer()?;

        match command {
            Command::Login(login) => login.run(&initializer),
            Command::Logout(logout) => logout.run(&initializer),
            Command::Status(status) => status.run(&initializer),
            Command::Token(token) => token.run(&initializer),
            Command::Redirect(redirect) => redirect.run(&initializer),
        }
    }
}
