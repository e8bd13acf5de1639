use clap::Args;

use crate::config::Initializer;
use crate::Result;

/// Sign out
#[derive(Args, Debug)]
pub struct LogoutCommand {}

impl LogoutCommand {
    pub fn run(self, initializer: &Initializer) -> Result<()> {
        let store = initializer.build_store()?;
        store.logout();
        println!("OK");
        Ok(())
    }
}
