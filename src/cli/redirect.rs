use clap::Args;

use crate::config::Initializer;
use crate::domain::Role;
use crate::Result;

/// Print the URL the user should be sent to
#[derive(Args, Debug)]
pub struct RedirectCommand {
    /// Role to resolve instead of the signed-in user's
    #[arg(long)]
    role: Option<Role>,
    /// Print where an application's own login entry forwards to
    #[arg(long, conflicts_with = "role")]
    login_entry: bool,
}

impl RedirectCommand {
    pub fn run(self, initializer: &Initializer) -> Result<()> {
        let urls = initializer.urls();

        let url = if self.login_entry {
            urls.login_url()
        } else {
            let role = match self.role {
                Some(role) => Some(role),
                None => initializer.build_store()?.state().role(),
            };
            urls.redirect_url(role)
        };

        println!("{}", url);
        Ok(())
    }
}
