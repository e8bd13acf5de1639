mod root;
pub use root::{parse, Command, StoreOptions, TakathonCommand};

pub mod login;
pub mod logout;
pub mod redirect;
pub mod status;
pub mod token;
