mod user;
pub use self::user::User;

mod state;
pub use self::state::{hydrate, Hydration, SessionState, STORAGE_KEY, STORAGE_VERSION};

mod subscriber;
pub use self::subscriber::Subscription;

mod store;
pub use self::store::SessionStore;
