use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;

use crate::common::{debug, info, warn, Result as InternalResult};
use crate::core::state::{hydrate, Hydration, STORAGE_KEY};
use crate::core::subscriber::{Listeners, Subscription};
use crate::core::{SessionState, User};
use crate::storage::Storage;
use crate::Result;

/// Single source of truth for who is signed in within one application
/// instance.
///
/// Construct one at bootstrap and hand it (usually behind an `Arc`) to every
/// surface that needs it. Every mutation is written to the storage medium
/// and announced to subscribers before the mutating call returns.
pub struct SessionStore {
    storage: Box<dyn Storage>,
    // Held across commit and persistence write so the medium sees mutations
    // in commit order.
    state: Mutex<Committed>,
    listeners: Arc<Listeners>,
    watch_tx: watch::Sender<Arc<SessionState>>,
    hydration: Hydration,
}

impl SessionStore {
    /// Build a store and hydrate it from `storage`.
    pub fn new(storage: impl Storage + 'static) -> Self {
        let raw = match storage.get_item(STORAGE_KEY) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("Read persisted session. {}", err);
                None
            }
        };
        let (state, hydration) = hydrate(raw.as_deref());
        debug!(?hydration, "Session store initialized");

        let state = Arc::new(state);
        let (watch_tx, _) = watch::channel(state.clone());

        Self {
            storage: Box::new(storage),
            state: Mutex::new(Committed { seq: 0, state }),
            listeners: Arc::new(Listeners::default()),
            watch_tx,
            hydration,
        }
    }

    /// Latest committed snapshot.
    pub fn state(&self) -> Arc<SessionState> {
        self.lock().state.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().state.is_authenticated()
    }

    pub fn hydration(&self) -> Hydration {
        self.hydration
    }

    /// Record a user authenticated elsewhere, replacing any current user.
    pub fn login(&self, user: User) -> Result<()> {
        user.validate()?;
        info!(user_id = %user.id, role = ?user.role, "Login");

        self.commit(true, move |current| {
            Some(SessionState::authenticated(
                user,
                current.access_token().map(str::to_owned),
            ))
        });
        Ok(())
    }

    /// Clear the user and access token. Calling it while signed out rewrites
    /// the cleared record but notifies nobody.
    pub fn logout(&self) {
        self.commit(true, |current| {
            if *current == SessionState::default() {
                None
            } else {
                if let Some(user) = current.user() {
                    info!(user_id = %user.id, "Logout");
                }
                Some(SessionState::default())
            }
        });
    }

    pub fn set_access_token(&self, access_token: Option<String>) {
        self.commit(true, |current| {
            if current.access_token() == access_token.as_deref() {
                None
            } else {
                debug!(present = access_token.is_some(), "Set access token");
                Some(current.with_access_token(access_token))
            }
        });
    }

    /// Re-read the persisted record, adopting it when it differs from the
    /// in-memory state. An undecodable record or an unreadable medium leaves
    /// the state untouched.
    pub fn rehydrate(&self) -> Hydration {
        let raw = match self.storage.get_item(STORAGE_KEY) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("Read persisted session. {}", err);
                return Hydration::Empty;
            }
        };
        let (persisted, hydration) = hydrate(raw.as_deref());
        if hydration == Hydration::Discarded {
            return hydration;
        }

        self.commit(false, |current| {
            if *current == persisted {
                None
            } else {
                debug!("Adopt session changed in storage");
                Some(persisted)
            }
        });
        hydration
    }

    /// Register `listener` to be called with every new snapshot.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&SessionState) + Send + Sync + 'static,
    {
        let seq = self.lock().seq;
        let id = self.listeners.add(Arc::new(listener), seq);
        Subscription::new(id, &self.listeners)
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// Channel view of the snapshots for async consumers.
    pub fn watch(&self) -> watch::Receiver<Arc<SessionState>> {
        self.watch_tx.subscribe()
    }

    /// The single mutation path.
    ///
    /// `next` returns `None` when the state does not change. The resulting
    /// state is persisted (when `persist` is set) in either case, listeners
    /// only run on change.
    fn commit<F>(&self, persist: bool, next: F)
    where
        F: FnOnce(&SessionState) -> Option<SessionState>,
    {
        let changed = {
            let mut guard = self.lock();
            let changed = next(&guard.state).map(Arc::new);
            if let Some(state) = &changed {
                guard.seq += 1;
                guard.state = state.clone();
                self.watch_tx.send_replace(state.clone());
            }
            if persist {
                self.persist(&guard.state);
            }
            changed.map(|state| (guard.seq, state))
        };

        if let Some((seq, state)) = changed {
            self.listeners.notify(seq, &state);
        }
    }

    // Write failures are dropped, the in-memory state stays authoritative.
    fn persist(&self, state: &SessionState) {
        let result: InternalResult<()> = state
            .encode()
            .and_then(|raw| self.storage.set_item(STORAGE_KEY, &raw));
        if let Err(err) = result {
            warn!("Persist session. {}", err);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Committed> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

struct Committed {
    // Incremented on every change; orders deliveries to listeners.
    seq: u64,
    state: Arc<SessionState>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.state())
            .field("hydration", &self.hydration)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::storage::{CookieStorage, MemoryStorage};
    use crate::{Role, SessionError};

    fn ada() -> User {
        User::new("u1", "a@b.com", "Ada Lovelace", Role::Student)
    }

    fn persisted(storage: &MemoryStorage) -> SessionState {
        let raw = storage.get_item(STORAGE_KEY).unwrap().unwrap();
        SessionState::decode(&raw).unwrap()
    }

    #[test]
    fn login_then_logout() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone());
        assert_eq!(store.hydration(), Hydration::Empty);
        assert_eq!(*store.state(), SessionState::default());

        store.login(ada()).unwrap();
        let state = store.state();
        assert!(state.is_authenticated());
        assert_eq!(state.user(), Some(&ada()));
        assert_eq!(persisted(&storage), *state);

        store.logout();
        let state = store.state();
        assert!(!state.is_authenticated());
        assert_eq!(state.user(), None);
        assert_eq!(persisted(&storage), SessionState::default());
    }

    #[test]
    fn logout_is_idempotent() {
        let store = SessionStore::new(MemoryStorage::new());
        store.login(ada()).unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let _sub = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.logout();
        let once = store.state();
        store.logout();
        assert_eq!(store.state(), once);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn login_rejects_incomplete_user() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone());
        let mut user = ada();
        user.role = None;

        let err = store.login(user).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidUserRecord { ref missing } if missing == &["role"]
        ));
        assert!(!store.is_authenticated());
        assert!(storage.is_empty());
    }

    #[test]
    fn login_overwrites_current_user() {
        let store = SessionStore::new(MemoryStorage::new());
        store.login(ada()).unwrap();
        store.set_access_token(Some("t1".into()));

        let grace = User::new("u2", "g@h.com", "Grace Hopper", Role::Organizer);
        store.login(grace.clone()).unwrap();

        let state = store.state();
        assert_eq!(state.user(), Some(&grace));
        assert_eq!(state.access_token(), Some("t1"));
    }

    #[test]
    fn listener_sees_state_before_login_returns() {
        let store = SessionStore::new(MemoryStorage::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        let _sub = store.subscribe(move |state| {
            log.lock().unwrap().push(state.clone());
        });

        store.login(ada()).unwrap();
        {
            let seen = seen.lock().unwrap();
            assert_eq!(seen.len(), 1);
            assert_eq!(seen[0].user(), Some(&ada()));
        }
    }

    #[test]
    fn listener_may_read_and_mutate_store() {
        let store = Arc::new(SessionStore::new(MemoryStorage::new()));
        let inner = Arc::downgrade(&store);
        let _sub = store.subscribe(move |state| {
            let store = match inner.upgrade() {
                Some(store) => store,
                None => return,
            };
            assert_eq!(*store.state(), *state);
            if state.is_authenticated() && state.access_token().is_none() {
                store.set_access_token(Some("issued".into()));
            }
        });

        store.login(ada()).unwrap();
        assert_eq!(store.state().access_token(), Some("issued"));
    }

    #[test]
    fn dropped_subscription_is_removed() {
        let store = SessionStore::new(MemoryStorage::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let sub = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(store.subscriber_count(), 1);

        sub.unsubscribe();
        assert_eq!(store.subscriber_count(), 0);
        store.login(ada()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn detached_subscription_stays() {
        let store = SessionStore::new(MemoryStorage::new());
        store.subscribe(|_| {}).detach();
        assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn write_failure_keeps_memory_state() {
        let store = SessionStore::new(MemoryStorage::with_quota(16));
        store.login(ada()).unwrap();
        assert!(store.is_authenticated());

        let store = SessionStore::new(MemoryStorage::unavailable());
        assert_eq!(store.hydration(), Hydration::Empty);
        store.login(ada()).unwrap();
        assert!(store.is_authenticated());
        store.logout();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn hydrates_from_storage() {
        let storage = Arc::new(MemoryStorage::new());
        SessionStore::new(storage.clone()).login(ada()).unwrap();

        let store = SessionStore::new(storage.clone());
        assert_eq!(store.hydration(), Hydration::Restored);
        assert_eq!(store.state().user(), Some(&ada()));

        storage.set_item(STORAGE_KEY, "{garbage").unwrap();
        let store = SessionStore::new(storage);
        assert_eq!(store.hydration(), Hydration::Discarded);
        assert_eq!(*store.state(), SessionState::default());
    }

    #[test]
    fn rehydrate_adopts_other_instance_changes() {
        let storage = Arc::new(MemoryStorage::new());
        let tab1 = SessionStore::new(storage.clone());
        let tab2 = SessionStore::new(storage.clone());

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let _sub = tab2.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tab1.login(ada()).unwrap();
        assert!(!tab2.is_authenticated());

        assert_eq!(tab2.rehydrate(), Hydration::Restored);
        assert_eq!(tab2.state().user(), Some(&ada()));
        assert_eq!(tab2.rehydrate(), Hydration::Restored);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        storage.set_item(STORAGE_KEY, "nope").unwrap();
        assert_eq!(tab2.rehydrate(), Hydration::Discarded);
        assert!(tab2.is_authenticated());
    }

    #[test]
    fn watch_receives_latest_snapshot() {
        let store = SessionStore::new(MemoryStorage::new());
        let mut rx = store.watch();
        assert!(!rx.borrow().is_authenticated());

        store.login(ada()).unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_authenticated());

        tokio_test::block_on(async move {
            store.logout();
            rx.changed().await.unwrap();
            assert!(!rx.borrow().is_authenticated());
        });
    }

    #[test]
    fn nested_mutation_reaches_later_listeners_last() {
        let store = Arc::new(SessionStore::new(MemoryStorage::new()));

        let inner = Arc::downgrade(&store);
        let _issuer = store.subscribe(move |state| {
            if let Some(store) = inner.upgrade() {
                if state.is_authenticated() && state.access_token().is_none() {
                    store.set_access_token(Some("issued".into()));
                }
            }
        });

        let tokens = Arc::new(Mutex::new(Vec::new()));
        let log = tokens.clone();
        let _observer = store.subscribe(move |state| {
            log.lock()
                .unwrap()
                .push(state.access_token().map(str::to_owned));
        });

        store.login(ada()).unwrap();

        assert_eq!(store.state().access_token(), Some("issued"));
        assert_eq!(*tokens.lock().unwrap(), vec![Some("issued".to_owned())]);
    }

    #[test]
    fn concurrent_commits_leave_listener_on_latest_state() {
        let store = Arc::new(SessionStore::new(MemoryStorage::new()));
        store.login(ada()).unwrap();

        let last = Arc::new(Mutex::new(None));
        let log = last.clone();
        let _sub = store.subscribe(move |state| {
            *log.lock().unwrap() = state.access_token().map(str::to_owned);
        });

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        store.set_access_token(Some(format!("t{}-{}", t, i)));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(
            last.lock().unwrap().as_deref(),
            store.state().access_token()
        );
    }

    #[test]
    fn rehydrate_keeps_state_when_medium_unreadable() {
        let store = SessionStore::new(MemoryStorage::unavailable());
        store.login(ada()).unwrap();

        assert_eq!(store.rehydrate(), Hydration::Empty);
        assert!(store.is_authenticated());
    }

    #[test]
    fn undecodable_cookie_is_reported_discarded() {
        let storage = Arc::new(CookieStorage::new("http://localhost:3003"));
        storage
            .jar()
            .apply_set_cookie("auth-storage=%FF", chrono::Utc::now())
            .unwrap();

        let store = SessionStore::new(storage);
        assert_eq!(store.hydration(), Hydration::Discarded);
        assert!(!store.is_authenticated());
    }
}
