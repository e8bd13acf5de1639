use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, Weak};
use std::thread::{self, ThreadId};

use crate::core::SessionState;

pub(crate) type Listener = Arc<dyn Fn(&SessionState) + Send + Sync>;

struct Entry {
    listener: Listener,
    // Sequence number of the newest snapshot handed to the listener.
    last_seen: AtomicU64,
}

#[derive(Default)]
pub(crate) struct Listeners {
    inner: Mutex<Registry>,
    gate: DeliveryGate,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    // Ordered by id so listeners run in subscription order.
    listeners: BTreeMap<u64, Arc<Entry>>,
}

impl Listeners {
    /// Register `listener`; snapshots up to `seq` count as already seen.
    pub(crate) fn add(&self, listener: Listener, seq: u64) -> u64 {
        let mut registry = self.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.insert(
            id,
            Arc::new(Entry {
                listener,
                last_seen: AtomicU64::new(seq),
            }),
        );
        id
    }

    pub(crate) fn remove(&self, id: u64) -> bool {
        self.lock().listeners.remove(&id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Call every listener with the snapshot committed as `seq`.
    ///
    /// One thread delivers at a time, and a listener never receives a
    /// snapshot older than one it has already seen. The registry is not
    /// locked while listeners run and the delivering thread may re-enter,
    /// so a listener may subscribe, unsubscribe or mutate the store.
    pub(crate) fn notify(&self, seq: u64, state: &SessionState) {
        let _delivering = self.gate.enter();

        let entries: Vec<Arc<Entry>> = self.lock().listeners.values().cloned().collect();
        for entry in entries {
            if entry.last_seen.fetch_max(seq, Ordering::SeqCst) < seq {
                (entry.listener)(state);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// Mutual exclusion between threads that the owning thread may re-enter.
#[derive(Default)]
struct DeliveryGate {
    owner: Mutex<Option<(ThreadId, usize)>>,
    released: Condvar,
}

struct GateGuard<'a> {
    gate: &'a DeliveryGate,
}

impl DeliveryGate {
    fn enter(&self) -> GateGuard<'_> {
        let current = thread::current().id();
        let mut owner = self
            .owner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        loop {
            match owner.as_mut() {
                None => {
                    *owner = Some((current, 1));
                    break;
                }
                Some((id, depth)) if *id == current => {
                    *depth += 1;
                    break;
                }
                Some(_) => {
                    owner = self
                        .released
                        .wait(owner)
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                }
            }
        }
        GateGuard { gate: self }
    }
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        let mut owner = self
            .gate
            .owner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some((_, depth)) = owner.as_mut() {
            *depth -= 1;
            if *depth == 0 {
                *owner = None;
                self.gate.released.notify_all();
            }
        }
    }
}

/// Keeps a listener registered until dropped.
#[must_use = "the listener is removed when the subscription is dropped"]
pub struct Subscription {
    id: u64,
    listeners: Weak<Listeners>,
}

impl Subscription {
    pub(crate) fn new(id: u64, listeners: &Arc<Listeners>) -> Self {
        Self {
            id,
            listeners: Arc::downgrade(listeners),
        }
    }

    pub fn unsubscribe(self) {
        // Removal happens in drop.
    }

    /// Keep the listener registered for the lifetime of the store.
    pub fn detach(mut self) {
        self.listeners = Weak::new();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.remove(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
