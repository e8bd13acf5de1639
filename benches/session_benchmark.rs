use criterion::{criterion_group, criterion_main, Criterion};

use takathon_session::storage::{FileStorage, MemoryStorage};
use takathon_session::{hydrate, Role, SessionStore, User};

fn ada() -> User {
    User::new("u1", "a@b.com", "Ada Lovelace", Role::Student)
}

pub fn login_logout(c: &mut Criterion) {
    const NUM_CYCLE: usize = 100;

    let store = SessionStore::new(MemoryStorage::new());
    store.subscribe(|_| {}).detach();

    c.bench_function("login_logout_memory", |b| {
        b.iter(|| {
            for _ in 0..NUM_CYCLE {
                store.login(ada()).unwrap();
                store.logout();
            }
        });
    });

    let dir = tempfile::TempDir::new().unwrap();
    let store = SessionStore::new(FileStorage::open(dir.path(), "http://localhost:3001").unwrap());

    c.bench_function("login_logout_file", |b| {
        b.iter(|| {
            store.login(ada()).unwrap();
            store.logout();
        });
    });
}

pub fn hydration(c: &mut Criterion) {
    let store = SessionStore::new(MemoryStorage::new());
    store.login(ada()).unwrap();
    let raw = store.state().encode().unwrap();

    c.bench_function("hydrate", |b| {
        b.iter(|| hydrate(Some(&raw)));
    });
}

criterion_group!(benches, login_logout, hydration);
criterion_main!(benches);
