use crate::store::TimeKeyedStore;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

static CREATED: AtomicUsize = AtomicUsize::new(0);

struct Counted;

impl Default for Counted {
    fn default() -> Self {
        CREATED.fetch_add(1, Ordering::SeqCst);
        Counted
    }
}

#[test]
fn get_or_create_is_idempotent() {
    let store: TimeKeyedStore<Mutex<Vec<u32>>> = TimeKeyedStore::new();

    let a = store.get_or_create(10);
    a.lock().push(1);
    let b = store.get_or_create(10);

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(*b.lock(), vec![1]);
    assert_eq!(store.len(), 1);
}

#[test]
fn concurrent_get_or_create_creates_exactly_one_item() {
    const CALLERS: usize = 16;

    let store: Arc<TimeKeyedStore<Counted>> = Arc::new(TimeKeyedStore::new());
    let barrier = Arc::new(Barrier::new(CALLERS));
    let before = CREATED.load(Ordering::SeqCst);

    let handles: Vec<_> = (0..CALLERS)
        .map(|_| {
            let store = store.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                store.get_or_create(777)
            })
        })
        .collect();

    let items: Vec<Arc<Counted>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(CREATED.load(Ordering::SeqCst) - before, 1);
    assert_eq!(items.len(), CALLERS);
    assert!(items.iter().all(|item| Arc::ptr_eq(item, &items[0])));
    assert_eq!(store.len(), 1);
}

#[test]
fn oldest_and_newest_track_min_and_max_keys() {
    let store: TimeKeyedStore<u32> = TimeKeyedStore::new();
    assert!(store.oldest().is_none());
    assert!(store.newest().is_none());

    store.add(30, Arc::new(3));
    store.add(10, Arc::new(1));
    store.add(20, Arc::new(2));

    let (oldest_key, oldest) = store.oldest().unwrap();
    let (newest_key, newest) = store.newest().unwrap();

    assert_eq!((oldest_key, *oldest), (10, 1));
    assert_eq!((newest_key, *newest), (30, 3));
    assert_eq!(store.oldest_key(), Some(10));
    assert_eq!(store.newest_key(), Some(30));
}

#[test]
fn add_keeps_existing_item_for_key() {
    let store: TimeKeyedStore<u32> = TimeKeyedStore::new();

    let first = store.add(5, Arc::new(1));
    let second = store.add(5, Arc::new(2));

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(*store.get(5).unwrap(), 1);
}

#[test]
fn remove_matches_instance_not_key() {
    let store: TimeKeyedStore<u32> = TimeKeyedStore::new();
    let stored = store.add(1, Arc::new(7));
    let lookalike = Arc::new(7);

    assert!(!store.remove(&lookalike));
    assert_eq!(store.len(), 1);

    assert!(store.remove(&stored));
    assert!(store.is_empty());

    // already gone
    assert!(!store.remove(&stored));
}

#[test]
fn discard_older_than_trims_prefix() {
    let store: TimeKeyedStore<i64> = TimeKeyedStore::new();
    for key in [1, 2, 3, 4, 5] {
        store.add(key, Arc::new(key));
    }

    assert_eq!(store.discard_older_than(3), 2);
    assert_eq!(store.oldest_key(), Some(3));
    assert_eq!(store.len(), 3);

    assert_eq!(store.discard_older_than(3), 0);
    assert_eq!(store.discard_older_than(100), 3);
    assert!(store.is_empty());
}

#[test]
fn find_newest_first_scans_in_reverse_key_order() {
    let store: TimeKeyedStore<&'static str> = TimeKeyedStore::new();
    store.add(1, Arc::new("old"));
    store.add(2, Arc::new("new"));

    let mut visited = Vec::new();
    let found = store.find_newest_first(|key, _| {
        visited.push(key);
        None::<()>
    });

    assert!(found.is_none());
    assert_eq!(visited, vec![2, 1]);

    let hit = store.find_newest_first(|key, item| item.starts_with('o').then_some(key));
    assert_eq!(hit, Some(1));
}

#[test]
fn wait_for_data_times_out_without_signal() {
    let store: TimeKeyedStore<u32> = TimeKeyedStore::new();
    let started = Instant::now();

    assert!(!store.wait_for_data(Duration::from_millis(20)));
    assert!(started.elapsed() >= Duration::from_millis(20));
}

#[test]
fn wait_for_data_wakes_on_notify() {
    let store: Arc<TimeKeyedStore<u32>> = Arc::new(TimeKeyedStore::new());
    let producer = store.clone();

    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        producer.notify_data_available();
    });

    assert!(store.wait_for_data(Duration::from_secs(10)));
    handle.join().unwrap();
}

#[test]
fn notify_before_wait_is_not_lost() {
    let store: TimeKeyedStore<u32> = TimeKeyedStore::new();
    store.notify_data_available();

    let started = Instant::now();
    assert!(store.wait_for_data(Duration::from_secs(10)));
    assert!(started.elapsed() < Duration::from_secs(5));

    // consumed
    assert!(!store.wait_for_data(Duration::from_millis(5)));
}
