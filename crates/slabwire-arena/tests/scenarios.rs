//! Integration tests: end-to-end arena scenarios at default geometry.

use std::collections::HashSet;

use slabwire_arena::{Arena, ArenaConfig, ArenaError};
use slabwire_core::{FreeBlockRegistry, RegistryFull, SizeClass};
use slabwire_test_utils::{assert_conserved, assert_no_aliasing, pattern, tiny_config, MockRegistry};

fn default_arena() -> Arena {
    Arena::new(ArenaConfig::default()).unwrap()
}

#[test]
fn two_appends_promote_small_to_medium() {
    let arena = default_arena();
    let data = pattern(5000);
    let mut msg = arena.acquire().unwrap();
    let small_offset = msg.offset();

    assert_eq!(msg.append(&data, 0, 4000).unwrap(), 4000);
    assert_eq!(msg.class(), SizeClass::Small);
    assert_eq!(msg.remaining(), 96);

    assert_eq!(msg.append(&data, 4000, 1000).unwrap(), 1000);
    assert_eq!(msg.class(), SizeClass::Medium);
    assert_eq!(msg.capacity(), 131_072);
    assert_eq!(msg.len(), 5000);
    assert_eq!(msg.to_vec(), data);

    // The small block went back to the registry.
    assert_eq!(arena.free_blocks(SizeClass::Small), 1024);
    assert_eq!(arena.live_blocks(SizeClass::Small), 0);
    let mut others: Vec<_> = (0..1024).map(|_| arena.acquire().unwrap()).collect();
    assert!(others.iter().any(|m| m.offset() == small_offset));
    others.clear();
    assert_conserved(&arena);
}

#[test]
fn acquire_all_small_blocks_then_reuse() {
    let arena = default_arena();
    let mut held: Vec<_> = (0..1024).map(|_| arena.acquire().unwrap()).collect();
    assert_no_aliasing(&held);

    let offsets: HashSet<u32> = held.iter().map(|m| m.offset()).collect();
    assert_eq!(offsets.len(), 1024);
    assert!(offsets.iter().all(|o| o % 4096 == 0));

    assert!(arena.acquire().is_none());
    assert_conserved(&arena);

    let released = held.pop().unwrap();
    let released_offset = released.offset();
    arena.release(released);

    let again = arena.acquire().unwrap();
    assert_eq!(again.offset(), released_offset);
    assert!(arena.acquire().is_none());
    assert_conserved(&arena);
}

#[test]
fn exhaustion_is_stable_and_release_allows_exactly_one_more() {
    let arena = Arena::new(tiny_config()).unwrap();
    let mut held: Vec<_> = (0..4).map(|_| arena.acquire().unwrap()).collect();

    let before = arena.stats().classes;
    for _ in 0..10 {
        assert!(arena.acquire().is_none());
    }
    assert_eq!(arena.stats().classes, before);

    held.pop();
    held.push(arena.acquire().unwrap());
    assert!(arena.acquire().is_none());
    assert_conserved(&arena);
}

#[test]
fn promotion_exhaustion_is_stable() {
    let arena = Arena::new(tiny_config()).unwrap();
    let mut mediums = Vec::new();
    for _ in 0..2 {
        let mut m = arena.acquire().unwrap();
        m.promote().unwrap();
        mediums.push(m);
    }

    let mut msg = arena.acquire().unwrap();
    msg.append_all(&pattern(16)).unwrap();
    let before = arena.stats().classes;
    for _ in 0..5 {
        assert_eq!(
            msg.append_all(b"x"),
            Err(ArenaError::Exhausted {
                class: SizeClass::Medium
            })
        );
    }
    assert_eq!(arena.stats().classes, before);
    assert_eq!(msg.to_vec(), pattern(16));

    mediums.pop();
    assert_eq!(msg.append_all(b"x").unwrap(), 1);
    assert_eq!(msg.class(), SizeClass::Medium);
    assert_conserved(&arena);
}

#[test]
fn too_large_is_distinct_from_exhaustion() {
    let arena = default_arena();
    let mut msg = arena.acquire().unwrap();
    let err = msg.append_all(&vec![0u8; 1_048_577]).unwrap_err();
    assert_eq!(
        err,
        ArenaError::MessageTooLarge {
            requested: 1_048_577,
            max: 1_048_576
        }
    );
    assert!(!err.is_transient());
    assert_eq!(msg.class(), SizeClass::Small);
    assert!(msg.is_empty());

    // Exactly the large capacity fits.
    msg.append_all(&vec![1u8; 1_048_576]).unwrap();
    assert_eq!(msg.class(), SizeClass::Large);
    assert_eq!(msg.remaining(), 0);
    assert_eq!(arena.stats().too_large_rejections, 1);
}

#[test]
fn split_pipelined_messages() {
    let arena = default_arena();
    let first_payload = b"GET /index.html HTTP/1.1\r\nHost: a\r\n\r\n";
    let second_payload = b"GET /img/logo.png HTTP/1.1\r\n";
    let mut read = arena.acquire().unwrap();
    read.append_all(first_payload).unwrap();
    read.append_all(second_payload).unwrap();
    let k = first_payload.len();
    let total = read.len();

    let mut next = arena.acquire().unwrap();
    assert_eq!(next.split_tail(&read, k).unwrap(), total - k);
    assert_eq!(next.to_vec(), second_payload);
    assert_eq!(read.len(), total);

    read.truncate(k);
    assert_eq!(read.to_vec(), first_payload);
}

#[test]
fn arena_drives_custom_registries() {
    use std::sync::Arc;

    struct Shared(Arc<MockRegistry>);

    impl FreeBlockRegistry for Shared {
        fn put(&self, offset: u32) -> Result<(), RegistryFull> {
            self.0.put(offset)
        }
        fn take(&self) -> Option<u32> {
            self.0.take()
        }
        fn len(&self) -> usize {
            self.0.len()
        }
        fn capacity(&self) -> usize {
            self.0.capacity()
        }
    }

    let mut mocks = Vec::new();
    let arena = Arena::with_registries(tiny_config(), |_, capacity| {
        let mock = Arc::new(MockRegistry::new(capacity));
        mocks.push(Arc::clone(&mock));
        Box::new(Shared(mock))
    })
    .unwrap();

    let small = &mocks[SizeClass::Small.index()];
    assert_eq!(small.put_calls(), 4);

    let mut msg = arena.acquire().unwrap();
    assert_eq!(small.take_calls(), 1);
    msg.append_all(&pattern(20)).unwrap();
    assert_eq!(small.put_calls(), 5);
    assert_eq!(mocks[SizeClass::Medium.index()].take_calls(), 1);

    drop(msg);
    assert_eq!(mocks[SizeClass::Medium.index()].put_calls(), 3);
    assert_conserved(&arena);
}
