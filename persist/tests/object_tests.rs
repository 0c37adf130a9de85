//! Object-level save/load: field walk, references, hooks and the sequencer.

use std::collections::BTreeMap;

use keepsake_core::Transform;
use keepsake_core::math::{Vec3, quat_from_rotation_y};
use keepsake_persist::{
    ByteBuffer, ErrorKind, ObjectData, ObjectHandle, ObjectTable, Persist, PostLoad,
    apply_serialization, capture_fields, load_object, load_objects, restore_fields, save_object,
    save_objects, serialize,
};
use rstest::rstest;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq, Persist)]
#[persist(path = "tests::Stats")]
struct Stats {
    health: i32,
    speed: f32,
    alive: bool,
    title: String,
    tags: Vec<String>,
    best_time: Option<u64>,
    grid: [u8; 4],
    pair: (u16, char),
    scores: BTreeMap<String, u32>,
    home: Transform,
    #[persist(skip)]
    cached_rank: u32,
}

fn sample_stats() -> Stats {
    Stats {
        health: -12,
        speed: 4.5,
        alive: true,
        title: "Warden of the Gate".into(),
        tags: vec!["boss".into(), "undead".into()],
        best_time: Some(98_765),
        grid: [1, 2, 3, 4],
        pair: (7, 'λ'),
        scores: BTreeMap::from([("arena".into(), 3), ("maze".into(), 11)]),
        home: Transform::from_xyz(1.0, 2.0, 3.0)
            .with_rotation(quat_from_rotation_y(0.5))
            .with_scale(Vec3::new(2.0, 2.0, 2.0)),
        cached_rank: 42,
    }
}

#[derive(Debug, Default, Persist)]
#[persist(path = "tests::Guard")]
struct Guard {
    target: Option<ObjectHandle>,
    patrol: Vec<ObjectHandle>,
}

#[derive(Debug, Default, Persist)]
#[persist(path = "tests::Counter", post_load)]
struct Counter {
    value: u32,
    #[persist(skip)]
    hook_calls: u32,
    #[persist(skip)]
    value_seen_by_hook: u32,
}

impl PostLoad for Counter {
    fn post_load(&mut self) {
        self.hook_calls += 1;
        self.value_seen_by_hook = self.value;
    }
}

#[derive(Debug, Default, PartialEq, Persist)]
#[persist(path = "tests::Pair")]
struct Pair {
    x: u32,
    y: u32,
}

#[derive(Debug, Default, PartialEq, Persist)]
#[persist(path = "tests::Wide")]
struct Wide {
    z: u64,
}

#[derive(Debug, Default, PartialEq, Persist)]
#[persist(path = "tests::Slot")]
struct Slot<T> {
    item: T,
    history: Vec<T>,
    #[persist(skip)]
    scratch: u8,
}

// ---------------------------------------------------------------------------
// Single objects
// ---------------------------------------------------------------------------

#[test]
fn every_field_kind_survives_save_and_load() {
    let table = ObjectTable::new();
    let original = sample_stats();

    let data = save_object(&original, &table).unwrap();
    let mut loaded = Stats::default();
    load_object(&mut loaded, &data, &table).unwrap();

    assert_eq!(loaded.cached_rank, 0);
    loaded.cached_rank = original.cached_rank;
    assert_eq!(loaded, original);
}

#[test]
fn generic_struct_survives_save_and_load() {
    let table = ObjectTable::new();
    let original = Slot {
        item: String::from("lantern"),
        history: vec!["torch".into(), "candle".into()],
        scratch: 9,
    };

    let data = save_object(&original, &table).unwrap();
    let mut loaded = Slot::<String>::default();
    load_object(&mut loaded, &data, &table).unwrap();

    assert_eq!(loaded.item, original.item);
    assert_eq!(loaded.history, original.history);
    assert_eq!(loaded.scratch, 0);

    let numbers = Slot { item: 5u32, history: vec![1, 2], scratch: 0 };
    let mut loaded_numbers = Slot::<u32>::default();
    load_object(&mut loaded_numbers, &save_object(&numbers, &table).unwrap(), &table).unwrap();
    assert_eq!(loaded_numbers, numbers);
}

#[test]
fn skipped_fields_are_not_written() {
    let table = ObjectTable::new();
    let mut a = sample_stats();
    let mut b = sample_stats();
    a.cached_rank = 1;
    b.cached_rank = 2;
    assert_eq!(serialize(&a, &table).unwrap(), serialize(&b, &table).unwrap());
}

#[test]
fn serialize_matches_captured_buffer() {
    let table = ObjectTable::new();
    let stats = sample_stats();
    let raw = serialize(&stats, &table).unwrap();
    assert_eq!(capture_fields(&stats, &table).unwrap().as_slice(), &raw[..]);

    let mut applied = Stats::default();
    apply_serialization(&mut applied, &raw, &table).unwrap();
    assert_eq!(applied.title, stats.title);
}

#[test]
fn empty_payload_is_rejected_without_touching_target() {
    let table = ObjectTable::new();
    let mut counter = Counter {
        value: 5,
        ..Counter::default()
    };
    let err = load_object(&mut counter, &ObjectData::default(), &table).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyPayload);
    assert_eq!(counter.value, 5);
    assert_eq!(counter.hook_calls, 0);
}

#[test]
fn restore_is_partial_on_underrun() {
    let table = ObjectTable::new();
    let saved = serialize(&Pair { x: 10, y: 20 }, &table).unwrap();

    let mut pair = Pair { x: 1, y: 2 };
    let mut truncated = ByteBuffer::from(&saved[..6]);
    let err = restore_fields(&mut pair, &mut truncated, &table).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Underrun);
    assert_eq!(pair, Pair { x: 10, y: 2 });
}

// ---------------------------------------------------------------------------
// Post-load hook
// ---------------------------------------------------------------------------

#[test]
fn post_load_runs_once_after_fields() {
    let table = ObjectTable::new();
    let data = save_object(
        &Counter {
            value: 77,
            ..Counter::default()
        },
        &table,
    )
    .unwrap();

    let mut counter = Counter::default();
    load_object(&mut counter, &data, &table).unwrap();

    assert_eq!(counter.hook_calls, 1);
    assert_eq!(counter.value_seen_by_hook, 77);
}

#[test]
fn post_load_skipped_when_restore_fails() {
    let table = ObjectTable::new();
    let mut counter = Counter::default();
    let err = load_object(
        &mut counter,
        &ObjectData::new(ByteBuffer::from_vec(vec![1, 2])),
        &table,
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Underrun);
    assert_eq!(counter.hook_calls, 0);
}

#[test]
fn raw_apply_does_not_dispatch_hook() {
    let table = ObjectTable::new();
    let raw = serialize(
        &Counter {
            value: 3,
            ..Counter::default()
        },
        &table,
    )
    .unwrap();
    let mut counter = Counter::default();
    apply_serialization(&mut counter, &raw, &table).unwrap();
    assert_eq!(counter.value, 3);
    assert_eq!(counter.hook_calls, 0);
}

// ---------------------------------------------------------------------------
// References
// ---------------------------------------------------------------------------

#[test]
fn references_resolve_by_name_in_the_loading_table() {
    let mut saving = ObjectTable::new();
    let door = saving.insert("tests::Door", "door_3").unwrap();
    let lever = saving.insert("tests::Lever", "lever").unwrap();

    let guard = Guard {
        target: Some(door),
        patrol: vec![lever, door],
    };
    let data = save_object(&guard, &saving).unwrap();

    let mut loading = ObjectTable::new();
    loading.insert("tests::Crate", "padding").unwrap();
    let new_lever = loading.insert("tests::Lever", "lever").unwrap();
    let new_door = loading.insert("tests::Door", "door_3").unwrap();

    let mut loaded = Guard::default();
    load_object(&mut loaded, &data, &loading).unwrap();

    assert_eq!(loaded.target, Some(new_door));
    assert_eq!(loaded.patrol, vec![new_lever, new_door]);
    assert_ne!(new_door, door);
}

#[test]
fn unregistered_reference_cannot_be_saved() {
    let mut table = ObjectTable::new();
    let gone = table.insert("tests::Door", "door").unwrap();
    table.remove(gone);

    let err = save_object(
        &Guard {
            target: Some(gone),
            patrol: Vec::new(),
        },
        &table,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnserializableField);
}

#[rstest]
#[case::missing_name("tests::Door", "other_door")]
#[case::wrong_type("tests::Lever", "door_3")]
fn reference_that_does_not_resolve_fails(#[case] type_path: &str, #[case] name: &str) {
    let mut saving = ObjectTable::new();
    let door = saving.insert("tests::Door", "door_3").unwrap();
    let data = save_object(
        &Guard {
            target: Some(door),
            patrol: Vec::new(),
        },
        &saving,
    )
    .unwrap();

    let mut loading = ObjectTable::new();
    loading.insert(type_path, name).unwrap();
    let mut loaded = Guard::default();
    let err = load_object(&mut loaded, &data, &loading).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnresolvedReference);
}

// ---------------------------------------------------------------------------
// Sequencer
// ---------------------------------------------------------------------------

#[test]
fn sequence_restores_in_order() {
    let table = ObjectTable::new();
    let first = Pair { x: 1, y: 2 };
    let second = Wide { z: 3 };
    let data = save_objects(&[Some(&first), Some(&second)], &table).unwrap();
    assert_eq!(data.data.len(), 16);

    let mut a = Pair::default();
    let mut b = Wide::default();
    load_objects(&mut [Some(&mut a), Some(&mut b)], &data, &table).unwrap();
    assert_eq!(a, first);
    assert_eq!(b, second);
}

#[test]
fn reversed_order_silently_misreads() {
    let table = ObjectTable::new();
    let data = save_objects(&[Some(&Pair { x: 1, y: 2 }), Some(&Wide { z: 3 })], &table).unwrap();

    let mut a = Pair::default();
    let mut b = Wide::default();
    load_objects(&mut [Some(&mut b), Some(&mut a)], &data, &table).unwrap();

    assert_eq!(b.z, 1u64 | (2u64 << 32));
    assert_eq!(a, Pair { x: 3, y: 0 });
}

#[test]
fn missing_entries_are_skipped_on_both_sides() {
    let table = ObjectTable::new();
    let data = save_objects(&[None, Some(&Pair { x: 5, y: 6 }), None], &table).unwrap();
    assert_eq!(data.data.len(), 8);

    let mut a = Pair::default();
    load_objects(&mut [None, Some(&mut a)], &data, &table).unwrap();
    assert_eq!(a, Pair { x: 5, y: 6 });
}

#[test]
fn empty_object_lists_are_rejected() {
    let table = ObjectTable::new();
    assert_eq!(
        save_objects(&[], &table).unwrap_err().kind(),
        ErrorKind::EmptyInput
    );

    let data = ObjectData::new(ByteBuffer::from_vec(vec![0; 8]));
    assert_eq!(
        load_objects(&mut [], &data, &table).unwrap_err().kind(),
        ErrorKind::EmptyInput
    );
}

#[test]
fn empty_sequence_payload_leaves_objects_alone() {
    let table = ObjectTable::new();
    let mut a = Pair { x: 9, y: 9 };
    let err = load_objects(&mut [Some(&mut a)], &ObjectData::default(), &table).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyPayload);
    assert_eq!(a, Pair { x: 9, y: 9 });
}

#[test]
fn sequence_failure_stops_at_failing_object() {
    let table = ObjectTable::new();
    let mut counter = Counter::default();
    let mut pair = Pair { x: 1, y: 1 };
    let mut later = Counter {
        value: 8,
        ..Counter::default()
    };

    // 4 bytes for the counter, 6 of the 8 bytes the pair needs.
    let data = ObjectData::new(ByteBuffer::from_vec(vec![
        50, 0, 0, 0, //
        60, 0, 0, 0, 70, 0,
    ]));
    let err = load_objects(
        &mut [Some(&mut counter), Some(&mut pair), Some(&mut later)],
        &data,
        &table,
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Underrun);
    assert_eq!((counter.value, counter.hook_calls), (50, 1));
    assert_eq!(pair, Pair { x: 60, y: 1 });
    assert_eq!((later.value, later.hook_calls), (8, 0));
}

#[test]
fn sequence_runs_each_hook_once() {
    let table = ObjectTable::new();
    let saved = [
        Counter {
            value: 1,
            ..Counter::default()
        },
        Counter {
            value: 2,
            ..Counter::default()
        },
    ];
    let data = save_objects(&[Some(&saved[0]), Some(&saved[1])], &table).unwrap();

    let mut a = Counter::default();
    let mut b = Counter::default();
    load_objects(&mut [Some(&mut a), Some(&mut b)], &data, &table).unwrap();
    assert_eq!((a.hook_calls, a.value_seen_by_hook), (1, 1));
    assert_eq!((b.hook_calls, b.value_seen_by_hook), (1, 2));
}
