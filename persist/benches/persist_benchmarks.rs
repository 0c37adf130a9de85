use criterion::{Criterion, black_box, criterion_group, criterion_main};

use keepsake_core::Transform;
use keepsake_persist::{
    ActorCore, ObjectData, ObjectTable, Persist, capture_fields, compress, decompress,
    load_object, load_objects, save_object, save_objects,
};

#[derive(Default, Persist)]
#[persist(path = "bench::Npc")]
struct Npc {
    #[persist(core)]
    core: ActorCore,
    health: u32,
    mana: f32,
    inventory: Vec<String>,
    waypoints: Vec<Transform>,
    flags: [bool; 16],
}

fn npc(i: usize) -> Npc {
    Npc {
        core: ActorCore::new(format!("npc_{i}"), Transform::identity()),
        health: 100,
        mana: 42.5,
        inventory: (0..8).map(|n| format!("item_{n}")).collect(),
        waypoints: (0..16)
            .map(|n| Transform::from_xyz(n as f32, 0.0, -(n as f32)))
            .collect(),
        flags: [true; 16],
    }
}

// ---------------------------------------------------------------------------
// Field capture and restore
// ---------------------------------------------------------------------------

fn bench_capture_single(c: &mut Criterion) {
    let table = ObjectTable::new();
    let object = npc(0);
    c.bench_function("capture_npc", |b| {
        b.iter(|| capture_fields(black_box(&object), &table));
    });
}

fn bench_restore_single(c: &mut Criterion) {
    let table = ObjectTable::new();
    let data = save_object(&npc(0), &table).unwrap();
    let mut target = Npc::default();
    c.bench_function("restore_npc", |b| {
        b.iter(|| load_object(&mut target, black_box(&data), &table));
    });
}

fn bench_sequence_256(c: &mut Criterion) {
    let table = ObjectTable::new();
    let npcs: Vec<Npc> = (0..256).map(npc).collect();
    let refs: Vec<Option<&dyn Persist>> = npcs.iter().map(|n| Some(n as &dyn Persist)).collect();
    c.bench_function("save_objects_256", |b| {
        b.iter(|| save_objects(black_box(&refs), &table));
    });

    let data = save_objects(&refs, &table).unwrap();
    let mut targets: Vec<Npc> = (0..256).map(|_| Npc::default()).collect();
    c.bench_function("load_objects_256", |b| {
        b.iter(|| {
            let mut slots: Vec<Option<&mut dyn Persist>> = targets
                .iter_mut()
                .map(|n| Some(n as &mut dyn Persist))
                .collect();
            load_objects(&mut slots, black_box(&data), &table)
        });
    });
}

// ---------------------------------------------------------------------------
// Compression
// ---------------------------------------------------------------------------

fn bench_compression(c: &mut Criterion) {
    let table = ObjectTable::new();
    let npcs: Vec<Npc> = (0..256).map(npc).collect();
    let refs: Vec<Option<&dyn Persist>> = npcs.iter().map(|n| Some(n as &dyn Persist)).collect();
    let ObjectData { data } = save_objects(&refs, &table).unwrap();
    let packed = compress(data.as_slice()).unwrap();

    c.bench_function("compress_256_npcs", |b| {
        b.iter(|| compress(black_box(data.as_slice())));
    });
    c.bench_function("decompress_256_npcs", |b| {
        b.iter(|| decompress(black_box(packed.as_slice())));
    });
}

criterion_group!(
    benches,
    bench_capture_single,
    bench_restore_single,
    bench_sequence_256,
    bench_compression,
);
criterion_main!(benches);
