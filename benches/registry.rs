use criterion::{criterion_group, criterion_main, Criterion};
use peer_relay::signaling::{ConnectionId, RoomId, RoomStore, SessionRegistry};
use std::hint::black_box;

fn populated_registry(rooms: usize, per_room: usize) -> (SessionRegistry, Vec<ConnectionId>) {
    let mut registry = SessionRegistry::new();
    let mut ids = Vec::with_capacity(rooms * per_room);
    for room in 0..rooms {
        let room = RoomId(format!("room-{}", room));
        for n in 0..per_room {
            let id = ConnectionId::new();
            registry.join(&room, id, &format!("peer-{}", n));
            ids.push(id);
        }
    }
    (registry, ids)
}

fn bench_join_leave(c: &mut Criterion) {
    let (mut registry, _) = populated_registry(1_000, 8);
    let room = RoomId::from("room-500");

    c.bench_function("join_leave_busy_registry", |b| {
        b.iter(|| {
            let id = ConnectionId::new();
            registry.join(&room, id, "bench");
            black_box(registry.leave(&room, id));
        })
    });
}

fn bench_list_others(c: &mut Criterion) {
    let (registry, ids) = populated_registry(1_000, 8);
    let room = RoomId::from("room-0");
    let caller = ids[0];

    c.bench_function("list_others_8_peers", |b| {
        b.iter(|| black_box(registry.list_others(&room, caller)))
    });
}

fn bench_rooms_containing(c: &mut Criterion) {
    let (registry, ids) = populated_registry(1_000, 8);
    let caller = ids[ids.len() - 1];

    c.bench_function("rooms_containing_1000_rooms", |b| {
        b.iter(|| black_box(registry.rooms_containing(caller)))
    });
}

criterion_group!(benches, bench_join_leave, bench_list_others, bench_rooms_containing);
criterion_main!(benches);
