use rosterbench::{memory, CountingAlloc, StudentDb, Variant};

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc::new();

mod helpers;

#[test]
fn counter_tracks_container_growth() {
    let before = memory::heap_bytes();
    let allocs = memory::allocation_count();
    let mut db = StudentDb::new(Variant::LinkedHash);
    for i in 0..2_000 {
        db.push(helpers::student(&format!("s{i}@x"), "G", 1.0, 1, 1));
    }
    let loaded = memory::heap_bytes();
    assert!(
        loaded > before + 2_000 * 16,
        "heap should grow: before {before} loaded {loaded}"
    );
    assert!(memory::allocation_count() > allocs);
    assert!(memory::peak_heap_bytes() >= loaded);

    drop(db);
    let after = memory::heap_bytes();
    assert!(after < loaded, "heap should shrink: loaded {loaded} after {after}");
    memory::reset_peak();
    assert!(memory::peak_heap_bytes() < loaded);
}
