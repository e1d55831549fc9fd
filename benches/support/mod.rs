#![allow(dead_code)]
use std::sync::Mutex;
use std::time::Duration;

use once_cell::sync::Lazy;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use rosterbench::{Student, StudentDb, Variant};

pub mod mem;

pub use mem::record_mem;

static BASE_SEED: Lazy<u64> = Lazy::new(|| {
    std::env::var("ROSTERBENCH_BENCH_SEED")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5eed_0f57_0de4_7000)
});

static RNG_COUNTER: Lazy<Mutex<u64>> = Lazy::new(|| Mutex::new(0));

pub fn usize_env(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

pub fn duration_env(name: &str, default_secs: f64) -> Duration {
    let secs = std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|s| s.is_finite() && *s > 0.0)
        .unwrap_or(default_secs);
    Duration::from_secs_f64(secs)
}

#[inline]
pub fn seeded_rng() -> StdRng {
    let mut guard = RNG_COUNTER.lock().unwrap();
    let seed = BASE_SEED.wrapping_add(*guard);
    *guard = guard.wrapping_add(1);
    StdRng::seed_from_u64(seed)
}

/// Synthetic roster with uniform birth dates, ratings in `[0, 100)` and
/// `groups` distinct groups.
pub fn roster(n: usize, groups: usize) -> Vec<Student> {
    assert!(groups > 0, "groups must be > 0");
    let mut rng = seeded_rng();
    (0..n)
        .map(|i| Student {
            name: format!("name{i}"),
            surname: format!("surname{i}"),
            email: format!("student{i}@uni.edu"),
            birth_year: rng.gen_range(1995..2008),
            birth_month: rng.gen_range(1..=12),
            birth_day: rng.gen_range(1..=28),
            group: format!("KN-{}", rng.gen_range(0..groups)),
            rating: rng.gen::<f32>() * 100.0,
            phone: format!("+38050{:07}", rng.gen_range(0..10_000_000u32)),
        })
        .collect()
}

pub fn build_db(variant: Variant, students: &[Student]) -> StudentDb {
    let mut db = StudentDb::new(variant);
    for st in students {
        db.push(st.clone());
    }
    db
}

pub fn pick_existing(students: &[Student], k: usize) -> Vec<String> {
    let mut rng = seeded_rng();
    let mut emails: Vec<String> = students.iter().map(|s| s.email.clone()).collect();
    emails.shuffle(&mut rng);
    emails.truncate(emails.len().min(k));
    emails
}
