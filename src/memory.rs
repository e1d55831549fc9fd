//! Process-wide heap accounting.
//!
//! [`CountingAlloc`] wraps the system allocator and keeps live byte, peak and
//! allocation counters. It only reports real figures once a binary installs
//! it with `#[global_allocator]`; otherwise every reading is zero.
//!
//! The numbers cover the whole process, not a single container, so runs are
//! comparable only when one benchmark executes at a time.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};

static ALLOCATED: AtomicUsize = AtomicUsize::new(0);
static PEAK_ALLOCATED: AtomicUsize = AtomicUsize::new(0);
static ALLOCATION_COUNT: AtomicUsize = AtomicUsize::new(0);

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

pub struct CountingAlloc;

impl CountingAlloc {
    pub const fn new() -> Self {
        CountingAlloc
    }

    #[inline]
    fn grew(size: usize) {
        ALLOCATION_COUNT.fetch_add(1, Ordering::Relaxed);
        let current = ALLOCATED.fetch_add(size, Ordering::Relaxed) + size;
        PEAK_ALLOCATED.fetch_max(current, Ordering::Relaxed);
    }

    #[inline]
    fn shrank(size: usize) {
        ALLOCATED.fetch_sub(size, Ordering::Relaxed);
    }
}

impl Default for CountingAlloc {
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            Self::grew(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            Self::grew(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        Self::shrank(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            Self::shrank(layout.size());
            Self::grew(new_size);
        }
        new_ptr
    }
}

/// Live heap bytes.
#[inline]
pub fn heap_bytes() -> usize {
    ALLOCATED.load(Ordering::Relaxed)
}

/// Highest live heap figure since start or the last [`reset_peak`].
#[inline]
pub fn peak_heap_bytes() -> usize {
    PEAK_ALLOCATED.load(Ordering::Relaxed)
}

#[inline]
pub fn allocation_count() -> usize {
    ALLOCATION_COUNT.load(Ordering::Relaxed)
}

pub fn reset_peak() {
    PEAK_ALLOCATED.store(heap_bytes(), Ordering::Relaxed);
}

#[inline]
pub fn bytes_to_mib(bytes: usize) -> f64 {
    bytes as f64 / BYTES_PER_MIB
}
