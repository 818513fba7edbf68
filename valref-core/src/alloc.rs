// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Process-wide allocation tracking.
//!
//! Rust has no tracing collector to ask for collection counts, so the
//! harness reads allocator pressure from a counting wrapper around the
//! system allocator instead.
//!
//! The library does not install the wrapper. Each final artifact that wants
//! real numbers declares it:
//!
//! ```ignore
//! #[global_allocator]
//! static GLOBAL: valref_core::TrackingAllocator = valref_core::TrackingAllocator;
//! ```
//!
//! Without it every counter stays at zero.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

/// Counting wrapper around [`System`].
pub struct TrackingAllocator;

static LIVE_BYTES: AtomicUsize = AtomicUsize::new(0);
static PEAK_BYTES: AtomicUsize = AtomicUsize::new(0);
static ALLOCATED_BYTES: AtomicU64 = AtomicU64::new(0);
static ALLOCATIONS: AtomicU64 = AtomicU64::new(0);
static DEALLOCATIONS: AtomicU64 = AtomicU64::new(0);
static REALLOCATIONS: AtomicU64 = AtomicU64::new(0);

fn record_growth(size: usize) {
    let current = LIVE_BYTES.fetch_add(size, Ordering::Relaxed) + size;
    PEAK_BYTES.fetch_max(current, Ordering::Relaxed);
    ALLOCATED_BYTES.fetch_add(size as u64, Ordering::Relaxed);
}

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
            record_growth(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc_zeroed(layout) };
        if !ptr.is_null() {
            ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
            record_growth(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
        DEALLOCATIONS.fetch_add(1, Ordering::Relaxed);
        LIVE_BYTES.fetch_sub(layout.size(), Ordering::Relaxed);
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = unsafe { System.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() {
            REALLOCATIONS.fetch_add(1, Ordering::Relaxed);
            let old_size = layout.size();
            if new_size >= old_size {
                record_growth(new_size - old_size);
            } else {
                LIVE_BYTES.fetch_sub(old_size - new_size, Ordering::Relaxed);
            }
        }
        new_ptr
    }
}

/// Cumulative allocator counters at one point in time.
///
/// Everything except `live_bytes` and `peak_bytes` only ever grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocCounters {
    /// Bytes currently handed out and not yet freed
    pub live_bytes: u64,
    /// High-water mark of `live_bytes` since the last [`reset_peak`]
    pub peak_bytes: u64,
    /// Total bytes ever handed out
    pub allocated_bytes: u64,
    pub allocations: u64,
    pub deallocations: u64,
    pub reallocations: u64,
}

impl AllocCounters {
    /// Read the current counters.
    pub fn read() -> Self {
        Self {
            live_bytes: LIVE_BYTES.load(Ordering::Relaxed) as u64,
            peak_bytes: PEAK_BYTES.load(Ordering::Relaxed) as u64,
            allocated_bytes: ALLOCATED_BYTES.load(Ordering::Relaxed),
            allocations: ALLOCATIONS.load(Ordering::Relaxed),
            deallocations: DEALLOCATIONS.load(Ordering::Relaxed),
            reallocations: REALLOCATIONS.load(Ordering::Relaxed),
        }
    }

    /// Counter growth between `start` and `self`. Saturates at zero.
    pub fn since(&self, start: &AllocCounters) -> AllocCounters {
        AllocCounters {
            live_bytes: self.live_bytes,
            peak_bytes: self.peak_bytes,
            allocated_bytes: self.allocated_bytes.saturating_sub(start.allocated_bytes),
            allocations: self.allocations.saturating_sub(start.allocations),
            deallocations: self.deallocations.saturating_sub(start.deallocations),
            reallocations: self.reallocations.saturating_sub(start.reallocations),
        }
    }
}

/// Bytes currently live on the heap.
pub fn live_bytes() -> u64 {
    LIVE_BYTES.load(Ordering::Relaxed) as u64
}

/// Restart the high-water mark from the current live size.
pub fn reset_peak() {
    PEAK_BYTES.store(LIVE_BYTES.load(Ordering::Relaxed), Ordering::Relaxed);
}

/// Hand freed pages back to the operating system.
///
/// This is the closest thing to forcing a full collection: it does not
/// free anything live, but it makes the resident set reflect live data.
pub fn release_free_memory() {
    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    {
        // SAFETY: malloc_trim only walks allocator-internal free lists.
        unsafe {
            libc::malloc_trim(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_see_allocations() {
        let before = AllocCounters::read();
        let block = vec![0u8; 64 * 1024];
        let after = AllocCounters::read();

        let delta = after.since(&before);
        assert!(delta.allocations >= 1);
        assert!(delta.allocated_bytes >= 64 * 1024);
        drop(block);

        let freed = AllocCounters::read().since(&before);
        assert!(freed.deallocations >= 1);
    }

    #[test]
    fn test_realloc_is_counted() {
        let before = AllocCounters::read();
        let mut grow: Vec<u64> = Vec::with_capacity(1);
        grow.extend(0..4096);
        let delta = AllocCounters::read().since(&before);
        assert!(delta.reallocations >= 1);
        assert_eq!(grow.len(), 4096);
    }

    #[test]
    fn test_since_never_underflows() {
        let later = AllocCounters::read();
        let earlier = AllocCounters::default();
        let backwards = earlier.since(&later);
        assert_eq!(backwards.allocations, 0);
        assert_eq!(backwards.deallocations, 0);
        assert_eq!(backwards.allocated_bytes, 0);
    }

    #[test]
    fn test_peak_tracks_high_water_mark() {
        reset_peak();
        let block = vec![1u8; 256 * 1024];
        assert!(AllocCounters::read().peak_bytes >= 256 * 1024);
        drop(block);
        release_free_memory();
    }
}
