// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! valref core library
//!
//! Measures what value semantics and reference semantics cost under
//! allocation, field access and bulk copy. Provides the aggregate shapes,
//! the process-wide allocation tracker, the before/after statistics
//! gatherer and the scenario catalogue.
//!
//! Linking this crate does not change the global allocator. Binaries,
//! benches and test targets that report statistics install
//! [`TrackingAllocator`] themselves.

pub mod alloc;
pub mod error;
pub mod scenario;
pub mod shape;
pub mod stats;

// Re-export commonly used types
pub use alloc::{AllocCounters, TrackingAllocator};
pub use error::{ScenarioError, StatsError};
pub use scenario::{
    catalogue, Scenario, ScenarioOutcome, ScenarioParams, ShapeInfo, Workload, COPY_COUNT,
    ITERATIONS,
};
pub use shape::{
    Aggregate, Fields, Inline, Nested, RefComposite, RefFields, RefPoint, RefRefBundle, Shared,
    Storage, StorageKind, ValueComposite, ValuePoint, ValueRefBundle,
};
pub use stats::{StatsGatherer, StatsReport, StatsSnapshot};

#[cfg(test)]
#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;
