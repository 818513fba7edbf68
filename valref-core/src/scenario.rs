// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Benchmark scenarios and the fixed scenario catalogue.
//!
//! Two workload families, each instantiated per shape:
//!
//! - **Allocate-and-sum**: build an array of freshly constructed instances,
//!   then reduce it twice.
//! - **Copy-then-sum**: build a source array, copy it element by element into
//!   an equal-size destination `copy_count` times, then reduce the
//!   destination twice.
//!
//! Both reductions land in one checksum and one timing. The checksum is the
//! scenario's return value and goes through [`black_box`] so the access
//! loops stay in the binary.

use std::hint::black_box;

use serde::{Deserialize, Serialize};

use crate::alloc;
use crate::error::ScenarioError;
use crate::shape::{
    Aggregate, Fields, Inline, Nested, RefFields, Shared, Storage, StorageKind,
};

/// Elements per array in a real run.
pub const ITERATIONS: usize = 10 * 1000 * 1000;

/// Whole-array copies per copy scenario in a real run.
pub const COPY_COUNT: usize = 10;

/// Array size and copy repetition for one scenario invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioParams {
    iterations: usize,
    copy_count: usize,
}

impl ScenarioParams {
    /// The fixed parameters the driver uses.
    pub const fn standard() -> Self {
        Self {
            iterations: ITERATIONS,
            copy_count: COPY_COUNT,
        }
    }

    /// Scaled-down parameters for tests and criterion benches.
    pub fn scaled(iterations: usize, copy_count: usize) -> Result<Self, ScenarioError> {
        if iterations == 0 {
            return Err(ScenarioError::ZeroIterations);
        }
        if copy_count == 0 {
            return Err(ScenarioError::ZeroCopyCount);
        }
        Ok(Self {
            iterations,
            copy_count,
        })
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn copy_count(&self) -> usize {
        self.copy_count
    }
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self::standard()
    }
}

/// What a scenario hands back to the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    /// Double-pass field sum
    pub checksum: i64,
    /// Live heap bytes sampled while the scenario's arrays were still alive
    pub memory_consumed_bytes: u64,
}

impl ScenarioOutcome {
    pub fn memory_consumed_mb(&self) -> f64 {
        self.memory_consumed_bytes as f64 / 1024.0 / 1024.0
    }
}

/// Build `len` instances, element `i` seeded with `i`.
pub fn populate<F: Fields, S: Storage>(len: usize) -> Box<[Aggregate<F, S>]> {
    (0..len).map(|i| Aggregate::populated(i as i64)).collect()
}

/// One full reduction pass.
#[inline(never)]
pub fn sum_pass<F: Fields, S: Storage>(data: &[Aggregate<F, S>]) -> i64 {
    let mut accumulator = 0i64;
    for item in data {
        accumulator += item.checksum();
    }
    accumulator
}

/// Two full reduction passes over the same array, summed together.
pub fn double_pass<F: Fields, S: Storage>(data: &[Aggregate<F, S>]) -> i64 {
    let mut accumulator = sum_pass(black_box(data));
    accumulator += sum_pass(black_box(data));
    accumulator
}

/// Allocate an array the size of `src` and assign every element from `src`,
/// `copy_count` times over. `copy_count` must be at least one.
///
/// Assignment is `Clone`: inline fields are duplicated, shared pointers and
/// nested references are aliased.
pub fn copy_rounds<T: Clone>(src: &[T], copy_count: usize) -> Box<[T]> {
    let mut dst: Vec<T> = Vec::with_capacity(src.len());
    dst.extend_from_slice(src);
    for _ in 1..copy_count {
        black_box(dst.as_mut_slice()).clone_from_slice(src);
    }
    dst.into_boxed_slice()
}

fn finish(checksum: i64) -> ScenarioOutcome {
    ScenarioOutcome {
        checksum: black_box(checksum),
        memory_consumed_bytes: alloc::live_bytes(),
    }
}

/// Populate, then reduce twice.
pub fn allocate_and_sum<F: Fields, S: Storage>(params: &ScenarioParams) -> ScenarioOutcome {
    let data = populate::<F, S>(params.iterations());
    let checksum = double_pass(&data);
    finish(checksum)
}

/// Populate a source, copy it `copy_count` times into a destination, then
/// reduce the destination twice.
pub fn copy_then_sum<F: Fields, S: Storage>(params: &ScenarioParams) -> ScenarioOutcome {
    let source = populate::<F, S>(params.iterations());
    let data = copy_rounds(&source, params.copy_count());
    let checksum = double_pass(&data);
    finish(checksum)
}

/// Which workload family a scenario belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Workload {
    AllocateAndSum,
    CopyThenSum,
}

/// Static description of the element type a scenario works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeInfo {
    pub storage: StorageKind,
    pub field_count: usize,
    pub nested_refs: usize,
    /// Bytes one array element occupies
    pub element_bytes: usize,
}

impl ShapeInfo {
    pub fn of<F: Fields, S: Storage>() -> Self {
        Self {
            storage: S::KIND,
            field_count: F::FIELD_COUNT,
            nested_refs: F::NESTED_REFS,
            element_bytes: std::mem::size_of::<Aggregate<F, S>>(),
        }
    }
}

/// One named entry of the catalogue.
#[derive(Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub workload: Workload,
    pub shape: ShapeInfo,
    body: fn(&ScenarioParams) -> ScenarioOutcome,
}

impl Scenario {
    pub fn allocate<F: Fields, S: Storage>(name: &'static str) -> Self {
        Self {
            name,
            workload: Workload::AllocateAndSum,
            shape: ShapeInfo::of::<F, S>(),
            body: allocate_and_sum::<F, S>,
        }
    }

    pub fn copy<F: Fields, S: Storage>(name: &'static str) -> Self {
        Self {
            name,
            workload: Workload::CopyThenSum,
            shape: ShapeInfo::of::<F, S>(),
            body: copy_then_sum::<F, S>,
        }
    }

    pub fn run(&self, params: &ScenarioParams) -> ScenarioOutcome {
        tracing::debug!(
            scenario = self.name,
            iterations = params.iterations(),
            "Running scenario"
        );
        (self.body)(params)
    }
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("workload", &self.workload)
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

/// The full catalogue in run order.
///
/// "Struct" names are inline storage, "Class" names are shared storage.
pub fn catalogue() -> Vec<Scenario> {
    vec![
        Scenario::allocate::<[i64; 2], Inline>("Point Struct 2"),
        Scenario::allocate::<[i64; 2], Shared>("Point Class 2"),
        Scenario::allocate::<[i64; 3], Inline>("Point Struct 3"),
        Scenario::allocate::<[i64; 3], Shared>("Point Class 3"),
        Scenario::allocate::<[i64; 4], Inline>("Point Struct 4"),
        Scenario::allocate::<[i64; 4], Shared>("Point Class 4"),
        Scenario::allocate::<[i64; 8], Inline>("Point Struct 8"),
        Scenario::allocate::<Nested, Inline>("Point Struct 3 Ref 1"),
        Scenario::allocate::<Nested, Shared>("Point Class 3 Ref 1"),
        Scenario::copy::<[i64; 2], Inline>("Copy Struct 2"),
        Scenario::copy::<[i64; 3], Inline>("Copy Struct 3"),
        Scenario::copy::<[i64; 4], Inline>("Copy Struct 4"),
        Scenario::copy::<[i64; 8], Inline>("Copy Struct 8"),
        Scenario::copy::<[i64; 2], Shared>("Copy Class 2"),
        Scenario::allocate::<RefFields<2>, Inline>("Point Struct With Refs"),
        Scenario::allocate::<RefFields<3>, Inline>("Point Struct With 3 Refs"),
        Scenario::allocate::<RefFields<2>, Shared>("Point Class With Refs"),
        Scenario::copy::<RefFields<2>, Inline>("Copy Struct With Refs"),
        Scenario::copy::<RefFields<3>, Inline>("Copy Struct With 3 Refs"),
        Scenario::copy::<RefFields<2>, Shared>("Copy Class With Refs"),
    ]
}
