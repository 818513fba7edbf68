// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Catalogue-wide integration tests.
//!
//! Runs every scenario at a reduced size and checks its checksum against a
//! closed form derived from the shape alone.

use valref_core::scenario::{copy_rounds, populate};
use valref_core::{
    catalogue, RefRefBundle, ScenarioParams, StatsGatherer, StorageKind, TrackingAllocator,
    ValueRefBundle, Workload,
};

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

/// Single-pass sum over `n` elements for a shape with `fields` top-level
/// fields and `nested_refs` reference sub-objects.
fn expected_single_pass(n: i64, fields: i64, nested_refs: usize) -> i64 {
    let per_element_offset = if nested_refs > 1 {
        // one x or y per nested point: 0, 1, 0, ...
        fields / 2
    } else {
        // (i) + (i+1) + ... + (i+fields-1)
        fields * (fields - 1) / 2
    };
    let sum_i = n * (n - 1) / 2;
    fields * sum_i + per_element_offset * n
}

#[test]
fn test_every_scenario_reports_expected_checksum() {
    let n = 64;
    let params = ScenarioParams::scaled(n, 3).expect("valid params");

    for scenario in catalogue() {
        let outcome = scenario.run(&params);
        let single = expected_single_pass(
            n as i64,
            scenario.shape.field_count as i64,
            scenario.shape.nested_refs,
        );
        assert_eq!(
            outcome.checksum,
            2 * single,
            "checksum mismatch for '{}'",
            scenario.name
        );
    }
}

#[test]
fn test_catalogue_covers_both_storage_modes_and_workloads() {
    let scenarios = catalogue();
    let count = |storage: StorageKind, workload: Workload| {
        scenarios
            .iter()
            .filter(|s| s.shape.storage == storage && s.workload == workload)
            .count()
    };

    assert_eq!(count(StorageKind::Value, Workload::AllocateAndSum), 7);
    assert_eq!(count(StorageKind::Reference, Workload::AllocateAndSum), 5);
    assert_eq!(count(StorageKind::Value, Workload::CopyThenSum), 6);
    assert_eq!(count(StorageKind::Reference, Workload::CopyThenSum), 2);
}

#[test]
fn test_reference_heavy_copy_shares_nested_points() {
    let source: Box<[ValueRefBundle<3>]> = populate(16);
    let copied = copy_rounds(&source, 10);
    for (src, dst) in source.iter().zip(copied.iter()) {
        for k in 0..3 {
            assert!(src.fields().nested(k).same_object(dst.fields().nested(k)));
        }
    }

    let shared: Box<[RefRefBundle<2>]> = populate(16);
    let aliased = copy_rounds(&shared, 10);
    assert!(shared
        .iter()
        .zip(aliased.iter())
        .all(|(a, b)| a.same_object(b)));
}

#[test]
fn test_gatherer_deltas_cover_scenario_allocations() {
    let n = 1000;
    let params = ScenarioParams::scaled(n, 1).expect("valid params");
    let scenario = catalogue()
        .into_iter()
        .find(|s| s.name == "Point Class 2")
        .expect("scenario exists");

    let mut gatherer = StatsGatherer::new();
    gatherer.start_gathering();
    let outcome = scenario.run(&params);
    let report = gatherer.stop_gathering().expect("started");

    // One box per element plus the array itself.
    assert!(report.allocations >= n as u64 + 1);
    assert!(report.deallocations >= n as u64 + 1);
    assert!(report.heap_peak_bytes >= report.heap_before_bytes);
    assert!(outcome.memory_consumed_bytes > 0);
}
