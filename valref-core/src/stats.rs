// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Before/after memory statistics around a measured run.
//!
//! A gatherer takes a snapshot in [`StatsGatherer::start_gathering`] and a
//! second one in [`StatsGatherer::stop_gathering`]. Both ends hand freed
//! pages back to the OS so the resident set reflects only live data. The
//! allocator counters are read at the inner edge of each call, so the
//! gatherer's own bookkeeping never shows up in the deltas.

use std::fmt;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use sysinfo::{Pid, System};

use crate::alloc::{self, AllocCounters};
use crate::error::StatsError;

/// Memory state at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Live heap bytes according to the tracking allocator
    pub heap_bytes: u64,
    /// Process resident set size, if the platform reports it
    pub rss_bytes: Option<u64>,
    /// Cumulative allocator counters
    pub counters: AllocCounters,
}

/// What changed across a measured interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsReport {
    pub heap_before_bytes: u64,
    pub heap_after_bytes: u64,
    /// Highest live heap size seen during the interval
    pub heap_peak_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rss_before_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rss_after_bytes: Option<u64>,
    pub allocations: u64,
    pub deallocations: u64,
    pub reallocations: u64,
    pub allocated_bytes: u64,
}

impl StatsReport {
    /// Resident set growth in kilobytes; negative when pages were returned.
    pub fn rss_delta_kb(&self) -> Option<i64> {
        match (self.rss_before_bytes, self.rss_after_bytes) {
            (Some(before), Some(after)) => Some((after as i64 - before as i64) / 1024),
            _ => None,
        }
    }
}

impl fmt::Display for StatsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Mem before: {}KB; Mem after: {}KB; Allocs - {}; Frees - {}; Reallocs - {}",
            self.heap_before_bytes / 1024,
            self.heap_after_bytes / 1024,
            self.allocations,
            self.deallocations,
            self.reallocations,
        )?;
        match self.rss_delta_kb() {
            Some(delta) => write!(f, "; RSS delta - {}KB", delta),
            None => write!(f, "; RSS delta - n/a"),
        }
    }
}

/// Collects a [`StatsReport`] around one measured run.
pub struct StatsGatherer {
    system: System,
    pid: Option<Pid>,
    start: Option<StatsSnapshot>,
    report: Option<StatsReport>,
}

impl StatsGatherer {
    pub fn new() -> Self {
        Self {
            system: System::new(),
            pid: sysinfo::get_current_pid().ok(),
            start: None,
            report: None,
        }
    }

    /// Release free memory, then record the "before" snapshot.
    ///
    /// Call immediately before the timed work starts.
    pub fn start_gathering(&mut self) {
        alloc::release_free_memory();
        let rss_bytes = self.resident_set_bytes();
        // Counters last: the RSS refresh allocates and must stay outside the window.
        let counters = AllocCounters::read();
        alloc::reset_peak();
        self.start = Some(StatsSnapshot {
            heap_bytes: counters.live_bytes,
            rss_bytes,
            counters,
        });
        self.report = None;
    }

    /// Record the "after" snapshot and the counter deltas since
    /// [`start_gathering`](Self::start_gathering), then release free memory
    /// before sampling the resident set.
    pub fn stop_gathering(&mut self) -> Result<StatsReport, StatsError> {
        let start = self.start.take().ok_or(StatsError::NotStarted)?;

        // Counters first, for the same reason.
        let counters = AllocCounters::read();
        alloc::release_free_memory();
        let end = StatsSnapshot {
            heap_bytes: counters.live_bytes,
            rss_bytes: self.resident_set_bytes(),
            counters,
        };
        let delta = end.counters.since(&start.counters);

        let report = StatsReport {
            heap_before_bytes: start.heap_bytes,
            heap_after_bytes: end.heap_bytes,
            heap_peak_bytes: end.counters.peak_bytes.max(start.heap_bytes),
            rss_before_bytes: start.rss_bytes,
            rss_after_bytes: end.rss_bytes,
            allocations: delta.allocations,
            deallocations: delta.deallocations,
            reallocations: delta.reallocations,
            allocated_bytes: delta.allocated_bytes,
        };

        tracing::debug!(
            allocations = report.allocations,
            deallocations = report.deallocations,
            peak_kb = report.heap_peak_bytes / 1024,
            "Stopped gathering"
        );

        self.report = Some(report);
        Ok(report)
    }

    /// The last completed report, if any.
    pub fn report(&self) -> Option<&StatsReport> {
        self.report.as_ref()
    }

    /// Write the last report as one line. Writes nothing if no interval has
    /// been completed yet.
    pub fn print_stats<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match &self.report {
            Some(report) => writeln!(out, "{}", report),
            None => Ok(()),
        }
    }

    fn resident_set_bytes(&mut self) -> Option<u64> {
        let pid = self.pid?;
        if !self.system.refresh_process(pid) {
            return None;
        }
        self.system.process(pid).map(|process| process.memory())
    }
}

impl Default for StatsGatherer {
    fn default() -> Self {
        Self::new()
    }
}
