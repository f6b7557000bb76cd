// Copyright (c) The autotest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Events produced over the course of a run.

use crate::{RunMode, VariantSet};
use camino::Utf8PathBuf;
use chrono::{DateTime, FixedOffset};
use std::time::Duration;

/// A run event.
///
/// Events are produced by a [`CaseRunner`](crate::runner::CaseRunner) and
/// consumed by whatever is observing the run (status display, results
/// presentation).
#[derive(Clone, Debug)]
pub struct RunEvent {
    /// The time at which the event was generated, including the offset from UTC.
    pub timestamp: DateTime<FixedOffset>,

    /// The amount of time elapsed since the start of the run.
    pub elapsed: Duration,

    /// The kind of run event this is.
    pub kind: RunEventKind,
}

/// The kind of run event this is.
///
/// Forms part of [`RunEvent`].
#[derive(Clone, Debug)]
pub enum RunEventKind {
    /// A run started.
    RunStarted {
        /// The name of the case being run.
        case_name: String,

        /// The mode the run executes in.
        mode: RunMode,

        /// The variants the case was configured with.
        options: VariantSet,
    },

    /// The countdown ticked. Purely informational.
    CountdownTick {
        /// The status label, i.e. the running case's name.
        label: String,

        /// Seconds remaining on the countdown.
        remaining_seconds: u32,
    },

    /// A variant result was recorded into the aggregator.
    VariantRecorded {
        /// The composite result key, `"{name} - {variant}"`.
        key: String,
    },

    /// The run finished and its results are final.
    RunFinished {
        /// The published result set, sorted ascending by key.
        report: RunReport,
    },

    /// The run was cancelled; no results were published.
    RunCancelled,
}

/// Whether a case variant passed or failed.
///
/// The runner itself is agnostic to this; it is carried inside the result
/// payload and only interpreted downstream.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExecutionResult {
    /// The variant rendered/computed what it was expected to.
    Pass,
    /// The variant did not.
    Fail,
}

impl ExecutionResult {
    /// Returns true if the variant passed.
    pub fn is_success(self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// The result payload a case reports for one variant.
///
/// Opaque to the runner beyond storage: it records and publishes these
/// without inspecting them.
#[derive(Clone, Debug)]
pub struct CaseResult {
    /// Pass/fail, as judged by the case itself.
    pub result: ExecutionResult,

    /// When the variant started executing.
    pub start_time: DateTime<FixedOffset>,

    /// How long the variant took.
    pub time_taken: Duration,

    /// A capture artifact (screenshot or similar), if the case produced one.
    pub artifact: Option<Utf8PathBuf>,
}

/// One published result: a composite key and the payload recorded under it.
#[derive(Clone, Debug)]
pub struct ResultEntry {
    /// The composite key, `"{name} - {variant}"`. Unique within a run.
    pub key: String,

    /// The recorded payload.
    pub result: CaseResult,
}

/// The published outcome of one completed, non-cancelled run.
///
/// Entries are sorted ascending by key; downstream reporting relies on that
/// ordering.
#[derive(Clone, Debug, Default)]
pub struct RunReport {
    /// The result entries, in ascending key order.
    pub entries: Vec<ResultEntry>,
}

impl RunReport {
    /// The number of entries in the report.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The keys in published order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }
}
