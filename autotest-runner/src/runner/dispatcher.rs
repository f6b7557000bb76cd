// Copyright (c) The autotest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The event loop at the heart of the run controller.
//!
//! This module is where the runner sits while a case executes. It receives
//! events from the case's completion handle, ticks from the countdown, and
//! cancellation requests, processes them one at a time, and sends run events
//! out to the observer callback. There is no polling: the loop is resumed
//! only by inbound events.

use super::internal_events::CaseEvent;
use crate::{
    RunMode, VariantSet,
    reporter::{RunEvent, RunEventKind, RunReport, RunResults},
    time::{Countdown, StopwatchStart},
};
use chrono::Local;
use debug_ignore::DebugIgnore;
use tokio::sync::{mpsc::UnboundedReceiver, watch};
use tracing::debug;

/// Context for the dispatcher.
///
/// Holds the state of one run session while the case executes, and
/// coordinates between the case, the countdown, cancellation, and the
/// observer callback.
#[derive_where::derive_where(Debug)]
pub(super) struct DispatcherContext<'run, F> {
    callback: DebugIgnore<F>,
    stopwatch: StopwatchStart,
    case_name: String,
    options: VariantSet,
    results: &'run mut RunResults,
    cancelled: bool,
}

impl<'run, F> DispatcherContext<'run, F>
where
    F: FnMut(RunEvent),
{
    pub(super) fn new(
        callback: F,
        case_name: &str,
        options: VariantSet,
        results: &'run mut RunResults,
    ) -> Self {
        Self {
            callback: DebugIgnore(callback),
            stopwatch: crate::time::stopwatch(),
            case_name: case_name.to_owned(),
            options,
            results,
            cancelled: false,
        }
    }

    pub(super) fn run_started(&mut self, mode: RunMode) {
        self.basic_callback(RunEventKind::RunStarted {
            case_name: self.case_name.clone(),
            mode,
            options: self.options,
        });
    }

    /// Runs the dispatcher until the case finishes, then finalizes.
    ///
    /// `case_rx` is the channel the case's completion handle feeds. The
    /// countdown sits in its own select arm, gated so it stops participating
    /// once it has self-terminated. Cancellation is advisory: it never
    /// preempts the case, it only suppresses the publish step. A case that
    /// never finishes parks this loop indefinitely; that is a deliberate
    /// property of the design.
    pub(super) async fn run(
        &mut self,
        mut case_rx: UnboundedReceiver<CaseEvent>,
        mut cancel_rx: watch::Receiver<bool>,
        mut countdown: Countdown,
    ) -> Option<RunReport> {
        let mut cancel_done = false;

        loop {
            let countdown_running = countdown.is_running();

            tokio::select! {
                event = case_rx.recv() => {
                    match event {
                        Some(CaseEvent::VariantReported { case_name, variant, result }) => {
                            if self.options.contains_kind(variant) {
                                let key = self.results.record(&case_name, variant, result);
                                debug!(key = %key, "variant result recorded");
                                self.basic_callback(RunEventKind::VariantRecorded { key });
                            } else {
                                debug!(
                                    case_name = %case_name,
                                    variant = %variant,
                                    "variant reported but not configured, ignoring",
                                );
                            }
                        }
                        Some(CaseEvent::Finished { case_name }) => {
                            debug!(case_name = %case_name, "case finished");
                            break;
                        }
                        None => {
                            // Every completion handle was dropped without an
                            // explicit finish. Treat whatever was reported so
                            // far as the final result set.
                            debug!(
                                case_name = %self.case_name,
                                "completion handles dropped without finish",
                            );
                            break;
                        }
                    }
                }
                res = cancel_rx.changed(), if !cancel_done => {
                    match res {
                        Ok(()) if *cancel_rx.borrow_and_update() => {
                            debug!(case_name = %self.case_name, "cancellation requested");
                            self.cancelled = true;
                            cancel_done = true;
                        }
                        Ok(()) => {}
                        Err(_) => {
                            // The runner owning the sender went away; nothing
                            // left to observe on this arm.
                            cancel_done = true;
                        }
                    }
                }
                (label, remaining) = countdown.tick(), if countdown_running => {
                    self.basic_callback(RunEventKind::CountdownTick {
                        label,
                        remaining_seconds: remaining,
                    });
                }
            }
        }

        self.finalize(countdown)
    }

    /// Stops the countdown, snapshots the aggregator, and publishes the
    /// report unless the run was cancelled.
    fn finalize(&mut self, mut countdown: Countdown) -> Option<RunReport> {
        countdown.stop();

        let snapshot = self.stopwatch.snapshot();
        debug!(
            case_name = %self.case_name,
            started_at = %snapshot.start_time,
            elapsed = ?snapshot.elapsed,
            recorded = self.results.len(),
            "finalizing run",
        );

        let report = self.results.snapshot();
        if self.cancelled {
            debug!(
                case_name = %self.case_name,
                recorded = report.len(),
                "run cancelled, suppressing publish",
            );
            self.basic_callback(RunEventKind::RunCancelled);
            None
        } else {
            self.basic_callback(RunEventKind::RunFinished {
                report: report.clone(),
            });
            Some(report)
        }
    }

    #[inline]
    fn basic_callback(&mut self, kind: RunEventKind) {
        let snapshot = self.stopwatch.snapshot();
        let event = RunEvent {
            // Use `Local::now()` for the timestamp (which isn't necessarily
            // monotonic) along with the stopwatch's elapsed time (which is).
            timestamp: Local::now().fixed_offset(),
            elapsed: snapshot.elapsed,
            kind,
        };
        (self.callback)(event)
    }
}
