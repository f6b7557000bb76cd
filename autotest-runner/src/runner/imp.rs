// Copyright (c) The autotest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{dispatcher::DispatcherContext, internal_events::CompletionHandle};
use crate::{
    RunMode, VariantSet,
    config::RunToggles,
    errors::{InvalidCaseIndexError, StartRunError},
    list::{CaseContext, CaseList},
    reporter::{RunEvent, RunReport, RunResults},
    time::Countdown,
};
use std::{fmt, sync::Arc};
use tokio::sync::{mpsc::unbounded_channel, watch};
use tracing::debug;

/// Where the runner is in a run's lifecycle.
///
/// A run walks `Idle → Configuring → Running → AwaitingCompletion →
/// Finalizing` and back to `Idle`; failures travel through the same path as a
/// failure-flavored result rather than a distinct terminal state.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RunState {
    /// No run session exists.
    #[default]
    Idle,
    /// A case is being configured for a run.
    Configuring,
    /// The case has been started.
    Running,
    /// Waiting for the case's completion events; the only way out is the
    /// case reporting in.
    AwaitingCompletion,
    /// The run is wrapping up: countdown stopped, flags cleared, results
    /// snapshotted.
    Finalizing,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Configuring => "configuring",
            Self::Running => "running",
            Self::AwaitingCompletion => "awaiting-completion",
            Self::Finalizing => "finalizing",
        };
        f.write_str(s)
    }
}

/// Per-case selection state, owned and mutated only by the runner.
///
/// The presentation layer reads these through
/// [`CaseRunner::case_flags`]; nothing outside the runner writes them.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CaseFlags {
    /// The case has been picked out (it completed a run, or the driver
    /// marked it).
    pub selected: bool,
    /// The case is currently executing.
    pub running: bool,
}

/// A clonable handle that requests cancellation of the in-flight run.
///
/// Cancellation is advisory: it does not preempt the running case, it
/// suppresses the publish step once the case does finish. Cancelling while
/// the runner is idle is a no-op.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Requests cancellation of the current run, if any.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Case runner options.
#[derive(Debug, Default)]
pub struct CaseRunnerBuilder {
    toggles: Option<RunToggles>,
}

impl CaseRunnerBuilder {
    /// Sets the run toggles for this runner.
    ///
    /// If not set, the built-in defaults are used (both variants enabled,
    /// viewing while testing on).
    pub fn set_toggles(&mut self, toggles: RunToggles) -> &mut Self {
        self.toggles = Some(toggles);
        self
    }

    /// Creates a new case runner over the given registry.
    pub fn build(&self, list: CaseList) -> CaseRunner {
        let flags = vec![CaseFlags::default(); list.len()];
        CaseRunner {
            list,
            toggles: self.toggles.unwrap_or_default(),
            flags,
            state: RunState::Idle,
            results: RunResults::default(),
            cancel_tx: Arc::new(watch::Sender::new(false)),
        }
    }
}

/// Drives registered test cases through their run lifecycle one at a time.
///
/// Created using [`CaseRunnerBuilder::build`]. At most one run session exists
/// at a time; starting a run while another is pending is rejected rather than
/// implicitly cancelling it.
#[derive(Debug)]
pub struct CaseRunner {
    list: CaseList,
    toggles: RunToggles,
    flags: Vec<CaseFlags>,
    state: RunState,
    results: RunResults,
    cancel_tx: Arc<watch::Sender<bool>>,
}

impl CaseRunner {
    /// The registry this runner drives.
    pub fn list(&self) -> &CaseList {
        &self.list
    }

    /// The toggles this runner was built with.
    pub fn toggles(&self) -> &RunToggles {
        &self.toggles
    }

    /// Where the runner is in the run lifecycle.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// The variants enabled by this runner's toggles; the usual argument to
    /// [`execute`](Self::execute).
    pub fn enabled_variants(&self) -> VariantSet {
        self.toggles.enabled_variants()
    }

    /// Reads the selection state of a case.
    pub fn case_flags(&self, index: usize) -> Result<CaseFlags, InvalidCaseIndexError> {
        self.list.get(index)?;
        Ok(self.flags[index])
    }

    /// Marks a case as selected (or not) on behalf of the driver.
    pub fn set_selected(
        &mut self,
        index: usize,
        selected: bool,
    ) -> Result<(), InvalidCaseIndexError> {
        self.list.get(index)?;
        self.flags[index].selected = selected;
        Ok(())
    }

    /// Returns a handle that can cancel the in-flight run from elsewhere.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            tx: self.cancel_tx.clone(),
        }
    }

    /// Runs one case to completion.
    ///
    /// Configures the case at `index` with the given mode and variant set,
    /// starts it, and then reacts to its completion events until it reports
    /// being done. Every run event is passed to `on_event` as it happens; the
    /// sorted result report is additionally returned, unless the run was
    /// cancelled (`None`).
    ///
    /// # Errors
    ///
    /// Fails with [`StartRunError::RunAlreadyInProgress`] if a run session
    /// already exists, and [`StartRunError::IndexOutOfRange`] if `index` is
    /// outside the registry. Neither mutates any in-flight state.
    pub async fn execute<F>(
        &mut self,
        index: usize,
        mode: RunMode,
        variants: VariantSet,
        on_event: F,
    ) -> Result<Option<RunReport>, StartRunError>
    where
        F: FnMut(RunEvent),
    {
        if self.state != RunState::Idle {
            return Err(StartRunError::RunAlreadyInProgress { state: self.state });
        }
        let case = self.list.get(index)?.clone();

        // --- Configuring ---
        self.state = RunState::Configuring;
        self.results.reset();
        // A cancel requested while idle must not bleed into this run.
        self.cancel_tx.send_replace(false);
        let cancel_rx = self.cancel_tx.subscribe();

        let (case_tx, case_rx) = unbounded_channel();
        let completion = CompletionHandle::new(case.name(), case_tx);

        // The countdown drives the "time remaining" display for unattended,
        // observed runs. In manual mode completion is user-driven, so there
        // is nothing to count down.
        let countdown = if mode.is_automatic() && self.toggles.view_while_testing {
            Countdown::started(case.capture_delay(), case.name())
        } else {
            Countdown::disabled()
        };

        // --- Running ---
        self.state = RunState::Running;
        self.flags[index].running = true;

        let mut dispatcher_cx =
            DispatcherContext::new(on_event, case.name(), variants, &mut self.results);
        dispatcher_cx.run_started(mode);

        debug!(case_name = case.name(), mode = %mode, options = %variants, "starting case");
        case.case().start(CaseContext {
            mode,
            options: variants,
            completion,
        });

        // --- Awaiting completion ---
        self.state = RunState::AwaitingCompletion;
        let report = dispatcher_cx.run(case_rx, cancel_rx, countdown).await;

        // --- Finalizing ---
        self.state = RunState::Finalizing;
        self.flags[index].running = false;
        // Only a completed, published run marks the case as selected.
        if report.is_some() {
            self.flags[index].selected = true;
        }
        self.state = RunState::Idle;

        Ok(report)
    }
}
