// Copyright (c) The autotest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the run orchestrator, driven through the public API
//! with scripted cases on a paused clock.

use autotest_runner::{
    RunMode, VariantKind, VariantSet,
    config::RunToggles,
    errors::{InvalidCaseIndexError, StartRunError},
    list::{CaseContext, CaseList, RegisteredCase, TestCase},
    reporter::{CaseResult, ExecutionResult, RunEventKind},
    runner::{CaseRunner, CaseRunnerBuilder, RunState},
};
use chrono::Local;
use pretty_assertions::assert_eq;
use std::{sync::Arc, time::Duration};

fn case_result(outcome: ExecutionResult) -> CaseResult {
    CaseResult {
        result: outcome,
        start_time: Local::now().fixed_offset(),
        time_taken: Duration::from_millis(400),
        artifact: None,
    }
}

/// A case that "works" for a fixed duration, reports its scripted variant
/// results, and finishes.
struct ScriptedCase {
    work: Duration,
    reports: Vec<(VariantKind, ExecutionResult)>,
}

impl ScriptedCase {
    fn new(work_secs: u64, reports: Vec<(VariantKind, ExecutionResult)>) -> Arc<Self> {
        Arc::new(Self {
            // Offset from whole seconds so completion never races a
            // countdown tick on the paused clock.
            work: Duration::from_secs(work_secs) + Duration::from_millis(500),
            reports,
        })
    }
}

impl TestCase for ScriptedCase {
    fn start(&self, cx: CaseContext) {
        let work = self.work;
        let reports = self.reports.clone();
        let completion = cx.completion;
        tokio::spawn(async move {
            tokio::time::sleep(work).await;
            for (variant, outcome) in reports {
                completion.report(variant, case_result(outcome));
            }
            completion.finish();
        });
    }
}

/// A case that starts work and never reports back.
struct HungCase;

impl TestCase for HungCase {
    fn start(&self, cx: CaseContext) {
        let completion = cx.completion;
        tokio::spawn(async move {
            std::future::pending::<()>().await;
            drop(completion);
        });
    }
}

fn scenario_runner() -> CaseRunner {
    let list = CaseList::new(vec![
        RegisteredCase::new(
            "Geography",
            5,
            ScriptedCase::new(5, vec![(VariantKind::Map, ExecutionResult::Pass)]),
        ),
        RegisteredCase::new(
            "Vectors",
            3,
            ScriptedCase::new(
                3,
                vec![
                    (VariantKind::Map, ExecutionResult::Pass),
                    (VariantKind::Globe, ExecutionResult::Pass),
                ],
            ),
        ),
    ]);
    CaseRunnerBuilder::default().build(list)
}

fn tick_sequence(events: &[RunEventKind]) -> Vec<u32> {
    events
        .iter()
        .filter_map(|kind| match kind {
            RunEventKind::CountdownTick {
                remaining_seconds, ..
            } => Some(*remaining_seconds),
            _ => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn automatic_run_publishes_sorted_report() {
    let mut runner = scenario_runner();

    // Geography: capture delay 5, reports only Map.
    let mut events = Vec::new();
    let report = runner
        .execute(0, RunMode::Automatic, VariantSet::MAP, |event| {
            events.push(event.kind)
        })
        .await
        .unwrap()
        .expect("run was not cancelled");

    let keys: Vec<_> = report.keys().collect();
    assert_eq!(keys, vec!["Geography - Map"]);
    assert_eq!(tick_sequence(&events), vec![4, 3, 2, 1, 0]);
    assert!(matches!(events.first(), Some(RunEventKind::RunStarted { .. })));
    assert!(matches!(events.last(), Some(RunEventKind::RunFinished { .. })));

    assert_eq!(runner.state(), RunState::Idle);
    let flags = runner.case_flags(0).unwrap();
    assert!(flags.selected);
    assert!(!flags.running);

    // Vectors: reports both variants; the published order is lexical.
    let report = runner
        .execute(
            1,
            RunMode::Automatic,
            VariantSet::MAP | VariantSet::GLOBE,
            |_| {},
        )
        .await
        .unwrap()
        .expect("run was not cancelled");

    let keys: Vec<_> = report.keys().collect();
    assert_eq!(keys, vec!["Vectors - Globe", "Vectors - Map"]);
}

#[tokio::test(start_paused = true)]
async fn manual_run_has_no_countdown() {
    let mut runner = scenario_runner();

    let mut events = Vec::new();
    let report = runner
        .execute(0, RunMode::Manual, VariantSet::MAP, |event| {
            events.push(event.kind)
        })
        .await
        .unwrap()
        .expect("run was not cancelled");

    assert_eq!(report.len(), 1);
    assert_eq!(tick_sequence(&events), Vec::<u32>::new());
}

#[tokio::test(start_paused = true)]
async fn unobserved_automatic_run_has_no_countdown() {
    let mut builder = CaseRunnerBuilder::default();
    builder.set_toggles(RunToggles {
        run_globe: true,
        run_map: true,
        view_while_testing: false,
    });
    let mut runner = builder.build(CaseList::new(vec![RegisteredCase::new(
        "Geography",
        5,
        ScriptedCase::new(5, vec![(VariantKind::Map, ExecutionResult::Pass)]),
    )]));

    // With viewing turned off there is nothing to count down, even for an
    // unattended run; the results still publish as usual.
    let mut events = Vec::new();
    let report = runner
        .execute(0, RunMode::Automatic, VariantSet::MAP, |event| {
            events.push(event.kind)
        })
        .await
        .unwrap()
        .expect("run was not cancelled");

    assert_eq!(tick_sequence(&events), Vec::<u32>::new());
    let keys: Vec<_> = report.keys().collect();
    assert_eq!(keys, vec!["Geography - Map"]);
}

#[tokio::test(start_paused = true)]
async fn out_of_range_index_faults_and_leaves_runner_usable() {
    let mut runner = scenario_runner();

    let err = runner
        .execute(2, RunMode::Automatic, VariantSet::MAP, |_| {})
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StartRunError::IndexOutOfRange(InvalidCaseIndexError { index: 2, count: 2 })
    ));
    assert_eq!(runner.state(), RunState::Idle);

    // The fault left nothing behind; a valid run still works.
    let report = runner
        .execute(0, RunMode::Manual, VariantSet::MAP, |_| {})
        .await
        .unwrap();
    assert!(report.is_some());
}

#[tokio::test(start_paused = true)]
async fn reentrant_start_is_rejected() {
    let list = CaseList::new(vec![RegisteredCase::new("Hung", 3, Arc::new(HungCase))]);
    let mut runner = CaseRunnerBuilder::default().build(list);

    {
        let mut in_flight =
            std::pin::pin!(runner.execute(0, RunMode::Automatic, VariantSet::MAP, |_| {}));
        assert!(futures::poll!(in_flight.as_mut()).is_pending());
    }

    // The first session never reached Idle, so a second start is rejected
    // without touching it.
    let err = runner
        .execute(0, RunMode::Automatic, VariantSet::MAP, |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, StartRunError::RunAlreadyInProgress { .. }));
    assert!(runner.case_flags(0).unwrap().running);
}

#[tokio::test(start_paused = true)]
async fn partial_results_are_not_an_error() {
    let list = CaseList::new(vec![RegisteredCase::new(
        "Geography",
        2,
        ScriptedCase::new(2, vec![(VariantKind::Map, ExecutionResult::Pass)]),
    )]);
    let mut runner = CaseRunnerBuilder::default().build(list);

    // Both variants requested, only Map ever reports.
    let report = runner
        .execute(
            0,
            RunMode::Automatic,
            VariantSet::MAP | VariantSet::GLOBE,
            |_| {},
        )
        .await
        .unwrap()
        .expect("run was not cancelled");

    let keys: Vec<_> = report.keys().collect();
    assert_eq!(keys, vec!["Geography - Map"]);
    assert_eq!(runner.state(), RunState::Idle);
}

#[tokio::test(start_paused = true)]
async fn unconfigured_variant_reports_are_ignored() {
    let list = CaseList::new(vec![RegisteredCase::new(
        "Vectors",
        2,
        ScriptedCase::new(
            2,
            vec![
                (VariantKind::Map, ExecutionResult::Pass),
                (VariantKind::Globe, ExecutionResult::Pass),
            ],
        ),
    )]);
    let mut runner = CaseRunnerBuilder::default().build(list);

    let report = runner
        .execute(0, RunMode::Automatic, VariantSet::GLOBE, |_| {})
        .await
        .unwrap()
        .expect("run was not cancelled");

    let keys: Vec<_> = report.keys().collect();
    assert_eq!(keys, vec!["Vectors - Globe"]);
}

#[tokio::test(start_paused = true)]
async fn duplicate_variant_report_is_last_write_wins() {
    let list = CaseList::new(vec![RegisteredCase::new(
        "Flaky",
        2,
        ScriptedCase::new(
            2,
            vec![
                (VariantKind::Map, ExecutionResult::Fail),
                (VariantKind::Map, ExecutionResult::Pass),
            ],
        ),
    )]);
    let mut runner = CaseRunnerBuilder::default().build(list);

    let report = runner
        .execute(0, RunMode::Automatic, VariantSet::MAP, |_| {})
        .await
        .unwrap()
        .expect("run was not cancelled");

    assert_eq!(report.len(), 1);
    assert_eq!(report.entries[0].result.result, ExecutionResult::Pass);
}

#[tokio::test(start_paused = true)]
async fn cancel_suppresses_publish() {
    let mut runner = scenario_runner();

    let cancel = runner.cancel_handle();
    tokio::spawn(async move {
        // Cancel mid-run, well before Geography's 5.5s completion.
        tokio::time::sleep(Duration::from_secs(1)).await;
        cancel.cancel();
    });

    let mut events = Vec::new();
    let report = runner
        .execute(0, RunMode::Automatic, VariantSet::MAP, |event| {
            events.push(event.kind)
        })
        .await
        .unwrap();

    assert!(report.is_none(), "cancelled run must not publish");
    assert!(matches!(events.last(), Some(RunEventKind::RunCancelled)));
    assert!(
        !events
            .iter()
            .any(|kind| matches!(kind, RunEventKind::RunFinished { .. })),
        "no report may reach the reporter",
    );
    assert_eq!(runner.state(), RunState::Idle);

    // A cancelled run does not count as a completed one.
    let flags = runner.case_flags(0).unwrap();
    assert!(!flags.selected);
    assert!(!flags.running);
}

#[tokio::test(start_paused = true)]
async fn cancel_while_idle_is_a_noop() {
    let mut runner = scenario_runner();
    runner.cancel_handle().cancel();

    // The stale cancel must not bleed into the next run.
    let report = runner
        .execute(0, RunMode::Manual, VariantSet::MAP, |_| {})
        .await
        .unwrap();
    assert!(report.is_some());
}

#[tokio::test(start_paused = true)]
async fn selection_flags_are_owned_by_the_runner() {
    let mut runner = scenario_runner();

    assert_eq!(runner.case_flags(1).unwrap(), Default::default());
    runner.set_selected(1, true).unwrap();
    assert!(runner.case_flags(1).unwrap().selected);
    runner.set_selected(1, false).unwrap();
    assert!(!runner.case_flags(1).unwrap().selected);

    assert!(matches!(
        runner.set_selected(7, true).unwrap_err(),
        InvalidCaseIndexError { index: 7, count: 2 }
    ));
}
