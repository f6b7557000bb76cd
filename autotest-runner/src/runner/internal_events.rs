// Copyright (c) The autotest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Internal events used between the runner components.
//!
//! These are the messages a running case delivers back into the dispatcher.
//! They mirror parts of [`crate::reporter::events`], but carry the raw
//! per-variant payloads before aggregation.

use crate::{VariantKind, reporter::CaseResult};
use tokio::sync::mpsc::UnboundedSender;

/// An internal event.
///
/// These events are sent by an executing case (through its
/// [`CompletionHandle`]) to the dispatcher, which processes them one at a
/// time.
#[derive(Debug)]
pub(super) enum CaseEvent {
    /// The case produced a result for one variant.
    VariantReported {
        case_name: String,
        variant: VariantKind,
        result: CaseResult,
    },
    /// The case is done; no further variant reports will follow.
    Finished { case_name: String },
}

/// The handle a running case reports its completion through.
///
/// Handed to the case inside its [`CaseContext`](crate::list::CaseContext).
/// The case may call [`report`](Self::report) once per variant it executed
/// (in any order, possibly spread over several invocations), then
/// [`finish`](Self::finish) exactly once. Reports for a variant the case was
/// not configured with are ignored by the dispatcher, and a variant that
/// never reports is simply absent from the published results.
#[derive(Clone, Debug)]
pub struct CompletionHandle {
    case_name: String,
    tx: UnboundedSender<CaseEvent>,
}

impl CompletionHandle {
    pub(super) fn new(case_name: impl Into<String>, tx: UnboundedSender<CaseEvent>) -> Self {
        Self {
            case_name: case_name.into(),
            tx,
        }
    }

    /// Reports the result for one variant. Last write wins per variant.
    pub fn report(&self, variant: VariantKind, result: CaseResult) {
        // A send failure means the run was torn down; the report has nowhere
        // to go.
        let _ = self.tx.send(CaseEvent::VariantReported {
            case_name: self.case_name.clone(),
            variant,
            result,
        });
    }

    /// Signals that the case is done and the run can finalize.
    pub fn finish(self) {
        let _ = self.tx.send(CaseEvent::Finished {
            case_name: self.case_name,
        });
    }
}
