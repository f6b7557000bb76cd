// Copyright (c) The autotest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{RunMode, VariantSet, runner::CompletionHandle};

/// Context handed to a test case when it is started.
///
/// Carries everything the runner decided at configure time, plus the handle
/// through which the case reports back.
#[derive(Debug)]
pub struct CaseContext {
    /// The mode this run executes in.
    pub mode: RunMode,

    /// The variants the case should execute. A case is free to report fewer
    /// variants than requested; partial results are valid.
    pub options: VariantSet,

    /// The completion handle. The case must eventually call
    /// [`CompletionHandle::finish`] (or drop the handle) to end the run.
    pub completion: CompletionHandle,
}

/// The contract every opaque test case implements.
///
/// New cases are added by registering a descriptor with the
/// [`CaseList`](crate::list::CaseList), not by extending the runner. The
/// runner knows nothing about what a case does internally.
pub trait TestCase: Send + Sync {
    /// Begins the case's own asynchronous work. Must not block.
    ///
    /// The case reports zero or more per-variant results through
    /// `cx.completion` at some arbitrary later point, then finishes. The
    /// runner is purely reactive to those messages.
    fn start(&self, cx: CaseContext);
}
