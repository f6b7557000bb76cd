// Copyright (c) The autotest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Events and result aggregation for run consumers.

mod aggregator;
pub mod events;

pub(crate) use aggregator::RunResults;
pub use aggregator::result_key;
pub use events::{CaseResult, ExecutionResult, ResultEntry, RunEvent, RunEventKind, RunReport};
