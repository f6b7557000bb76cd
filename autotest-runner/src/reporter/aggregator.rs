// Copyright (c) The autotest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregation of per-variant results over one run session.

use crate::{
    VariantKind,
    reporter::{CaseResult, ResultEntry, RunReport},
};
use std::collections::BTreeMap;

/// Builds the composite key a result is recorded under.
pub fn result_key(case_name: &str, variant: VariantKind) -> String {
    format!("{case_name} - {variant}")
}

/// The per-run result map, keyed by `"{name} - {variant}"`.
///
/// Owned exclusively by the runner. Reset exactly once at the start of each
/// run; recording is an upsert, so a duplicate report for the same key is
/// last-write-wins. The `BTreeMap` keeps entries in ascending lexical key
/// order, which is the ordering contract the published snapshot carries.
#[derive(Clone, Debug, Default)]
pub(crate) struct RunResults {
    entries: BTreeMap<String, CaseResult>,
}

impl RunResults {
    /// Clears all entries, establishing a fresh run session.
    pub(crate) fn reset(&mut self) {
        self.entries.clear();
    }

    /// Upserts a result under its composite key, returning the key.
    pub(crate) fn record(
        &mut self,
        case_name: &str,
        variant: VariantKind,
        result: CaseResult,
    ) -> String {
        let key = result_key(case_name, variant);
        self.entries.insert(key.clone(), result);
        key
    }

    /// Returns the recorded entries sorted ascending by key.
    pub(crate) fn snapshot(&self) -> RunReport {
        RunReport {
            entries: self
                .entries
                .iter()
                .map(|(key, result)| ResultEntry {
                    key: key.clone(),
                    result: result.clone(),
                })
                .collect(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
