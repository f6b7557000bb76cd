// Copyright (c) The autotest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{errors::InvalidCaseIndexError, list::TestCase};
use std::{fmt, sync::Arc};

/// A test case registered with the harness, along with its static metadata.
///
/// Created once at startup and kept for the lifetime of the process. The
/// registry owns the static fields; the per-run `selected`/`running` flags
/// live on the runner, not here.
#[derive(Clone)]
pub struct RegisteredCase {
    name: String,
    capture_delay: u32,
    case: Arc<dyn TestCase>,
}

impl RegisteredCase {
    /// Registers a case under a human-readable unique name.
    ///
    /// `capture_delay` is the number of seconds the countdown is seeded with
    /// when the case runs unattended; it is not consulted in manual mode.
    pub fn new(name: impl Into<String>, capture_delay: u32, case: Arc<dyn TestCase>) -> Self {
        Self {
            name: name.into(),
            capture_delay,
            case,
        }
    }

    /// The case's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The countdown seed for unattended runs, in seconds.
    pub fn capture_delay(&self) -> u32 {
        self.capture_delay
    }

    /// The opaque case body.
    pub fn case(&self) -> &Arc<dyn TestCase> {
        &self.case
    }
}

impl fmt::Debug for RegisteredCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredCase")
            .field("name", &self.name)
            .field("capture_delay", &self.capture_delay)
            .finish_non_exhaustive()
    }
}

/// An immutable, ordered catalog of registered test cases.
///
/// Lookup is by index and bounds-checked: asking for an index outside the
/// registry is a programming error and faults rather than clamping.
#[derive(Clone, Debug, Default)]
pub struct CaseList {
    cases: Vec<RegisteredCase>,
}

impl CaseList {
    /// Creates a registry from an ordered list of cases.
    ///
    /// Case names must be unique; result keys are derived from them.
    pub fn new(cases: Vec<RegisteredCase>) -> Self {
        debug_assert!(
            {
                let mut names: Vec<_> = cases.iter().map(RegisteredCase::name).collect();
                names.sort_unstable();
                names.windows(2).all(|w| w[0] != w[1])
            },
            "case names must be unique"
        );
        Self { cases }
    }

    /// Creates an empty registry.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The number of registered cases.
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Returns true if no cases are registered.
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Looks up a case by index.
    pub fn get(&self, index: usize) -> Result<&RegisteredCase, InvalidCaseIndexError> {
        self.cases.get(index).ok_or(InvalidCaseIndexError {
            index,
            count: self.cases.len(),
        })
    }

    /// Iterates over the registered cases in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredCase> {
        self.cases.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::CaseContext;

    struct NoopCase;

    impl TestCase for NoopCase {
        fn start(&self, cx: CaseContext) {
            cx.completion.finish();
        }
    }

    fn list_of(names: &[&str]) -> CaseList {
        CaseList::new(
            names
                .iter()
                .map(|name| RegisteredCase::new(*name, 3, Arc::new(NoopCase)))
                .collect(),
        )
    }

    #[test]
    fn in_bounds_lookup_succeeds() {
        let list = list_of(&["Geography", "Vectors"]);
        assert_eq!(list.len(), 2);
        for (index, name) in ["Geography", "Vectors"].iter().enumerate() {
            assert_eq!(list.get(index).unwrap().name(), *name);
        }
    }

    #[test]
    fn out_of_bounds_lookup_faults() {
        let list = list_of(&["Geography"]);
        let err = list.get(1).unwrap_err();
        assert!(matches!(err, InvalidCaseIndexError { index: 1, count: 1 }));

        assert!(list_of(&[]).get(0).is_err());
    }
}
