// Copyright (c) The autotest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Run mode for the auto tester.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The run mode for a test case.
///
/// This is used to distinguish between interactive runs, where completion is
/// driven by the user dismissing the case, and unattended runs bounded by a
/// per-case countdown.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    /// An interactive run; the countdown is suppressed.
    Manual,
    /// An unattended run with a capture-delay countdown.
    #[default]
    Automatic,
}

impl RunMode {
    /// Returns true if this is an unattended run.
    pub fn is_automatic(self) -> bool {
        matches!(self, Self::Automatic)
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => write!(f, "manual"),
            Self::Automatic => write!(f, "automatic"),
        }
    }
}
