// Copyright (c) The autotest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by the auto tester runner.

use crate::{VariantKind, runner::RunState};
use camino::Utf8PathBuf;
use config::ConfigError;
use thiserror::Error;

/// An error that occurred while starting a run.
///
/// These are integration faults: they indicate a misuse of the runner by the
/// driver, not an expected runtime condition, and are surfaced immediately
/// with the runner state left unchanged.
#[derive(Clone, Debug, Error)]
pub enum StartRunError {
    /// A run is already in progress; only one run session may exist at a
    /// time.
    #[error("a run is already in progress (runner state: {state})")]
    RunAlreadyInProgress {
        /// The state the runner was in when the start was rejected.
        state: RunState,
    },

    /// The requested case index is outside the registry.
    #[error(transparent)]
    IndexOutOfRange(#[from] InvalidCaseIndexError),
}

/// An error that occurred while looking up a case in the registry.
#[derive(Clone, Debug, Error)]
#[error("case index {index} out of range (registry has {count} cases)")]
pub struct InvalidCaseIndexError {
    /// The requested index.
    pub index: usize,
    /// The number of registered cases.
    pub count: usize,
}

/// An error which indicates that a variant kind outside the supported set was
/// named.
#[derive(Clone, Debug, Error)]
#[error(
    "unknown variant kind `{input}` (known variants: {})",
    VariantKind::variants().join(", "),
)]
pub struct UnknownVariantError {
    input: String,
}

impl UnknownVariantError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

/// An error that occurred while parsing the harness config.
#[derive(Debug, Error)]
#[error("failed to parse auto tester config at `{config_file}`")]
pub struct ConfigParseError {
    config_file: Utf8PathBuf,
    #[source]
    err: ConfigError,
}

impl ConfigParseError {
    pub(crate) fn new(config_file: impl Into<Utf8PathBuf>, err: ConfigError) -> Self {
        Self {
            config_file: config_file.into(),
            err,
        }
    }

    /// Returns the path of the config file that failed to parse.
    pub fn config_file(&self) -> &Utf8PathBuf {
        &self.config_file
    }
}
