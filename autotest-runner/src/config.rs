// Copyright (c) The autotest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Harness configuration.
//!
//! The runner consults three toggles, read once when a run is configured:
//! whether to execute the globe variant, whether to execute the map variant,
//! and whether the run should be observed while it executes (which is what
//! the countdown display hangs off of). Defaults are compiled in and an
//! optional `autotester.toml` next to the harness overrides them.

use crate::{VariantSet, errors::ConfigParseError};
use camino::Utf8Path;
use config::{Config, File, FileFormat};
use serde::Deserialize;

/// The name of the override config file, relative to the harness directory.
pub const CONFIG_FILE_NAME: &str = "autotester.toml";

static DEFAULT_CONFIG: &str = r#"
run-globe = true
run-map = true
view-while-testing = true
"#;

/// The toggles that shape a run.
///
/// Read-only as far as the runner is concerned; it consults them exactly once
/// per run, while configuring the chosen case.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RunToggles {
    /// Execute the globe variant of each case.
    pub run_globe: bool,
    /// Execute the map variant of each case.
    pub run_map: bool,
    /// Display the case (and the countdown) while it runs.
    pub view_while_testing: bool,
}

impl RunToggles {
    /// Reads toggles from the built-in defaults, overridden by
    /// `autotester.toml` in `harness_dir` if that file exists.
    pub fn from_dir(harness_dir: &Utf8Path) -> Result<Self, ConfigParseError> {
        let config_file = harness_dir.join(CONFIG_FILE_NAME);
        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::new(config_file.as_str(), FileFormat::Toml).required(false));

        let config = builder
            .build()
            .map_err(|err| ConfigParseError::new(config_file.clone(), err))?;
        config
            .try_deserialize()
            .map_err(|err| ConfigParseError::new(config_file, err))
    }

    /// Maps the variant toggles to the set of variants a run should enable.
    pub fn enabled_variants(&self) -> VariantSet {
        let mut variants = VariantSet::empty();
        if self.run_globe {
            variants |= VariantSet::GLOBE;
        }
        if self.run_map {
            variants |= VariantSet::MAP;
        }
        variants
    }
}

impl Default for RunToggles {
    fn default() -> Self {
        Self {
            run_globe: true,
            run_map: true,
            view_while_testing: true,
        }
    }
}
