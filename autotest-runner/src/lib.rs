// Copyright (c) The autotest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Run orchestration for the Maply auto tester.
//!
//! This crate owns the logic that drives one registered test case through a
//! run: configuring it, starting it, counting down while it executes,
//! collecting the per-variant results it reports asynchronously, and handing
//! the sorted result set off to a reporter once the run is over. Test case
//! bodies, result presentation, and persistent settings all live elsewhere
//! and are reached only through the contracts defined here.

pub mod config;
pub mod errors;
pub mod list;
pub mod reporter;
mod run_mode;
pub mod runner;
mod time;
mod variant;

pub use run_mode::RunMode;
pub use variant::{VariantKind, VariantSet};
