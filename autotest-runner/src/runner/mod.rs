// Copyright (c) The autotest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The run controller.
//!
//! The main structure in this module is [`CaseRunner`].

mod dispatcher;
mod imp;
mod internal_events;

pub use imp::*;
pub use internal_events::CompletionHandle;
