// Copyright (c) The autotest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

mod countdown;
mod stopwatch;

pub(crate) use countdown::*;
pub(crate) use stopwatch::*;
