// Copyright (c) The autotest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The case registry and the contract every test case implements.

mod case_list;
mod test_case;

pub use case_list::*;
pub use test_case::*;
