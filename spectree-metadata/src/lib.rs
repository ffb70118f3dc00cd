// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Records exchanged with the spectree reconciliation engine.
//!
//! The engine consumes two kinds of input records:
//!
//! * [`TestDefinition`]: a test discovered by statically parsing project sources, with its
//!   location and focus/disable directives.
//! * [`SpecOutcome`]: a result reported by a test execution backend, identified only by display
//!   strings.
//!
//! It produces a [`TestTreeSummary`], a hierarchical, serializable view of suites and tests, and
//! a [`FocusSnapshot`] that hosts persist between builds.

mod definition;
mod errors;
mod exit_codes;
mod outcome;
mod tree_summary;

pub use definition::*;
pub use errors::*;
pub use exit_codes::*;
pub use outcome::*;
pub use tree_summary::*;
