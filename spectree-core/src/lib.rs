// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for spectree: reconciling the tests found in project sources with the
//! results reported by a test runner, and building a display tree from both.
//!
//! A build takes a [`DefinitionIndex`](index::DefinitionIndex) of test definitions and a list
//! of [`SpecOutcome`](spectree_metadata::SpecOutcome)s in arrival order, and produces a
//! [`TestTree`](tree::TestTree):
//!
//! 1. Each outcome is matched to a definition by the suite names and description it reports
//!    ([`matcher`]). Outcomes with no definition are collected separately.
//! 2. The outcome's suites and test are added to the tree, and focus directives are applied
//!    ([`focus`]).
//! 3. The finished tree is optionally regrouped by file and folder, then sorted ([`tree`]).
//!
//! [`ReconcileSession`](session::ReconcileSession) runs builds repeatedly, carrying focus state
//! from one to the next.

pub mod config;
pub mod errors;
pub mod focus;
pub mod helpers;
pub mod index;
pub mod matcher;
pub mod session;
pub mod tree;
