// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line front end for spectree.
//!
//! `spectree build` reads test definitions and runner outcomes from files, builds the tree, and
//! prints it. Focus state can be persisted between invocations with `--focus-state`.

#![warn(missing_docs)]

mod dispatch;
mod display;
mod errors;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use output::{OutputContext, OutputWriter, StderrStyles};
