// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Construction of the test tree.
//!
//! The main entry points in this module are [`build_tree`] and the lower-level
//! [`TreeBuilder`], which accepts outcomes one at a time.

pub(crate) mod arena;
mod builder;
mod node;
mod organizer;
mod sorter;

pub use builder::{TreeBuilder, UNMAPPED_SUITE_ID, UNMAPPED_SUITE_NAME};
pub use node::*;

use crate::{
    config::TreeConfig,
    errors::BuildError,
    focus::{FocusChanges, FocusState},
    index::DefinitionIndex,
};
use spectree_metadata::{SpecOutcome, TestTreeSummary};

/// Counts collected while building a tree.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BuildStats {
    /// The number of outcomes added.
    pub outcomes: usize,

    /// Outcomes that matched a definition.
    pub mapped: usize,

    /// Outcomes without a definition that were placed under the unmapped suite.
    pub unmapped: usize,

    /// Outcomes without a definition that were dropped.
    pub skipped_unmapped: usize,

    /// Outcomes dropped because their definition is disabled.
    pub skipped_disabled: usize,

    /// Mapped outcomes dropped on arrival because another test is focused.
    pub excluded_by_focus: usize,

    /// Outcomes that matched one of several definitions with the same name.
    pub duplicate_definitions: usize,

    /// Outcomes reported after every matching definition was claimed.
    pub duplicate_reports: usize,
}

/// A built tree.
#[derive(Clone, Debug)]
pub struct TestTree {
    /// The root suite. It has an empty id and name.
    pub root: SuiteNode,

    /// The focus state to carry into the next build.
    pub focus_state: FocusState,

    /// How focus changed since the previous build.
    pub focus_changes: FocusChanges,

    /// Counts collected during the build.
    pub stats: BuildStats,
}

impl TestTree {
    /// Returns the node with the given id.
    pub fn find(&self, id: &str) -> Option<&TestNode> {
        fn find_in<'a>(children: &'a [TestNode], id: &str) -> Option<&'a TestNode> {
            children.iter().find_map(|child| {
                if child.info().id == id {
                    return Some(child);
                }
                child
                    .as_suite()
                    .and_then(|suite| find_in(&suite.children, id))
            })
        }
        find_in(&self.root.children, id)
    }

    /// Converts to the serializable form.
    pub fn to_summary(&self) -> TestTreeSummary {
        TestTreeSummary {
            root: self.root.to_summary(),
            focus: self.focus_changes.to_summary(),
        }
    }
}

/// Builds a tree from outcomes in arrival order.
///
/// `previous` is the focus state returned by the last build, or an empty state.
pub fn build_tree<I: DefinitionIndex + ?Sized>(
    config: &TreeConfig,
    index: &I,
    outcomes: &[SpecOutcome],
    previous: &FocusState,
) -> Result<TestTree, BuildError> {
    let mut builder = TreeBuilder::new(config, index, previous);
    for outcome in outcomes {
        builder.add_outcome(outcome)?;
    }
    Ok(builder.finish())
}
