// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{RecordKind, RecordParseError, SpecStatus};
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether a node is a suite or a test.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// A suite: a node with children.
    Suite,

    /// A test: a leaf node.
    Test,
}

/// The classification of a suite node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum SuiteType {
    /// A suite reported by the test framework.
    Plain,

    /// A synthetic suite holding the tests of one source file.
    File,

    /// A synthetic suite representing one directory level.
    Folder,
}

/// The display state of a node with respect to focus and disable directives.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActiveState {
    /// No directive applies.
    #[default]
    Default,

    /// The node is the innermost focused node on its branch.
    Focused,

    /// The node is an ancestor or a descendant of a focused node.
    FocusedIn,

    /// The node is disabled in source.
    Disabled,

    /// The node is disabled through one of its ancestors.
    DisabledOut,
}

/// The focus mark recorded for a node in a [`FocusSnapshot`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FocusMark {
    /// The node was marked [`ActiveState::FocusedIn`].
    FocusedIn,

    /// The node was marked [`ActiveState::Focused`].
    Focused,
}

impl FocusMark {
    /// Returns the active state corresponding to this mark.
    pub fn active_state(self) -> ActiveState {
        match self {
            Self::Focused => ActiveState::Focused,
            Self::FocusedIn => ActiveState::FocusedIn,
        }
    }
}

/// Serializable form of a tree node.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestNodeSummary {
    /// Whether this is a suite or a test.
    pub kind: NodeKind,

    /// For suites, the suite classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suite_type: Option<SuiteType>,

    /// An identifier, unique within the tree and stable across builds.
    pub id: String,

    /// The node's name.
    pub name: String,

    /// The node's full display name.
    pub full_name: String,

    /// The label to present.
    pub label: String,

    /// A longer description to present on hover.
    pub tooltip: String,

    /// Focus and disable state.
    pub active_state: ActiveState,

    /// The source file, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<Utf8PathBuf>,

    /// The 1-based source line, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,

    /// An informational or error message attached to the node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// True if `message` describes an error.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub errored: bool,

    /// For tests, the reported status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SpecStatus>,

    /// For tests, the reported duration in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,

    /// For failed tests, the failure messages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failure_messages: Vec<String>,

    /// For suites, the children in display order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TestNodeSummary>>,
}

impl TestNodeSummary {
    /// Returns the children of this node, or an empty slice for tests.
    pub fn children(&self) -> &[TestNodeSummary] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Returns an iterator over this node and all its descendants, depth-first.
    pub fn iter(&self) -> impl Iterator<Item = &TestNodeSummary> + '_ {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children().iter().rev());
            Some(node)
        })
    }
}

/// A node whose focus mark from a previous build is no longer held.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemotedFocusSummary {
    /// The node's id.
    pub id: String,

    /// The mark held in the previous build.
    pub from: FocusMark,

    /// The mark held now, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<FocusMark>,
}

/// How focus changed relative to the previous build.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusChangesSummary {
    /// Ids of nodes that are focused now but were not before.
    pub newly_focused: Vec<String>,

    /// Nodes that lost or weakened their focus mark.
    pub demoted: Vec<DemotedFocusSummary>,
}

/// Serializable form of a built tree.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestTreeSummary {
    /// The root suite. Its name is empty.
    pub root: TestNodeSummary,

    /// Focus changes relative to the previous build.
    pub focus: FocusChangesSummary,
}

/// Focus marks persisted from one build to the next, keyed by node id.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusSnapshot {
    /// The mark held by each focused node.
    pub marks: BTreeMap<String, FocusMark>,
}

impl FocusSnapshot {
    /// Parses a snapshot from JSON.
    pub fn parse_json(input: &str) -> Result<Self, RecordParseError> {
        serde_json::from_str(input)
            .map_err(|err| RecordParseError::new(RecordKind::FocusSnapshot, None, err))
    }
}
