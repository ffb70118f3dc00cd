// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8PathBuf;
use spectree_metadata::{ActiveState, NodeKind, SpecStatus, SuiteType, TestNodeSummary};

/// A node of the built tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TestNode {
    /// A suite, with children.
    Suite(SuiteNode),

    /// A test.
    Test(TestCaseNode),
}

impl TestNode {
    /// Returns information common to suites and tests.
    pub fn info(&self) -> &NodeInfo {
        match self {
            Self::Suite(suite) => &suite.info,
            Self::Test(test) => &test.info,
        }
    }

    /// Returns a mutable reference to the information common to suites and tests.
    pub fn info_mut(&mut self) -> &mut NodeInfo {
        match self {
            Self::Suite(suite) => &mut suite.info,
            Self::Test(test) => &mut test.info,
        }
    }

    /// Returns the suite, if this is one.
    pub fn as_suite(&self) -> Option<&SuiteNode> {
        match self {
            Self::Suite(suite) => Some(suite),
            Self::Test(_) => None,
        }
    }

    /// Converts this node and its descendants into their serializable form.
    pub fn to_summary(&self) -> TestNodeSummary {
        match self {
            Self::Suite(suite) => suite.to_summary(),
            Self::Test(test) => test.to_summary(),
        }
    }
}

/// Information common to suites and tests.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NodeInfo {
    /// Unique within the tree, and stable across builds of the same sources.
    pub id: String,

    /// The node's own name.
    pub name: String,

    /// The node's full display name: enclosing suite names and its own name, joined by spaces.
    /// Empty for file and folder suites, which have no display name of their own.
    pub full_name: String,

    /// The label to present.
    pub label: String,

    /// The text to present on hover.
    pub tooltip: String,

    /// Focus and disable state.
    pub active_state: ActiveState,

    /// Where the node is defined, if known.
    pub location: Option<SourceLocation>,

    /// A message attached to the node.
    pub issue: Option<NodeIssue>,
}

impl NodeInfo {
    fn write_summary(&self, summary: &mut TestNodeSummary) {
        summary.id = self.id.clone();
        summary.name = self.name.clone();
        summary.full_name = self.full_name.clone();
        summary.label = self.label.clone();
        summary.tooltip = self.tooltip.clone();
        summary.active_state = self.active_state;
        summary.file = self.location.as_ref().map(|location| location.file.clone());
        summary.line = self.location.as_ref().and_then(|location| location.line);
        summary.message = self.issue.as_ref().map(|issue| issue.message.clone());
        summary.errored = self.issue.as_ref().is_some_and(|issue| issue.errored);
    }
}

/// A source location.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourceLocation {
    /// The file, as reported by the definition.
    pub file: Utf8PathBuf,

    /// The 1-based line. File suites have no line.
    pub line: Option<u32>,
}

/// A message attached to a node.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NodeIssue {
    /// The message.
    pub message: String,

    /// True if the message describes an error.
    pub errored: bool,
}

impl NodeIssue {
    /// An error message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errored: true,
        }
    }

    /// An informational message.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errored: false,
        }
    }
}

/// A suite node.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SuiteNode {
    /// The suite classification.
    pub suite_type: SuiteType,

    /// Common information.
    pub info: NodeInfo,

    /// Children, in display order once the tree is sorted.
    pub children: Vec<TestNode>,
}

impl SuiteNode {
    /// Returns the number of tests under this suite.
    pub fn test_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                TestNode::Suite(suite) => suite.test_count(),
                TestNode::Test(_) => 1,
            })
            .sum()
    }

    /// Converts this suite and its descendants into their serializable form.
    pub fn to_summary(&self) -> TestNodeSummary {
        let mut summary = empty_summary(NodeKind::Suite);
        self.info.write_summary(&mut summary);
        summary.suite_type = Some(self.suite_type);
        summary.children = Some(self.children.iter().map(TestNode::to_summary).collect());
        summary
    }
}

/// A test node.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestCaseNode {
    /// Common information.
    pub info: NodeInfo,

    /// The status reported by the backend.
    pub status: SpecStatus,

    /// The duration reported by the backend, in milliseconds.
    pub duration_ms: u64,

    /// Failure messages reported by the backend.
    pub failure_messages: Vec<String>,
}

impl TestCaseNode {
    fn to_summary(&self) -> TestNodeSummary {
        let mut summary = empty_summary(NodeKind::Test);
        self.info.write_summary(&mut summary);
        summary.status = Some(self.status);
        summary.duration_ms = Some(self.duration_ms);
        summary.failure_messages = self.failure_messages.clone();
        summary
    }
}

fn empty_summary(kind: NodeKind) -> TestNodeSummary {
    TestNodeSummary {
        kind,
        suite_type: None,
        id: String::new(),
        name: String::new(),
        full_name: String::new(),
        label: String::new(),
        tooltip: String::new(),
        active_state: ActiveState::Default,
        file: None,
        line: None,
        message: None,
        errored: false,
        status: None,
        duration_ms: None,
        failure_messages: Vec::new(),
        children: None,
    }
}
