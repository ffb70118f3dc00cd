// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    config::{TestGrouping, TreeConfig},
    errors::BuildError,
    focus::{FocusContext, FocusState, FocusVerdict},
    helpers::{convert_rel_path_to_forward_slash, plural},
    index::DefinitionIndex,
    matcher::{MatchIssue, NormalizedId, SpecMatcher},
    tree::{
        BuildStats, NodeInfo, NodeIssue, SourceLocation, SuiteNode, TestCaseNode, TestNode,
        TestTree,
        arena::{ArenaNode, ArenaPayload, BuildArena, NodeId},
        organizer, sorter,
    },
};
use camino::Utf8Path;
use spectree_metadata::{
    ActiveState, AncestorEntry, DefinitionState, FocusMark, SpecOutcome, SuiteType,
    TestDefinition,
};
use std::collections::HashMap;
use swrite::{SWrite, swrite};
use tracing::debug;

/// The id of the suite holding outcomes without a definition.
pub const UNMAPPED_SUITE_ID: &str = "unmapped";

/// The name of the suite holding outcomes without a definition.
pub const UNMAPPED_SUITE_NAME: &str = "Unmapped Tests";

const UNMAPPED_MESSAGE: &str = "these tests were reported by the test runner, \
                                but no matching definition was found in the project sources";

/// Builds a [`TestTree`] from outcomes, one outcome at a time.
///
/// Outcomes are added in arrival order. Nodes are held in an arena until [`Self::finish`], which
/// assigns focus and disable states, groups and sorts the tree, and appends unmapped tests.
#[derive(Debug)]
pub struct TreeBuilder<'a, I: ?Sized> {
    config: &'a TreeConfig,
    matcher: SpecMatcher<'a, I>,
    focus: FocusContext<'a>,
    arena: BuildArena,
    root: NodeId,
    unmapped_root: NodeId,
    // Test nodes built for each key, for flagging duplicate reports.
    reports: HashMap<NormalizedId, Vec<NodeId>>,
    stats: BuildStats,
}

impl<'a, I: DefinitionIndex + ?Sized> TreeBuilder<'a, I> {
    /// Creates a builder. `previous` is the focus state left by the last build.
    pub fn new(config: &'a TreeConfig, index: &'a I, previous: &'a FocusState) -> Self {
        let mut arena = BuildArena::new();
        let root = arena.add_root(ArenaNode::new(ArenaPayload::Suite, "".into(), String::new()));
        let mut unmapped = ArenaNode::new(
            ArenaPayload::Suite,
            UNMAPPED_SUITE_NAME.into(),
            UNMAPPED_SUITE_NAME.to_owned(),
        );
        unmapped.id = UNMAPPED_SUITE_ID.to_owned();
        unmapped.issue = Some(NodeIssue::info(UNMAPPED_MESSAGE));
        let unmapped_root = arena.add_root(unmapped);

        Self {
            config,
            matcher: SpecMatcher::new(index),
            focus: FocusContext::new(previous, config.options().show_only_focused_tests),
            arena,
            root,
            unmapped_root,
            reports: HashMap::new(),
            stats: BuildStats::default(),
        }
    }

    /// Adds one outcome.
    ///
    /// Returns an error if the outcome is malformed. The builder should be discarded in that
    /// case.
    pub fn add_outcome(&mut self, outcome: &SpecOutcome) -> Result<(), BuildError> {
        if outcome.id.is_empty() {
            return Err(BuildError::InvalidOutcome {
                full_name: outcome.full_name(),
                reason: "outcome id is empty",
            });
        }
        self.stats.outcomes += 1;

        let resolution = self.matcher.resolve(outcome);
        let Some(definition) = resolution.definition else {
            self.add_unmapped(outcome);
            return Ok(());
        };

        if self.config.options().exclude_disabled_tests && definition.is_disabled() {
            debug!("skipping disabled test `{}`", outcome.full_name());
            self.stats.skipped_disabled += 1;
            return Ok(());
        }

        let display_file = self.display_file(&definition.file);
        let mut created = Vec::new();
        let mut parent = self.root;
        let mut full_name = String::new();
        for entry in &definition.ancestor_chain {
            if !full_name.is_empty() {
                full_name.push(' ');
            }
            full_name.push_str(entry.name());
            parent = self.suite_for(
                parent,
                entry,
                definition,
                &display_file,
                &full_name,
                &mut created,
            );
        }

        let test_full_name = outcome.full_name();
        let mut node = ArenaNode::new(
            ArenaPayload::Test {
                status: outcome.status,
                duration_ms: outcome.duration_ms,
                failure_messages: outcome.failure_messages.clone(),
            },
            definition.description.clone(),
            test_full_name,
        );
        node.id = format!("{display_file}:{}", node.full_name);
        node.file = Some(definition.file.clone());
        node.line = Some(definition.line);
        node.state = definition.state;
        node.disabled = definition.disabled;
        let test = self.arena.add_child(parent, node);

        self.record_issue(resolution.key, resolution.issue.as_ref(), test);
        self.stats.mapped += 1;

        if self.focus.observe(&mut self.arena, test) == FocusVerdict::Exclude {
            self.stats.excluded_by_focus += 1;
            self.arena.detach(test);
            for &suite in created.iter().rev() {
                if !self.arena.get(suite).children().is_empty() {
                    break;
                }
                self.arena.detach(suite);
            }
        }

        Ok(())
    }

    fn suite_for(
        &mut self,
        parent: NodeId,
        entry: &AncestorEntry,
        test: &TestDefinition,
        display_file: &str,
        full_name: &str,
        created: &mut Vec<NodeId>,
    ) -> NodeId {
        let (file, line) = match entry.definition() {
            Some(suite) => (suite.file.as_path(), Some(suite.line)),
            None => (test.file.as_path(), None),
        };
        if let Some(existing) = self.arena.find_child_suite(parent, entry.name(), Some(file), line)
        {
            return existing;
        }

        let mut node =
            ArenaNode::new(ArenaPayload::Suite, entry.name().into(), full_name.to_owned());
        node.id = format!("{display_file}:{full_name}");
        node.file = Some(file.to_owned());
        node.line = line;
        if let Some(suite) = entry.definition() {
            node.state = suite.state;
            node.disabled = suite.disabled;
        }
        let id = self.arena.add_child(parent, node);
        created.push(id);
        id
    }

    fn record_issue(&mut self, key: NormalizedId, issue: Option<&MatchIssue<'_>>, test: NodeId) {
        let built = self.reports.entry(key).or_default();
        built.push(test);
        match issue {
            Some(issue @ MatchIssue::DuplicateDefinition { .. }) => {
                self.stats.duplicate_definitions += 1;
                let message = issue.message(self.config);
                self.arena.get_mut(test).issue = Some(NodeIssue::error(message));
            }
            Some(issue @ MatchIssue::DuplicateReport { .. }) => {
                self.stats.duplicate_reports += 1;
                let message = issue.message(self.config);
                for &node in built.iter() {
                    self.arena.get_mut(node).issue = Some(NodeIssue::error(message.clone()));
                }
            }
            None => {}
        }
    }

    fn add_unmapped(&mut self, outcome: &SpecOutcome) {
        if !self.config.options().show_unmapped_tests {
            self.stats.skipped_unmapped += 1;
            return;
        }
        self.stats.unmapped += 1;

        let mut parent = self.unmapped_root;
        let mut full_name = String::new();
        for name in &outcome.suite_chain {
            if !full_name.is_empty() {
                full_name.push(' ');
            }
            full_name.push_str(name);
            parent = match self.arena.find_child_suite(parent, name, None, None) {
                Some(existing) => existing,
                None => {
                    let mut node =
                        ArenaNode::new(ArenaPayload::Suite, name.clone(), full_name.clone());
                    node.id = format!("{UNMAPPED_SUITE_ID}:{full_name}");
                    self.arena.add_child(parent, node)
                }
            };
        }

        let mut node = ArenaNode::new(
            ArenaPayload::Test {
                status: outcome.status,
                duration_ms: outcome.duration_ms,
                failure_messages: outcome.failure_messages.clone(),
            },
            outcome.description.clone(),
            outcome.full_name(),
        );
        node.id = format!("{UNMAPPED_SUITE_ID}:{}", node.full_name);
        self.arena.add_child(parent, node);
    }

    fn display_file(&self, file: &Utf8Path) -> String {
        let resolved = self.config.resolve_file(file);
        convert_rel_path_to_forward_slash(self.config.display_path(&resolved))
    }

    /// Finishes the build.
    pub fn finish(self) -> TestTree {
        let Self {
            config,
            focus,
            arena,
            root,
            unmapped_root,
            stats,
            ..
        } = self;

        let focus = focus.finish(&arena);
        let materializer = Materializer {
            config,
            arena: &arena,
            marks: &focus.marks,
        };

        let mut root = materializer.suite(root, false);
        if config.options().test_grouping == TestGrouping::Folder {
            organizer::group_by_folder(&mut root, config);
        }
        sorter::sort_suite(&mut root);

        let mut unmapped = materializer.suite(unmapped_root, false);
        if !unmapped.children.is_empty() {
            sorter::sort_suite(&mut unmapped);
            root.children.push(TestNode::Suite(unmapped));
        }

        let test_count = root.test_count();
        debug!(
            "built tree with {test_count} {} from {} outcomes ({} unmapped)",
            plural::tests_str(test_count),
            stats.outcomes,
            stats.unmapped,
        );

        TestTree {
            root,
            focus_state: focus.next,
            focus_changes: focus.changes,
            stats,
        }
    }
}

/// Converts reachable arena nodes into [`TestNode`]s.
struct Materializer<'b> {
    config: &'b TreeConfig,
    arena: &'b BuildArena,
    marks: &'b HashMap<NodeId, FocusMark>,
}

impl Materializer<'_> {
    fn suite(&self, id: NodeId, ancestor_disabled: bool) -> SuiteNode {
        let node = self.arena.get(id);
        let disabled = ancestor_disabled || is_disabled(node);
        SuiteNode {
            suite_type: SuiteType::Plain,
            info: self.info(id, ancestor_disabled),
            children: node
                .children()
                .iter()
                .map(|&child| self.node(child, disabled))
                .collect(),
        }
    }

    fn node(&self, id: NodeId, ancestor_disabled: bool) -> TestNode {
        let node = self.arena.get(id);
        match &node.payload {
            ArenaPayload::Suite => TestNode::Suite(self.suite(id, ancestor_disabled)),
            ArenaPayload::Test {
                status,
                duration_ms,
                failure_messages,
            } => TestNode::Test(TestCaseNode {
                info: self.info(id, ancestor_disabled),
                status: *status,
                duration_ms: *duration_ms,
                failure_messages: failure_messages.clone(),
            }),
        }
    }

    fn info(&self, id: NodeId, ancestor_disabled: bool) -> NodeInfo {
        let node = self.arena.get(id);
        let active_state = if node.state == DefinitionState::Disabled {
            ActiveState::Disabled
        } else if node.disabled || ancestor_disabled {
            ActiveState::DisabledOut
        } else if let Some(mark) = self.marks.get(&id) {
            mark.active_state()
        } else {
            ActiveState::Default
        };

        let mut tooltip = node.full_name.clone();
        if let Some(file) = &node.file {
            let resolved = self.config.resolve_file(file);
            let display = convert_rel_path_to_forward_slash(self.config.display_path(&resolved));
            swrite!(tooltip, "\n{display}");
            if let Some(line) = node.line {
                swrite!(tooltip, ":{line}");
            }
        }

        NodeInfo {
            id: node.id.clone(),
            name: node.name.to_string(),
            full_name: node.full_name.clone(),
            label: node.name.to_string(),
            tooltip,
            active_state,
            location: node.file.as_ref().map(|file| SourceLocation {
                file: file.clone(),
                line: node.line,
            }),
            issue: node.issue.clone(),
        }
    }
}

fn is_disabled(node: &ArenaNode) -> bool {
    node.disabled || node.state == DefinitionState::Disabled
}
