// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human-readable rendering of a built tree.

use owo_colors::{OwoColorize, Style, style};
use spectree_core::{
    focus::FocusChanges,
    helpers::plural,
    tree::{BuildStats, SuiteNode, TestNode, TestTree},
};
use spectree_metadata::{ActiveState, SpecStatus};
use std::io::{self, Write};

#[derive(Clone, Debug, Default)]
pub(crate) struct ThemeCharacters {
    use_unicode: bool,
}

impl ThemeCharacters {
    pub(crate) fn use_unicode(&mut self) {
        self.use_unicode = true;
    }

    fn tree_branch(&self) -> &'static str {
        if self.use_unicode { "├─" } else { "|-" }
    }

    fn tree_last(&self) -> &'static str {
        if self.use_unicode { "└─" } else { "\\-" }
    }

    fn tree_continuation(&self) -> &'static str {
        if self.use_unicode { "│ " } else { "| " }
    }

    fn tree_space(&self) -> &'static str {
        "  "
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Styles {
    suite: Style,
    pass: Style,
    fail: Style,
    skip: Style,
    focus: Style,
    disabled: Style,
    message: Style,
    count: Style,
}

impl Styles {
    pub(crate) fn colorize(&mut self) {
        self.suite = style().bold();
        self.pass = style().green().bold();
        self.fail = style().red().bold();
        self.skip = style().yellow().bold();
        self.focus = style().cyan();
        self.disabled = style().dimmed();
        self.message = style().dimmed();
        self.count = style().bold();
    }
}

/// Writes a tree as an indented outline, followed by a summary.
#[derive(Clone, Debug, Default)]
pub(crate) struct TreeDisplayer {
    theme: ThemeCharacters,
    styles: Styles,
    show_failure_messages: bool,
}

impl TreeDisplayer {
    pub(crate) fn new(
        theme: ThemeCharacters,
        styles: Styles,
        show_failure_messages: bool,
    ) -> Self {
        Self {
            theme,
            styles,
            show_failure_messages,
        }
    }

    pub(crate) fn write_tree(&self, tree: &TestTree, writer: &mut dyn Write) -> io::Result<()> {
        for item in traverse(&tree.root) {
            self.write_item(&item, writer)?;
        }
        self.write_focus_changes(&tree.focus_changes, writer)?;
        self.write_summary(&tree.root, &tree.stats, writer)
    }

    fn write_item(&self, item: &TreeItem<'_>, writer: &mut dyn Write) -> io::Result<()> {
        let prefix = self.prefix(item);
        let info = item.node.info();
        match item.node {
            TestNode::Suite(_) => {
                write!(writer, "{prefix}{}", info.label.style(self.styles.suite))?;
            }
            TestNode::Test(test) => {
                write!(writer, "{prefix}{} ", info.label)?;
                match test.status {
                    SpecStatus::Passed => write!(
                        writer,
                        "[{} {}ms]",
                        "PASS".style(self.styles.pass),
                        test.duration_ms
                    )?,
                    SpecStatus::Failed => write!(
                        writer,
                        "[{} {}ms]",
                        "FAIL".style(self.styles.fail),
                        test.duration_ms
                    )?,
                    SpecStatus::Skipped => write!(writer, "[{}]", "SKIP".style(self.styles.skip))?,
                }
            }
        }

        match info.active_state {
            ActiveState::Default => {}
            ActiveState::Focused => write!(writer, " {}", "(focused)".style(self.styles.focus))?,
            ActiveState::FocusedIn => {}
            ActiveState::Disabled => {
                write!(writer, " {}", "(disabled)".style(self.styles.disabled))?
            }
            ActiveState::DisabledOut => {}
        }

        if let Some(issue) = &info.issue {
            let first_line = issue.message.lines().next().unwrap_or_default();
            let style = if issue.errored {
                self.styles.fail
            } else {
                self.styles.message
            };
            write!(writer, " -- {}", first_line.style(style))?;
        }
        writeln!(writer)?;

        if self.show_failure_messages
            && let TestNode::Test(test) = item.node
        {
            let indent = self.child_prefix(item);
            for message in &test.failure_messages {
                for line in message.lines() {
                    writeln!(writer, "{indent}{}", line.style(self.styles.message))?;
                }
            }
        }
        Ok(())
    }

    fn prefix(&self, item: &TreeItem<'_>) -> String {
        if item.depth == 0 {
            return String::new();
        }
        let mut prefix = self.continuation(&item.continuation_flags);
        prefix.push_str(if item.is_last {
            self.theme.tree_last()
        } else {
            self.theme.tree_branch()
        });
        prefix.push(' ');
        prefix
    }

    // The indent for lines printed beneath an item, aligned with its children.
    fn child_prefix(&self, item: &TreeItem<'_>) -> String {
        let mut flags = item.continuation_flags.clone();
        if item.depth > 0 {
            flags.push(!item.is_last);
        }
        self.continuation(&flags)
    }

    fn continuation(&self, flags: &[bool]) -> String {
        let mut out = String::new();
        for &flag in flags {
            out.push_str(if flag {
                self.theme.tree_continuation()
            } else {
                self.theme.tree_space()
            });
            out.push(' ');
        }
        out
    }

    fn write_focus_changes(&self, changes: &FocusChanges, writer: &mut dyn Write) -> io::Result<()> {
        for id in &changes.newly_focused {
            writeln!(writer, "{}: {id}", "now focused".style(self.styles.focus))?;
        }
        for demoted in &changes.demoted {
            writeln!(
                writer,
                "{}: {}",
                "no longer focused".style(self.styles.disabled),
                demoted.id
            )?;
        }
        Ok(())
    }

    fn write_summary(
        &self,
        root: &SuiteNode,
        stats: &BuildStats,
        writer: &mut dyn Write,
    ) -> io::Result<()> {
        let counts = StatusCounts::new(root);
        let total = counts.passed + counts.failed + counts.skipped;
        write!(
            writer,
            "{} {}: {} passed, {} failed, {} skipped",
            total.style(self.styles.count),
            plural::tests_str(total),
            counts.passed.style(self.styles.pass),
            counts.failed.style(self.styles.fail),
            counts.skipped.style(self.styles.skip),
        )?;
        if stats.unmapped > 0 {
            write!(writer, "; {} unmapped", stats.unmapped.style(self.styles.count))?;
        }
        if stats.excluded_by_focus > 0 {
            write!(
                writer,
                "; {} excluded by focus",
                stats.excluded_by_focus.style(self.styles.count)
            )?;
        }
        writeln!(writer)
    }
}

#[derive(Debug, Default)]
struct StatusCounts {
    passed: usize,
    failed: usize,
    skipped: usize,
}

impl StatusCounts {
    fn new(root: &SuiteNode) -> Self {
        let mut counts = Self::default();
        let mut stack: Vec<&TestNode> = root.children.iter().collect();
        while let Some(node) = stack.pop() {
            match node {
                TestNode::Suite(suite) => stack.extend(&suite.children),
                TestNode::Test(test) => match test.status {
                    SpecStatus::Passed => counts.passed += 1,
                    SpecStatus::Failed => counts.failed += 1,
                    SpecStatus::Skipped => counts.skipped += 1,
                },
            }
        }
        counts
    }
}

#[derive(Debug)]
struct TreeItem<'a> {
    node: &'a TestNode,
    // 0 for children of the root.
    depth: usize,
    is_last: bool,
    // For each ancestor level below the top, whether to draw a continuation line.
    continuation_flags: Vec<bool>,
}

/// Walks the tree depth-first in display order.
fn traverse(root: &SuiteNode) -> Vec<TreeItem<'_>> {
    let mut items = Vec::new();
    let mut stack: Vec<TreeItem<'_>> = root
        .children
        .iter()
        .rev()
        .map(|node| TreeItem {
            node,
            depth: 0,
            is_last: true,
            continuation_flags: Vec::new(),
        })
        .collect();

    while let Some(item) = stack.pop() {
        if let TestNode::Suite(suite) = item.node {
            let child_count = suite.children.len();
            let child_continuation = if item.depth == 0 {
                Vec::new()
            } else {
                let mut flags = item.continuation_flags.clone();
                flags.push(!item.is_last);
                flags
            };
            for (i, child) in suite.children.iter().enumerate().rev() {
                stack.push(TreeItem {
                    node: child,
                    depth: item.depth + 1,
                    is_last: i == child_count - 1,
                    continuation_flags: child_continuation.clone(),
                });
            }
        }
        items.push(item);
    }

    items
}
