// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use color_eyre::eyre::Result;
use fixture_data::web_app;
use spectree_core::{
    config::{TreeConfig, TreeOptions},
    focus::FocusState,
    index::DefinitionLookup,
    tree::{SuiteNode, TestNode, TestTree, build_tree},
};
use spectree_metadata::{ActiveState, SpecOutcome, TestDefinition};
use std::fmt::Write;

pub(crate) fn web_app_config(options: TreeOptions) -> TreeConfig {
    TreeConfig::new(web_app::PROJECT_ROOT, options)
}

pub(crate) fn build(
    options: TreeOptions,
    definitions: Vec<TestDefinition>,
    outcomes: &[SpecOutcome],
    previous: &FocusState,
) -> Result<TestTree> {
    let config = web_app_config(options);
    let lookup = DefinitionLookup::new(definitions)?;
    Ok(build_tree(&config, &lookup, outcomes, previous)?)
}

pub(crate) fn build_web_app(options: TreeOptions) -> Result<TestTree> {
    build(
        options,
        web_app::definitions(),
        &web_app::OUTCOMES,
        &FocusState::new(),
    )
}

/// Renders a suite's descendants one per line, indented by depth.
///
/// Non-default active states are shown in parentheses, and errored nodes end with `!`.
pub(crate) fn outline(suite: &SuiteNode) -> String {
    fn write_node(out: &mut String, node: &TestNode, depth: usize) {
        let info = node.info();
        write!(out, "{:width$}{}", "", info.label, width = depth * 2).unwrap();
        match info.active_state {
            ActiveState::Default => {}
            ActiveState::Focused => out.push_str(" (focused)"),
            ActiveState::FocusedIn => out.push_str(" (focusedIn)"),
            ActiveState::Disabled => out.push_str(" (disabled)"),
            ActiveState::DisabledOut => out.push_str(" (disabledOut)"),
        }
        if info.issue.as_ref().is_some_and(|issue| issue.errored) {
            out.push_str(" !");
        }
        out.push('\n');
        if let Some(suite) = node.as_suite() {
            for child in &suite.children {
                write_node(out, child, depth + 1);
            }
        }
    }

    let mut out = String::new();
    for child in &suite.children {
        write_node(&mut out, child, 0);
    }
    out
}

pub(crate) fn find<'a>(tree: &'a TestTree, id: &str) -> &'a TestNode {
    tree.find(id)
        .unwrap_or_else(|| panic!("node `{id}` should be in the tree"))
}
