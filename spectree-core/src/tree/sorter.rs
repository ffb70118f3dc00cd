// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic ordering of tree children.
//!
//! Children are ordered by rank (folders, then files, then everything else) and name. Nodes
//! from the same file with known lines are then laid out in line order within the positions
//! their rank and name placed them in, so source order wins where it is known.

use crate::tree::{SuiteNode, TestNode};
use camino::Utf8PathBuf;
use indexmap::IndexMap;
use spectree_metadata::SuiteType;
use std::cmp::Ordering;

/// Sorts the children of `suite`, recursively.
pub(crate) fn sort_suite(suite: &mut SuiteNode) {
    sort_children(&mut suite.children);
    for child in &mut suite.children {
        if let TestNode::Suite(child) = child {
            sort_suite(child);
        }
    }
}

fn rank(node: &TestNode) -> u8 {
    match node {
        TestNode::Suite(suite) => match suite.suite_type {
            SuiteType::Folder => 0,
            SuiteType::File if suite.info.full_name.is_empty() => 1,
            _ => 2,
        },
        TestNode::Test(_) => 2,
    }
}

fn compare(a: &TestNode, b: &TestNode) -> Ordering {
    let (a_info, b_info) = (a.info(), b.info());
    rank(a)
        .cmp(&rank(b))
        .then_with(|| {
            a_info
                .name
                .to_lowercase()
                .cmp(&b_info.name.to_lowercase())
        })
        .then_with(|| a_info.name.cmp(&b_info.name))
        .then_with(|| a_info.id.cmp(&b_info.id))
}

fn sort_children(children: &mut Vec<TestNode>) {
    children.sort_by(compare);

    // Positions held by nodes with a known line, by rank and file.
    let mut groups: IndexMap<(u8, Utf8PathBuf), Vec<usize>> = IndexMap::new();
    for (idx, child) in children.iter().enumerate() {
        if let Some(location) = &child.info().location
            && location.line.is_some()
        {
            groups
                .entry((rank(child), location.file.clone()))
                .or_default()
                .push(idx);
        }
    }

    let line = |idx: usize| {
        children[idx]
            .info()
            .location
            .as_ref()
            .and_then(|location| location.line)
    };
    let mut order: Vec<usize> = (0..children.len()).collect();
    for slots in groups.values() {
        let mut by_line = slots.clone();
        by_line.sort_by_key(|&idx| line(idx));
        for (&slot, &idx) in slots.iter().zip(&by_line) {
            order[slot] = idx;
        }
    }

    let mut taken: Vec<Option<TestNode>> =
        std::mem::take(children).into_iter().map(Some).collect();
    *children = order.iter().filter_map(|&idx| taken[idx].take()).collect();
}
