// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Index-based storage for trees under construction.
//!
//! Nodes are never freed during a build. Removing a branch detaches it from its parent, after
//! which it is unreachable from any root and is skipped when the final tree is materialized.

use crate::tree::NodeIssue;
use camino::{Utf8Path, Utf8PathBuf};
use smol_str::SmolStr;
use spectree_metadata::{DefinitionState, SpecStatus};
use std::collections::HashMap;

/// Identifies a node within one build.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub(crate) struct NodeId(usize);

#[derive(Clone, Debug)]
pub(crate) enum ArenaPayload {
    Suite,
    Test {
        status: SpecStatus,
        duration_ms: u64,
        failure_messages: Vec<String>,
    },
}

#[derive(Clone, Debug)]
pub(crate) struct ArenaNode {
    pub(crate) payload: ArenaPayload,
    pub(crate) id: String,
    pub(crate) name: SmolStr,
    pub(crate) full_name: String,
    pub(crate) file: Option<Utf8PathBuf>,
    pub(crate) line: Option<u32>,
    pub(crate) state: DefinitionState,
    pub(crate) disabled: bool,
    pub(crate) issue: Option<NodeIssue>,
    // Set once a focus has been found at or below this node.
    pub(crate) on_focus_path: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl ArenaNode {
    pub(crate) fn new(payload: ArenaPayload, name: SmolStr, full_name: String) -> Self {
        Self {
            payload,
            id: String::new(),
            name,
            full_name,
            file: None,
            line: None,
            state: DefinitionState::Default,
            disabled: false,
            issue: None,
            on_focus_path: false,
            parent: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn is_suite(&self) -> bool {
        matches!(self.payload, ArenaPayload::Suite)
    }

    pub(crate) fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug, Default)]
pub(crate) struct BuildArena {
    nodes: Vec<ArenaNode>,
    roots: Vec<NodeId>,
    // Number of times each id has been handed out.
    id_counts: HashMap<String, u32>,
}

impl BuildArena {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_root(&mut self, node: ArenaNode) -> NodeId {
        let id = self.push(node);
        self.roots.push(id);
        id
    }

    pub(crate) fn add_child(&mut self, parent: NodeId, mut node: ArenaNode) -> NodeId {
        node.parent = Some(parent);
        let id = self.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    fn push(&mut self, mut node: ArenaNode) -> NodeId {
        node.id = self.unique_id(std::mem::take(&mut node.id));
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Returns `base`, or `base#N` if `base` was already handed out N-1 times.
    fn unique_id(&mut self, base: String) -> String {
        let count = self.id_counts.entry(base.clone()).or_default();
        *count += 1;
        if *count == 1 {
            base
        } else {
            format!("{base}#{count}")
        }
    }

    pub(crate) fn get(&self, id: NodeId) -> &ArenaNode {
        &self.nodes[id.0]
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut ArenaNode {
        &mut self.nodes[id.0]
    }

    /// Finds the suite under `parent` identified by (name, file, line).
    pub(crate) fn find_child_suite(
        &self,
        parent: NodeId,
        name: &str,
        file: Option<&Utf8Path>,
        line: Option<u32>,
    ) -> Option<NodeId> {
        self.get(parent).children.iter().copied().find(|&child| {
            let node = self.get(child);
            node.is_suite()
                && node.name == name
                && node.file.as_deref() == file
                && node.line == line
        })
    }

    /// Removes `id` from its parent's children. The node's own subtree is left intact.
    pub(crate) fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&child| child != id);
        }
    }

    /// Detaches the children of `parent` that don't satisfy `keep`, returning them.
    pub(crate) fn retain_children(
        &mut self,
        parent: NodeId,
        mut keep: impl FnMut(&ArenaNode) -> bool,
    ) -> Vec<NodeId> {
        let children = std::mem::take(&mut self.nodes[parent.0].children);
        let (kept, removed): (Vec<_>, Vec<_>) = children
            .into_iter()
            .partition(|&child| keep(&self.nodes[child.0]));
        for &child in &removed {
            self.nodes[child.0].parent = None;
        }
        self.nodes[parent.0].children = kept;
        removed
    }

    /// Returns the ancestors of `id`, innermost first.
    pub(crate) fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.get(id).parent, |&node| self.get(node).parent)
    }

    /// Returns true if `id` is reachable from a root.
    pub(crate) fn is_attached(&self, id: NodeId) -> bool {
        let top = self.ancestors(id).last().unwrap_or(id);
        self.roots.contains(&top)
    }

    /// Returns true if `id` is a root.
    pub(crate) fn is_root(&self, id: NodeId) -> bool {
        self.roots.contains(&id)
    }

    /// Returns the descendants of `id`, depth-first.
    pub(crate) fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack: Vec<NodeId> = self.get(id).children.iter().rev().copied().collect();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(self.get(node).children.iter().rev().copied());
            Some(node)
        })
    }
}
