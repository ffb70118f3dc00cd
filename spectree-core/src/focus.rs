// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Focus directives and their persistence across builds.
//!
//! Within a build, focus is tracked on arena nodes. Across builds, it is tracked by node id in a
//! [`FocusState`], so that a node which loses its focus can be reported as demoted.

use crate::{
    helpers::plural,
    tree::arena::{BuildArena, NodeId},
};
use spectree_metadata::{
    DefinitionState, DemotedFocusSummary, FocusChangesSummary, FocusMark, FocusSnapshot,
};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Focus marks by node id, carried from one build to the next.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FocusState {
    marks: BTreeMap<String, FocusMark>,
}

impl FocusState {
    /// Creates an empty focus state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a focus state from a persisted snapshot.
    pub fn from_snapshot(snapshot: FocusSnapshot) -> Self {
        Self {
            marks: snapshot.marks,
        }
    }

    /// Returns a snapshot suitable for persisting.
    pub fn to_snapshot(&self) -> FocusSnapshot {
        FocusSnapshot {
            marks: self.marks.clone(),
        }
    }

    /// Returns the mark held by the node with this id.
    pub fn mark(&self, id: &str) -> Option<FocusMark> {
        self.marks.get(id).copied()
    }

    /// Returns true if no node holds a mark.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Iterates over (id, mark) pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, FocusMark)> + '_ {
        self.marks.iter().map(|(id, mark)| (id.as_str(), *mark))
    }
}

/// How focus changed between two builds.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FocusChanges {
    /// Nodes marked focused that were not focused before, in id order.
    pub newly_focused: Vec<String>,

    /// Nodes that lost the mark they held, in id order.
    pub demoted: Vec<DemotedFocus>,
}

impl FocusChanges {
    /// Returns true if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.newly_focused.is_empty() && self.demoted.is_empty()
    }

    /// Converts to the serializable form.
    pub fn to_summary(&self) -> FocusChangesSummary {
        FocusChangesSummary {
            newly_focused: self.newly_focused.clone(),
            demoted: self
                .demoted
                .iter()
                .map(|demoted| DemotedFocusSummary {
                    id: demoted.id.clone(),
                    from: demoted.from,
                    to: demoted.to,
                })
                .collect(),
        }
    }
}

/// A node that lost its focus mark.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DemotedFocus {
    /// The node id.
    pub id: String,

    /// The mark held after the previous build.
    pub from: FocusMark,

    /// The mark held now, if any.
    pub to: Option<FocusMark>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum FocusVerdict {
    Include,
    Exclude,
}

/// The result of applying focus to a finished build.
#[derive(Debug)]
pub(crate) struct FocusOutcome {
    pub(crate) marks: HashMap<NodeId, FocusMark>,
    pub(crate) next: FocusState,
    pub(crate) changes: FocusChanges,
}

/// Tracks focus directives seen during one build.
#[derive(Debug)]
pub(crate) struct FocusContext<'a> {
    previous: &'a FocusState,
    show_only_focused: bool,
    // Tail focused nodes, in the order they were first seen.
    tails: Vec<NodeId>,
}

impl<'a> FocusContext<'a> {
    pub(crate) fn new(previous: &'a FocusState, show_only_focused: bool) -> Self {
        Self {
            previous,
            show_only_focused,
            tails: Vec::new(),
        }
    }

    /// Applies focus to a freshly attached test node.
    pub(crate) fn observe(&mut self, arena: &mut BuildArena, test: NodeId) -> FocusVerdict {
        let tail = std::iter::once(test)
            .chain(arena.ancestors(test))
            .find(|&node| arena.get(node).state == DefinitionState::Focused);

        let Some(tail) = tail else {
            if self.show_only_focused && !self.tails.is_empty() {
                return FocusVerdict::Exclude;
            }
            return FocusVerdict::Include;
        };
        if self.tails.contains(&tail) {
            return FocusVerdict::Include;
        }

        debug!("found focused node `{}`", arena.get(tail).id);
        self.tails.push(tail);
        let path: Vec<_> = arena.ancestors(tail).collect();
        arena.get_mut(tail).on_focus_path = true;
        for &node in &path {
            arena.get_mut(node).on_focus_path = true;
        }

        if self.show_only_focused {
            // Narrow outermost first. Nodes inside a tail keep all their children.
            for &node in path.iter().rev() {
                if self.tails.contains(&node) {
                    break;
                }
                let removed = arena.retain_children(node, |child| child.on_focus_path);
                if !removed.is_empty() {
                    debug!(
                        "removed {} unfocused {} from `{}`",
                        removed.len(),
                        if removed.len() == 1 { "child" } else { "children" },
                        arena.get(node).id,
                    );
                }
            }
        }

        FocusVerdict::Include
    }

    /// Computes final marks and how they changed since the previous build.
    pub(crate) fn finish(self, arena: &BuildArena) -> FocusOutcome {
        let tails: Vec<_> = self
            .tails
            .iter()
            .copied()
            .filter(|&tail| arena.is_attached(tail))
            .collect();

        let mut marks: HashMap<NodeId, FocusMark> = HashMap::new();
        let mut raise = |node: NodeId, mark: FocusMark| {
            let entry = marks.entry(node).or_insert(mark);
            *entry = (*entry).max(mark);
        };
        for &tail in &tails {
            let has_inner_tail = tails
                .iter()
                .any(|&other| other != tail && arena.ancestors(other).any(|node| node == tail));
            raise(
                tail,
                if has_inner_tail {
                    FocusMark::FocusedIn
                } else {
                    FocusMark::Focused
                },
            );
            for node in arena.ancestors(tail).filter(|&node| !arena.is_root(node)) {
                raise(node, FocusMark::FocusedIn);
            }
            for node in arena.descendants(tail) {
                raise(node, FocusMark::FocusedIn);
            }
        }

        let next = FocusState {
            marks: marks
                .iter()
                .map(|(&node, &mark)| (arena.get(node).id.clone(), mark))
                .collect(),
        };
        let changes = diff(self.previous, &next);
        debug!(
            "focus: {} focused {}, {} newly focused, {} demoted",
            tails.len(),
            plural::tests_str(tails.len()),
            changes.newly_focused.len(),
            changes.demoted.len(),
        );

        FocusOutcome {
            marks,
            next,
            changes,
        }
    }
}

fn diff(previous: &FocusState, next: &FocusState) -> FocusChanges {
    let newly_focused = next
        .iter()
        .filter(|&(id, mark)| {
            mark == FocusMark::Focused && previous.mark(id) != Some(FocusMark::Focused)
        })
        .map(|(id, _)| id.to_owned())
        .collect();
    let demoted = previous
        .iter()
        .filter_map(|(id, from)| {
            let to = next.mark(id);
            to.is_none_or(|to| to < from).then(|| DemotedFocus {
                id: id.to_owned(),
                from,
                to,
            })
        })
        .collect();

    FocusChanges {
        newly_focused,
        demoted,
    }
}
