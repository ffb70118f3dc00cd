// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolution of spec outcomes to source definitions.
//!
//! Outcomes carry only display strings, so several definitions can share the name an outcome
//! reports. Candidates for a name are handed out first come, first served, in index order.

use crate::{
    config::TreeConfig, helpers::convert_rel_path_to_forward_slash, index::DefinitionIndex,
};
use camino::Utf8PathBuf;
use smol_str::SmolStr;
use spectree_metadata::{SpecOutcome, TestDefinition};
use std::collections::HashMap;
use swrite::{SWrite, swrite};
use tracing::debug;

/// The key under which outcomes and definitions are disambiguated.
///
/// This is never used as the identity of a node.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct NormalizedId {
    /// The source file, if known. Outcomes never know their file.
    pub file: Option<Utf8PathBuf>,

    /// The enclosing suite names, outermost first.
    pub suite_chain: Vec<SmolStr>,

    /// The test's own name.
    pub description: SmolStr,
}

impl NormalizedId {
    /// Returns the key for an outcome.
    pub fn for_outcome(outcome: &SpecOutcome) -> Self {
        Self {
            file: None,
            suite_chain: outcome.suite_chain.clone(),
            description: outcome.description.clone(),
        }
    }
}

/// The result of resolving one outcome.
#[derive(Clone, Debug)]
pub struct Resolution<'a> {
    /// The disambiguation key of the outcome.
    pub key: NormalizedId,

    /// The definition the outcome maps to, or `None` if it is unmapped.
    pub definition: Option<&'a TestDefinition>,

    /// A problem detected while resolving.
    pub issue: Option<MatchIssue<'a>>,
}

/// A problem with how an outcome maps to definitions.
#[derive(Clone, Debug)]
pub enum MatchIssue<'a> {
    /// More than one definition has this name. The outcome took `selected`.
    DuplicateDefinition {
        /// All candidates, in index order.
        candidates: Vec<&'a TestDefinition>,

        /// The index into `candidates` of the definition that was taken.
        selected: usize,
    },

    /// More outcomes were reported under this name than there are definitions.
    DuplicateReport {
        /// All candidates, in index order.
        candidates: Vec<&'a TestDefinition>,
    },
}

impl MatchIssue<'_> {
    /// Returns the message to attach to affected nodes.
    pub fn message(&self, config: &TreeConfig) -> String {
        let location = |definition: &TestDefinition| {
            let file = config.resolve_file(&definition.file);
            format!(
                "{}:{}",
                convert_rel_path_to_forward_slash(config.display_path(&file)),
                definition.line
            )
        };

        let mut message = String::new();
        match self {
            Self::DuplicateDefinition {
                candidates,
                selected,
            } => {
                swrite!(
                    message,
                    "{} definitions share this name; matched the first unclaimed one:",
                    candidates.len()
                );
                swrite!(message, "\n  {} (matched)", location(candidates[*selected]));
                for (idx, candidate) in candidates.iter().enumerate() {
                    if idx != *selected {
                        swrite!(message, "\n  {}", location(candidate));
                    }
                }
            }
            Self::DuplicateReport { candidates } => {
                message.push_str(
                    "this test was reported more times than it is defined, \
                     so results cannot be told apart:",
                );
                for candidate in candidates {
                    swrite!(message, "\n  {}", location(candidate));
                }
            }
        }
        message
    }
}

#[derive(Debug)]
struct DefinitionQueue<'a> {
    candidates: Vec<&'a TestDefinition>,
    next: usize,
}

/// Maps outcomes to definitions for the duration of one build.
#[derive(Debug)]
pub struct SpecMatcher<'a, I: ?Sized> {
    index: &'a I,
    queues: HashMap<NormalizedId, DefinitionQueue<'a>>,
}

impl<'a, I: DefinitionIndex + ?Sized> SpecMatcher<'a, I> {
    /// Creates a matcher with every definition unclaimed.
    pub fn new(index: &'a I) -> Self {
        Self {
            index,
            queues: HashMap::new(),
        }
    }

    /// Resolves an outcome, claiming a definition for it if one is left.
    pub fn resolve(&mut self, outcome: &SpecOutcome) -> Resolution<'a> {
        let key = NormalizedId::for_outcome(outcome);
        let index: &'a I = self.index;
        let queue = self
            .queues
            .entry(key.clone())
            .or_insert_with(|| DefinitionQueue {
                candidates: index.candidates(&outcome.suite_chain, &outcome.description),
                next: 0,
            });

        let Some(&first) = queue.candidates.first() else {
            debug!("no definition matches outcome `{}`", outcome.full_name());
            return Resolution {
                key,
                definition: None,
                issue: None,
            };
        };

        if queue.next < queue.candidates.len() {
            let selected = queue.next;
            queue.next += 1;
            let issue = (queue.candidates.len() > 1).then(|| {
                debug!(
                    "outcome `{}` matches {} definitions, taking candidate {}",
                    outcome.full_name(),
                    queue.candidates.len(),
                    selected + 1,
                );
                MatchIssue::DuplicateDefinition {
                    candidates: queue.candidates.clone(),
                    selected,
                }
            });
            Resolution {
                key,
                definition: Some(queue.candidates[selected]),
                issue,
            }
        } else {
            debug!(
                "outcome `{}` reported again after all {} definitions were claimed",
                outcome.full_name(),
                queue.candidates.len(),
            );
            Resolution {
                key,
                definition: Some(first),
                issue: Some(MatchIssue::DuplicateReport {
                    candidates: queue.candidates.clone(),
                }),
            }
        }
    }
}
