// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Repeated builds that share focus state.

use crate::{
    config::TreeConfig,
    errors::BuildError,
    focus::FocusState,
    index::DefinitionLookup,
    tree::{TestTree, build_tree},
};
use spectree_metadata::{SpecOutcome, TestDefinition};

/// Rebuilds the tree for a project as new definitions and outcomes arrive.
///
/// A failed rebuild leaves the last tree and the focus state as they were.
#[derive(Debug)]
pub struct ReconcileSession {
    config: TreeConfig,
    focus_state: FocusState,
    last_tree: Option<TestTree>,
}

impl ReconcileSession {
    /// Creates a session with no focus history.
    pub fn new(config: TreeConfig) -> Self {
        Self::with_focus_state(config, FocusState::new())
    }

    /// Creates a session that continues from a persisted focus state.
    pub fn with_focus_state(config: TreeConfig, focus_state: FocusState) -> Self {
        Self {
            config,
            focus_state,
            last_tree: None,
        }
    }

    /// Returns the config.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Returns the focus state left by the last successful build.
    pub fn focus_state(&self) -> &FocusState {
        &self.focus_state
    }

    /// Returns the last successfully built tree.
    pub fn last_tree(&self) -> Option<&TestTree> {
        self.last_tree.as_ref()
    }

    /// Validates the inputs and builds a new tree.
    pub fn rebuild(
        &mut self,
        definitions: Vec<TestDefinition>,
        outcomes: &[SpecOutcome],
    ) -> Result<&TestTree, BuildError> {
        let lookup = DefinitionLookup::new(definitions)?;
        let tree = build_tree(&self.config, &lookup, outcomes, &self.focus_state)?;
        self.focus_state = tree.focus_state.clone();
        Ok(self.last_tree.insert(tree))
    }

    /// Decodes definitions (a JSON array) and outcomes (JSON Lines), then builds a new tree.
    pub fn rebuild_from_json(
        &mut self,
        definitions_json: &str,
        outcomes_jsonl: &str,
    ) -> Result<&TestTree, BuildError> {
        let definitions = TestDefinition::parse_json_array(definitions_json)?;
        let outcomes = SpecOutcome::parse_json_lines(outcomes_jsonl)?;
        self.rebuild(definitions, &outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TreeOptions;
    use indoc::indoc;
    use spectree_metadata::{FocusMark, RecordKind};

    const DEFINITIONS: &str = indoc! {r#"
        [
            {
                "description": "boots",
                "file": "src/app.spec.ts",
                "line": 4,
                "state": "Focused",
                "ancestorChain": ["App"]
            }
        ]
    "#};

    const OUTCOMES: &str = indoc! {r#"
        {"id": "1", "suiteChain": ["App"], "description": "boots", "status": "Passed"}
    "#};

    #[test]
    fn failed_rebuild_keeps_previous_results() {
        let mut session = ReconcileSession::new(TreeConfig::new("/work", TreeOptions::default()));
        session
            .rebuild_from_json(DEFINITIONS, OUTCOMES)
            .expect("first build succeeds");
        let focus_before = session.focus_state().clone();
        assert_eq!(
            focus_before.mark("src/app.spec.ts:App boots"),
            Some(FocusMark::Focused)
        );

        let error = session
            .rebuild_from_json(DEFINITIONS, "{\"id\": \"2\"\n")
            .expect_err("outcome is truncated");
        match error {
            BuildError::Decode(error) => {
                assert_eq!(error.kind(), RecordKind::Outcome);
                assert_eq!(error.line(), Some(1));
            }
            other => panic!("unexpected error: {other}"),
        }

        let error = session
            .rebuild(Vec::new(), &[SpecOutcome {
                id: "".into(),
                suite_chain: Vec::new(),
                description: "anonymous".into(),
                status: spectree_metadata::SpecStatus::Failed,
                duration_ms: 0,
                failure_messages: Vec::new(),
            }])
            .expect_err("outcome id is empty");
        assert!(matches!(error, BuildError::InvalidOutcome { .. }));

        assert_eq!(session.focus_state(), &focus_before);
        let tree = session.last_tree().expect("first tree is kept");
        assert_eq!(tree.stats.outcomes, 1);
        assert!(tree.find("src/app.spec.ts:App boots").is_some());
    }
}
