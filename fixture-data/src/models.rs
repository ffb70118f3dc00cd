// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data models for fixture information.

use spectree_metadata::{
    AncestorEntry, DefinitionState, SpecOutcome, SpecStatus, SuiteDefinition, TestDefinition,
};

/// An enclosing suite of a fixture test.
#[derive(Copy, Clone, Debug)]
pub enum SuiteFixture {
    /// A suite known only by name.
    Named(&'static str),

    /// A suite with its own definition in the same file.
    Defined {
        name: &'static str,
        line: u32,
        state: DefinitionState,
    },
}

#[derive(Copy, Clone, Debug)]
pub struct DefinitionFixture {
    pub file: &'static str,
    pub line: u32,
    pub suites: &'static [SuiteFixture],
    pub description: &'static str,
    pub state: DefinitionState,
}

impl DefinitionFixture {
    pub const fn new(
        file: &'static str,
        line: u32,
        suites: &'static [SuiteFixture],
        description: &'static str,
    ) -> Self {
        Self {
            file,
            line,
            suites,
            description,
            state: DefinitionState::Default,
        }
    }

    pub const fn with_state(mut self, state: DefinitionState) -> Self {
        self.state = state;
        self
    }

    pub fn to_definition(&self) -> TestDefinition {
        let suite_disabled = self.suites.iter().any(|suite| {
            matches!(
                suite,
                SuiteFixture::Defined {
                    state: DefinitionState::Disabled,
                    ..
                }
            )
        });
        TestDefinition {
            description: self.description.into(),
            file: self.file.into(),
            line: self.line,
            state: self.state,
            disabled: suite_disabled || self.state == DefinitionState::Disabled,
            ancestor_chain: self
                .suites
                .iter()
                .map(|suite| match *suite {
                    SuiteFixture::Named(name) => AncestorEntry::Name(name.into()),
                    SuiteFixture::Defined { name, line, state } => {
                        AncestorEntry::Definition(SuiteDefinition {
                            description: name.into(),
                            file: self.file.into(),
                            line,
                            state,
                            disabled: state == DefinitionState::Disabled,
                        })
                    }
                })
                .collect(),
        }
    }

    /// Returns an outcome reporting this test with the given status.
    pub fn outcome(&self, id: &str, status: SpecStatus) -> SpecOutcome {
        SpecOutcome {
            id: id.into(),
            suite_chain: self
                .suites
                .iter()
                .map(|suite| match *suite {
                    SuiteFixture::Named(name) | SuiteFixture::Defined { name, .. } => name.into(),
                })
                .collect(),
            description: self.description.into(),
            status,
            duration_ms: 0,
            failure_messages: if status == SpecStatus::Failed {
                vec![format!("expected `{}` to pass", self.description)]
            } else {
                Vec::new()
            },
        }
    }
}
