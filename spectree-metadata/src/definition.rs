// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{RecordKind, RecordParseError};
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// The directive attached to a test or suite in source.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum DefinitionState {
    /// No directive.
    #[default]
    Default,

    /// An exclusive-run directive: only focused branches run while any exist.
    Focused,

    /// The test or suite is disabled in source.
    Disabled,
}

/// A suite found in source, as it appears in the ancestor chain of a [`TestDefinition`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteDefinition {
    /// The suite's own description.
    pub description: SmolStr,

    /// The file the suite is defined in.
    pub file: Utf8PathBuf,

    /// The 1-based line the suite is defined on.
    pub line: u32,

    /// The directive on the suite itself.
    #[serde(default)]
    pub state: DefinitionState,

    /// True if the suite is disabled, either directly or through one of its ancestors.
    #[serde(default)]
    pub disabled: bool,
}

/// An entry in the ancestor chain of a [`TestDefinition`].
///
/// Suites that carry no directive are often reported as plain names.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AncestorEntry {
    /// Only the suite's name is known.
    Name(SmolStr),

    /// The suite's own definition is known.
    Definition(SuiteDefinition),
}

impl AncestorEntry {
    /// Returns the display name of the suite.
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Definition(definition) => &definition.description,
        }
    }

    /// Returns the suite's definition, if known.
    pub fn definition(&self) -> Option<&SuiteDefinition> {
        match self {
            Self::Name(_) => None,
            Self::Definition(definition) => Some(definition),
        }
    }
}

/// A test discovered by parsing project sources.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDefinition {
    /// The test's own description.
    pub description: SmolStr,

    /// The file the test is defined in.
    pub file: Utf8PathBuf,

    /// The 1-based line the test is defined on.
    pub line: u32,

    /// The directive on the test itself.
    #[serde(default)]
    pub state: DefinitionState,

    /// True if the test is disabled, either directly or through one of its ancestor suites.
    #[serde(default)]
    pub disabled: bool,

    /// The suites enclosing this test, outermost first.
    #[serde(default)]
    pub ancestor_chain: Vec<AncestorEntry>,
}

impl TestDefinition {
    /// Parses a JSON array of definitions.
    pub fn parse_json_array(input: &str) -> Result<Vec<Self>, RecordParseError> {
        serde_json::from_str(input)
            .map_err(|err| RecordParseError::new(RecordKind::Definition, None, err))
    }

    /// Returns the names of the enclosing suites, outermost first.
    pub fn suite_chain(&self) -> impl Iterator<Item = &str> + '_ {
        self.ancestor_chain.iter().map(AncestorEntry::name)
    }

    /// Returns true if the test is disabled directly or by an ancestor.
    pub fn is_disabled(&self) -> bool {
        self.disabled || self.state == DefinitionState::Disabled
    }
}
