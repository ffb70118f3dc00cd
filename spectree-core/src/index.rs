// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lookup of test definitions by display names.

use crate::{errors::BuildError, helpers::plural};
use smol_str::SmolStr;
use spectree_metadata::TestDefinition;
use std::collections::HashMap;
use tracing::debug;

/// Answers which source definitions could have produced an outcome.
pub trait DefinitionIndex {
    /// Returns the definitions whose suite chain and description match, in a stable order.
    fn candidates(&self, suite_chain: &[SmolStr], description: &str) -> Vec<&TestDefinition>;
}

/// An in-memory [`DefinitionIndex`] over a list of definitions.
///
/// Candidates are returned in the order the definitions were supplied.
#[derive(Clone, Debug, Default)]
pub struct DefinitionLookup {
    definitions: Vec<TestDefinition>,
    // Invariant: vectors are never empty, and indexes are ascending.
    by_name: HashMap<String, Vec<usize>>,
}

impl DefinitionLookup {
    /// Validates and indexes the given definitions.
    pub fn new(definitions: Vec<TestDefinition>) -> Result<Self, BuildError> {
        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, definition) in definitions.iter().enumerate() {
            validate(definition)?;
            let key = lookup_key(definition.suite_chain(), &definition.description);
            by_name.entry(key).or_default().push(idx);
        }
        debug!(
            "indexed {} test {} under {} distinct names",
            definitions.len(),
            plural::definitions_str(definitions.len()),
            by_name.len(),
        );

        Ok(Self {
            definitions,
            by_name,
        })
    }

    /// Returns the number of definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true if there are no definitions.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Returns all definitions in the order they were supplied.
    pub fn definitions(&self) -> &[TestDefinition] {
        &self.definitions
    }
}

impl DefinitionIndex for DefinitionLookup {
    fn candidates(&self, suite_chain: &[SmolStr], description: &str) -> Vec<&TestDefinition> {
        let key = lookup_key(suite_chain.iter().map(SmolStr::as_str), description);
        self.by_name
            .get(&key)
            .map(|indexes| indexes.iter().map(|&idx| &self.definitions[idx]).collect())
            .unwrap_or_default()
    }
}

fn validate(definition: &TestDefinition) -> Result<(), BuildError> {
    let invalid = |reason| BuildError::InvalidDefinition {
        description: definition.description.clone(),
        file: definition.file.clone(),
        line: definition.line,
        reason,
    };

    if definition.description.is_empty() {
        return Err(invalid("description is empty"));
    }
    if definition.line == 0 {
        return Err(invalid("line numbers start at 1"));
    }
    for suite in definition.ancestor_chain.iter().filter_map(|a| a.definition()) {
        if suite.file != definition.file {
            return Err(invalid("an enclosing suite is defined in a different file"));
        }
        if suite.line == 0 {
            return Err(invalid("an enclosing suite has line number 0"));
        }
    }
    Ok(())
}

// Suite names may contain any character, so join with a control character that display
// strings do not carry.
fn lookup_key<'a>(suite_chain: impl Iterator<Item = &'a str>, description: &str) -> String {
    let mut key = String::new();
    for name in suite_chain {
        key.push_str(name);
        key.push('\u{1f}');
    }
    key.push_str(description);
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use spectree_metadata::{AncestorEntry, DefinitionState, SuiteDefinition};

    fn definition(chain: &[&str], description: &str, file: &str, line: u32) -> TestDefinition {
        TestDefinition {
            description: description.into(),
            file: file.into(),
            line,
            state: DefinitionState::Default,
            disabled: false,
            ancestor_chain: chain
                .iter()
                .map(|name| AncestorEntry::Name((*name).into()))
                .collect(),
        }
    }

    #[test]
    fn candidates_keep_supplied_order() {
        let lookup = DefinitionLookup::new(vec![
            definition(&["App"], "boots", "b.spec.ts", 10),
            definition(&["App"], "stops", "a.spec.ts", 3),
            definition(&["App"], "boots", "a.spec.ts", 5),
        ])
        .expect("valid definitions");

        let chain = [SmolStr::new("App")];
        let lines: Vec<_> = lookup
            .candidates(&chain, "boots")
            .iter()
            .map(|d| (d.file.as_str(), d.line))
            .collect();
        assert_eq!(lines, vec![("b.spec.ts", 10), ("a.spec.ts", 5)]);
        assert!(lookup.candidates(&chain, "missing").is_empty());
        assert!(lookup.candidates(&[], "boots").is_empty());
    }

    #[test]
    fn chain_boundaries_are_significant() {
        let lookup = DefinitionLookup::new(vec![definition(&["a b"], "c", "x.spec.ts", 1)])
            .expect("valid definitions");
        let split = [SmolStr::new("a"), SmolStr::new("b")];
        assert!(lookup.candidates(&split, "c").is_empty());
        assert_eq!(lookup.candidates(&[SmolStr::new("a b")], "c").len(), 1);
    }

    #[test]
    fn rejects_malformed_definitions() {
        let error = DefinitionLookup::new(vec![definition(&[], "boots", "a.spec.ts", 0)])
            .expect_err("line 0 is invalid");
        assert!(
            matches!(error, BuildError::InvalidDefinition { line: 0, .. }),
            "unexpected error: {error}"
        );

        let mut cross_file = definition(&[], "boots", "a.spec.ts", 4);
        cross_file
            .ancestor_chain
            .push(AncestorEntry::Definition(SuiteDefinition {
                description: "App".into(),
                file: Utf8PathBuf::from("b.spec.ts"),
                line: 1,
                state: DefinitionState::Default,
                disabled: false,
            }));
        let error = DefinitionLookup::new(vec![cross_file]).expect_err("suite in another file");
        assert_eq!(
            error.to_string(),
            "invalid test definition `boots` at a.spec.ts:4: \
             an enclosing suite is defined in a different file"
        );
    }
}
