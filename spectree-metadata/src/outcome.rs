// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{RecordKind, RecordParseError};
use serde::{Deserialize, Deserializer, Serialize, de::Unexpected};
use smol_str::SmolStr;

/// The status a test execution backend reported for a spec.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum SpecStatus {
    /// The spec passed.
    Passed,

    /// The spec failed.
    Failed,

    /// The spec was not run.
    Skipped,
}

/// A single result reported by a test execution backend.
///
/// Outcomes carry no source location: they are identified only by the display strings of their
/// suites and their own description, and nothing guarantees that these are unique.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecOutcome {
    /// An identifier assigned by the backend. Opaque to spectree.
    pub id: SmolStr,

    /// The names of the enclosing suites, outermost first.
    #[serde(default)]
    pub suite_chain: Vec<SmolStr>,

    /// The spec's own description.
    pub description: SmolStr,

    /// The reported status.
    pub status: SpecStatus,

    /// How long the spec took, in milliseconds. Fractional durations are rounded.
    #[serde(default, deserialize_with = "deserialize_duration_ms")]
    pub duration_ms: u64,

    /// Failure messages, for failed specs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failure_messages: Vec<String>,
}

impl SpecOutcome {
    /// Parses outcomes from JSON Lines input: one record per line. Blank lines are ignored.
    pub fn parse_json_lines(input: &str) -> Result<Vec<Self>, RecordParseError> {
        input
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                serde_json::from_str(line)
                    .map_err(|err| RecordParseError::new(RecordKind::Outcome, Some(idx + 1), err))
            })
            .collect()
    }

    /// Returns the suite names and the description joined by spaces, the way test frameworks
    /// display a spec's full name.
    pub fn full_name(&self) -> String {
        let mut full_name = String::new();
        for part in self.suite_chain.iter().chain(std::iter::once(&self.description)) {
            if !full_name.is_empty() {
                full_name.push(' ');
            }
            full_name.push_str(part);
        }
        full_name
    }
}

// Backends report durations as arbitrary JSON numbers.
fn deserialize_duration_ms<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let millis = f64::deserialize(deserializer)?;
    if millis.is_finite() && millis >= 0.0 {
        // Saturates at u64::MAX.
        Ok(millis.round() as u64)
    } else {
        Err(serde::de::Error::invalid_value(
            Unexpected::Float(millis),
            &"a non-negative number of milliseconds",
        ))
    }
}
