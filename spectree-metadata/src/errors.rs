// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{error, fmt};

/// The kind of record that failed to parse.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RecordKind {
    /// A [`TestDefinition`](crate::TestDefinition).
    Definition,

    /// A [`SpecOutcome`](crate::SpecOutcome).
    Outcome,

    /// A [`FocusSnapshot`](crate::FocusSnapshot).
    FocusSnapshot,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Definition => write!(f, "test definitions"),
            Self::Outcome => write!(f, "spec outcomes"),
            Self::FocusSnapshot => write!(f, "focus snapshot"),
        }
    }
}

/// An error that occurs while decoding spectree records from JSON.
#[derive(Debug)]
pub struct RecordParseError {
    kind: RecordKind,
    line: Option<usize>,
    err: serde_json::Error,
}

impl RecordParseError {
    pub(crate) fn new(kind: RecordKind, line: Option<usize>, err: serde_json::Error) -> Self {
        Self { kind, line, err }
    }

    /// Returns the kind of record that failed to parse.
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// For line-delimited input, returns the 1-based line that failed to parse.
    pub fn line(&self) -> Option<usize> {
        self.line
    }
}

impl fmt::Display for RecordParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "failed to parse {} at line {line}", self.kind),
            None => write!(f, "failed to parse {}", self.kind),
        }
    }
}

impl error::Error for RecordParseError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        Some(&self.err)
    }
}
