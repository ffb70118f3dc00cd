// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by spectree.

use camino::Utf8PathBuf;
use config::ConfigError;
use smol_str::SmolStr;
use spectree_metadata::RecordParseError;
use thiserror::Error;

/// An error that occurred while parsing the config.
#[derive(Debug, Error)]
#[error("failed to parse spectree config at `{config_file}`")]
#[non_exhaustive]
pub struct ConfigParseError {
    config_file: Utf8PathBuf,
    #[source]
    kind: ConfigParseErrorKind,
}

impl ConfigParseError {
    pub(crate) fn new(config_file: impl Into<Utf8PathBuf>, kind: ConfigParseErrorKind) -> Self {
        Self {
            config_file: config_file.into(),
            kind,
        }
    }

    /// Returns the config file for this error.
    pub fn config_file(&self) -> &Utf8PathBuf {
        &self.config_file
    }

    /// Returns the kind of error.
    pub fn kind(&self) -> &ConfigParseErrorKind {
        &self.kind
    }
}

/// The kind of error that occurred while parsing the config.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigParseErrorKind {
    /// An error occurred while building the config.
    #[error(transparent)]
    BuildError(Box<ConfigError>),

    /// An error occurred while deserializing the config.
    #[error(transparent)]
    DeserializeError(Box<serde_path_to_error::Error<ConfigError>>),
}

/// An error that aborts a single build.
///
/// When a build fails, the previously built tree and focus state are left untouched.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BuildError {
    /// Input records could not be decoded.
    #[error("failed to decode build input")]
    Decode(#[from] RecordParseError),

    /// A test definition is malformed.
    #[error("invalid test definition `{description}` at {file}:{line}: {reason}")]
    InvalidDefinition {
        /// The description of the definition.
        description: SmolStr,

        /// The file the definition claims to be in.
        file: Utf8PathBuf,

        /// The line the definition claims to be on.
        line: u32,

        /// What is wrong with it.
        reason: &'static str,
    },

    /// A spec outcome is malformed.
    #[error("invalid spec outcome `{full_name}`: {reason}")]
    InvalidOutcome {
        /// The full name of the outcome.
        full_name: String,

        /// What is wrong with it.
        reason: &'static str,
    },
}
