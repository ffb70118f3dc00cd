// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::{NO_HEADING_TARGET, StderrStyles};
use camino::Utf8PathBuf;
use owo_colors::OwoColorize;
use spectree_core::errors::{BuildError, ConfigParseError};
use spectree_metadata::{RecordParseError, SpectreeExitCode};
use std::{error::Error, path::PathBuf};
use thiserror::Error;
use tracing::error;

// Note that the #[error()] strings are mostly placeholder messages -- the expected way to print out
// errors is with the display_to_stderr method, which colorizes errors.

/// An error that the user can act on, as opposed to a bug in spectree.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("could not determine the current directory")]
    CurrentDirFailed {
        #[source]
        err: std::io::Error,
    },
    #[error("current directory is not valid UTF-8")]
    CurrentDirInvalidUtf8 { path: PathBuf },
    #[error("config parse error")]
    ConfigParseError {
        #[from]
        err: ConfigParseError,
    },
    #[error("error reading {arg_name} file")]
    ArgumentFileReadError {
        arg_name: &'static str,
        file_name: Utf8PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("error reading focus state")]
    FocusStateReadError {
        path: Utf8PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("error parsing focus state")]
    FocusStateParseError {
        path: Utf8PathBuf,
        #[source]
        err: RecordParseError,
    },
    #[error("build aborted")]
    BuildError {
        #[from]
        err: BuildError,
    },
    #[error("error writing output")]
    WriteOutputError {
        #[source]
        err: std::io::Error,
    },
    #[error("error writing focus state")]
    FocusStateWriteError {
        path: Utf8PathBuf,
        #[source]
        err: std::io::Error,
    },
}

impl ExpectedError {
    pub(crate) fn argument_file_read_error(
        arg_name: &'static str,
        file_name: impl Into<Utf8PathBuf>,
        err: std::io::Error,
    ) -> Self {
        Self::ArgumentFileReadError {
            arg_name,
            file_name: file_name.into(),
            err,
        }
    }

    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::CurrentDirFailed { .. }
            | Self::CurrentDirInvalidUtf8 { .. }
            | Self::ConfigParseError { .. }
            | Self::ArgumentFileReadError { .. }
            | Self::FocusStateReadError { .. }
            | Self::FocusStateParseError { .. } => SpectreeExitCode::SETUP_ERROR,
            Self::BuildError { .. } => SpectreeExitCode::BUILD_ABORTED,
            Self::WriteOutputError { .. } | Self::FocusStateWriteError { .. } => {
                SpectreeExitCode::WRITE_OUTPUT_ERROR
            }
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match self {
            Self::CurrentDirFailed { err } => {
                error!("could not determine the current directory");
                Some(err as &dyn Error)
            }
            Self::CurrentDirInvalidUtf8 { path } => {
                error!(
                    "current directory `{}` is not valid UTF-8",
                    path.display().style(styles.bold)
                );
                None
            }
            Self::ConfigParseError { err } => {
                error!(
                    "failed to parse spectree config at `{}`",
                    err.config_file().style(styles.bold)
                );
                Some(err.kind() as &dyn Error)
            }
            Self::ArgumentFileReadError {
                arg_name,
                file_name,
                err,
            } => {
                error!(
                    "error reading {} file `{}`",
                    arg_name.style(styles.bold),
                    file_name.style(styles.bold),
                );
                Some(err as &dyn Error)
            }
            Self::FocusStateReadError { path, err } => {
                error!("error reading focus state from `{}`", path.style(styles.bold));
                Some(err as &dyn Error)
            }
            Self::FocusStateParseError { path, err } => {
                error!(
                    "focus state at `{}` is invalid (delete it to start over)",
                    path.style(styles.bold)
                );
                Some(err as &dyn Error)
            }
            Self::BuildError { err } => {
                error!(
                    "{}: no tree was built",
                    "build aborted".style(styles.warning_text)
                );
                Some(err as &dyn Error)
            }
            Self::WriteOutputError { err } => {
                error!("error writing tree to output");
                Some(err as &dyn Error)
            }
            Self::FocusStateWriteError { path, err } => {
                error!("error writing focus state to `{}`", path.style(styles.bold));
                Some(err as &dyn Error)
            }
        };

        while let Some(err) = next_error {
            error!(target: NO_HEADING_TARGET, "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}
