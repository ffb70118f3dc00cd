// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `spectree` failures.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum SpectreeExitCode {}

impl SpectreeExitCode {
    /// No errors occurred and spectree exited normally.
    pub const OK: i32 = 0;

    /// A user issue happened while setting up a spectree invocation: bad arguments, an unreadable
    /// input file, or an invalid config.
    pub const SETUP_ERROR: i32 = 96;

    /// Input records could not be decoded or failed validation, so no tree was built.
    pub const BUILD_ABORTED: i32 = 97;

    /// Writing the tree or the focus state failed.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}
