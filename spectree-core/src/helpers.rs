// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Helpers shared across spectree.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Utilities for pluralizing various words based on count or plurality.
pub mod plural {
    /// Returns "test" if `count` is 1, otherwise "tests".
    pub fn tests_str(count: usize) -> &'static str {
        if count == 1 { "test" } else { "tests" }
    }

    /// Returns "definition" if `count` is 1, otherwise "definitions".
    pub fn definitions_str(count: usize) -> &'static str {
        if count == 1 {
            "definition"
        } else {
            "definitions"
        }
    }
}

/// Removes `.` components and resolves `..` components without touching the file system.
pub(crate) fn normalize_lexically(path: &Utf8Path) -> Utf8PathBuf {
    let mut normalized = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => match normalized.components().next_back() {
                Some(Utf8Component::Normal(_)) => {
                    normalized.pop();
                }
                // `/..` is `/`.
                Some(Utf8Component::RootDir | Utf8Component::Prefix(_)) => {}
                _ => normalized.push(component),
            },
            other => normalized.push(other),
        }
    }
    normalized
}

/// On Windows, convert relative paths to always use forward slashes.
#[cfg(windows)]
pub(crate) fn convert_rel_path_to_forward_slash(rel_path: &Utf8Path) -> String {
    rel_path.as_str().replace('\\', "/")
}

#[cfg(not(windows))]
pub(crate) fn convert_rel_path_to_forward_slash(rel_path: &Utf8Path) -> String {
    rel_path.as_str().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("/a/b/c", "/a/b/c" ; "already normal")]
    #[test_case("/a/./b", "/a/b" ; "cur dir")]
    #[test_case("/a/b/../c", "/a/c" ; "parent dir")]
    #[test_case("/a/b/..", "/a" ; "trailing parent dir")]
    #[test_case("a/../../b", "../b" ; "relative escapes")]
    #[test_case("../../b", "../../b" ; "leading parent dirs")]
    #[test_case("/..", "/" ; "parent of root")]
    fn normalize(input: &str, expected: &str) {
        assert_eq!(normalize_lexically(Utf8Path::new(input)), expected);
    }
}
