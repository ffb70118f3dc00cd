// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for tree construction.
//!
//! Options are read from the `[tree]` table of `.config/spectree.toml`, layered over the
//! defaults in `default-config.toml`. Hosts that manage options themselves can construct a
//! [`TreeConfig`] directly with [`TreeConfig::new`].

use crate::{
    errors::{ConfigParseError, ConfigParseErrorKind},
    helpers::normalize_lexically,
};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, builder::DefaultState};
use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::warn;

/// How tests are grouped in the built tree.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestGrouping {
    /// Nesting follows only the suite names reported with each outcome.
    Suite,

    /// Suites are grouped by source file, and files by directory.
    #[default]
    Folder,
}

/// Options that control how the tree is built.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TreeOptions {
    /// Drop tests whose definition is disabled.
    pub exclude_disabled_tests: bool,

    /// When any focus directive is present, keep only focused branches.
    pub show_only_focused_tests: bool,

    /// Include outcomes without a matching definition under a dedicated suite.
    pub show_unmapped_tests: bool,

    /// The grouping mode.
    pub test_grouping: TestGrouping,

    /// Merge folders whose only child is another folder.
    pub flatten_single_child_folders: bool,

    /// Merge files with their only top-level suite.
    pub flatten_single_suite_files: bool,

    /// The root of folder grouping. Relative paths are joined to the project root.
    pub tests_base_path: Option<Utf8PathBuf>,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            exclude_disabled_tests: false,
            show_only_focused_tests: false,
            show_unmapped_tests: true,
            test_grouping: TestGrouping::Folder,
            flatten_single_child_folders: true,
            flatten_single_suite_files: true,
            tests_base_path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TreeConfigDeserialize {
    tree: TreeOptions,
}

/// Resolved configuration for building trees in a project.
#[derive(Clone, Debug)]
pub struct TreeConfig {
    project_root: Utf8PathBuf,
    tests_base_path: Utf8PathBuf,
    options: TreeOptions,
}

impl TreeConfig {
    /// The default configuration.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// The config file looked up relative to the project root when none is specified.
    pub const CONFIG_PATH: &'static str = ".config/spectree.toml";

    /// Creates a config from options, resolving the tests base path against `project_root`.
    pub fn new(project_root: impl Into<Utf8PathBuf>, options: TreeOptions) -> Self {
        let project_root = normalize_lexically(&project_root.into());
        let tests_base_path =
            resolve_tests_base_path(&project_root, options.tests_base_path.as_deref());
        Self {
            project_root,
            tests_base_path,
            options,
        }
    }

    /// Reads the config for a project.
    ///
    /// If `config_file` is `None`, [`Self::CONFIG_PATH`] under the project root is read if it
    /// exists.
    pub fn from_sources(
        project_root: impl Into<Utf8PathBuf>,
        config_file: Option<&Utf8Path>,
    ) -> Result<Self, ConfigParseError> {
        let project_root = project_root.into();
        let builder = Config::builder()
            .add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml));
        let (builder, config_file) = match config_file {
            Some(file) => (
                builder.add_source(File::new(file.as_str(), FileFormat::Toml)),
                file.to_owned(),
            ),
            None => {
                let file = project_root.join(Self::CONFIG_PATH);
                (
                    builder.add_source(File::new(file.as_str(), FileFormat::Toml).required(false)),
                    file,
                )
            }
        };

        let (config, ignored) = Self::build_and_deserialize_config(builder)
            .map_err(|kind| ConfigParseError::new(&config_file, kind))?;
        if !ignored.is_empty() {
            warn!(
                "ignoring unknown configuration keys in config file {config_file}: {}",
                itertools::join(&ignored, ", "),
            );
        }

        Ok(Self::new(project_root, config.tree))
    }

    /// Returns the project root.
    pub fn project_root(&self) -> &Utf8Path {
        &self.project_root
    }

    /// Returns the resolved root of folder grouping.
    pub fn tests_base_path(&self) -> &Utf8Path {
        &self.tests_base_path
    }

    /// Returns the options.
    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    /// Resolves a definition's file against the project root.
    pub fn resolve_file(&self, file: &Utf8Path) -> Utf8PathBuf {
        if file.is_absolute() {
            normalize_lexically(file)
        } else {
            normalize_lexically(&self.project_root.join(file))
        }
    }

    /// Returns `file` relative to the project root, for display.
    pub fn display_path<'a>(&self, file: &'a Utf8Path) -> &'a Utf8Path {
        file.strip_prefix(&self.project_root).unwrap_or(file)
    }

    /// This returns a tuple of (config, ignored paths).
    fn build_and_deserialize_config(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<(TreeConfigDeserialize, BTreeSet<String>), ConfigParseErrorKind> {
        let config = builder
            .build()
            .map_err(|error| ConfigParseErrorKind::BuildError(Box::new(error)))?;

        let mut ignored = BTreeSet::new();
        let mut cb = |path: serde_ignored::Path| {
            ignored.insert(path.to_string());
        };
        let ignored_de = serde_ignored::Deserializer::new(config, &mut cb);
        let config: TreeConfigDeserialize = serde_path_to_error::deserialize(ignored_de)
            .map_err(|error| {
                // The config crate reports the key as well. Drop it in favor of the path.
                let path = error.path().clone();
                let error = match error.into_inner() {
                    ConfigError::At { error, .. } => *error,
                    other => other,
                };
                ConfigParseErrorKind::DeserializeError(Box::new(serde_path_to_error::Error::new(
                    path, error,
                )))
            })?;

        Ok((config, ignored))
    }
}

fn resolve_tests_base_path(project_root: &Utf8Path, configured: Option<&Utf8Path>) -> Utf8PathBuf {
    let Some(configured) = configured else {
        return project_root.to_owned();
    };
    let base = normalize_lexically(&project_root.join(configured));

    // The base path must contain the whole project.
    if project_root.starts_with(&base) {
        base
    } else {
        warn!(
            "tests base path `{configured}` does not contain the project root \
             `{project_root}`, using the project root instead"
        );
        project_root.to_owned()
    }
}
