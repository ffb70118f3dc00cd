// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    ExpectedError,
    display::{Styles, ThemeCharacters, TreeDisplayer},
    output::{OutputContext, OutputOpts, OutputWriter, clap_styles},
};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand, ValueEnum};
use spectree_core::{
    config::TreeConfig, focus::FocusState, helpers::plural, session::ReconcileSession,
    tree::TestTree,
};
use spectree_metadata::{FocusSnapshot, SpectreeExitCode};
use std::io::{self, Write};
use tracing::{debug, info};

/// Builds a test explorer tree from test definitions and runner outcomes.
#[derive(Debug, Parser)]
#[command(version, styles = clap_styles::style())]
pub struct SpectreeApp {
    #[command(flatten)]
    output: OutputOpts,

    #[command(subcommand)]
    command: Command,
}

impl SpectreeApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app, returning the exit code on success.
    pub fn exec(
        self,
        output: OutputContext,
        output_writer: &mut OutputWriter,
    ) -> Result<i32, ExpectedError> {
        match self.command {
            Command::Build(opts) => opts.exec(output, output_writer),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Reconcile definitions with outcomes and print the resulting tree
    Build(BuildOpts),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
enum MessageFormat {
    /// An outline for people to read
    #[default]
    Human,

    /// The tree and focus changes as pretty-printed JSON
    Json,
}

#[derive(Debug, Args)]
struct BuildOpts {
    /// Test definitions, as a JSON array
    #[arg(long, value_name = "PATH")]
    definitions: Utf8PathBuf,

    /// Spec outcomes, as JSON Lines in the order they were reported
    #[arg(long, value_name = "PATH")]
    outcomes: Utf8PathBuf,

    /// Project root that definition files are relative to [default: current directory]
    #[arg(long, value_name = "DIR")]
    project_root: Option<Utf8PathBuf>,

    /// Config file [default: project-root/.config/spectree.toml]
    #[arg(long, value_name = "PATH")]
    config_file: Option<Utf8PathBuf>,

    /// File that carries focus state between builds; created if it doesn't exist
    #[arg(long, value_name = "PATH")]
    focus_state: Option<Utf8PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t, value_name = "FORMAT")]
    message_format: MessageFormat,
}

impl BuildOpts {
    fn exec(
        self,
        output: OutputContext,
        output_writer: &mut OutputWriter,
    ) -> Result<i32, ExpectedError> {
        let current_dir = current_dir()?;
        let project_root = match &self.project_root {
            Some(root) => current_dir.join(root),
            None => current_dir,
        };
        let config = TreeConfig::from_sources(&project_root, self.config_file.as_deref())?;
        debug!(
            "building tree for `{}` with tests base path `{}`",
            config.project_root(),
            config.tests_base_path(),
        );

        let definitions = read_argument_file("definitions", &self.definitions)?;
        let outcomes = read_argument_file("outcomes", &self.outcomes)?;
        let focus_state = match &self.focus_state {
            Some(path) => read_focus_state(path)?,
            None => FocusState::new(),
        };

        let mut session = ReconcileSession::with_focus_state(config, focus_state);
        let tree = session.rebuild_from_json(&definitions, &outcomes)?;
        log_summary(tree);

        let mut writer = output_writer.stdout_writer();
        self.write_tree(tree, output, &mut writer)
            .and_then(|()| writer.flush())
            .map_err(|err| ExpectedError::WriteOutputError { err })?;

        if let Some(path) = &self.focus_state {
            write_focus_state(path, tree.focus_state.to_snapshot())?;
        }

        Ok(SpectreeExitCode::OK)
    }

    fn write_tree(
        &self,
        tree: &TestTree,
        output: OutputContext,
        writer: &mut dyn Write,
    ) -> io::Result<()> {
        match self.message_format {
            MessageFormat::Human => {
                let mut theme = ThemeCharacters::default();
                if supports_unicode::on(supports_unicode::Stream::Stdout) {
                    theme.use_unicode();
                }
                let mut styles = Styles::default();
                if output.colorize_stdout() {
                    styles.colorize();
                }
                TreeDisplayer::new(theme, styles, output.verbose).write_tree(tree, writer)
            }
            MessageFormat::Json => {
                serde_json::to_writer_pretty(&mut *writer, &tree.to_summary())?;
                writeln!(writer)
            }
        }
    }
}

fn current_dir() -> Result<Utf8PathBuf, ExpectedError> {
    let dir = std::env::current_dir().map_err(|err| ExpectedError::CurrentDirFailed { err })?;
    Utf8PathBuf::try_from(dir)
        .map_err(|err| ExpectedError::CurrentDirInvalidUtf8 { path: err.into_path_buf() })
}

fn read_argument_file(arg_name: &'static str, path: &Utf8Path) -> Result<String, ExpectedError> {
    std::fs::read_to_string(path)
        .map_err(|err| ExpectedError::argument_file_read_error(arg_name, path, err))
}

fn read_focus_state(path: &Utf8Path) -> Result<FocusState, ExpectedError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!("no focus state at `{path}`, starting fresh");
            return Ok(FocusState::new());
        }
        Err(err) => {
            return Err(ExpectedError::FocusStateReadError {
                path: path.to_owned(),
                err,
            });
        }
    };
    let snapshot =
        FocusSnapshot::parse_json(&contents).map_err(|err| ExpectedError::FocusStateParseError {
            path: path.to_owned(),
            err,
        })?;
    Ok(FocusState::from_snapshot(snapshot))
}

fn write_focus_state(path: &Utf8Path, snapshot: FocusSnapshot) -> Result<(), ExpectedError> {
    let write = || -> io::Result<()> {
        let mut contents = serde_json::to_string_pretty(&snapshot)?;
        contents.push('\n');
        std::fs::write(path, contents)
    };
    write().map_err(|err| ExpectedError::FocusStateWriteError {
        path: path.to_owned(),
        err,
    })
}

fn log_summary(tree: &TestTree) {
    let stats = &tree.stats;
    info!(
        "reconciled {} {}: {} mapped, {} unmapped",
        stats.outcomes,
        plural::tests_str(stats.outcomes),
        stats.mapped,
        stats.unmapped,
    );
    if stats.duplicate_definitions > 0 || stats.duplicate_reports > 0 {
        info!(
            "{} matched ambiguous definitions, {} reported more often than defined",
            stats.duplicate_definitions, stats.duplicate_reports,
        );
    }
    if stats.skipped_unmapped > 0 || stats.skipped_disabled > 0 || stats.excluded_by_focus > 0 {
        debug!(
            "dropped {} unmapped, {} disabled, {} unfocused",
            stats.skipped_unmapped, stats.skipped_disabled, stats.excluded_by_focus,
        );
    }
}
