// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Regrouping of a built tree by source file and folder.

use crate::{
    config::TreeConfig,
    helpers::convert_rel_path_to_forward_slash,
    tree::{NodeInfo, SourceLocation, SuiteNode, TestNode},
};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use spectree_metadata::{ActiveState, SuiteType};

/// Groups the root's children into file suites nested under folder suites, then flattens.
pub(crate) fn group_by_folder(root: &mut SuiteNode, config: &TreeConfig) {
    let mut files: IndexMap<Utf8PathBuf, Vec<TestNode>> = IndexMap::new();
    let mut unlocated = Vec::new();
    for child in std::mem::take(&mut root.children) {
        match &child.info().location {
            Some(location) => {
                let resolved = config.resolve_file(&location.file);
                files.entry(resolved).or_default().push(child);
            }
            None => unlocated.push(child),
        }
    }

    let base = config.tests_base_path();
    let mut tree = FolderBuilder::new(base.to_owned(), String::new());
    let mut outside: IndexMap<Utf8PathBuf, Vec<TestNode>> = IndexMap::new();
    for (file, children) in files {
        let file_node = file_suite(&file, children, config);
        let parent = file.parent().unwrap_or(Utf8Path::new(""));
        match parent.strip_prefix(base) {
            Ok(relative) => tree.insert(relative, file_node),
            Err(_) => outside
                .entry(parent.to_owned())
                .or_default()
                .push(TestNode::Suite(file_node)),
        }
    }

    let options = config.options();
    let mut children = tree.into_children(config);
    for (dir, files) in outside {
        let name = dir.to_string();
        children.push(TestNode::Suite(folder_suite(&dir, name, files, config)));
    }
    children.extend(unlocated);
    for child in &mut children {
        if let TestNode::Suite(suite) = child {
            flatten(
                suite,
                options.flatten_single_suite_files,
                options.flatten_single_child_folders,
            );
        }
    }
    root.children = children;
}

#[derive(Debug)]
struct FolderBuilder {
    dir: Utf8PathBuf,
    name: String,
    folders: IndexMap<String, FolderBuilder>,
    files: Vec<SuiteNode>,
}

impl FolderBuilder {
    fn new(dir: Utf8PathBuf, name: String) -> Self {
        Self {
            dir,
            name,
            folders: IndexMap::new(),
            files: Vec::new(),
        }
    }

    fn insert(&mut self, relative: &Utf8Path, file: SuiteNode) {
        let mut current = self;
        for component in relative.components() {
            let name = component.as_str();
            let dir = current.dir.join(name);
            current = current
                .folders
                .entry(name.to_owned())
                .or_insert_with(|| FolderBuilder::new(dir, name.to_owned()));
        }
        current.files.push(file);
    }

    fn into_children(self, config: &TreeConfig) -> Vec<TestNode> {
        self.folders
            .into_values()
            .map(|folder| TestNode::Suite(folder.into_suite(config)))
            .chain(self.files.into_iter().map(TestNode::Suite))
            .collect()
    }

    fn into_suite(mut self, config: &TreeConfig) -> SuiteNode {
        let dir = std::mem::take(&mut self.dir);
        let name = std::mem::take(&mut self.name);
        folder_suite(&dir, name, self.into_children(config), config)
    }
}

fn file_suite(file: &Utf8Path, children: Vec<TestNode>, config: &TreeConfig) -> SuiteNode {
    let name = file.file_name().unwrap_or(file.as_str()).to_owned();
    let location = children
        .iter()
        .find_map(|child| child.info().location.as_ref())
        .map(|location| SourceLocation {
            file: location.file.clone(),
            line: None,
        });
    SuiteNode {
        suite_type: SuiteType::File,
        info: NodeInfo {
            id: format!("file:{file}"),
            label: name.clone(),
            name,
            full_name: String::new(),
            tooltip: convert_rel_path_to_forward_slash(config.display_path(file)),
            active_state: combined_state(&children),
            location,
            issue: None,
        },
        children,
    }
}

fn folder_suite(
    dir: &Utf8Path,
    name: String,
    children: Vec<TestNode>,
    config: &TreeConfig,
) -> SuiteNode {
    SuiteNode {
        suite_type: SuiteType::Folder,
        info: NodeInfo {
            id: format!("folder:{dir}"),
            label: name.clone(),
            name,
            full_name: String::new(),
            tooltip: convert_rel_path_to_forward_slash(config.display_path(dir)),
            active_state: combined_state(&children),
            location: None,
            issue: None,
        },
        children,
    }
}

/// File and folder suites have no directives of their own.
fn combined_state(children: &[TestNode]) -> ActiveState {
    let states = || children.iter().map(|child| child.info().active_state);
    if states().any(|state| matches!(state, ActiveState::Focused | ActiveState::FocusedIn)) {
        ActiveState::FocusedIn
    } else if !children.is_empty()
        && states().all(|state| matches!(state, ActiveState::Disabled | ActiveState::DisabledOut))
    {
        ActiveState::DisabledOut
    } else {
        ActiveState::Default
    }
}

fn flatten(suite: &mut SuiteNode, single_suite_files: bool, single_child_folders: bool) {
    for child in &mut suite.children {
        if let TestNode::Suite(child) = child {
            flatten(child, single_suite_files, single_child_folders);
        }
    }

    match suite.suite_type {
        SuiteType::File if single_suite_files => {
            if let [TestNode::Suite(inner)] = suite.children.as_mut_slice()
                && inner.suite_type == SuiteType::Plain
            {
                let info = std::mem::take(&mut inner.info);
                let children = std::mem::take(&mut inner.children);
                suite.info = info;
                suite.children = children;
            }
        }
        SuiteType::Folder if single_child_folders => {
            if let [TestNode::Suite(inner)] = suite.children.as_mut_slice()
                && inner.suite_type == SuiteType::Folder
            {
                let mut info = std::mem::take(&mut inner.info);
                let children = std::mem::take(&mut inner.children);
                info.name = format!("{}/{}", suite.info.name, info.name);
                info.label = info.name.clone();
                suite.info = info;
                suite.children = children;
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TreeOptions;
    use pretty_assertions::assert_eq;

    fn test_at(file: &str, name: &str) -> TestNode {
        TestNode::Suite(SuiteNode {
            suite_type: SuiteType::Plain,
            info: NodeInfo {
                id: format!("{file}:{name}"),
                name: name.to_owned(),
                full_name: name.to_owned(),
                label: name.to_owned(),
                location: Some(SourceLocation {
                    file: file.into(),
                    line: Some(1),
                }),
                ..NodeInfo::default()
            },
            children: Vec::new(),
        })
    }

    fn root(children: Vec<TestNode>) -> SuiteNode {
        SuiteNode {
            suite_type: SuiteType::Plain,
            info: NodeInfo::default(),
            children,
        }
    }

    fn names(suite: &SuiteNode) -> Vec<(SuiteType, String)> {
        suite
            .children
            .iter()
            .filter_map(|child| child.as_suite())
            .map(|child| (child.suite_type, child.info.name.clone()))
            .collect()
    }

    fn config(flatten: bool) -> TreeConfig {
        TreeConfig::new(
            "/work",
            TreeOptions {
                flatten_single_child_folders: flatten,
                flatten_single_suite_files: flatten,
                ..TreeOptions::default()
            },
        )
    }

    #[test]
    fn single_child_folder_chain_is_merged() {
        let mut tree = root(vec![test_at("a/b/c/x.spec.ts", "X")]);
        group_by_folder(&mut tree, &config(true));

        assert_eq!(names(&tree), vec![(SuiteType::Folder, "a/b/c".to_owned())]);
        let folder = tree.children[0].as_suite().expect("folder");
        assert_eq!(folder.info.id, "folder:/work/a/b/c");
        // The file merged with its only suite.
        assert_eq!(names(folder), vec![(SuiteType::File, "X".to_owned())]);
    }

    #[test]
    fn folders_stay_nested_without_flattening() {
        let mut tree = root(vec![test_at("a/b/c/x.spec.ts", "X")]);
        group_by_folder(&mut tree, &config(false));

        let mut current = &tree;
        for expected in ["a", "b", "c"] {
            assert_eq!(names(current), vec![(SuiteType::Folder, expected.to_owned())]);
            current = current.children[0].as_suite().expect("folder");
        }
        assert_eq!(names(current), vec![(SuiteType::File, "x.spec.ts".to_owned())]);
        assert_eq!(current.children[0].as_suite().map(|f| f.info.full_name.as_str()), Some(""));
    }

    #[test]
    fn file_with_two_suites_is_kept() {
        let mut tree = root(vec![
            test_at("x.spec.ts", "First"),
            test_at("y.spec.ts", "Only"),
            test_at("x.spec.ts", "Second"),
        ]);
        group_by_folder(&mut tree, &config(true));

        assert_eq!(
            names(&tree),
            vec![
                (SuiteType::File, "x.spec.ts".to_owned()),
                (SuiteType::File, "Only".to_owned()),
            ]
        );
        let file = tree.children[0].as_suite().expect("file");
        assert_eq!(file.info.id, "file:/work/x.spec.ts");
        assert_eq!(file.children.len(), 2);
    }

    #[test]
    fn files_outside_the_base_share_one_folder() {
        let mut tree = root(vec![
            test_at("/elsewhere/lib/a.spec.ts", "A"),
            test_at("/elsewhere/lib/b.spec.ts", "B"),
        ]);
        group_by_folder(&mut tree, &config(true));

        assert_eq!(
            names(&tree),
            vec![(SuiteType::Folder, "/elsewhere/lib".to_owned())]
        );
    }
}
