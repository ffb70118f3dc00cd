// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::*;
use color_eyre::eyre::{Result, ensure};
use fixture_data::{
    models::{DefinitionFixture, SuiteFixture},
    web_app,
};
use indoc::indoc;
use pretty_assertions::assert_eq;
use spectree_core::{
    config::{TestGrouping, TreeOptions},
    focus::FocusState,
    tree::{TestNode, UNMAPPED_SUITE_ID},
};
use spectree_metadata::{ActiveState, DefinitionState, NodeKind, SpecStatus, SuiteType};
use test_case::test_case;

#[test]
fn web_app_grouped_by_folder() -> Result<()> {
    let tree = build_web_app(TreeOptions::default())?;
    assert_eq!(
        outline(&tree.root),
        indoc! {"
            src
              app
                nav
                  Nav
                    opens menu
                    closes menu
                    handles click !
                    handles click !
                    keyboard
                      tabs
                App
                  renders title
                  renders footer
              util
                format.spec.ts
                  formats dates
                  formats money (disabled)
            Unmapped Tests
              Legacy
                still works
        "}
    );

    let stats = tree.stats;
    assert_eq!(stats.outcomes, 10);
    assert_eq!(stats.mapped, 9);
    assert_eq!(stats.unmapped, 1);
    assert_eq!(stats.duplicate_definitions, 2);
    assert_eq!(stats.duplicate_reports, 0);
    Ok(())
}

#[test]
fn web_app_grouped_by_suite() -> Result<()> {
    let tree = build_web_app(TreeOptions {
        test_grouping: TestGrouping::Suite,
        ..TreeOptions::default()
    })?;
    assert_eq!(
        outline(&tree.root),
        indoc! {"
            App
              renders title
              renders footer
            formats dates
            formats money (disabled)
            Nav
              opens menu
              closes menu
              handles click !
              handles click !
              keyboard
                tabs
            Unmapped Tests
              Legacy
                still works
        "}
    );
    Ok(())
}

#[test]
fn web_app_without_flattening() -> Result<()> {
    let tree = build_web_app(TreeOptions {
        flatten_single_child_folders: false,
        flatten_single_suite_files: false,
        show_unmapped_tests: false,
        ..TreeOptions::default()
    })?;
    assert_eq!(
        outline(&tree.root),
        indoc! {"
            src
              app
                nav
                  nav.spec.ts
                    Nav
                      opens menu
                      closes menu
                      handles click !
                      handles click !
                      keyboard
                        tabs
                app.spec.ts
                  App
                    renders title
                    renders footer
              util
                format.spec.ts
                  formats dates
                  formats money (disabled)
        "}
    );
    Ok(())
}

#[test]
fn tests_base_path_above_the_project() -> Result<()> {
    let tree = build_web_app(TreeOptions {
        tests_base_path: Some("..".into()),
        show_unmapped_tests: false,
        ..TreeOptions::default()
    })?;
    let top = tree.root.children[0].as_suite().expect("top folder");
    assert_eq!(top.suite_type, SuiteType::Folder);
    assert_eq!(top.info.label, "web-app/src");
    assert_eq!(top.info.id, "folder:/work/web-app/src");
    assert_eq!(top.info.full_name, "");
    Ok(())
}

#[test_case(true ; "shown")]
#[test_case(false ; "hidden")]
fn unmapped_tests(show_unmapped_tests: bool) -> Result<()> {
    let tree = build_web_app(TreeOptions {
        show_unmapped_tests,
        ..TreeOptions::default()
    })?;

    let unmapped = tree.find(UNMAPPED_SUITE_ID);
    assert_eq!(unmapped.is_some(), show_unmapped_tests);
    if let Some(TestNode::Suite(unmapped)) = unmapped {
        let issue = unmapped.info.issue.as_ref().expect("unmapped suite explains itself");
        assert!(!issue.errored);
        assert_eq!(
            tree.root.children.last().map(|child| child.info().id.as_str()),
            Some(UNMAPPED_SUITE_ID),
            "unmapped suite comes last"
        );
        let test = find(&tree, "unmapped:Legacy still works");
        assert!(test.info().location.is_none());
    } else {
        assert_eq!(tree.stats.skipped_unmapped, 1);
    }
    Ok(())
}

#[test]
fn exclude_disabled_tests() -> Result<()> {
    let tree = build_web_app(TreeOptions {
        exclude_disabled_tests: true,
        ..TreeOptions::default()
    })?;
    assert!(tree.find("src/util/format.spec.ts:formats money").is_none());
    assert!(tree.find("src/util/format.spec.ts:formats dates").is_some());
    assert_eq!(tree.stats.skipped_disabled, 1);
    Ok(())
}

#[test]
fn single_candidates_keep_their_location() -> Result<()> {
    let tree = build_web_app(TreeOptions::default())?;
    let test = find(&tree, "src/app/app.spec.ts:App renders title");
    let location = test.info().location.as_ref().expect("mapped test has a location");
    assert_eq!(location.file, "src/app/app.spec.ts");
    assert_eq!(location.line, Some(5));
    assert!(test.info().issue.is_none());
    assert_eq!(
        test.info().tooltip,
        "App renders title\nsrc/app/app.spec.ts:5"
    );
    Ok(())
}

#[test]
fn duplicate_definitions_are_claimed_in_order() -> Result<()> {
    let tree = build_web_app(TreeOptions::default())?;

    // The first outcome reported for "handles click" failed.
    let first = find(&tree, "src/app/nav/nav.spec.ts:Nav handles click");
    let second = find(&tree, "src/app/nav/nav.spec.ts:Nav handles click#2");
    let (TestNode::Test(first), TestNode::Test(second)) = (first, second) else {
        panic!("both nodes are tests");
    };
    assert_eq!(first.status, SpecStatus::Failed);
    assert_eq!(second.status, SpecStatus::Passed);
    assert_eq!(first.info.location.as_ref().and_then(|l| l.line), Some(20));
    assert_eq!(second.info.location.as_ref().and_then(|l| l.line), Some(30));

    let message = |test: &spectree_core::tree::TestCaseNode| {
        test.info
            .issue
            .as_ref()
            .filter(|issue| issue.errored)
            .map(|issue| issue.message.clone())
            .expect("duplicate definitions are errors")
    };
    assert_eq!(
        message(first),
        indoc! {"
            2 definitions share this name; matched the first unclaimed one:
              src/app/nav/nav.spec.ts:20 (matched)
              src/app/nav/nav.spec.ts:30"}
    );
    assert!(message(second).contains("src/app/nav/nav.spec.ts:30 (matched)"));
    Ok(())
}

#[test]
fn duplicate_reports_flag_every_copy() -> Result<()> {
    const SUITES: &[SuiteFixture] = &[SuiteFixture::Named("Retry")];
    let definition = DefinitionFixture::new("src/retry.spec.ts", 6, SUITES, "eventually passes");
    let outcomes: Vec<_> = (0..3)
        .map(|id| definition.outcome(&id.to_string(), SpecStatus::Passed))
        .collect();

    let tree = build(
        TreeOptions::default(),
        vec![definition.to_definition()],
        &outcomes,
        &FocusState::new(),
    )?;
    assert_eq!(tree.stats.duplicate_reports, 2);

    let ids = [
        "src/retry.spec.ts:Retry eventually passes",
        "src/retry.spec.ts:Retry eventually passes#2",
        "src/retry.spec.ts:Retry eventually passes#3",
    ];
    for id in ids {
        let info = find(&tree, id).info();
        let issue = info.issue.as_ref().expect("duplicate report is flagged");
        ensure!(issue.errored, "{id} is errored");
        ensure!(
            issue.message.ends_with("\n  src/retry.spec.ts:6"),
            "{id} lists the candidate: {}",
            issue.message
        );
        assert_eq!(info.location.as_ref().and_then(|l| l.line), Some(6));
    }
    Ok(())
}

#[test]
fn arrival_order_does_not_change_layout() -> Result<()> {
    let forward = build_web_app(TreeOptions::default())?;
    let mut reversed = web_app::OUTCOMES.clone();
    reversed.reverse();
    let backward = build(
        TreeOptions::default(),
        web_app::definitions(),
        &reversed,
        &FocusState::new(),
    )?;
    assert_eq!(outline(&backward.root), outline(&forward.root));
    Ok(())
}

#[test]
fn builds_are_deterministic() -> Result<()> {
    let first = build_web_app(TreeOptions::default())?.to_summary();
    let second = build_web_app(TreeOptions::default())?.to_summary();
    assert_eq!(first, second);

    let tests = first
        .root
        .iter()
        .filter(|node| node.kind == NodeKind::Test)
        .count();
    assert_eq!(tests, 10);
    Ok(())
}

#[test]
fn same_named_suites_at_different_lines_stay_apart() -> Result<()> {
    const FIRST_APP: &[SuiteFixture] = &[SuiteFixture::Defined {
        name: "App",
        line: 1,
        state: DefinitionState::Default,
    }];
    const SECOND_APP: &[SuiteFixture] = &[SuiteFixture::Defined {
        name: "App",
        line: 20,
        state: DefinitionState::Default,
    }];
    let fixtures = [
        DefinitionFixture::new("src/twice.spec.ts", 2, FIRST_APP, "first"),
        DefinitionFixture::new("src/twice.spec.ts", 21, SECOND_APP, "second"),
    ];
    // Report the later block first: ids follow arrival, display follows lines.
    let outcomes = [
        fixtures[1].outcome("1", SpecStatus::Passed),
        fixtures[0].outcome("2", SpecStatus::Passed),
    ];

    let tree = build(
        TreeOptions {
            test_grouping: TestGrouping::Suite,
            ..TreeOptions::default()
        },
        fixtures.iter().map(DefinitionFixture::to_definition).collect(),
        &outcomes,
        &FocusState::new(),
    )?;
    assert_eq!(
        outline(&tree.root),
        indoc! {"
            App
              first
            App
              second
        "}
    );

    let second = find(&tree, "src/twice.spec.ts:App");
    assert_eq!(second.info().location.as_ref().and_then(|l| l.line), Some(20));
    let first = find(&tree, "src/twice.spec.ts:App#2");
    assert_eq!(first.info().location.as_ref().and_then(|l| l.line), Some(1));
    let children: Vec<_> = first
        .as_suite()
        .expect("App is a suite")
        .children
        .iter()
        .map(|child| child.info().id.as_str())
        .collect();
    assert_eq!(children, vec!["src/twice.spec.ts:App first"]);
    Ok(())
}

const LEGACY: &[SuiteFixture] = &[SuiteFixture::Defined {
    name: "Legacy",
    line: 1,
    state: DefinitionState::Disabled,
}];

fn legacy_fixtures() -> [DefinitionFixture; 3] {
    [
        DefinitionFixture::new("src/legacy.spec.ts", 2, LEGACY, "logs in"),
        DefinitionFixture::new("src/legacy.spec.ts", 5, LEGACY, "logs out"),
        DefinitionFixture::new("src/legacy.spec.ts", 10, &[], "current"),
    ]
}

fn build_legacy(exclude_disabled_tests: bool) -> Result<spectree_core::tree::TestTree> {
    let fixtures = legacy_fixtures();
    let outcomes = [
        fixtures[0].outcome("1", SpecStatus::Skipped),
        fixtures[1].outcome("2", SpecStatus::Skipped),
        fixtures[2].outcome("3", SpecStatus::Passed),
    ];
    build(
        TreeOptions {
            test_grouping: TestGrouping::Suite,
            exclude_disabled_tests,
            ..TreeOptions::default()
        },
        fixtures.iter().map(DefinitionFixture::to_definition).collect(),
        &outcomes,
        &FocusState::new(),
    )
}

#[test]
fn tests_under_a_disabled_suite_are_disabled_out() -> Result<()> {
    let tree = build_legacy(false)?;
    assert_eq!(
        outline(&tree.root),
        indoc! {"
            Legacy (disabled)
              logs in (disabledOut)
              logs out (disabledOut)
            current
        "}
    );
    assert_eq!(
        find(&tree, "src/legacy.spec.ts:current").info().active_state,
        ActiveState::Default
    );
    Ok(())
}

#[test]
fn exclude_disabled_tests_follows_disabled_suites() -> Result<()> {
    let tree = build_legacy(true)?;
    assert_eq!(outline(&tree.root), "current\n");
    assert!(tree.find("src/legacy.spec.ts:Legacy").is_none());
    assert_eq!(tree.stats.skipped_disabled, 2);
    Ok(())
}
