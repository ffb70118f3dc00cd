// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::*;
use color_eyre::eyre::Result;
use fixture_data::{
    models::{DefinitionFixture, SuiteFixture},
    web_app,
};
use indoc::indoc;
use pretty_assertions::assert_eq;
use spectree_core::{
    config::TreeOptions,
    focus::{DemotedFocus, FocusState},
};
use spectree_metadata::{
    ActiveState, AncestorEntry, DefinitionState, FocusMark, SpecStatus, TestDefinition,
};

const TITLE: &str = "src/app/app.spec.ts:App renders title";
const APP: &str = "src/app/app.spec.ts:App";

fn with_title_focused() -> Vec<TestDefinition> {
    let mut definitions = web_app::definitions();
    definitions[0].state = DefinitionState::Focused;
    definitions
}

fn show_only_focused() -> TreeOptions {
    TreeOptions {
        show_only_focused_tests: true,
        ..TreeOptions::default()
    }
}

#[test]
fn focus_is_demoted_when_removed() -> Result<()> {
    let first = build(
        TreeOptions::default(),
        with_title_focused(),
        &web_app::OUTCOMES,
        &FocusState::new(),
    )?;
    assert_eq!(find(&first, TITLE).info().active_state, ActiveState::Focused);
    assert_eq!(find(&first, APP).info().active_state, ActiveState::FocusedIn);
    assert_eq!(
        find(&first, "folder:/work/web-app/src").info().active_state,
        ActiveState::FocusedIn
    );
    assert_eq!(
        find(&first, "src/app/app.spec.ts:App renders footer")
            .info()
            .active_state,
        ActiveState::Default
    );
    assert_eq!(first.focus_changes.newly_focused, vec![TITLE.to_owned()]);
    assert!(first.focus_changes.demoted.is_empty());

    // Persist and restore the state, as a host would between builds.
    let previous = FocusState::from_snapshot(first.focus_state.to_snapshot());
    assert_eq!(previous, first.focus_state);

    let second = build(
        TreeOptions::default(),
        web_app::definitions(),
        &web_app::OUTCOMES,
        &previous,
    )?;
    assert_eq!(find(&second, TITLE).info().active_state, ActiveState::Default);
    assert_eq!(find(&second, APP).info().active_state, ActiveState::Default);
    assert!(second.focus_changes.newly_focused.is_empty());
    assert_eq!(
        second.focus_changes.demoted,
        vec![
            DemotedFocus {
                id: APP.to_owned(),
                from: FocusMark::FocusedIn,
                to: None,
            },
            DemotedFocus {
                id: TITLE.to_owned(),
                from: FocusMark::Focused,
                to: None,
            },
        ]
    );
    assert!(second.focus_state.is_empty());
    Ok(())
}

#[test]
fn unchanged_focus_is_not_reported() -> Result<()> {
    let first = build(
        TreeOptions::default(),
        with_title_focused(),
        &web_app::OUTCOMES,
        &FocusState::new(),
    )?;
    let second = build(
        TreeOptions::default(),
        with_title_focused(),
        &web_app::OUTCOMES,
        &first.focus_state,
    )?;
    assert!(second.focus_changes.is_empty());
    assert_eq!(second.focus_state, first.focus_state);
    Ok(())
}

#[test]
fn show_only_focused_suite() -> Result<()> {
    let mut definitions = web_app::definitions();
    match &mut definitions[6].ancestor_chain[1] {
        AncestorEntry::Definition(keyboard) => keyboard.state = DefinitionState::Focused,
        AncestorEntry::Name(name) => panic!("expected `keyboard` to be defined, found {name}"),
    }

    let tree = build(
        show_only_focused(),
        definitions,
        &web_app::OUTCOMES,
        &FocusState::new(),
    )?;
    assert_eq!(
        outline(&tree.root),
        indoc! {"
            src/app/nav (focusedIn)
              Nav (focusedIn)
                keyboard (focused)
                  tabs (focusedIn)
            Unmapped Tests
              Legacy
                still works
        "}
    );
    assert_eq!(tree.stats.excluded_by_focus, 8);
    Ok(())
}

#[test]
fn late_focus_removes_earlier_tests() -> Result<()> {
    // "renders footer" is reported after most other specs.
    let mut definitions = web_app::definitions();
    definitions[1].state = DefinitionState::Focused;

    let tree = build(
        show_only_focused(),
        definitions,
        &web_app::OUTCOMES,
        &FocusState::new(),
    )?;
    assert_eq!(
        outline(&tree.root),
        indoc! {"
            src/app (focusedIn)
              App (focusedIn)
                renders footer (focused)
            Unmapped Tests
              Legacy
                still works
        "}
    );
    // Only the spec reported after the focus is turned away on arrival.
    assert_eq!(tree.stats.excluded_by_focus, 1);
    Ok(())
}

#[test]
fn disabled_state_wins_over_focus() -> Result<()> {
    const CHECKOUT: &[SuiteFixture] = &[SuiteFixture::Defined {
        name: "Checkout",
        line: 1,
        state: DefinitionState::Focused,
    }];
    let fixtures = [
        DefinitionFixture::new("src/checkout.spec.ts", 2, CHECKOUT, "pays"),
        DefinitionFixture::new("src/checkout.spec.ts", 5, CHECKOUT, "refunds")
            .with_state(DefinitionState::Disabled),
    ];
    let outcomes = [
        fixtures[0].outcome("1", SpecStatus::Passed),
        fixtures[1].outcome("2", SpecStatus::Skipped),
    ];

    let tree = build(
        show_only_focused(),
        fixtures.iter().map(DefinitionFixture::to_definition).collect(),
        &outcomes,
        &FocusState::new(),
    )?;
    assert_eq!(
        outline(&tree.root),
        indoc! {"
            src (focusedIn)
              Checkout (focused)
                pays (focusedIn)
                refunds (disabled)
        "}
    );
    Ok(())
}
