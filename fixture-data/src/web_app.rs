// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Information about the "web-app" fixture: a small front-end project with specs spread over
//! a few folders.

use crate::models::{DefinitionFixture, SuiteFixture};
use spectree_metadata::{DefinitionState, SpecOutcome, SpecStatus, TestDefinition};
use std::sync::LazyLock;

pub const PROJECT_ROOT: &str = "/work/web-app";

const APP: &[SuiteFixture] = &[SuiteFixture::Defined {
    name: "App",
    line: 3,
    state: DefinitionState::Default,
}];
const NAV: &[SuiteFixture] = &[SuiteFixture::Named("Nav")];
const NAV_KEYBOARD: &[SuiteFixture] = &[
    SuiteFixture::Named("Nav"),
    SuiteFixture::Defined {
        name: "keyboard",
        line: 40,
        state: DefinitionState::Default,
    },
];
const TOP_LEVEL: &[SuiteFixture] = &[];

pub static DEFINITIONS: &[DefinitionFixture] = &[
    DefinitionFixture::new("src/app/app.spec.ts", 5, APP, "renders title"),
    DefinitionFixture::new("src/app/app.spec.ts", 11, APP, "renders footer"),
    DefinitionFixture::new("src/app/nav/nav.spec.ts", 12, NAV, "closes menu"),
    DefinitionFixture::new("src/app/nav/nav.spec.ts", 4, NAV, "opens menu"),
    DefinitionFixture::new("src/app/nav/nav.spec.ts", 20, NAV, "handles click"),
    DefinitionFixture::new("src/app/nav/nav.spec.ts", 30, NAV, "handles click"),
    DefinitionFixture::new("src/app/nav/nav.spec.ts", 42, NAV_KEYBOARD, "tabs"),
    DefinitionFixture::new("src/util/format.spec.ts", 2, TOP_LEVEL, "formats dates"),
    DefinitionFixture::new("src/util/format.spec.ts", 8, TOP_LEVEL, "formats money")
        .with_state(DefinitionState::Disabled),
];

/// Outcomes for every definition, in the order a runner might report them, plus one outcome
/// that has no definition.
pub static OUTCOMES: LazyLock<Vec<SpecOutcome>> = LazyLock::new(|| {
    let mut outcomes: Vec<_> = [
        (6, SpecStatus::Passed),
        (7, SpecStatus::Passed),
        (0, SpecStatus::Passed),
        (3, SpecStatus::Passed),
        (4, SpecStatus::Failed),
        (2, SpecStatus::Passed),
        (5, SpecStatus::Passed),
        (1, SpecStatus::Passed),
        (8, SpecStatus::Skipped),
    ]
    .into_iter()
    .enumerate()
    .map(|(id, (idx, status))| DEFINITIONS[idx].outcome(&format!("spec{id}"), status))
    .collect();

    outcomes.push(SpecOutcome {
        id: "spec-legacy".into(),
        suite_chain: vec!["Legacy".into()],
        description: "still works".into(),
        status: SpecStatus::Passed,
        duration_ms: 12,
        failure_messages: Vec::new(),
    });
    outcomes
});

pub fn definitions() -> Vec<TestDefinition> {
    DEFINITIONS
        .iter()
        .map(DefinitionFixture::to_definition)
        .collect()
}
