// Copyright (c) The spectree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixture data shared by spectree integration tests.

pub mod models;
pub mod web_app;
