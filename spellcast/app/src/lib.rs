// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

//! Casting spell files against a demo world built from the settings.

pub mod report;
pub mod spell_file;
pub mod world;

pub use spellcast_app_options as options;
pub use spellcast_app_settings as settings;
