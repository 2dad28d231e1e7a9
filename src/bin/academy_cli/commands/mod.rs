// ABOUTME: Subcommand modules for academy-cli
// ABOUTME: Each module owns its clap enum and an async run function
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

pub mod account;
pub mod category;
pub mod course;
