// ABOUTME: Helper modules shared by the route integration tests
// ABOUTME: Currently the in-process axum request builder
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy
#![allow(dead_code)]

pub mod axum_test;
