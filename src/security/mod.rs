// ABOUTME: Security helpers shared by the HTTP layer
// ABOUTME: Cookie handling and baseline security response headers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

/// Secure HTTP cookie utilities
pub mod cookies;

/// Security header values applied to every response
pub mod headers {
    /// `X-Content-Type-Options`
    pub const CONTENT_TYPE_OPTIONS: &str = "nosniff";
    /// `X-Frame-Options`
    pub const FRAME_OPTIONS: &str = "DENY";
    /// `Referrer-Policy`
    pub const REFERRER_POLICY: &str = "strict-origin-when-cross-origin";
}
