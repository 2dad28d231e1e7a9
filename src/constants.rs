// ABOUTME: Application-wide constants for catalog limits, sessions, OTP and search
// ABOUTME: Centralizes tunables so routes, views and storage agree on the same values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

/// Service identity
pub mod service {
    /// Display name used in page titles and emails
    pub const SITE_NAME: &str = "Online Academy";
    /// Service name reported by `/health`
    pub const SERVICE_NAME: &str = "online-academy";
    /// Crate version
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Session cookie settings
pub mod session {
    /// Name of the session cookie
    pub const COOKIE_NAME: &str = "session";
    /// Session lifetime
    pub const TTL_HOURS: i64 = 24;
    /// Session lifetime in seconds (cookie Max-Age)
    pub const TTL_SECS: i64 = TTL_HOURS * 3600;
    /// Cookie carrying the OAuth CSRF state
    pub const OAUTH_STATE_COOKIE: &str = "oauth_state";
    /// Lifetime of the OAuth state cookie
    pub const OAUTH_STATE_TTL_SECS: i64 = 600;
    /// Secret used when none is configured in development
    pub const DEV_SECRET: &str = "online-academy-development-secret-change-me";
}

/// One-time password settings
pub mod otp {
    /// Number of digits in a code
    pub const CODE_LENGTH: usize = 6;
    /// Validity window
    pub const TTL_MINUTES: i64 = 5;
    /// Wrong guesses allowed per code
    pub const MAX_ATTEMPTS: i64 = 5;
}

/// Account rules
pub mod accounts {
    /// Minimum password length
    pub const MIN_PASSWORD_LENGTH: usize = 8;
    /// Maximum display name length
    pub const MAX_NAME_LENGTH: usize = 100;
}

/// Catalog and home page sizing
pub mod catalog {
    /// Courses per search page
    pub const SEARCH_PAGE_SIZE: i64 = 8;
    /// Courses per page on the all-courses listing
    pub const LIST_PAGE_SIZE: i64 = 12;
    /// Home page section size
    pub const HOME_SECTION_SIZE: i64 = 10;
    /// Categories shown on the home page
    pub const HOME_CATEGORY_COUNT: i64 = 6;
    /// Related courses on the detail page
    pub const RELATED_COURSES: i64 = 5;
    /// A course younger than this is flagged new
    pub const NEW_COURSE_DAYS: i64 = 14;
    /// Student count above which a course is flagged bestseller
    pub const BESTSELLER_STUDENTS: i64 = 2000;
    /// Window used for weekly rankings
    pub const WEEKLY_WINDOW_DAYS: i64 = 7;
}

/// Search ranking
pub mod search {
    /// Minimum trigram similarity for a fuzzy title match
    pub const SIMILARITY_THRESHOLD: f64 = 0.3;
    /// Longest query accepted
    pub const MAX_QUERY_LENGTH: usize = 200;
}

/// Review rules
pub mod reviews {
    /// Lowest star rating
    pub const MIN_RATING: i64 = 1;
    /// Highest star rating
    pub const MAX_RATING: i64 = 5;
    /// Longest feedback text
    pub const MAX_FEEDBACK_LENGTH: usize = 2000;
}
