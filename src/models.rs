// ABOUTME: Domain models for accounts, catalog, curriculum, enrollment and reviews
// ABOUTME: Plain serde structs and string-backed enums shared by storage, routes and views
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Learner
    Student,
    /// Course author
    Instructor,
    /// Site administrator
    Admin,
}

impl Role {
    /// Database string form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Instructor => "instructor",
            Self::Admin => "admin",
        }
    }

    /// Parse the database string form
    ///
    /// # Errors
    ///
    /// Returns an error for unknown role strings
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "student" => Ok(Self::Student),
            "instructor" => Ok(Self::Instructor),
            "admin" => Ok(Self::Admin),
            other => Err(AppError::invalid_input(format!("Unknown role: {other}"))),
        }
    }

    /// Landing page after login
    #[must_use]
    pub const fn home_path(self) -> &'static str {
        match self {
            Self::Student => "/",
            Self::Instructor => "/instructor",
            Self::Admin => "/admin",
        }
    }
}

/// How the account signs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthProvider {
    /// Email and password
    Email,
    /// Google OAuth
    Google,
}

impl AuthProvider {
    /// Database string form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Google => "google",
        }
    }

    /// Parse the database string form, unknown values read as email
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value == "google" {
            Self::Google
        } else {
            Self::Email
        }
    }
}

/// Publication status of a course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseStatus {
    /// Still being authored
    Incomplete,
    /// Authoring finished
    Complete,
    /// Approved and running
    Active,
    /// Hidden by an administrator
    Suspended,
}

impl CourseStatus {
    /// Database string form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete",
            Self::Complete => "complete",
            Self::Active => "active",
            Self::Suspended => "suspended",
        }
    }

    /// Parse the database string form
    ///
    /// # Errors
    ///
    /// Returns an error for unknown status strings
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "incomplete" => Ok(Self::Incomplete),
            "complete" => Ok(Self::Complete),
            "active" => Ok(Self::Active),
            "suspended" => Ok(Self::Suspended),
            other => Err(AppError::invalid_input(format!(
                "Unknown course status: {other}"
            ))),
        }
    }

    /// Whether the course shows up in the public catalog
    #[must_use]
    pub const fn is_listed(self) -> bool {
        !matches!(self, Self::Suspended)
    }

    /// Statuses an instructor may set on their own course
    #[must_use]
    pub const fn instructor_settable(self) -> bool {
        matches!(self, Self::Incomplete | Self::Complete)
    }

    /// Label shown in dashboards
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Incomplete => "In progress",
            Self::Complete => "Complete",
            Self::Active => "Active",
            Self::Suspended => "Suspended",
        }
    }
}

/// Why an OTP was issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    /// Confirm a new registration
    Register,
    /// Confirm a new email address
    EmailChange,
}

impl OtpPurpose {
    /// Database string form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::EmailChange => "email_change",
        }
    }
}

/// Login identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Primary key
    pub account_id: i64,
    /// Lower-cased email
    pub email: String,
    /// bcrypt hash (empty for OAuth-only accounts)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Display name
    pub full_name: String,
    /// Role
    pub role: Role,
    /// Whether the email was confirmed
    pub is_verified: bool,
    /// Profile picture
    pub avatar_url: Option<String>,
    /// Sign-in method
    pub auth_provider: AuthProvider,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Student profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// Primary key
    pub student_id: i64,
    /// Owning account
    pub account_id: i64,
    /// Name shown on reviews
    pub name: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Instructor profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instructor {
    /// Primary key
    pub instructor_id: i64,
    /// Owning account
    pub account_id: i64,
    /// Name shown on course pages
    pub name: String,
    /// Short biography
    pub bio: Option<String>,
    /// Students across all courses
    pub total_students: i64,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Account row joined with its role profile, for admin listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    /// Account id
    pub account_id: i64,
    /// Email
    pub email: String,
    /// Display name
    pub full_name: String,
    /// Role
    pub role: Role,
    /// Whether the email was confirmed
    pub is_verified: bool,
    /// Courses taught (instructors) or enrolled (students)
    pub course_count: i64,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Course category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Primary key
    pub category_id: i64,
    /// Unique name
    pub name: String,
    /// Parent for subcategories
    pub parent_id: Option<i64>,
}

impl Category {
    /// Whether this is a top-level subject area
    #[must_use]
    pub const fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Category with aggregate counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryStats {
    /// Primary key
    pub category_id: i64,
    /// Name
    pub category_name: String,
    /// Parent name, empty for top-level
    pub parent_name: String,
    /// Courses linked directly
    pub course_count: i64,
    /// Students across linked courses
    pub total_students: i64,
    /// Average star across linked courses
    pub avg_star: f64,
    /// Enrollments in the last week
    pub weekly_enrollments: i64,
}

/// Top-level category with its subcategories, for navigation menus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTree {
    /// Subject area
    pub category: Category,
    /// Subcategories
    pub children: Vec<Category>,
}

/// Full course row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Primary key
    pub course_id: i64,
    /// Title
    pub title: String,
    /// Short description
    pub description: String,
    /// Long description (trusted HTML authored by the instructor)
    pub detail_html: String,
    /// Cover image
    pub image_url: Option<String>,
    /// Selling price in VND
    pub current_price: i64,
    /// List price in VND
    pub original_price: i64,
    /// Total video hours
    pub total_hours: f64,
    /// Number of lectures
    pub total_lectures: i64,
    /// Publication status
    pub status: CourseStatus,
    /// Editorial bestseller flag
    pub is_bestseller: bool,
    /// Category
    pub category_id: Option<i64>,
    /// Author
    pub instructor_id: i64,
    /// Detail page views
    pub view_count: i64,
    /// Enrolled students
    pub student_count: i64,
    /// Average rating
    pub star: f64,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Course as shown on cards and in JSON listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseCard {
    /// Primary key
    pub course_id: i64,
    /// Title
    pub title: String,
    /// Short description
    pub description: String,
    /// Cover image
    pub image_url: Option<String>,
    /// Selling price in VND
    pub current_price: i64,
    /// List price in VND
    pub original_price: i64,
    /// Enrolled students
    pub student_count: i64,
    /// Detail page views
    pub view_count: i64,
    /// Average rating
    pub star: f64,
    /// Editorial bestseller flag
    pub is_bestseller: bool,
    /// Publication status
    pub status: CourseStatus,
    /// Total video hours
    pub total_hours: f64,
    /// Number of lectures
    pub total_lectures: i64,
    /// Author name
    pub instructor_name: Option<String>,
    /// Category name
    pub category_name: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl CourseCard {
    /// Whether the course sells below its list price
    #[must_use]
    pub const fn is_discounted(&self) -> bool {
        self.current_price < self.original_price
    }
}

/// Curriculum section with its lectures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Primary key
    pub section_id: i64,
    /// Owning course
    pub course_id: i64,
    /// Title
    pub title: String,
    /// Position within the course
    pub order_index: i64,
    /// Lectures ordered by position
    pub lectures: Vec<Lecture>,
}

impl Section {
    /// Sum of lecture durations
    #[must_use]
    pub fn duration_seconds(&self) -> i64 {
        self.lectures.iter().map(|l| l.duration_seconds).sum()
    }
}

/// Single video lecture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lecture {
    /// Primary key
    pub lecture_id: i64,
    /// Owning section
    pub section_id: i64,
    /// Title
    pub title: String,
    /// Video location
    pub video_url: Option<String>,
    /// Length in seconds
    pub duration_seconds: i64,
    /// Watchable without enrolling
    pub is_preview: bool,
    /// Position within the section
    pub order_index: i64,
}

/// Gallery image on the detail page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseImage {
    /// Image location
    pub image_url: String,
    /// Caption
    pub description: Option<String>,
}

/// Student review of a course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Primary key
    pub review_id: i64,
    /// Author
    pub student_id: i64,
    /// Reviewed course
    pub course_id: i64,
    /// Stars, 1 to 5
    pub rating: i64,
    /// Text
    pub feedback: String,
    /// Last write time
    pub created_at: DateTime<Utc>,
    /// Author name
    pub student_name: String,
    /// Course title
    pub course_title: String,
}

/// Enrollment row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    /// Primary key
    pub enrollment_id: i64,
    /// Student
    pub student_id: i64,
    /// Course
    pub course_id: i64,
    /// Percent of lectures completed
    pub progress: u8,
    /// Enrollment time
    pub enrolled_at: DateTime<Utc>,
}

/// Enrolled course with progress, for "my courses"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrolledCourse {
    /// Course card
    pub course: CourseCard,
    /// Percent of lectures completed
    pub progress: u8,
    /// Enrollment time
    pub enrolled_at: DateTime<Utc>,
    /// Whether the course is also on the watchlist
    pub in_watchlist: bool,
}

/// Watchlist entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistEntry {
    /// Course card
    pub course: CourseCard,
    /// When it was saved
    pub added_at: DateTime<Utc>,
}

/// Everything the detail page shows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseDetails {
    /// Course row
    pub course: Course,
    /// Author
    pub instructor: Instructor,
    /// Category, when linked
    pub category: Option<Category>,
    /// Number of enrollments
    pub enrollment_count: i64,
    /// Average review rating, one decimal
    pub average_rating: f64,
    /// Number of reviews
    pub review_count: i64,
    /// Ordered curriculum
    pub sections: Vec<Section>,
    /// Reviews, newest first
    pub reviews: Vec<Review>,
    /// Other courses in the same category
    pub related: Vec<CourseCard>,
    /// Gallery
    pub images: Vec<CourseImage>,
}

impl CourseDetails {
    /// All lectures in curriculum order
    pub fn lectures(&self) -> impl Iterator<Item = &Lecture> {
        self.sections.iter().flat_map(|s| s.lectures.iter())
    }
}

/// Instructor overview numbers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstructorStats {
    /// Courses authored
    pub total_courses: i64,
    /// Courses marked complete or active
    pub completed_courses: i64,
    /// Lectures across all courses
    pub total_lectures: i64,
    /// Students across all courses
    pub total_students: i64,
}

/// Admin dashboard counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminCounts {
    /// Categories
    pub categories: i64,
    /// Courses
    pub courses: i64,
    /// Instructors
    pub instructors: i64,
    /// Students
    pub students: i64,
}
