// ABOUTME: HTTP tests for registration, email verification, login, logout and profile changes
// ABOUTME: One-time codes are read back from a recording mailer instead of a real inbox
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use anyhow::Result;
use axum::http::StatusCode;

use common::{create_test_resources, create_test_student, session_for, TEST_PASSWORD};
use helpers::axum_test::AxumTestRequest;
use online_academy::server::AcademyServer;

const NEW_PASSWORD: &str = "BrandNew2025";

#[tokio::test]
async fn test_register_verify_login_flow() -> Result<()> {
    let (resources, mailer) = create_test_resources().await?;
    let app = AcademyServer::new(resources.clone()).app();

    let registered = AxumTestRequest::post("/auth/register")
        .form(&[
            ("full_name", "Nguyen Van A"),
            ("email", "  Student@Example.com "),
            ("password", NEW_PASSWORD),
            ("confirm_password", NEW_PASSWORD),
        ])
        .send(app.clone())
        .await;
    assert_eq!(registered.status_code(), StatusCode::OK);
    assert!(registered.text().contains("student@example.com"));

    let account = resources
        .database
        .get_account_by_email("student@example.com")
        .await?
        .unwrap();
    assert!(!account.is_verified);

    // Unverified accounts cannot sign in yet; a fresh code is sent instead
    let early = AxumTestRequest::post("/auth/login")
        .form(&[("email", "student@example.com"), ("password", NEW_PASSWORD)])
        .send(app.clone())
        .await;
    assert_eq!(early.status_code(), StatusCode::OK);
    assert!(early.set_cookie("session").is_none());
    assert_eq!(mailer.messages().len(), 2);

    let wrong = AxumTestRequest::post("/auth/verify")
        .form(&[("email", "student@example.com"), ("code", "000000x")])
        .send(app.clone())
        .await;
    assert_eq!(wrong.status_code(), StatusCode::BAD_REQUEST);

    let code = mailer.last_code_for("student@example.com").unwrap();
    let verified = AxumTestRequest::post("/auth/verify")
        .form(&[("email", "student@example.com"), ("code", code.as_str())])
        .send(app.clone())
        .await;
    assert_eq!(verified.status_code(), StatusCode::SEE_OTHER);
    assert!(verified
        .location()
        .unwrap()
        .starts_with("/auth/login?email=student%40example.com"));

    let login = AxumTestRequest::post("/auth/login")
        .form(&[
            ("email", "student@example.com"),
            ("password", NEW_PASSWORD),
            ("return_to", "/profile/my-courses"),
        ])
        .send(app.clone())
        .await;
    assert_eq!(login.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(login.location().as_deref(), Some("/profile/my-courses"));
    let token = login.set_cookie("session").unwrap();
    assert!(!token.is_empty());

    let my_courses = AxumTestRequest::get("/profile/my-courses")
        .session(Some(&token))
        .send(app.clone())
        .await;
    assert_eq!(my_courses.status_code(), StatusCode::OK);

    let logout = AxumTestRequest::post("/auth/logout")
        .session(Some(&token))
        .send(app)
        .await;
    assert_eq!(logout.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(logout.set_cookie("session").as_deref(), Some(""));
    Ok(())
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_mismatches() -> Result<()> {
    let (resources, mailer) = create_test_resources().await?;
    create_test_student(&resources.database, "taken@example.com").await?;
    let app = AcademyServer::new(resources).app();

    let duplicate = AxumTestRequest::post("/auth/register")
        .form(&[
            ("full_name", "Someone"),
            ("email", "taken@example.com"),
            ("password", NEW_PASSWORD),
            ("confirm_password", NEW_PASSWORD),
        ])
        .send(app.clone())
        .await;
    assert_eq!(duplicate.status_code(), StatusCode::CONFLICT);

    let mismatch = AxumTestRequest::post("/auth/register")
        .form(&[
            ("full_name", "Someone"),
            ("email", "fresh@example.com"),
            ("password", NEW_PASSWORD),
            ("confirm_password", "Different2025"),
        ])
        .send(app)
        .await;
    assert_eq!(mismatch.status_code(), StatusCode::BAD_REQUEST);
    assert!(mailer.messages().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_login_rejects_bad_password_and_drops_offsite_return() -> Result<()> {
    let (resources, _) = create_test_resources().await?;
    create_test_student(&resources.database, "learner@example.com").await?;
    let app = AcademyServer::new(resources).app();

    let bad = AxumTestRequest::post("/auth/login")
        .form(&[("email", "learner@example.com"), ("password", "nope-nope")])
        .send(app.clone())
        .await;
    assert_eq!(bad.status_code(), StatusCode::UNAUTHORIZED);
    assert!(bad.text().contains("Invalid email or password"));

    let good = AxumTestRequest::post("/auth/login")
        .form(&[
            ("email", "learner@example.com"),
            ("password", TEST_PASSWORD),
            ("return_to", "//evil.example.com"),
        ])
        .send(app)
        .await;
    assert_eq!(good.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(good.location().as_deref(), Some("/"));
    Ok(())
}

#[tokio::test]
async fn test_protected_page_redirects_to_login_with_return_path() -> Result<()> {
    let (resources, _) = create_test_resources().await?;
    let app = AcademyServer::new(resources).app();

    let response = AxumTestRequest::get("/profile").send(app.clone()).await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.location().as_deref(),
        Some("/auth/login?return_to=%2Fprofile")
    );

    let forged = AxumTestRequest::get("/profile")
        .session(Some("not-a-token"))
        .send(app)
        .await;
    assert_eq!(forged.status_code(), StatusCode::SEE_OTHER);
    Ok(())
}

#[tokio::test]
async fn test_profile_update_refreshes_session() -> Result<()> {
    let (resources, _) = create_test_resources().await?;
    let (account, _) = create_test_student(&resources.database, "learner@example.com").await?;
    let token = session_for(&resources, &account);
    let app = AcademyServer::new(resources.clone()).app();

    let empty = AxumTestRequest::post("/profile/update")
        .session(Some(&token))
        .form(&[("full_name", "   "), ("avatar_url", "")])
        .send(app.clone())
        .await;
    assert!(empty.location().unwrap().contains("error="));

    let saved = AxumTestRequest::post("/profile/update")
        .session(Some(&token))
        .form(&[("full_name", "Renamed Learner"), ("avatar_url", "")])
        .send(app.clone())
        .await;
    assert_eq!(saved.status_code(), StatusCode::SEE_OTHER);
    let refreshed = saved.set_cookie("session").unwrap();
    assert_ne!(refreshed, token);

    let page = AxumTestRequest::get("/profile")
        .session(Some(&refreshed))
        .send(app)
        .await;
    assert!(page.text().contains("Renamed Learner"));
    Ok(())
}

#[tokio::test]
async fn test_change_password_checks_current_password() -> Result<()> {
    let (resources, _) = create_test_resources().await?;
    let (account, _) = create_test_student(&resources.database, "learner@example.com").await?;
    let token = session_for(&resources, &account);
    let app = AcademyServer::new(resources.clone()).app();

    let wrong = AxumTestRequest::post("/profile/change-password")
        .session(Some(&token))
        .form(&[
            ("current_password", "not-my-password"),
            ("new_password", NEW_PASSWORD),
            ("confirm_password", NEW_PASSWORD),
        ])
        .send(app.clone())
        .await;
    assert!(wrong.location().unwrap().contains("error="));

    let changed = AxumTestRequest::post("/profile/change-password")
        .session(Some(&token))
        .form(&[
            ("current_password", TEST_PASSWORD),
            ("new_password", NEW_PASSWORD),
            ("confirm_password", NEW_PASSWORD),
        ])
        .send(app.clone())
        .await;
    assert!(changed.location().unwrap().contains("notice="));

    let login = AxumTestRequest::post("/auth/login")
        .form(&[("email", "learner@example.com"), ("password", NEW_PASSWORD)])
        .send(app)
        .await;
    assert_eq!(login.status_code(), StatusCode::SEE_OTHER);
    Ok(())
}

#[tokio::test]
async fn test_change_email_confirms_new_address() -> Result<()> {
    let (resources, mailer) = create_test_resources().await?;
    let (account, _) = create_test_student(&resources.database, "old@example.com").await?;
    create_test_student(&resources.database, "taken@example.com").await?;
    let token = session_for(&resources, &account);
    let app = AcademyServer::new(resources.clone()).app();

    let taken = AxumTestRequest::post("/profile/change-email")
        .session(Some(&token))
        .form(&[("new_email", "taken@example.com")])
        .send(app.clone())
        .await;
    assert!(taken.location().unwrap().contains("error="));

    let requested = AxumTestRequest::post("/profile/change-email")
        .session(Some(&token))
        .form(&[("new_email", "New@Example.com")])
        .send(app.clone())
        .await;
    assert_eq!(requested.status_code(), StatusCode::SEE_OTHER);
    assert!(requested
        .location()
        .unwrap()
        .starts_with("/profile/verify-email?email=new%40example.com"));

    // The code goes to the new address only
    assert!(mailer.last_code_for("old@example.com").is_none());
    let code = mailer.last_code_for("new@example.com").unwrap();

    let confirmed = AxumTestRequest::post("/profile/verify-email")
        .session(Some(&token))
        .form(&[("code", code.as_str())])
        .send(app.clone())
        .await;
    assert_eq!(confirmed.location().as_deref().map(|l| l.starts_with("/profile?notice=")), Some(true));

    let account = resources.database.get_account(account.account_id).await?.unwrap();
    assert_eq!(account.email, "new@example.com");

    // Codes are single use
    let replay = AxumTestRequest::post("/profile/verify-email")
        .session(Some(&token))
        .form(&[("code", code.as_str())])
        .send(app)
        .await;
    assert!(replay.location().unwrap().contains("error="));
    Ok(())
}

#[cfg(feature = "oauth")]
#[tokio::test]
async fn test_google_sign_in_discards_unconfirmed_password() -> Result<()> {
    use online_academy::auth::password::hash_otp_code;
    use online_academy::external::GoogleProfile;
    use online_academy::models::{AuthProvider, OtpPurpose};
    use online_academy::routes::auth::AuthService;

    let (resources, mailer) = create_test_resources().await?;
    let app = AcademyServer::new(resources.clone()).app();

    // Someone registers an address they do not control and never confirms it
    AxumTestRequest::post("/auth/register")
        .form(&[
            ("full_name", "Not The Owner"),
            ("email", "owner@gmail.com"),
            ("password", NEW_PASSWORD),
            ("confirm_password", NEW_PASSWORD),
        ])
        .send(app.clone())
        .await;
    let pending = resources
        .database
        .get_account_by_email("owner@gmail.com")
        .await?
        .unwrap();
    assert!(!pending.is_verified);
    let code = mailer.last_code_for("owner@gmail.com").unwrap();

    let (account, token) = AuthService::new(resources.clone())
        .login_with_google(&GoogleProfile {
            sub: "google-123".to_owned(),
            email: "owner@gmail.com".to_owned(),
            email_verified: true,
            name: Some("Real Owner".to_owned()),
            picture: None,
        })
        .await?;
    assert_eq!(account.account_id, pending.account_id);
    assert!(!token.is_empty());

    let stored = resources
        .database
        .get_account(pending.account_id)
        .await?
        .unwrap();
    assert!(stored.is_verified);
    assert!(stored.password_hash.is_empty());
    assert_eq!(stored.auth_provider, AuthProvider::Google);

    // The registration password no longer opens the account
    let login = AxumTestRequest::post("/auth/login")
        .form(&[("email", "owner@gmail.com"), ("password", NEW_PASSWORD)])
        .send(app)
        .await;
    assert_eq!(login.status_code(), StatusCode::UNAUTHORIZED);
    assert!(login.set_cookie("session").is_none());

    // Nor does the code mailed at registration
    assert!(resources
        .database
        .verify_otp(pending.account_id, OtpPurpose::Register, &hash_otp_code(&code))
        .await
        .is_err());
    Ok(())
}

#[tokio::test]
async fn test_claiming_requires_unverified_account() -> Result<()> {
    use online_academy::errors::ErrorCode;
    use online_academy::models::AuthProvider;

    let (resources, _) = create_test_resources().await?;
    let (account, _) = create_test_student(&resources.database, "learner@example.com").await?;

    let err = resources
        .database
        .claim_unverified_account(account.account_id, AuthProvider::Google)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);

    let unchanged = resources
        .database
        .get_account(account.account_id)
        .await?
        .unwrap();
    assert!(!unchanged.password_hash.is_empty());
    Ok(())
}
