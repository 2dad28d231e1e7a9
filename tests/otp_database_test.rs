// ABOUTME: Integration tests for one-time code storage: attempt limits, single use and reissue
// ABOUTME: Codes are hashed the same way the registration flow hashes them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use common::{create_test_database, create_test_student};
use online_academy::auth::password::{generate_otp_code, hash_otp_code};
use online_academy::constants::otp;
use online_academy::errors::ErrorCode;
use online_academy::models::OtpPurpose;

#[tokio::test]
async fn test_code_is_single_use() -> Result<()> {
    let db = create_test_database().await?;
    let (account, _) = create_test_student(&db, "learner@example.com").await?;
    let code = generate_otp_code();
    assert_eq!(code.len(), otp::CODE_LENGTH);
    assert!(code.chars().all(|c| c.is_ascii_digit()));

    db.create_otp(account.account_id, OtpPurpose::Register, &hash_otp_code(&code), None)
        .await?;
    db.verify_otp(account.account_id, OtpPurpose::Register, &hash_otp_code(&code))
        .await?;

    let err = db
        .verify_otp(account.account_id, OtpPurpose::Register, &hash_otp_code(&code))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    Ok(())
}

#[tokio::test]
async fn test_attempt_limit_locks_code() -> Result<()> {
    let db = create_test_database().await?;
    let (account, _) = create_test_student(&db, "learner@example.com").await?;
    db.create_otp(account.account_id, OtpPurpose::Register, &hash_otp_code("123456"), None)
        .await?;

    for _ in 0..otp::MAX_ATTEMPTS {
        let err = db
            .verify_otp(account.account_id, OtpPurpose::Register, &hash_otp_code("000000"))
            .await
            .unwrap_err();
        assert!(err.message.contains("incorrect"));
    }

    // Even the right code is refused once the limit is reached
    let err = db
        .verify_otp(account.account_id, OtpPurpose::Register, &hash_otp_code("123456"))
        .await
        .unwrap_err();
    assert!(err.message.contains("Too many attempts"));
    Ok(())
}

#[tokio::test]
async fn test_new_code_replaces_old_one() -> Result<()> {
    let db = create_test_database().await?;
    let (account, _) = create_test_student(&db, "learner@example.com").await?;
    db.create_otp(account.account_id, OtpPurpose::Register, &hash_otp_code("111111"), None)
        .await?;
    db.create_otp(account.account_id, OtpPurpose::Register, &hash_otp_code("222222"), None)
        .await?;

    let err = db
        .verify_otp(account.account_id, OtpPurpose::Register, &hash_otp_code("111111"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    db.verify_otp(account.account_id, OtpPurpose::Register, &hash_otp_code("222222"))
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_purposes_do_not_mix() -> Result<()> {
    let db = create_test_database().await?;
    let (account, _) = create_test_student(&db, "learner@example.com").await?;
    db.create_otp(
        account.account_id,
        OtpPurpose::EmailChange,
        &hash_otp_code("654321"),
        Some("next@example.com"),
    )
    .await?;

    assert!(db
        .verify_otp(account.account_id, OtpPurpose::Register, &hash_otp_code("654321"))
        .await
        .is_err());

    let verified = db
        .verify_otp(account.account_id, OtpPurpose::EmailChange, &hash_otp_code("654321"))
        .await?;
    assert_eq!(verified.new_email.as_deref(), Some("next@example.com"));
    Ok(())
}
