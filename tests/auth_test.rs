mod common;

use anyhow::Result;
use common::test_service;
use fiscus::application::{AppError, UpdateProfile};

#[tokio::test]
async fn test_register_and_authenticate() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let (user, session) = service
        .register("Ada", "ada@example.com", "averysecurepassword")
        .await?;

    let resolved = service.authenticate(&session.token).await?;
    assert_eq!(resolved.id, user.id);
    assert_eq!(resolved.email, "ada@example.com");

    Ok(())
}

#[tokio::test]
async fn test_register_validation() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service
        .register("", "ada@example.com", "averysecurepassword")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = service
        .register("Ada", "not-an-email", "averysecurepassword")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = service
        .register("Ada", "ada@example.com", "short")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    Ok(())
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .register("Ada", "ada@example.com", "averysecurepassword")
        .await?;

    let err = service
        .register("Imposter", "ada@example.com", "anotherpassword")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    Ok(())
}

#[tokio::test]
async fn test_login() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .register("Ada", "ada@example.com", "averysecurepassword")
        .await?;

    let (user, session) = service
        .login("ada@example.com", "averysecurepassword")
        .await?;
    assert_eq!(user.email, "ada@example.com");
    assert!(!session.token.is_empty());

    let err = service
        .login("ada@example.com", "wrongpassword")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    let err = service
        .login("nobody@example.com", "averysecurepassword")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    Ok(())
}

#[tokio::test]
async fn test_authenticate_rejects_unknown_token() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service.authenticate("not-a-real-token").await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    Ok(())
}

#[tokio::test]
async fn test_update_profile() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let (user, _session) = service
        .register("Ada", "ada@example.com", "averysecurepassword")
        .await?;

    let updated = service
        .update_profile(
            user.id,
            UpdateProfile {
                name: Some("Ada Lovelace".to_string()),
                email: Some("lovelace@example.com".to_string()),
                password: Some("anevenbetterpassword".to_string()),
            },
        )
        .await?;

    assert_eq!(updated.name, "Ada Lovelace");
    assert_eq!(updated.email, "lovelace@example.com");

    // Old password no longer works, new one does
    let err = service
        .login("lovelace@example.com", "averysecurepassword")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    service
        .login("lovelace@example.com", "anevenbetterpassword")
        .await?;

    Ok(())
}

#[tokio::test]
async fn test_update_profile_rejects_taken_email() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let (user, _session) = service
        .register("Ada", "ada@example.com", "averysecurepassword")
        .await?;
    service
        .register("Grace", "grace@example.com", "anothersecurepassword")
        .await?;

    let err = service
        .update_profile(
            user.id,
            UpdateProfile {
                email: Some("grace@example.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    Ok(())
}
