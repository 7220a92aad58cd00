mod common;

use chrono::Utc;

use common::{create_user, insert_file_access, insert_login, setup_pipeline_without_model};
use secmon_backend::types::internal::{LoginStatus, UserRole};

#[tokio::test]
async fn test_dashboard_counts_today_only() {
    let app = setup_pipeline_without_model().await;
    let user = create_user(&app.db, "worker", UserRole::Employee).await;
    let now = Utc::now().timestamp();

    // Two logins and one blocked access now, one failed login yesterday
    insert_login(
        &app.db,
        Some(&user.id),
        "worker",
        "10.0.0.1",
        "Chrome",
        LoginStatus::Success,
        now - 2,
    )
    .await;
    insert_login(
        &app.db,
        Some(&user.id),
        "worker",
        "10.0.0.1",
        "Chrome",
        LoginStatus::Failed,
        now - 1,
    )
    .await;
    insert_file_access(&app.db, &user.id, "worker", "/confidential/x", false, now - 1).await;
    insert_login(
        &app.db,
        Some(&user.id),
        "worker",
        "10.0.0.1",
        "Chrome",
        LoginStatus::Failed,
        now - 86_400 * 2,
    )
    .await;

    let stats = app.reporting.dashboard(now).await.unwrap();

    assert_eq!(stats.total_users, 1);
    assert_eq!(stats.active_users, 1);
    assert_eq!(stats.today_logins, 2);
    assert_eq!(stats.failed_logins, 1);
    assert_eq!(stats.blocked_files, 1);
    assert_eq!(stats.risk_users, 0);
}

#[tokio::test]
async fn test_dashboard_counts_elevated_risk_users() {
    let app = setup_pipeline_without_model().await;
    let calm = create_user(&app.db, "calm", UserRole::Employee).await;
    let risky = create_user(&app.db, "risky", UserRole::Employee).await;
    let now = Utc::now().timestamp();

    app.user_store.update_risk_score(&app.db, &calm.id, 50).await.unwrap();
    app.user_store.update_risk_score(&app.db, &risky.id, 51).await.unwrap();

    let stats = app.reporting.dashboard(now).await.unwrap();

    // The threshold is exclusive: exactly 50 does not count
    assert_eq!(stats.risk_users, 1);
}

#[tokio::test]
async fn test_risk_users_bands_and_ordering() {
    let app = setup_pipeline_without_model().await;
    let low = create_user(&app.db, "low", UserRole::Employee).await;
    let mid = create_user(&app.db, "mid", UserRole::Employee).await;
    let high = create_user(&app.db, "high", UserRole::Employee).await;
    let crit = create_user(&app.db, "crit", UserRole::Employee).await;

    app.user_store.update_risk_score(&app.db, &low.id, 0).await.unwrap();
    app.user_store.update_risk_score(&app.db, &mid.id, 30).await.unwrap();
    app.user_store.update_risk_score(&app.db, &high.id, 60).await.unwrap();
    app.user_store.update_risk_score(&app.db, &crit.id, 90).await.unwrap();

    let report = app.reporting.risk_users().await.unwrap();

    // Zero-score users are excluded, highest score first
    assert_eq!(report.len(), 3);
    assert_eq!(report[0].username, "crit");
    assert_eq!(report[0].status, "critical");
    assert_eq!(report[1].username, "high");
    assert_eq!(report[1].status, "high");
    assert_eq!(report[2].username, "mid");
    assert_eq!(report[2].status, "medium");
}

#[tokio::test]
async fn test_risk_user_reasons_describe_event_counts() {
    let app = setup_pipeline_without_model().await;
    let user = create_user(&app.db, "noted", UserRole::Employee).await;
    let now = Utc::now().timestamp();

    for i in 0..2 {
        insert_login(
            &app.db,
            Some(&user.id),
            "noted",
            "10.0.0.1",
            "Chrome",
            LoginStatus::Failed,
            now - 10 - i,
        )
        .await;
    }
    insert_file_access(&app.db, &user.id, "noted", "/credentials", false, now - 5).await;

    app.risk_scorer
        .recompute_and_store(&app.db, &user.id, now)
        .await
        .unwrap();

    let report = app.reporting.risk_users().await.unwrap();

    assert_eq!(report.len(), 1);
    assert_eq!(report[0].risk_score, 45);
    assert_eq!(
        report[0].reasons,
        "2 failed login(s), 1 unauthorized file access(es)"
    );
}

#[tokio::test]
async fn test_suspend_user_deactivates_without_deleting() {
    let app = setup_pipeline_without_model().await;
    let user = create_user(&app.db, "leaving", UserRole::Employee).await;

    let suspended = app.reporting.suspend_user(&user.id).await.unwrap();
    assert!(!suspended.is_active);

    let stored = app
        .user_store
        .get_user(&app.db, &user.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!stored.is_active);

    let stats = app.reporting.dashboard(Utc::now().timestamp()).await.unwrap();
    assert_eq!(stats.total_users, 1);
    assert_eq!(stats.active_users, 0);
}

#[tokio::test]
async fn test_latest_views_are_capped() {
    let app = setup_pipeline_without_model().await;
    let user = create_user(&app.db, "busy", UserRole::Employee).await;
    let now = Utc::now().timestamp();

    for i in 0..60 {
        insert_login(
            &app.db,
            Some(&user.id),
            "busy",
            "10.0.0.1",
            "Chrome",
            LoginStatus::Success,
            now - 1000 + i,
        )
        .await;
        insert_file_access(&app.db, &user.id, "busy", "/ok.txt", true, now - 1000 + i).await;
    }

    let attempts = app.reporting.latest_login_attempts().await.unwrap();
    let accesses = app.reporting.latest_file_accesses().await.unwrap();

    assert_eq!(attempts.len(), 50);
    assert_eq!(accesses.len(), 50);
    // Newest first
    assert!(attempts[0].timestamp >= attempts[49].timestamp);
}
