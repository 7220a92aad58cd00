mod common;

use chrono::Utc;

use common::{create_user, insert_file_access, insert_login, setup_pipeline_without_model};
use secmon_backend::types::internal::{LoginStatus, UserRole};

#[tokio::test]
async fn test_empty_history_scores_zero() {
    let app = setup_pipeline_without_model().await;
    let user = create_user(&app.db, "quiet", UserRole::Employee).await;
    let now = Utc::now().timestamp();

    let score = app.risk_scorer.compute(&app.db, &user.id, now).await.unwrap();

    assert_eq!(score, 0);
}

#[tokio::test]
async fn test_event_weights() {
    let app = setup_pipeline_without_model().await;
    let user = create_user(&app.db, "mixed", UserRole::Employee).await;
    let now = Utc::now().timestamp();

    // 2 failed logins, 1 unauthorized access, 1 suspicious login
    for i in 0..2 {
        insert_login(
            &app.db,
            Some(&user.id),
            "mixed",
            "10.0.0.1",
            "Chrome",
            LoginStatus::Failed,
            now - 60 - i,
        )
        .await;
    }
    insert_file_access(&app.db, &user.id, "mixed", "/confidential/x", false, now - 30).await;
    insert_login(
        &app.db,
        Some(&user.id),
        "mixed",
        "203.0.113.1",
        "Edge",
        LoginStatus::Suspicious,
        now - 15,
    )
    .await;

    let score = app.risk_scorer.compute(&app.db, &user.id, now).await.unwrap();

    // 2*10 + 1*25 + 1*15
    assert_eq!(score, 60);
}

#[tokio::test]
async fn test_score_clamps_at_100() {
    let app = setup_pipeline_without_model().await;
    let user = create_user(&app.db, "hammered", UserRole::Employee).await;
    let now = Utc::now().timestamp();

    // 15 failed logins: raw 150
    for i in 0..15 {
        insert_login(
            &app.db,
            Some(&user.id),
            "hammered",
            "10.0.0.1",
            "Chrome",
            LoginStatus::Failed,
            now - 60 - i,
        )
        .await;
    }

    let score = app.risk_scorer.compute(&app.db, &user.id, now).await.unwrap();

    assert_eq!(score, 100);
}

#[tokio::test]
async fn test_one_hour_window_boundary() {
    let app = setup_pipeline_without_model().await;
    let user = create_user(&app.db, "edge", UserRole::Employee).await;
    let now = Utc::now().timestamp();

    // 61 minutes old: outside the window
    insert_login(
        &app.db,
        Some(&user.id),
        "edge",
        "10.0.0.1",
        "Chrome",
        LoginStatus::Failed,
        now - 61 * 60,
    )
    .await;

    let score = app.risk_scorer.compute(&app.db, &user.id, now).await.unwrap();
    assert_eq!(score, 0, "61-minute-old event must not count");

    // 59 minutes old: inside the window
    insert_login(
        &app.db,
        Some(&user.id),
        "edge",
        "10.0.0.1",
        "Chrome",
        LoginStatus::Failed,
        now - 59 * 60,
    )
    .await;

    let score = app.risk_scorer.compute(&app.db, &user.id, now).await.unwrap();
    assert_eq!(score, 10, "59-minute-old event must count");
}

#[tokio::test]
async fn test_recompute_persists_score() {
    let app = setup_pipeline_without_model().await;
    let user = create_user(&app.db, "persisted", UserRole::Employee).await;
    let now = Utc::now().timestamp();

    insert_file_access(&app.db, &user.id, "persisted", "/credentials", false, now - 5).await;

    let score = app
        .risk_scorer
        .recompute_and_store(&app.db, &user.id, now)
        .await
        .unwrap();
    assert_eq!(score, 25);

    let stored = app
        .user_store
        .get_user(&app.db, &user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.risk_score, 25);
}

#[tokio::test]
async fn test_recompute_is_idempotent() {
    let app = setup_pipeline_without_model().await;
    let user = create_user(&app.db, "steady", UserRole::Employee).await;
    let now = Utc::now().timestamp();

    insert_login(
        &app.db,
        Some(&user.id),
        "steady",
        "10.0.0.1",
        "Chrome",
        LoginStatus::Failed,
        now - 10,
    )
    .await;

    let first = app.risk_scorer.compute(&app.db, &user.id, now).await.unwrap();
    let second = app.risk_scorer.compute(&app.db, &user.id, now).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_authorized_accesses_do_not_raise_score() {
    let app = setup_pipeline_without_model().await;
    let user = create_user(&app.db, "browser", UserRole::Employee).await;
    let now = Utc::now().timestamp();

    for i in 0..4 {
        insert_file_access(
            &app.db,
            &user.id,
            "browser",
            "/reports/ok.txt",
            true,
            now - 10 - i,
        )
        .await;
    }

    let score = app.risk_scorer.compute(&app.db, &user.id, now).await.unwrap();
    assert_eq!(score, 0);
}
