mod common;

use campus_portal::domain::entities::NewSession;
use campus_portal::domain::repositories::SessionRepository;
use campus_portal::infrastructure::persistence::PgSessionRepository;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;

fn new_session(user_id: i64, hash: &str, expires_in: Duration) -> NewSession {
    NewSession {
        user_id,
        token_hash: hash.to_string(),
        expires_at: Utc::now() + expires_in,
    }
}

#[sqlx::test]
async fn test_create_and_find(pool: PgPool) {
    let user_id = common::insert_user(&pool, "Asha", "asha@college.edu").await;
    let repo = PgSessionRepository::new(Arc::new(pool));

    let created = repo
        .create(new_session(user_id, "hash-1", Duration::days(7)))
        .await
        .unwrap();

    assert!(created.is_active);
    assert_eq!(created.user_id, user_id);

    let found = repo.find_by_token_hash("hash-1").await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert!(repo.find_by_token_hash("missing").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_create_same_hash_returns_existing_row(pool: PgPool) {
    let user_id = common::insert_user(&pool, "Asha", "asha@college.edu").await;
    let repo = PgSessionRepository::new(Arc::new(pool));

    let first = repo
        .create(new_session(user_id, "hash-dup", Duration::days(7)))
        .await
        .unwrap();
    repo.deactivate(first.id).await.unwrap();

    let second = repo
        .create(new_session(user_id, "hash-dup", Duration::days(30)))
        .await
        .unwrap();

    assert_eq!(second.id, first.id);
    assert!(!second.is_active);
    assert_eq!(repo.counts(Utc::now()).await.unwrap().total, 1);
}

#[sqlx::test]
async fn test_touch_updates_last_used(pool: PgPool) {
    let user_id = common::insert_user(&pool, "Asha", "asha@college.edu").await;
    let repo = PgSessionRepository::new(Arc::new(pool));
    let session = repo
        .create(new_session(user_id, "hash-t", Duration::days(7)))
        .await
        .unwrap();

    let at = session.last_used + Duration::hours(3);
    repo.touch(session.id, at).await.unwrap();

    let found = repo.find_by_token_hash("hash-t").await.unwrap().unwrap();
    assert_eq!(found.last_used.timestamp(), at.timestamp());
}

#[sqlx::test]
async fn test_deactivate_by_token_hash_counts_only_active(pool: PgPool) {
    let user_id = common::insert_user(&pool, "Asha", "asha@college.edu").await;
    let repo = PgSessionRepository::new(Arc::new(pool));
    repo.create(new_session(user_id, "hash-r", Duration::days(7)))
        .await
        .unwrap();

    assert_eq!(repo.deactivate_by_token_hash("hash-r").await.unwrap(), 1);
    assert_eq!(repo.deactivate_by_token_hash("hash-r").await.unwrap(), 0);
    assert_eq!(repo.deactivate_by_token_hash("unknown").await.unwrap(), 0);
}

#[sqlx::test]
async fn test_deactivate_all_for_user(pool: PgPool) {
    let asha = common::insert_user(&pool, "Asha", "asha@college.edu").await;
    let ravi = common::insert_user(&pool, "Ravi", "ravi@college.edu").await;
    let repo = PgSessionRepository::new(Arc::new(pool));

    for hash in ["a1", "a2"] {
        repo.create(new_session(asha, hash, Duration::days(7)))
            .await
            .unwrap();
    }
    repo.create(new_session(ravi, "r1", Duration::days(7)))
        .await
        .unwrap();

    assert_eq!(repo.deactivate_all_for_user(asha).await.unwrap(), 2);

    let counts = repo.counts(Utc::now()).await.unwrap();
    assert_eq!(counts.total, 3);
    assert_eq!(counts.active, 1);
}

#[sqlx::test]
async fn test_prune_passes(pool: PgPool) {
    let user_id = common::insert_user(&pool, "Asha", "asha@college.edu").await;
    let repo = PgSessionRepository::new(Arc::new(pool));

    repo.create(new_session(user_id, "expired", Duration::days(-1)))
        .await
        .unwrap();
    let revoked = repo
        .create(new_session(user_id, "revoked", Duration::days(7)))
        .await
        .unwrap();
    repo.create(new_session(user_id, "live", Duration::days(7)))
        .await
        .unwrap();
    repo.deactivate(revoked.id).await.unwrap();

    let now = Utc::now();
    assert_eq!(repo.delete_expired(now).await.unwrap(), 1);
    assert_eq!(
        repo.delete_inactive_created_before(now - Duration::days(30))
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        repo.delete_inactive_created_before(now + Duration::minutes(1))
            .await
            .unwrap(),
        1
    );

    assert!(repo.find_by_token_hash("live").await.unwrap().is_some());
}

#[sqlx::test]
async fn test_list_overview_joins_owner(pool: PgPool) {
    let user_id = common::insert_user(&pool, "Asha", "asha@college.edu").await;
    let repo = PgSessionRepository::new(Arc::new(pool));

    let first = repo
        .create(new_session(user_id, "o1", Duration::days(7)))
        .await
        .unwrap();
    repo.create(new_session(user_id, "o2", Duration::days(7)))
        .await
        .unwrap();
    repo.deactivate(first.id).await.unwrap();

    let all = repo.list_overview(false).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].user_email, "asha@college.edu");

    let active = repo.list_overview(true).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].session.token_hash, "o2");
}

#[sqlx::test]
async fn test_sessions_removed_with_user(pool: PgPool) {
    let user_id = common::insert_user(&pool, "Asha", "asha@college.edu").await;
    let repo = PgSessionRepository::new(Arc::new(pool.clone()));
    repo.create(new_session(user_id, "cascade", Duration::days(7)))
        .await
        .unwrap();

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&pool)
        .await
        .unwrap();

    assert!(repo.find_by_token_hash("cascade").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_ping(pool: PgPool) {
    let repo = PgSessionRepository::new(Arc::new(pool));

    assert!(repo.ping().await.is_ok());
}
