//! Integration tests for the tracking repositories against a real database:
//! - Session creation and fingerprint-window resolution
//! - Page view creation (exit fields start NULL)
//! - Exit recording, including the last-write-wins overwrite
//! - Foreign key enforcement for orphaned page views

use assert_matches::assert_matches;
use sqlx::PgPool;
use uuid::Uuid;

use meridian_db::models::page_view::CreatePageView;
use meridian_db::repositories::{PageViewRepo, SessionRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_page_view(session_id: Uuid, path: &str) -> CreatePageView {
    CreatePageView {
        session_id,
        page_path: path.to_string(),
        locale: "en".to_string(),
        referrer: String::new(),
    }
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_session_and_find_by_id(pool: PgPool) {
    let session = SessionRepo::create(&pool, "fp-alpha").await.unwrap();
    assert_eq!(session.fingerprint, "fp-alpha");

    let found = SessionRepo::find_by_id(&pool, session.id).await.unwrap();
    assert_eq!(found.unwrap().id, session.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_by_id_returns_none_for_unknown_session(pool: PgPool) {
    let found = SessionRepo::find_by_id(&pool, Uuid::new_v4()).await.unwrap();
    assert_matches!(found, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn fingerprint_lookup_respects_window(pool: PgPool) {
    let created = SessionRepo::create(&pool, "fp-window").await.unwrap();

    let hit = SessionRepo::find_recent_by_fingerprint(&pool, "fp-window", 30)
        .await
        .unwrap();
    assert_eq!(hit.unwrap().id, created.id);

    // A zero-minute window excludes everything already created.
    let miss = SessionRepo::find_recent_by_fingerprint(&pool, "fp-window", 0)
        .await
        .unwrap();
    assert_matches!(miss, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn fingerprint_match_is_exact(pool: PgPool) {
    SessionRepo::create(&pool, "fp-Case").await.unwrap();

    let miss = SessionRepo::find_recent_by_fingerprint(&pool, "fp-case", 30)
        .await
        .unwrap();
    assert_matches!(miss, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn most_recent_session_wins(pool: PgPool) {
    SessionRepo::create(&pool, "fp-repeat").await.unwrap();
    let second = SessionRepo::create(&pool, "fp-repeat").await.unwrap();

    let found = SessionRepo::find_recent_by_fingerprint(&pool, "fp-repeat", 30)
        .await
        .unwrap();
    assert_eq!(found.unwrap().id, second.id);
}

// ---------------------------------------------------------------------------
// Page views
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn created_page_view_has_entry_but_no_exit(pool: PgPool) {
    let session = SessionRepo::create(&pool, "fp-views").await.unwrap();

    let page_view = PageViewRepo::create(&pool, &new_page_view(session.id, "/en/about"))
        .await
        .unwrap();

    assert_eq!(page_view.session_id, session.id);
    assert_eq!(page_view.page_path, "/en/about");
    assert_eq!(page_view.locale, "en");
    assert_eq!(page_view.referrer, "");
    assert_matches!(page_view.exit_time, None);
    assert_matches!(page_view.time_on_page_seconds, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn record_exit_sets_exit_fields(pool: PgPool) {
    let session = SessionRepo::create(&pool, "fp-exit").await.unwrap();
    let created = PageViewRepo::create(&pool, &new_page_view(session.id, "/en/pricing"))
        .await
        .unwrap();

    let exited = PageViewRepo::record_exit(&pool, created.id, 42)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(exited.time_on_page_seconds, Some(42));
    let exit_time = exited.exit_time.unwrap();
    assert!(exit_time >= exited.entry_time);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn repeated_exit_overwrites_previous_value(pool: PgPool) {
    let session = SessionRepo::create(&pool, "fp-double-exit").await.unwrap();
    let created = PageViewRepo::create(&pool, &new_page_view(session.id, "/en/blog"))
        .await
        .unwrap();

    PageViewRepo::record_exit(&pool, created.id, 42)
        .await
        .unwrap()
        .unwrap();
    let second = PageViewRepo::record_exit(&pool, created.id, 99)
        .await
        .unwrap()
        .unwrap();

    // Last exit wins; the first recorded duration is discarded.
    assert_eq!(second.time_on_page_seconds, Some(99));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn record_exit_returns_none_for_unknown_page_view(pool: PgPool) {
    let result = PageViewRepo::record_exit(&pool, Uuid::new_v4(), 5)
        .await
        .unwrap();
    assert_matches!(result, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn orphaned_page_view_insert_violates_foreign_key(pool: PgPool) {
    let err = PageViewRepo::create(&pool, &new_page_view(Uuid::new_v4(), "/en/contact"))
        .await
        .unwrap_err();

    match err {
        sqlx::Error::Database(db_err) => {
            // PostgreSQL foreign key violation.
            assert_eq!(db_err.code().as_deref(), Some("23503"));
            assert_eq!(db_err.constraint(), Some("fk_page_views_session"));
        }
        other => panic!("Expected a database error, got: {other:?}"),
    }
}
