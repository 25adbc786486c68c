//! Database layer: migrations, queries, and cursor management.

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;

use crate::errors::Result;
use crate::events::{CourseEvent, CourseProgress, EventKind, EventRecord};

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    // Make sure the file is created if it doesn't exist yet.
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };
    let url = if url.contains('?') || url.contains(":memory:") {
        url
    } else {
        format!("{url}?mode=rwc")
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await?;

    migrate(&pool).await?;
    Ok(pool)
}

/// Apply the embedded migrations to `pool`.
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied successfully");
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Cursor helpers
// ─────────────────────────────────────────────────────────

/// Read the last-seen ledger from the cursor row.
/// Returns `0` when no cursor has been persisted yet.
pub async fn get_last_ledger(pool: &SqlitePool) -> Result<i64> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT last_ledger FROM indexer_cursor WHERE id = 1")
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(v,)| v).unwrap_or(0))
}

/// Persist the last-seen ledger (and optionally a pagination cursor string).
pub async fn save_cursor(
    pool: &SqlitePool,
    last_ledger: i64,
    last_cursor: Option<&str>,
) -> Result<()> {
    sqlx::query("UPDATE indexer_cursor SET last_ledger = ?1, last_cursor = ?2 WHERE id = 1")
        .bind(last_ledger)
        .bind(last_cursor)
        .execute(pool)
        .await?;
    Ok(())
}

/// Read back the raw cursor string (used to resume pagination mid-ledger).
pub async fn get_cursor_string(pool: &SqlitePool) -> Result<Option<String>> {
    let row: Option<(Option<String>,)> =
        sqlx::query_as("SELECT last_cursor FROM indexer_cursor WHERE id = 1")
            .fetch_optional(pool)
            .await?;
    Ok(row.and_then(|(v,)| v))
}

// ─────────────────────────────────────────────────────────
// Event writes
// ─────────────────────────────────────────────────────────

/// Persist a batch of decoded events in one transaction. Events whose RPC
/// `event_id` is already stored are silently ignored, so re-polling a ledger
/// range is harmless.
pub async fn insert_events(pool: &SqlitePool, events: &[CourseEvent]) -> Result<usize> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;
    for ev in events {
        let rows_affected = sqlx::query(
            r#"
            INSERT OR IGNORE INTO events
                (event_id, event_type, course_id, actor, amount, token_id,
                 ledger, timestamp, contract_id, tx_hash)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&ev.event_id)
        .bind(&ev.event_type)
        .bind(&ev.course_id)
        .bind(&ev.actor)
        .bind(&ev.amount)
        .bind(&ev.token_id)
        .bind(ev.ledger)
        .bind(ev.timestamp)
        .bind(&ev.contract_id)
        .bind(&ev.tx_hash)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        count += rows_affected as usize;
    }
    tx.commit().await?;
    Ok(count)
}

// ─────────────────────────────────────────────────────────
// Event reads
// ─────────────────────────────────────────────────────────

const SELECT_EVENTS: &str = r#"
    SELECT id, event_id, event_type, course_id, actor, amount, token_id,
           ledger, timestamp, contract_id, tx_hash, created_at
    FROM   events
"#;

/// Fetch all events for a given course, ordered by ledger ascending.
pub async fn get_events_for_course(
    pool: &SqlitePool,
    course_id: &str,
) -> Result<Vec<EventRecord>> {
    let sql = format!("{SELECT_EVENTS} WHERE course_id = ?1 ORDER BY ledger ASC, id ASC");
    let rows = sqlx::query_as::<_, EventRecord>(&sql)
        .bind(course_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Fetch all events, ordered by ledger ascending.
pub async fn get_all_events(pool: &SqlitePool) -> Result<Vec<EventRecord>> {
    let sql = format!("{SELECT_EVENTS} ORDER BY ledger ASC, id ASC");
    let rows = sqlx::query_as::<_, EventRecord>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Project a learner's standing in a course from the indexed events.
///
/// `coins` is the balance carried by the most recent `coin_rewarded` event;
/// `claimed` is set once any certificate event names the learner.
pub async fn get_course_progress(
    pool: &SqlitePool,
    user: &str,
    course_id: &str,
) -> Result<CourseProgress> {
    let balance: Option<(Option<String>,)> = sqlx::query_as(
        r#"
        SELECT amount FROM events
        WHERE  actor = ?1 AND course_id = ?2 AND event_type = ?3
        ORDER  BY ledger DESC, id DESC
        LIMIT  1
        "#,
    )
    .bind(user)
    .bind(course_id)
    .bind(EventKind::CoinRewarded.as_str())
    .fetch_optional(pool)
    .await?;

    let certificate: Option<(Option<String>,)> = sqlx::query_as(
        r#"
        SELECT token_id FROM events
        WHERE  actor = ?1 AND course_id = ?2 AND event_type IN (?3, ?4)
        ORDER  BY ledger ASC, id ASC
        LIMIT  1
        "#,
    )
    .bind(user)
    .bind(course_id)
    .bind(EventKind::CertificateMinted.as_str())
    .bind(EventKind::CertificateClaimed.as_str())
    .fetch_optional(pool)
    .await?;

    let coins = balance
        .and_then(|(amount,)| amount)
        .and_then(|a| a.parse().ok())
        .unwrap_or(0);

    Ok(CourseProgress {
        user: user.to_string(),
        course_id: course_id.to_string(),
        coins,
        claimed: certificate.is_some(),
        token_id: certificate.and_then(|(token_id,)| token_id),
    })
}
