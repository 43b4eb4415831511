use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Open the connection pool, creating the database file if needed / 打开数据库连接池
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("invalid database url: {}", database_url))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect_with(options)
        .await
        .with_context(|| format!("failed to connect to {}", database_url))?;

    Ok(pool)
}

/// Run database migrations / 运行数据库迁移
///
/// `full_text` controls the FTS5 index. When it cannot be created the service
/// keeps running and search uses the pattern fallback.
pub async fn run_migrations(pool: &SqlitePool, full_text: bool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            year INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .context("failed to create table 'books'")?;

    tracing::info!("Table 'books' ready");

    if full_text {
        match create_full_text_index(pool).await {
            Ok(()) => tracing::info!("Full-text index 'books_fts' ready"),
            Err(e) => tracing::warn!("Full-text index unavailable, search will use pattern matching: {:#}", e),
        }
    } else {
        drop_full_text_index(pool).await?;
    }

    Ok(())
}

async fn create_full_text_index(pool: &SqlitePool) -> Result<()> {
    let statements = [
        r#"
        CREATE VIRTUAL TABLE IF NOT EXISTS books_fts USING fts5(
            title, author,
            content='books', content_rowid='id',
            tokenize='porter unicode61'
        )
        "#,
        r#"
        CREATE TRIGGER IF NOT EXISTS books_fts_ai AFTER INSERT ON books BEGIN
            INSERT INTO books_fts(rowid, title, author) VALUES (new.id, new.title, new.author);
        END
        "#,
        r#"
        CREATE TRIGGER IF NOT EXISTS books_fts_ad AFTER DELETE ON books BEGIN
            INSERT INTO books_fts(books_fts, rowid, title, author) VALUES ('delete', old.id, old.title, old.author);
        END
        "#,
        r#"
        CREATE TRIGGER IF NOT EXISTS books_fts_au AFTER UPDATE ON books BEGIN
            INSERT INTO books_fts(books_fts, rowid, title, author) VALUES ('delete', old.id, old.title, old.author);
            INSERT INTO books_fts(rowid, title, author) VALUES (new.id, new.title, new.author);
        END
        "#,
        // Pick up rows written while the index was disabled
        "INSERT INTO books_fts(books_fts) VALUES ('rebuild')",
    ];

    for sql in statements {
        sqlx::query(sql).execute(pool).await?;
    }
    Ok(())
}

async fn drop_full_text_index(pool: &SqlitePool) -> Result<()> {
    for sql in [
        "DROP TRIGGER IF EXISTS books_fts_ai",
        "DROP TRIGGER IF EXISTS books_fts_ad",
        "DROP TRIGGER IF EXISTS books_fts_au",
        "DROP TABLE IF EXISTS books_fts",
    ] {
        sqlx::query(sql)
            .execute(pool)
            .await
            .context("failed to drop full-text index")?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Single-connection in-memory pool; more connections would each see their own database.
    pub(crate) async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = test_support::memory_pool().await;
        run_migrations(&pool, true).await.unwrap();
        run_migrations(&pool, true).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books").fetch_one(&pool).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_disabling_full_text_drops_index() {
        let pool = test_support::memory_pool().await;
        run_migrations(&pool, true).await.unwrap();
        run_migrations(&pool, false).await.unwrap();

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE name LIKE 'books_fts%'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(tables, 0);
    }

    #[tokio::test]
    async fn test_connect_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.db");
        let pool = connect(&format!("sqlite:{}", path.display()), 2).await.unwrap();
        run_migrations(&pool, false).await.unwrap();
        assert!(path.exists());
        pool.close().await;
    }
}
