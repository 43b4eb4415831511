use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;

use super::{BookStore, StoreResult};
use crate::error::StoreError;
use crate::models::{Book, NewBook};
use crate::search::tokenizer::{like_pattern, match_expression, matches_folded};
use crate::telemetry::{MutationEvent, MutationObserver, NoopObserver};

const BOOK_COLUMNS: &str = "id, title, author, year, created_at, updated_at";

/// SQLite-backed book store / SQLite 图书存储
#[derive(Clone)]
pub struct SqliteBookStore {
    db: SqlitePool,
    observer: Arc<dyn MutationObserver>,
}

impl SqliteBookStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db, observer: Arc::new(NoopObserver) }
    }

    /// Report mutations to the given observer
    pub fn with_observer(mut self, observer: Arc<dyn MutationObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db
    }
}

#[async_trait]
impl BookStore for SqliteBookStore {
    async fn list_all(&self) -> StoreResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!("SELECT {} FROM books ORDER BY id ASC", BOOK_COLUMNS))
            .fetch_all(&self.db)
            .await?;
        Ok(books)
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<Book> {
        sqlx::query_as::<_, Book>(&format!("SELECT {} FROM books WHERE id = ?", BOOK_COLUMNS))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(StoreError::NotFound { id })
    }

    async fn create(&self, book: &NewBook) -> StoreResult<Book> {
        self.observer.notify(MutationEvent::Created { title: book.title.clone() });

        let now = Utc::now();
        let created = sqlx::query_as::<_, Book>(&format!(
            "INSERT INTO books (title, author, year, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?) RETURNING {}",
            BOOK_COLUMNS
        ))
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.year)
        .bind(now)
        .bind(now)
        .fetch_one(&self.db)
        .await?;

        Ok(created)
    }

    async fn update(&self, id: i64, book: &NewBook) -> StoreResult<Book> {
        self.observer.notify(MutationEvent::Updated { id, title: book.title.clone() });

        sqlx::query_as::<_, Book>(&format!(
            "UPDATE books SET title = ?, author = ?, year = ?, updated_at = ? \
             WHERE id = ? RETURNING {}",
            BOOK_COLUMNS
        ))
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.year)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(StoreError::NotFound { id })
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        self.observer.notify(MutationEvent::Deleted { id });

        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { id });
        }
        Ok(())
    }

    async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    async fn search_full_text(&self, query: &str) -> StoreResult<Vec<Book>> {
        // Whitespace-only input has nothing for MATCH; let the caller fall back
        let expr = match_expression(query).ok_or(StoreError::NoSearchTerms)?;

        let books = sqlx::query_as::<_, Book>(
            "SELECT b.id, b.title, b.author, b.year, b.created_at, b.updated_at \
             FROM books_fts JOIN books b ON b.id = books_fts.rowid \
             WHERE books_fts MATCH ? \
             ORDER BY bm25(books_fts), b.id",
        )
        .bind(expr)
        .fetch_all(&self.db)
        .await?;
        Ok(books)
    }

    async fn search_pattern(&self, query: &str) -> StoreResult<Vec<Book>> {
        // LOWER() and LIKE only fold ASCII
        if !query.is_ascii() {
            let needle = query.to_lowercase();
            let books = self.list_all().await?;
            return Ok(books.into_iter().filter(|book| matches_folded(book, &needle)).collect());
        }

        let pattern = like_pattern(query);

        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books \
             WHERE LOWER(title) LIKE ?1 ESCAPE '\\' \
                OR LOWER(author) LIKE ?1 ESCAPE '\\' \
                OR CAST(year AS TEXT) LIKE ?1 ESCAPE '\\' \
             ORDER BY id ASC",
            BOOK_COLUMNS
        ))
        .bind(pattern)
        .fetch_all(&self.db)
        .await?;
        Ok(books)
    }
}
