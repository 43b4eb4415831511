//! Record store - persistence primitives for books / 图书存储
//!
//! The store only exposes primitive operations. Validation happens before a
//! value reaches the store, and search flow control (fallback, ranking) lives
//! in the `search` module.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{Book, NewBook};

pub mod sqlite;

pub use sqlite::SqliteBookStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Book persistence interface / 图书存储接口
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books ordered by ascending id
    async fn list_all(&self) -> StoreResult<Vec<Book>>;

    async fn get_by_id(&self, id: i64) -> StoreResult<Book>;

    /// Insert a book, assigning id and timestamps
    async fn create(&self, book: &NewBook) -> StoreResult<Book>;

    /// Replace title, author and year. Keeps id and created_at, refreshes updated_at.
    async fn update(&self, id: i64, book: &NewBook) -> StoreResult<Book>;

    async fn delete(&self, id: i64) -> StoreResult<()>;

    async fn count(&self) -> StoreResult<i64>;

    /// Full-text match over title and author, best match first.
    ///
    /// Errors when the engine cannot run the query (e.g. the index is missing);
    /// callers treat that as "use the fallback", not as a user-facing failure.
    async fn search_full_text(&self, query: &str) -> StoreResult<Vec<Book>>;

    /// Case-insensitive substring match on title, author or year, unordered.
    async fn search_pattern(&self, query: &str) -> StoreResult<Vec<Book>>;
}
