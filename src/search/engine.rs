use crate::error::AppError;
use crate::models::Book;
use crate::store::BookStore;

use super::ranking::rank_by_relevance;

/// Resolve a search query against the store / 执行图书搜索
///
/// Tries full-text first; only an execution error on that path triggers the
/// substring fallback. Fallback failures are internal errors.
pub async fn search_books(store: &dyn BookStore, query: &str) -> Result<Vec<Book>, AppError> {
    if query.is_empty() {
        return Err(AppError::validation("search query parameter 'q' is required"));
    }

    match store.search_full_text(query).await {
        Ok(books) => return Ok(books),
        Err(e) => {
            tracing::debug!("Full-text search unavailable, falling back to pattern match: {}", e);
        }
    }

    let hits = store.search_pattern(query).await?;
    Ok(rank_by_relevance(hits, query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::NewBook;
    use crate::store::SqliteBookStore;

    async fn seeded(full_text: bool) -> SqliteBookStore {
        let pool = db::test_support::memory_pool().await;
        db::run_migrations(&pool, full_text).await.unwrap();
        let store = SqliteBookStore::new(pool);
        for (title, author, year) in [
            ("Children of Dune", "Frank Herbert", 1976),
            ("Dune Messiah", "Frank Herbert", 1969),
            ("Dune", "Frank Herbert", 1965),
            ("Emma", "Jane Austen", 1815),
            ("Sand Planet Notes", "Dune Society", 2001),
        ] {
            store
                .create(&NewBook { title: title.into(), author: author.into(), year })
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_empty_query_is_validation_error() {
        let store = seeded(false).await;
        assert!(matches!(search_books(&store, "").await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_fallback_ranks_exact_title_first() {
        let store = seeded(false).await;
        let titles: Vec<String> = search_books(&store, "dune").await.unwrap().into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["Dune", "Dune Messiah", "Children of Dune", "Sand Planet Notes"]);
    }

    #[tokio::test]
    async fn test_fallback_matches_year_text() {
        let store = seeded(false).await;
        let hits = search_books(&store, "1815").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Emma");
    }

    #[tokio::test]
    async fn test_no_match_is_empty_not_error() {
        let store = seeded(false).await;
        assert!(search_books(&store, "tolkien").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_primary_empty_result_does_not_fall_back() {
        let store = seeded(true).await;
        // Year is not in the full-text index, and an empty primary answer is final
        assert!(search_books(&store, "1815").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_query_falls_back_to_pattern() {
        let store = seeded(false).await;
        let titles: Vec<String> = search_books(&store, " ").await.unwrap().into_iter().map(|b| b.title).collect();
        // Space in the title ranks ahead of space in the author only
        assert_eq!(titles, vec!["Children of Dune", "Dune Messiah", "Sand Planet Notes", "Dune", "Emma"]);

        // Same answer when the index exists: no terms means the primary cannot run
        let store = seeded(true).await;
        assert_eq!(search_books(&store, " ").await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_fallback_ranks_non_ascii_titles() {
        let store = seeded(false).await;
        for (title, author, year) in [("Über Alles", "Müller", 2003), ("Élan", "Anonyme", 1999)] {
            store
                .create(&NewBook { title: title.into(), author: author.into(), year })
                .await
                .unwrap();
        }

        let hits = search_books(&store, "élan").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Élan");
        assert_eq!(crate::search::relevance_tier(&hits[0], "élan"), 1);

        let hits = search_books(&store, "über").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Über Alles");
    }

    #[tokio::test]
    async fn test_primary_answers_when_index_present() {
        let store = seeded(true).await;
        let hits = search_books(&store, "austen").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Emma");
    }
}
