//! Relevance ordering for fallback results / 回退搜索的相关度排序

use crate::models::Book;

/// Relevance tier of a fallback hit, lower is better.
///
/// 1: title equals the query, 2: title starts with it, 3: title contains it,
/// 4: anything else (matched on author or year). Case-insensitive.
pub fn relevance_tier(book: &Book, query: &str) -> u8 {
    let title = book.title.to_lowercase();
    let query = query.to_lowercase();

    if title == query {
        1
    } else if title.starts_with(&query) {
        2
    } else if title.contains(&query) {
        3
    } else {
        4
    }
}

/// Sort by tier ascending, then by title
pub fn rank_by_relevance(mut books: Vec<Book>, query: &str) -> Vec<Book> {
    books.sort_by_cached_key(|book| (relevance_tier(book, query), book.title.clone()));
    books
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn book(id: i64, title: &str, author: &str, year: i64) -> Book {
        let now = Utc::now();
        Book {
            id,
            title: title.to_string(),
            author: author.to_string(),
            year,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_relevance_tier() {
        assert_eq!(relevance_tier(&book(1, "Dune", "Herbert", 1965), "dune"), 1);
        assert_eq!(relevance_tier(&book(1, "Dune Messiah", "Herbert", 1969), "DUNE"), 2);
        assert_eq!(relevance_tier(&book(1, "Children of Dune", "Herbert", 1976), "dune"), 3);
        assert_eq!(relevance_tier(&book(1, "Emma", "Dune Fan", 1815), "dune"), 4);
    }

    #[test]
    fn test_rank_by_relevance() {
        let books = vec![
            book(1, "Zen", "Dune Author", 2000),
            book(2, "Children of Dune", "Herbert", 1976),
            book(3, "Dune Messiah", "Herbert", 1969),
            book(4, "Dune", "Herbert", 1965),
            book(5, "Attack of Dune", "Herbert", 1990),
            book(6, "Alpha", "Dune Author", 2001),
        ];
        let titles: Vec<String> = rank_by_relevance(books, "dune").into_iter().map(|b| b.title).collect();
        assert_eq!(
            titles,
            vec!["Dune", "Dune Messiah", "Attack of Dune", "Children of Dune", "Alpha", "Zen"]
        );
    }
}
