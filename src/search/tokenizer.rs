//! Query text helpers / 查询文本处理
//!
//! Turns raw user input into either an FTS5 match expression or a LIKE
//! pattern. Neither output lets the user reach query syntax.

use crate::models::Book;

/// Build an FTS5 expression: every whitespace-separated term quoted, joined with AND.
///
/// Returns None when the query has no terms.
pub fn match_expression(query: &str) -> Option<String> {
    let terms: Vec<String> = query
        .split_whitespace()
        .map(|term| format!("\"{}\"", term.replace('"', "\"\"")))
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" AND "))
    }
}

/// Lowercased `%query%` pattern for `LIKE ... ESCAPE '\'`
pub fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Unicode case-insensitive substring test over title, author and year.
///
/// `needle` must already be lowercased.
pub fn matches_folded(book: &Book, needle: &str) -> bool {
    book.title.to_lowercase().contains(needle)
        || book.author.to_lowercase().contains(needle)
        || book.year.to_string().contains(needle)
}
