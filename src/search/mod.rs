//! Search module - two-tier book search / 图书搜索
//!
//! Flow / 流程:
//! - Primary: full-text match through the store, ranked by the engine
//! - Fallback: substring match, ranked by `ranking::relevance_tier` then title
//!
//! The fallback only runs when the primary query fails to execute. An empty
//! primary result is a valid answer.

pub mod engine;
pub mod ranking;
pub mod tokenizer;

pub use engine::search_books;
pub use ranking::{rank_by_relevance, relevance_tier};
