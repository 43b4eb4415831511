use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Persisted book record / 图书记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub year: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client supplied book payload, every field optional / 客户端提交的图书数据
///
/// Empty strings and a zero year count as "not provided", same as a missing key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct BookDraft {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub year: Option<i64>,
}

/// Validated book fields, the only shape the store accepts / 已校验的图书字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: i64,
}

impl BookDraft {
    fn usable_title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    fn usable_author(&self) -> Option<&str> {
        self.author.as_deref().filter(|a| !a.is_empty())
    }

    fn usable_year(&self) -> Option<i64> {
        // TODO: year 0 doubles as "absent"; switch to a tri-state field if the API ever needs year 0
        self.year.filter(|y| *y != 0)
    }

    /// Full validation for create / replace. Returns None if any field is missing.
    pub fn validate(&self) -> Option<NewBook> {
        Some(NewBook {
            title: self.usable_title()?.to_string(),
            author: self.usable_author()?.to_string(),
            year: self.usable_year()?,
        })
    }

    /// Overlay the usable fields onto an existing record.
    ///
    /// Returns None when the draft carries nothing usable, meaning no write is needed.
    pub fn merge_into(&self, existing: &Book) -> Option<NewBook> {
        let title = self.usable_title();
        let author = self.usable_author();
        let year = self.usable_year();

        if title.is_none() && author.is_none() && year.is_none() {
            return None;
        }

        Some(NewBook {
            title: title.unwrap_or(&existing.title).to_string(),
            author: author.unwrap_or(&existing.author).to_string(),
            year: year.unwrap_or(existing.year),
        })
    }
}

impl From<&Book> for NewBook {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.year,
        }
    }
}
