//! Domain DTOs for the catalog API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch schema drift between the two crates.
//!
//! Every optional field is `Option<T>` with `#[serde(default)]`, so a field
//! that is absent and one that is `null` both decode to `None`. `BookPatch`
//! is the exception: it has to tell the two apart.

use serde::{Deserialize, Serialize};

/// Server-assigned book identifier.
pub type BookId = i64;

/// A catalog entry returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub published_year: Option<i32>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub preview_images: Option<Vec<String>>,
    /// Free-form ingestion status reported by the backend.
    #[serde(default)]
    pub task_status: Option<String>,
    #[serde(default)]
    pub processed_pages: Option<i64>,
}

impl Book {
    /// Classify `task_status` into a known ingestion state.
    pub fn task_state(&self) -> Option<TaskState> {
        self.task_status.as_deref().map(TaskState::parse)
    }

    /// Preview image URLs, empty when the server sent none.
    pub fn preview_images(&self) -> &[String] {
        self.preview_images.as_deref().unwrap_or_default()
    }
}

/// Background ingestion state of a book's uploaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskState {
    Queued,
    Running,
    Done,
    Failed,
    Other(String),
}

impl TaskState {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "queued" => TaskState::Queued,
            "running" => TaskState::Running,
            "done" => TaskState::Done,
            "failed" => TaskState::Failed,
            _ => TaskState::Other(raw.to_string()),
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, TaskState::Done | TaskState::Failed)
    }
}

/// One page of the book listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookListResponse {
    pub items: Vec<Book>,
    /// Number of matching records on the server; may exceed `items.len()`.
    pub total: i64,
    /// 1-based page index.
    pub page: i64,
    pub page_size: i64,
}

/// A comprehension question attached to a book, optionally to one page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionItem {
    pub id: i64,
    pub book_id: BookId,
    #[serde(default)]
    pub doc_text_id: Option<i64>,
    #[serde(default)]
    pub page_number: Option<i64>,
    pub text: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// One window of a book's questions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionListResponse {
    pub items: Vec<QuestionItem>,
    pub total: i64,
    /// 0-based offset used for the request.
    pub start: i64,
    pub limit: i64,
}

/// Filters for the book listing. Unset fields are left to server defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BookFilters {
    pub q: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Window for a book's question listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QuestionFilters {
    pub start: Option<i64>,
    pub limit: Option<i64>,
}

/// Request payload for creating a book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
}

/// Request payload for updating a book. Only the fields present in the JSON
/// are applied; omitted fields remain unchanged on the server.
///
/// The nullable fields are double options: `None` leaves the field out of the
/// body, `Some(None)` sends `null` and clears it, `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub description: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub published_year: Option<Option<i32>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub isbn: Option<Option<String>>,
}

// A present key, even `null`, is `Some`; a missing key falls back to `default`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
