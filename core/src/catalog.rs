//! Async resource fetchers.
//!
//! Each fetcher is one path from `client` plus one `HttpTransport` call.
//! Nothing is validated locally: negative pages or oversized limits go to
//! the server as given, and whatever it answers is surfaced.

use tracing::instrument;

use crate::client::{book_path, books_path, json_options, questions_path};
use crate::config::api_base;
use crate::error::ApiError;
use crate::http::{HttpMethod, RequestOptions};
use crate::transport::HttpTransport;
use crate::types::{
    Book, BookFilters, BookId, BookListResponse, BookPatch, NewBook, QuestionFilters,
    QuestionListResponse,
};

/// Typed entry point for views. Cheap to clone; clones share one pool.
#[derive(Debug, Clone)]
pub struct Catalog {
    transport: HttpTransport,
}

impl Catalog {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self::with_transport(HttpTransport::new(base_url)?))
    }

    /// Use the process-wide origin from `BITEBOOK_API_BASE`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(api_base())
    }

    pub fn with_transport(transport: HttpTransport) -> Self {
        Self { transport }
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// `GET /api/books/?q=&page=&page_size=`
    #[instrument(skip(self))]
    pub async fn fetch_books(&self, filters: &BookFilters) -> Result<BookListResponse, ApiError> {
        self.transport
            .request(&books_path(filters), RequestOptions::default())
            .await
    }

    /// `GET /api/books/<id>`
    #[instrument(skip(self))]
    pub async fn fetch_book(&self, id: BookId) -> Result<Book, ApiError> {
        self.transport
            .request(&book_path(id), RequestOptions::default())
            .await
    }

    /// `GET /api/books/<book_id>/questions?start=&limit=`
    #[instrument(skip(self))]
    pub async fn fetch_questions(
        &self,
        book_id: BookId,
        filters: &QuestionFilters,
    ) -> Result<QuestionListResponse, ApiError> {
        self.transport
            .request(&questions_path(book_id, filters), RequestOptions::default())
            .await
    }

    /// `POST /api/books/`
    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create_book(&self, input: &NewBook) -> Result<Book, ApiError> {
        let options = json_options(HttpMethod::Post, input)?;
        self.transport
            .request(&books_path(&BookFilters::default()), options)
            .await
    }

    /// `PUT /api/books/<id>`
    #[instrument(skip(self, input))]
    pub async fn update_book(&self, id: BookId, input: &BookPatch) -> Result<Book, ApiError> {
        let options = json_options(HttpMethod::Put, input)?;
        self.transport.request(&book_path(id), options).await
    }

    /// `DELETE /api/books/<id>`
    #[instrument(skip(self))]
    pub async fn delete_book(&self, id: BookId) -> Result<(), ApiError> {
        let options = RequestOptions::default().method(HttpMethod::Delete);
        self.transport.request_no_content(&book_path(id), options).await
    }
}
