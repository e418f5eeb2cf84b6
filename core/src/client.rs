//! Stateless HTTP request builder and response parser for the catalog API.
//!
//! # Design
//! `CatalogClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the actual HTTP round trip.
//!
//! The `*_path` functions are shared with the async `Catalog`, so both layers
//! address the same URLs.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestOptions};
use crate::query::QueryBuilder;
use crate::types::{
    Book, BookFilters, BookId, BookListResponse, BookPatch, NewBook, QuestionFilters,
    QuestionListResponse,
};

/// `/api/books/` plus `q`, `page`, `page_size` in that order.
pub fn books_path(filters: &BookFilters) -> String {
    let query = QueryBuilder::new()
        .text("q", filters.q.as_deref())
        .number("page", filters.page)
        .number("page_size", filters.page_size)
        .build();
    format!("/api/books/{query}")
}

/// `/api/books/<id>`; the id is a path segment, not a query value.
pub fn book_path(id: BookId) -> String {
    format!("/api/books/{id}")
}

/// `/api/books/<book_id>/questions` plus `start`, `limit` in that order.
pub fn questions_path(book_id: BookId, filters: &QuestionFilters) -> String {
    let query = QueryBuilder::new()
        .number("start", filters.start)
        .number("limit", filters.limit)
        .build();
    format!("/api/books/{book_id}/questions{query}")
}

/// Synchronous, stateless client for the catalog API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_books(&self, filters: &BookFilters) -> HttpRequest {
        HttpRequest::new(&self.base_url, &books_path(filters), RequestOptions::default())
    }

    pub fn build_get_book(&self, id: BookId) -> HttpRequest {
        HttpRequest::new(&self.base_url, &book_path(id), RequestOptions::default())
    }

    pub fn build_list_questions(&self, book_id: BookId, filters: &QuestionFilters) -> HttpRequest {
        HttpRequest::new(
            &self.base_url,
            &questions_path(book_id, filters),
            RequestOptions::default(),
        )
    }

    pub fn build_create_book(&self, input: &NewBook) -> Result<HttpRequest, ApiError> {
        let options = json_options(HttpMethod::Post, input)?;
        Ok(HttpRequest::new(&self.base_url, &books_path(&BookFilters::default()), options))
    }

    pub fn build_update_book(&self, id: BookId, input: &BookPatch) -> Result<HttpRequest, ApiError> {
        let options = json_options(HttpMethod::Put, input)?;
        Ok(HttpRequest::new(&self.base_url, &book_path(id), options))
    }

    pub fn build_delete_book(&self, id: BookId) -> HttpRequest {
        let options = RequestOptions::default().method(HttpMethod::Delete);
        HttpRequest::new(&self.base_url, &book_path(id), options)
    }

    pub fn parse_list_books(&self, response: HttpResponse) -> Result<BookListResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_book(&self, response: HttpResponse) -> Result<Book, ApiError> {
        parse_json(response)
    }

    pub fn parse_list_questions(
        &self,
        response: HttpResponse,
    ) -> Result<QuestionListResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_create_book(&self, response: HttpResponse) -> Result<Book, ApiError> {
        parse_json(response)
    }

    pub fn parse_update_book(&self, response: HttpResponse) -> Result<Book, ApiError> {
        parse_json(response)
    }

    pub fn parse_delete_book(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

/// Serialize `input` as the JSON body of a request using `method`.
pub(crate) fn json_options<T: serde::Serialize>(
    method: HttpMethod,
    input: &T,
) -> Result<RequestOptions, ApiError> {
    let body = serde_json::to_string(input).map_err(ApiError::Serialization)?;
    Ok(RequestOptions::default().method(method).body(body))
}

/// Map any status outside 200..=299 to `ApiError::Status`, ignoring the body.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Status {
        status: response.status,
    })
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(ApiError::Deserialization)
}
