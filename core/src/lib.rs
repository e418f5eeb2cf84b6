//! Client core for the BiteBook catalog service.
//!
//! # Overview
//! Lists books, fetches book detail and retrieves per-page comprehension
//! questions. Two layers share the same URL rules:
//!
//! - `CatalogClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network (host-does-IO).
//! - `Catalog` runs the same operations asynchronously over `HttpTransport`.
//!
//! # Design
//! - The API origin is resolved once (`config::api_base`) and injected into
//!   the client and transport at construction.
//! - Optional query parameters are filtered on presence, so `start=0` is sent.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod query;
pub mod transport;
pub mod types;

pub use catalog::Catalog;
pub use client::CatalogClient;
pub use config::{api_base, resolve_api_base, DEFAULT_API_BASE};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestOptions};
pub use query::QueryBuilder;
pub use transport::HttpTransport;
pub use types::{
    Book, BookFilters, BookId, BookListResponse, BookPatch, NewBook, QuestionFilters,
    QuestionItem, QuestionListResponse, TaskState,
};
