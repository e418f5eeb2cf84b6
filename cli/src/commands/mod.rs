//! CLI command implementations

mod books;
mod questions;

pub use books::{book, books};
pub use questions::questions;
