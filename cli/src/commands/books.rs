//! Book listing and detail commands

use anyhow::{Context, Result};
use bitebook_core::{Book, BookFilters, Catalog};

/// List one page of books
pub async fn books(
    catalog: &Catalog,
    q: Option<String>,
    page: Option<i64>,
    page_size: Option<i64>,
    json: bool,
) -> Result<()> {
    let filters = BookFilters { q, page, page_size };
    let list = catalog
        .fetch_books(&filters)
        .await
        .context("Failed to list books")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    for book in &list.items {
        let year = book
            .published_year
            .map(|y| format!(" ({y})"))
            .unwrap_or_default();
        println!("{:>5}  {} - {}{}", book.id, book.title, book.author, year);
    }
    println!(
        "page {} / size {} / {} of {} books",
        list.page,
        list.page_size,
        list.items.len(),
        list.total
    );

    Ok(())
}

/// Show a single book
pub async fn book(catalog: &Catalog, id: i64, json: bool) -> Result<()> {
    let book = catalog
        .fetch_book(id)
        .await
        .with_context(|| format!("Failed to fetch book {id}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&book)?);
    } else {
        print_book(&book);
    }

    Ok(())
}

fn print_book(book: &Book) {
    println!("Id:          {}", book.id);
    println!("Title:       {}", book.title);
    println!("Author:      {}", book.author);
    if let Some(year) = book.published_year {
        println!("Published:   {}", year);
    }
    if let Some(isbn) = &book.isbn {
        println!("ISBN:        {}", isbn);
    }
    if let Some(desc) = &book.description {
        println!("Description: {}", desc);
    }
    if let Some(summary) = &book.summary {
        println!("Summary:     {}", summary);
    }
    if let Some(cover) = &book.cover_url {
        println!("Cover:       {}", cover);
    }
    if !book.preview_images().is_empty() {
        println!("Previews:    {}", book.preview_images().len());
    }
    if let Some(status) = &book.task_status {
        let pages = book
            .processed_pages
            .map(|p| format!(", {p} pages processed"))
            .unwrap_or_default();
        println!("Ingestion:   {}{}", status, pages);
    }
}
