//! Question listing command

use anyhow::{Context, Result};
use bitebook_core::{Catalog, QuestionFilters};

/// List a window of a book's questions
pub async fn questions(
    catalog: &Catalog,
    book_id: i64,
    start: Option<i64>,
    limit: Option<i64>,
    json: bool,
) -> Result<()> {
    let filters = QuestionFilters { start, limit };
    let list = catalog
        .fetch_questions(book_id, &filters)
        .await
        .with_context(|| format!("Failed to list questions for book {book_id}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    for question in &list.items {
        let page = question
            .page_number
            .map(|p| format!("p.{p}"))
            .unwrap_or_else(|| "-".to_string());
        println!("{:>5}  [{}] {}", question.id, page, question.text);
        if let Some(explanation) = &question.explanation {
            println!("       > {}", explanation);
        }
    }
    println!("{}", window_summary(list.start, list.items.len(), list.total));

    Ok(())
}

fn window_summary(start: i64, shown: usize, total: i64) -> String {
    let end = start.saturating_add(i64::try_from(shown).unwrap_or(i64::MAX));
    format!("{start}..{end} of {total} questions")
}
