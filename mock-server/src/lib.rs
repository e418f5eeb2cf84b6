//! In-memory BiteBook catalog server.
//!
//! Serves the routes the client consumes, with the same defaults and error
//! shapes as the real backend: `page=1`, `page_size=20`, `start=0`,
//! `limit=20`, and `{"detail": "..."}` bodies on 4xx.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;

const DEFAULT_PAGE_SIZE: i64 = 20;
const DEFAULT_LIMIT: i64 = 20;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub published_year: Option<i32>,
    pub isbn: Option<String>,
    pub cover_url: Option<String>,
    pub preview_images: Option<Vec<String>>,
    pub task_status: Option<String>,
    pub processed_pages: Option<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub book_id: i64,
    pub doc_text_id: Option<i64>,
    pub page_number: Option<i64>,
    pub text: String,
    pub explanation: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookList {
    pub items: Vec<Book>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionList {
    pub items: Vec<Question>,
    pub total: i64,
    pub start: i64,
    pub limit: i64,
}

#[derive(Deserialize)]
pub struct CreateBook {
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub published_year: Option<i32>,
    pub isbn: Option<String>,
}

/// Partial update. A nullable field sent as `null` is `Some(None)` and clears
/// the stored value; a missing key is `None` and leaves it alone.
#[derive(Deserialize)]
pub struct UpdateBook {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub published_year: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub isbn: Option<Option<String>>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
pub struct ListBooks {
    pub q: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Deserialize)]
pub struct ListQuestions {
    pub start: Option<i64>,
    pub limit: Option<i64>,
}

/// Books and questions held by one server instance.
#[derive(Debug, Default)]
pub struct Library {
    books: BTreeMap<i64, Book>,
    questions: Vec<Question>,
    next_book_id: i64,
    next_question_id: i64,
}

impl Library {
    pub fn new() -> Self {
        Self {
            next_book_id: 1,
            next_question_id: 1,
            ..Default::default()
        }
    }

    /// The ten sample books plus a few questions on the first and eighth.
    pub fn seeded() -> Self {
        let mut library = Self::new();
        let samples = [
            ("The Little Prince", "Antoine de Saint-Exupéry", 1943, "A pilot meets a prince from another planet."),
            ("Alice's Adventures in Wonderland", "Lewis Carroll", 1865, "Alice falls into a fantastical world."),
            ("Peter Pan", "J. M. Barrie", 1911, "A boy who never grows up."),
            ("Charlotte's Web", "E. B. White", 1952, "Friendship between a pig and a spider."),
            ("Winnie-the-Pooh", "A. A. Milne", 1926, "Adventures in the Hundred Acre Wood."),
            ("The Secret Garden", "Frances Hodgson Burnett", 1911, "A hidden garden transforms lives."),
            ("Pippi Longstocking", "Astrid Lindgren", 1945, "The strongest girl in the world."),
            ("Matilda", "Roald Dahl", 1988, "A brilliant girl with telekinetic powers."),
            ("The Lion, the Witch and the Wardrobe", "C. S. Lewis", 1950, "Children enter the world of Narnia."),
            ("Harry Potter and the Philosopher's Stone", "J. K. Rowling", 1997, "A boy discovers he is a wizard."),
        ];
        for (title, author, year, description) in samples {
            library.insert_book(CreateBook {
                title: title.to_string(),
                author: author.to_string(),
                description: Some(description.to_string()),
                published_year: Some(year),
                isbn: None,
            });
        }

        let questions = [
            (1, Some(1), Some(1), "What does the narrator draw when he is six years old?", Some("A boa constrictor digesting an elephant.")),
            (1, Some(4), Some(4), "Which asteroid does the little prince come from?", None),
            (1, None, None, "Why does the fox ask to be tamed?", None),
            (8, Some(12), Some(12), "What does Matilda read at the library?", None),
            (8, Some(30), Some(30), "How does Matilda first show her powers?", Some("She tips over a glass of water.")),
        ];
        for (book_id, doc_text_id, page_number, text, explanation) in questions {
            library.insert_question(book_id, doc_text_id, page_number, text, explanation);
        }
        library
    }

    pub fn insert_book(&mut self, input: CreateBook) -> Book {
        let book = Book {
            id: self.next_book_id,
            title: input.title,
            author: input.author,
            description: input.description,
            summary: None,
            published_year: input.published_year,
            isbn: input.isbn,
            cover_url: None,
            preview_images: None,
            task_status: None,
            processed_pages: None,
        };
        self.next_book_id += 1;
        self.books.insert(book.id, book.clone());
        book
    }

    pub fn insert_question(
        &mut self,
        book_id: i64,
        doc_text_id: Option<i64>,
        page_number: Option<i64>,
        text: &str,
        explanation: Option<&str>,
    ) -> Question {
        let question = Question {
            id: self.next_question_id,
            book_id,
            doc_text_id,
            page_number,
            text: text.to_string(),
            explanation: explanation.map(str::to_string),
        };
        self.next_question_id += 1;
        self.questions.push(question.clone());
        question
    }

    fn isbn_taken(&self, isbn: &str, except: Option<i64>) -> bool {
        self.books
            .values()
            .any(|b| b.isbn.as_deref() == Some(isbn) && Some(b.id) != except)
    }
}

pub type Db = Arc<RwLock<Library>>;

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

fn detail(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "detail": message })))
}

/// Router over the seeded sample library.
pub fn app() -> Router {
    app_with(Library::seeded())
}

pub fn app_with(library: Library) -> Router {
    let db: Db = Arc::new(RwLock::new(library));
    Router::new()
        .route("/api/books/", get(list_books).post(create_book))
        .route(
            "/api/books/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .route("/api/books/{id}/questions", get(list_questions))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn matches_query(book: &Book, needle: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(needle);
    contains(&book.title)
        || contains(&book.author)
        || book.isbn.as_deref().is_some_and(contains)
}

async fn list_books(State(db): State<Db>, Query(params): Query<ListBooks>) -> Json<BookList> {
    let page = params.page.unwrap_or(1);
    let page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    let needle = params
        .q
        .filter(|q| !q.is_empty())
        .map(|q| q.to_lowercase());

    let library = db.read().await;
    let matching: Vec<&Book> = library
        .books
        .values()
        .filter(|b| needle.as_deref().map_or(true, |n| matches_query(b, n)))
        .collect();

    // A page below 1 is echoed back as sent but reads from the first item.
    let offset = (page.saturating_sub(1)).saturating_mul(page_size).max(0) as usize;
    let items = matching
        .iter()
        .skip(offset)
        .take(page_size.max(0) as usize)
        .map(|b| (*b).clone())
        .collect();

    Json(BookList {
        items,
        total: matching.len() as i64,
        page,
        page_size,
    })
}

async fn create_book(
    State(db): State<Db>,
    Json(input): Json<CreateBook>,
) -> ApiResult<(StatusCode, Json<Book>)> {
    let mut library = db.write().await;
    let new_isbn = input.isbn.as_deref();
    if let Some(isbn) = new_isbn.filter(|i| !i.is_empty()) {
        if library.isbn_taken(isbn, None) {
            return Err(detail(StatusCode::BAD_REQUEST, "ISBN already exists"));
        }
    }
    let book = library.insert_book(input);
    tracing::info!(id = book.id, title = %book.title, "book created");
    Ok((StatusCode::CREATED, Json(book)))
}

async fn get_book(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult<Json<Book>> {
    let library = db.read().await;
    library
        .books
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Book not found"))
}

async fn update_book(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateBook>,
) -> ApiResult<Json<Book>> {
    let mut library = db.write().await;
    if !library.books.contains_key(&id) {
        return Err(detail(StatusCode::NOT_FOUND, "Book not found"));
    }
    let new_isbn = input.isbn.as_ref().and_then(|i| i.as_deref());
    if let Some(isbn) = new_isbn.filter(|i| !i.is_empty()) {
        if library.isbn_taken(isbn, Some(id)) {
            return Err(detail(StatusCode::BAD_REQUEST, "ISBN already exists"));
        }
    }
    let book = library
        .books
        .get_mut(&id)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Book not found"))?;
    if let Some(title) = input.title {
        book.title = title;
    }
    if let Some(author) = input.author {
        book.author = author;
    }
    if let Some(description) = input.description {
        book.description = description;
    }
    if let Some(year) = input.published_year {
        book.published_year = year;
    }
    if let Some(isbn) = input.isbn {
        book.isbn = isbn;
    }
    Ok(Json(book.clone()))
}

async fn delete_book(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    let mut library = db.write().await;
    library
        .books
        .remove(&id)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Book not found"))?;
    library.questions.retain(|q| q.book_id != id);
    Ok(StatusCode::NO_CONTENT)
}

async fn list_questions(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Query(params): Query<ListQuestions>,
) -> ApiResult<Json<QuestionList>> {
    let start = params.start.unwrap_or(0);
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);

    let library = db.read().await;
    if !library.books.contains_key(&id) {
        return Err(detail(StatusCode::NOT_FOUND, "Book not found"));
    }
    let for_book: Vec<&Question> = library.questions.iter().filter(|q| q.book_id == id).collect();
    let items = for_book
        .iter()
        .skip(start.max(0) as usize)
        .take(limit.max(0) as usize)
        .map(|q| (*q).clone())
        .collect();

    Ok(Json(QuestionList {
        items,
        total: for_book.len() as i64,
        start,
        limit,
    }))
}
