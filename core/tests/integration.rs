//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every client
//! operation over real HTTP twice: once with `CatalogClient` build/parse and
//! ureq as the host, once with the async `Catalog` over `HttpTransport`.

use std::net::SocketAddr;

use bitebook_core::{
    ApiError, BookFilters, BookPatch, Catalog, CatalogClient, HttpMethod, HttpResponse, NewBook,
    QuestionFilters,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data, letting the core client interpret them.
fn execute(req: bitebook_core::HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.url).call(),
        (HttpMethod::Delete, _) => agent.delete(&req.url).call(),
        (HttpMethod::Post, Some(body)) => agent
            .post(&req.url)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Post, None) => agent.post(&req.url).send_empty(),
        (HttpMethod::Put, Some(body)) => agent
            .put(&req.url)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Put, None) => agent.put(&req.url).send_empty(),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

/// Run the mock server on its own runtime in a background thread.
fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

#[test]
fn host_does_io_lifecycle() {
    let addr = start_server();
    let client = CatalogClient::new(&format!("http://{addr}"));

    // Step 1: list with no filters: server defaults apply.
    let req = client.build_list_books(&BookFilters::default());
    let list = client.parse_list_books(execute(req)).unwrap();
    assert_eq!(list.total, 10);
    assert_eq!(list.page, 1);
    assert_eq!(list.page_size, 20);

    // Step 2: search, second page of size one.
    let filters = BookFilters {
        q: Some("lewis".to_string()),
        page: Some(2),
        page_size: Some(1),
    };
    let req = client.build_list_books(&filters);
    let list = client.parse_list_books(execute(req)).unwrap();
    assert_eq!(list.total, 2);
    assert_eq!(list.items.len(), 1);
    assert_eq!(list.items[0].author, "C. S. Lewis");

    // Step 3: detail.
    let req = client.build_get_book(1);
    let book = client.parse_get_book(execute(req)).unwrap();
    assert_eq!(book.title, "The Little Prince");
    assert_eq!(book.published_year, Some(1943));
    assert_eq!(book.cover_url, None);

    // Step 4: questions with an explicit zero start.
    let filters = QuestionFilters {
        start: Some(0),
        limit: Some(2),
    };
    let req = client.build_list_questions(1, &filters);
    let questions = client.parse_list_questions(execute(req)).unwrap();
    assert_eq!(questions.total, 3);
    assert_eq!(questions.items.len(), 2);
    assert_eq!(questions.start, 0);
    assert_eq!(questions.limit, 2);

    // Step 5: create, update, delete.
    let input = NewBook {
        title: "Momo".to_string(),
        author: "Michael Ende".to_string(),
        description: None,
        published_year: None,
        isbn: Some("978-3-522-20205-8".to_string()),
    };
    let req = client.build_create_book(&input).unwrap();
    let created = client.parse_create_book(execute(req)).unwrap();
    assert_eq!(created.title, "Momo");

    let patch = BookPatch {
        published_year: Some(Some(1973)),
        ..Default::default()
    };
    let req = client.build_update_book(created.id, &patch).unwrap();
    let updated = client.parse_update_book(execute(req)).unwrap();
    assert_eq!(updated.published_year, Some(1973));
    assert_eq!(updated.title, "Momo");

    let req = client.build_create_book(&input).unwrap();
    let err = client.parse_create_book(execute(req)).unwrap_err();
    assert_eq!(err.status(), Some(400));

    let req = client.build_delete_book(created.id);
    client.parse_delete_book(execute(req)).unwrap();

    // Step 6: detail after delete: 404 with the bare code as message.
    let req = client.build_get_book(created.id);
    let err = client.parse_get_book(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 404 }));
    assert_eq!(err.to_string(), "404");
}

#[tokio::test]
async fn async_fetchers_against_live_server() {
    let addr = start_server();
    let catalog = Catalog::new(&format!("http://{addr}")).unwrap();

    let filters = BookFilters {
        q: Some("Exupéry".to_string()),
        ..Default::default()
    };
    let list = catalog.fetch_books(&filters).await.unwrap();
    assert_eq!(list.total, 1);
    assert_eq!(list.items[0].id, 1);

    let book = catalog.fetch_book(8).await.unwrap();
    assert_eq!(book.title, "Matilda");

    let questions = catalog
        .fetch_questions(8, &QuestionFilters::default())
        .await
        .unwrap();
    assert_eq!(questions.total, 2);
    assert_eq!(questions.items[1].page_number, Some(30));

    let err = catalog.fetch_book(42).await.unwrap_err();
    assert_eq!(err.to_string(), "404");

    let err = catalog
        .fetch_questions(42, &QuestionFilters::default())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn concurrent_fetches_are_independent() {
    let addr = start_server();
    let catalog = Catalog::new(&format!("http://{addr}")).unwrap();

    let first = BookFilters {
        page: Some(1),
        page_size: Some(5),
        ..Default::default()
    };
    let second = BookFilters {
        page: Some(2),
        page_size: Some(5),
        ..Default::default()
    };
    let (a, b, c) = tokio::join!(
        catalog.fetch_books(&first),
        catalog.fetch_books(&second),
        catalog.fetch_book(3),
    );

    let a = a.unwrap();
    let b = b.unwrap();
    assert_eq!(a.items.first().map(|x| x.id), Some(1));
    assert_eq!(b.items.first().map(|x| x.id), Some(6));
    assert_eq!(c.unwrap().title, "Peter Pan");
}

#[tokio::test]
async fn async_write_operations_round_trip() {
    let addr = start_server();
    let catalog = Catalog::new(&format!("http://{addr}")).unwrap();

    let created = catalog
        .create_book(&NewBook {
            title: "The Neverending Story".to_string(),
            author: "Michael Ende".to_string(),
            description: Some("A boy reads himself into a book.".to_string()),
            published_year: Some(1979),
            isbn: None,
        })
        .await
        .unwrap();

    let patch = BookPatch {
        title: Some("Die unendliche Geschichte".to_string()),
        ..Default::default()
    };
    let updated = catalog.update_book(created.id, &patch).await.unwrap();
    assert_eq!(updated.title, "Die unendliche Geschichte");
    assert_eq!(updated.published_year, Some(1979));

    let clear = BookPatch {
        description: Some(None),
        ..Default::default()
    };
    catalog.update_book(created.id, &clear).await.unwrap();
    let reread = catalog.fetch_book(created.id).await.unwrap();
    assert_eq!(reread.description, None);
    assert_eq!(reread.published_year, Some(1979));

    catalog.delete_book(created.id).await.unwrap();
    let err = catalog.delete_book(created.id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let catalog = Catalog::new(&format!("http://{addr}")).unwrap();
    let err = catalog.fetch_book(1).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.status(), None);
}
