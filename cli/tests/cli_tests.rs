//! Integration tests for the BiteBook CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::net::SocketAddr;

/// Start the mock server on a random port in a background thread
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

fn bitebook(addr: SocketAddr) -> Command {
    let mut cmd = Command::cargo_bin("bitebook").unwrap();
    cmd.env("BITEBOOK_API_BASE", format!("http://{addr}"));
    cmd
}

#[test]
fn test_help() {
    let mut cmd = Command::cargo_bin("bitebook").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("books"))
        .stdout(predicate::str::contains("book"))
        .stdout(predicate::str::contains("questions"))
        .stdout(predicate::str::contains("--base-url"));
}

#[test]
fn test_version() {
    let mut cmd = Command::cargo_bin("bitebook").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bitebook"));
}

#[test]
fn test_books_help() {
    let mut cmd = Command::cargo_bin("bitebook").unwrap();
    cmd.args(["books", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("List books"))
        .stdout(predicate::str::contains("--page-size"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_book_requires_id() {
    let mut cmd = Command::cargo_bin("bitebook").unwrap();
    cmd.arg("book").assert().failure();
}

#[test]
fn test_books_lists_seeded_catalog() {
    let addr = start_server();
    bitebook(addr)
        .args(["books", "--page-size", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("The Little Prince"))
        .stdout(predicate::str::contains("Peter Pan"))
        .stdout(predicate::str::contains("Matilda").not())
        .stdout(predicate::str::contains("3 of 10 books"));
}

#[test]
fn test_books_search_json() {
    let addr = start_server();
    let output = bitebook(addr)
        .args(["books", "-q", "dahl", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let list: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(list["total"], 1);
    assert_eq!(list["items"][0]["title"], "Matilda");
}

#[test]
fn test_book_detail() {
    let addr = start_server();
    bitebook(addr)
        .args(["book", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Winnie-the-Pooh"))
        .stdout(predicate::str::contains("A. A. Milne"))
        .stdout(predicate::str::contains("1926"));
}

#[test]
fn test_book_not_found_reports_status() {
    let addr = start_server();
    bitebook(addr)
        .args(["book", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to fetch book 42"))
        .stderr(predicate::str::contains("404"));
}

#[test]
fn test_questions_with_zero_start() {
    let addr = start_server();
    bitebook(addr)
        .args(["questions", "1", "--start", "0", "--limit", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[p.1]"))
        .stdout(predicate::str::contains("Which asteroid"))
        .stdout(predicate::str::contains("fox").not())
        .stdout(predicate::str::contains("0..2 of 3 questions"));
}

#[test]
fn test_base_url_flag_overrides_environment() {
    let addr = start_server();
    let mut cmd = Command::cargo_bin("bitebook").unwrap();
    cmd.env("BITEBOOK_API_BASE", "http://127.0.0.1:9")
        .args(["--base-url", &format!("http://{addr}/"), "book", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("The Little Prince"));
}

#[test]
fn test_unreachable_server_fails() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    bitebook(addr)
        .args(["books"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to list books"));
}

#[test]
fn test_rust_log_enables_debug_output() {
    let addr = start_server();
    bitebook(addr)
        .env("RUST_LOG", "bitebook_cli=debug")
        .args(["book", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("using API origin"));
}

#[test]
fn test_default_filter_hides_debug_output() {
    let addr = start_server();
    bitebook(addr)
        .env_remove("RUST_LOG")
        .args(["book", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("using API origin").not());
}
