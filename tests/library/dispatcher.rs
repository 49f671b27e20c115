use crate::common::{MockServer, response};
use libshelf::library::LibraryError;
use libshelf::library::config::ServerConfig;
use libshelf::library::dispatcher::{BookDetails, BookEntry, BookInput, Library, Outcome};
use libshelf::network::error::Error;
use std::io::ErrorKind;

const COOKIE: &str = "connect.sid=s%3AyQ2.Hk9";
const TOKEN: &str = "eyJhbGciOi.eyJ1c2Vy.sig";

fn config() -> ServerConfig {
    ServerConfig {
        host: "10.1.2.3".to_string(),
        port: 8080,
        ..ServerConfig::default()
    }
}

fn library(server: &MockServer) -> Library<MockServer> {
    Library::new(server.clone(), config())
}

fn login_reply() -> String {
    format!(
        "HTTP/1.1 200 OK\r\nX-Powered-By: Express\r\nSet-Cookie: {COOKIE}; Path=/; HttpOnly\r\nContent-Length: 2\r\n\r\nOK"
    )
}

fn dune() -> BookInput<'static> {
    BookInput {
        title: "Dune",
        author: "Herbert",
        genre: "scifi",
        page_count: "412",
        publisher: "Chilton",
    }
}

/// A library that is logged in and holds a token.
fn authorized(server: &MockServer) -> Library<MockServer> {
    let mut lib = library(server);
    server.respond(&login_reply());
    server.respond(&response("200 OK", &format!(r#"{{"token":"{TOKEN}"}}"#)));
    assert!(matches!(lib.login("alice", "secret"), Ok(Outcome::LoggedIn { .. })));
    assert_eq!(lib.enter_library(), Ok(Outcome::AccessGranted));
    lib
}

#[test]
fn full_session() {
    let server = MockServer::new();
    let mut lib = library(&server);

    server.respond(&response("201 Created", ""));
    assert_eq!(
        lib.register("alice", "secret").unwrap(),
        Outcome::Registered {
            username: "alice".to_string()
        }
    );

    server.respond(&login_reply());
    assert_eq!(
        lib.login("alice", "secret").unwrap().to_string(),
        "User alice logged in!"
    );
    assert_eq!(lib.session().cookie(), Some(COOKIE));

    server.respond(&response("200 OK", &format!(r#"{{"token":"{TOKEN}"}}"#)));
    assert_eq!(lib.enter_library().unwrap(), Outcome::AccessGranted);
    assert_eq!(lib.session().token(), Some(TOKEN));

    server.respond(&response(
        "200 OK",
        r#"[{"id":1,"title":"Dune"},{"id":2,"title":"Emma"}]"#,
    ));
    assert_eq!(
        lib.get_books().unwrap(),
        Outcome::Books(vec![
            BookEntry { id: 1, title: "Dune".to_string() },
            BookEntry { id: 2, title: "Emma".to_string() },
        ])
    );

    server.respond(&response(
        "200 OK",
        r#"{"id":1,"title":"Dune","author":"Herbert","publisher":"Chilton","genre":"scifi","page_count":412}"#,
    ));
    assert_eq!(
        lib.get_book("1").unwrap(),
        Outcome::Book(BookDetails {
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            genre: "scifi".to_string(),
            page_count: 412,
            publisher: "Chilton".to_string(),
        })
    );

    server.respond(&response("200 OK", ""));
    assert_eq!(lib.add_book(&dune()).unwrap(), Outcome::BookAdded);

    server.respond(&response("200 OK", ""));
    assert_eq!(lib.delete_book("1").unwrap(), Outcome::BookDeleted);

    server.respond(&response("200 OK", ""));
    assert_eq!(lib.logout().unwrap(), Outcome::LoggedOut);
    assert!(!lib.session().is_logged_in());
    assert!(!lib.session().has_library_access());

    assert_eq!(server.connections(), 8);
    assert_eq!(server.closed(), 8);
    assert!(server.remotes().iter().all(|r| r == "10.1.2.3:8080"));

    let requests = server.requests();
    assert!(requests[0].starts_with("POST /api/v1/tema/auth/register HTTP/1.1\r\n"));
    assert!(requests[0].ends_with(r#"{"username":"alice","password":"secret"}"#));
    assert!(requests[0].contains("Content-Length: 40\r\n"));
    assert!(requests[1].starts_with("POST /api/v1/tema/auth/login HTTP/1.1\r\n"));

    assert!(requests[2].starts_with("GET /api/v1/tema/library/access HTTP/1.1\r\n"));
    assert!(requests[2].contains(&format!("Cookie: {COOKIE}\r\n")));
    assert!(!requests[2].contains("Authorization"));

    assert!(requests[3].starts_with("GET /api/v1/tema/library/books HTTP/1.1\r\n"));
    assert!(requests[3].contains(&format!("Authorization: Bearer {TOKEN}\r\n")));
    assert!(requests[4].starts_with("GET /api/v1/tema/library/books/1 HTTP/1.1\r\n"));

    assert!(requests[5].starts_with("POST /api/v1/tema/library/books HTTP/1.1\r\n"));
    assert!(requests[5].contains("Content-Type: application/json\r\n"));
    assert!(requests[5].ends_with(
        r#"{"title":"Dune","author":"Herbert","genre":"scifi","page_count":412,"publisher":"Chilton"}"#
    ));

    assert!(requests[6].starts_with("DELETE /api/v1/tema/library/books/1 HTTP/1.1\r\n"));
    assert!(requests[7].starts_with("GET /api/v1/tema/auth/logout HTTP/1.1\r\n"));
    assert!(requests[7].contains(&format!("Cookie: {COOKIE}\r\n")));
}

#[test]
fn refusals_become_outcomes() {
    let server = MockServer::new();
    let mut lib = library(&server);

    server.respond(&response("400 Bad Request", r#"{"error":"The username alice is taken!"}"#));
    assert_eq!(lib.register("alice", "secret"), Ok(Outcome::UsernameTaken));

    server.respond(&response("400 Bad Request", r#"{"error":"Credentials are not good!"}"#));
    assert_eq!(lib.login("alice", "wrong"), Ok(Outcome::LoginRejected));
    assert!(!lib.session().is_logged_in());
}

#[test]
fn login_without_cookie() {
    let server = MockServer::new();
    let mut lib = library(&server);

    server.respond(&response("200 OK", "OK"));
    assert_eq!(lib.login("alice", "secret"), Ok(Outcome::NoSessionCookie));
    assert!(!lib.session().is_logged_in());
}

#[test]
fn missing_book() {
    let server = MockServer::new();
    let mut lib = authorized(&server);

    server.respond(&response("404 Not Found", r#"{"error":"No book was found!"}"#));
    assert_eq!(lib.get_book("99"), Ok(Outcome::BookNotFound));

    server.respond(&response("404 Not Found", r#"{"error":"No book was deleted!"}"#));
    assert_eq!(lib.delete_book("99"), Ok(Outcome::BookNotFound));
}

#[test]
fn empty_library() {
    let server = MockServer::new();
    let mut lib = authorized(&server);

    server.respond(&response("200 OK", "[]"));
    let outcome = lib.get_books().unwrap();
    assert_eq!(outcome, Outcome::Books(Vec::new()));
    assert_eq!(outcome.to_string(), "The library is empty.");
}

#[test]
fn invalid_token_is_a_refusal() {
    let server = MockServer::new();
    let mut lib = authorized(&server);

    server.respond(&response("403 Forbidden", r#"{"error":"Error when decoding tokenn!"}"#));
    assert_eq!(lib.get_books(), Ok(Outcome::NoLibraryAccess));
}

#[test]
fn server_errors_without_a_message() {
    let server = MockServer::new();
    let mut lib = authorized(&server);

    server.respond(&response("502 Bad Gateway", ""));
    let outcome = lib.get_books().unwrap();
    assert_eq!(outcome, Outcome::ServerUnavailable);
    assert_eq!(outcome.to_string(), "Server did not respond, try again!");
}

#[test]
fn checks_happen_before_the_network() {
    let server = MockServer::new();
    let mut lib = library(&server);

    assert_eq!(lib.register("", "x"), Ok(Outcome::InvalidCredentials));
    assert_eq!(lib.login("al/ice", "x"), Ok(Outcome::InvalidCredentials));
    assert_eq!(lib.enter_library(), Ok(Outcome::NotLoggedIn));
    assert_eq!(lib.get_books(), Ok(Outcome::NoLibraryAccess));
    assert_eq!(lib.get_book("1"), Ok(Outcome::NoLibraryAccess));
    assert_eq!(lib.get_book("1a"), Ok(Outcome::InvalidBookId));
    assert_eq!(lib.delete_book("-1"), Ok(Outcome::InvalidBookId));
    assert_eq!(lib.logout(), Ok(Outcome::NotLoggedIn));

    let mut bad = dune();
    bad.page_count = "many";
    assert_eq!(lib.add_book(&bad), Ok(Outcome::InvalidBookDetails));
    bad = dune();
    bad.title = "";
    assert_eq!(lib.add_book(&bad), Ok(Outcome::InvalidBookDetails));
    assert_eq!(lib.add_book(&dune()), Ok(Outcome::NoLibraryAccess));

    assert_eq!(server.connections(), 0);
}

#[test]
fn second_login_is_refused_locally() {
    let server = MockServer::new();
    let mut lib = authorized(&server);

    assert_eq!(lib.login("bob", "pw"), Ok(Outcome::AlreadyLoggedIn));
    assert_eq!(lib.register("bob", "pw"), Ok(Outcome::AlreadyLoggedIn));
    assert_eq!(server.connections(), 2);
}

#[test]
fn network_failures_are_errors() {
    let server = MockServer::new();
    let mut lib = library(&server);

    assert_eq!(
        lib.register("alice", "secret"),
        Err(LibraryError::Network(Error::Connect(ErrorKind::ConnectionRefused)))
    );

    server.respond_chunked(Vec::new());
    assert_eq!(
        lib.register("alice", "secret"),
        Err(LibraryError::Network(Error::ConnectionClosed))
    );
    assert_eq!(server.closed(), 1);
}

#[test]
fn logout_forgets_the_session_even_on_failure() {
    let server = MockServer::new();
    let mut lib = authorized(&server);

    assert!(lib.logout().is_err());
    assert!(!lib.session().is_logged_in());
    assert_eq!(lib.enter_library(), Ok(Outcome::NotLoggedIn));
}

#[test]
fn malformed_book_is_a_payload_error() {
    let server = MockServer::new();
    let mut lib = authorized(&server);

    server.respond(&response("200 OK", r#"{"id":1,"title":"Dune"}"#));
    assert!(matches!(lib.get_book("1"), Err(LibraryError::Payload(_))));
}

#[test]
fn response_split_across_reads() {
    let server = MockServer::new();
    let mut lib = library(&server);

    let reply = login_reply().into_bytes();
    server.respond_chunked(reply.chunks(7).map(<[u8]>::to_vec).collect());
    assert!(matches!(lib.login("alice", "secret"), Ok(Outcome::LoggedIn { .. })));
    assert_eq!(lib.session().cookie(), Some(COOKIE));
}

#[test]
fn quoted_page_count_is_accepted() {
    let server = MockServer::new();
    let mut lib = authorized(&server);

    server.respond(&response(
        "200 OK",
        r#"{"id":1,"title":"Dune","author":"Herbert","publisher":"Chilton","genre":"scifi","page_count":"412"}"#,
    ));
    let outcome = lib.get_book("1").unwrap();
    assert_eq!(
        outcome,
        Outcome::Book(BookDetails {
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            genre: "scifi".to_string(),
            page_count: 412,
            publisher: "Chilton".to_string(),
        })
    );
    assert!(outcome.to_string().contains("page count=412"));
}

#[test]
fn titles_mentioning_error_are_not_refusals() {
    let server = MockServer::new();
    let mut lib = authorized(&server);

    server.respond(&response(
        "200 OK",
        r#"[{"id":1,"title":"Terror"},{"id":2,"title":"error"}]"#,
    ));
    assert_eq!(
        lib.get_books(),
        Ok(Outcome::Books(vec![
            BookEntry { id: 1, title: "Terror".to_string() },
            BookEntry { id: 2, title: "error".to_string() },
        ]))
    );

    server.respond(&response(
        "200 OK",
        r#"{"id":1,"title":"Terror","author":"Simmons","publisher":"Little","genre":"horror","page_count":769}"#,
    ));
    assert!(matches!(lib.get_book("1"), Ok(Outcome::Book(_))));
}
