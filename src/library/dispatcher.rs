//! One method per user command.
//!
//! Every command that reaches the server opens a fresh connection, sends one
//! request, reads one response and closes the connection again. Input is
//! validated and the session is checked before anything is sent.
//!
//! Responses are interpreted the way the server reports failures: an
//! `{"error": ...}` body is an application-level refusal, `404` means the book
//! does not exist, and any other non-2xx status means the server did not
//! answer properly.

use super::LibraryError;
use super::config::ServerConfig;
use super::payload::{self, BookSummary, Credentials, NewBook, Refusal, TokenReply};
use super::session::Session;
use super::validate::{is_valid_field, is_valid_number};
use crate::network::Connect;
use crate::network::application::http::{Client, Exchange, Request};
use core::fmt;

pub const REGISTER_PATH: &str = "/api/v1/tema/auth/register";
pub const LOGIN_PATH: &str = "/api/v1/tema/auth/login";
pub const LOGOUT_PATH: &str = "/api/v1/tema/auth/logout";
pub const ACCESS_PATH: &str = "/api/v1/tema/library/access";
pub const BOOKS_PATH: &str = "/api/v1/tema/library/books";

const JSON: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookEntry {
    pub id: u64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDetails {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub page_count: u32,
    pub publisher: String,
}

/// Book fields as typed by the user, before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookInput<'a> {
    pub title: &'a str,
    pub author: &'a str,
    pub genre: &'a str,
    pub page_count: &'a str,
    pub publisher: &'a str,
}

/// What a command amounted to, from the user's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Registered { username: String },
    UsernameTaken,
    InvalidCredentials,
    AlreadyLoggedIn,
    LoggedIn { username: String },
    LoginRejected,
    NoSessionCookie,
    NotLoggedIn,
    InvalidSession,
    AccessGranted,
    NoToken,
    NoLibraryAccess,
    Books(Vec<BookEntry>),
    Book(BookDetails),
    InvalidBookId,
    BookNotFound,
    InvalidBookDetails,
    BookAdded,
    BookDeleted,
    NotAuthenticated,
    LoggedOut,
    /// The server answered with something other than success or a refusal.
    ServerUnavailable,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Registered { username } => write!(f, "User {username} registered!"),
            Outcome::UsernameTaken => f.write_str("Error: The username is taken!"),
            Outcome::InvalidCredentials => f.write_str("Error: Invalid username or password!"),
            Outcome::AlreadyLoggedIn => f.write_str("Error: You are already logged in!"),
            Outcome::LoggedIn { username } => write!(f, "User {username} logged in!"),
            Outcome::LoginRejected => f.write_str("Error: Wrong username or password!"),
            Outcome::NoSessionCookie => f.write_str("Error: The server did not send a session!"),
            Outcome::NotLoggedIn => f.write_str("Error: You are not logged in!"),
            Outcome::InvalidSession => f.write_str("Error: Invalid session!"),
            Outcome::AccessGranted => f.write_str("Library access granted!"),
            Outcome::NoToken => f.write_str("Error: The server did not send an access token!"),
            Outcome::NoLibraryAccess => f.write_str("Error: You don't have access to the library!"),
            Outcome::Books(books) if books.is_empty() => f.write_str("The library is empty."),
            Outcome::Books(books) => {
                for (i, book) in books.iter().enumerate() {
                    if i > 0 {
                        f.write_str("\n")?;
                    }
                    write!(f, "id={}\ttitle={}", book.id, book.title)?;
                }
                Ok(())
            }
            Outcome::Book(book) => write!(
                f,
                "title={}\nauthor={}\ngenre={}\npage count={}\npublisher={}",
                book.title, book.author, book.genre, book.page_count, book.publisher
            ),
            Outcome::InvalidBookId => f.write_str("Error: Invalid book id!"),
            Outcome::BookNotFound => f.write_str("Error: Book does not exist!"),
            Outcome::InvalidBookDetails => f.write_str("Error: Invalid book details!"),
            Outcome::BookAdded => f.write_str("Book added!"),
            Outcome::BookDeleted => f.write_str("Book deleted!"),
            Outcome::NotAuthenticated => f.write_str("You are not authenticated!"),
            Outcome::LoggedOut => f.write_str("Logged out!"),
            Outcome::ServerUnavailable => f.write_str("Server did not respond, try again!"),
        }
    }
}

/// Command dispatcher holding the session between commands.
#[derive(Debug)]
pub struct Library<N: Connect> {
    connector: N,
    config: ServerConfig,
    session: Session,
}

impl<N: Connect> Library<N> {
    pub fn new(connector: N, config: ServerConfig) -> Self {
        Self {
            connector,
            config,
            session: Session::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn register(&mut self, username: &str, password: &str) -> Result<Outcome, LibraryError> {
        if self.session.is_logged_in() {
            return Ok(Outcome::AlreadyLoggedIn);
        }
        if !is_valid_field(username) || !is_valid_field(password) {
            return Ok(Outcome::InvalidCredentials);
        }

        let body = payload::encode(&Credentials { username, password })?;
        let request = Request::post(&self.config.host, REGISTER_PATH, JSON, &body);
        let exchange = exchange(&mut self.connector, &self.config, &request)?;

        Ok(if is_refusal(&exchange) {
            Outcome::UsernameTaken
        } else if !exchange.response.is_success() {
            Outcome::ServerUnavailable
        } else {
            Outcome::Registered {
                username: username.to_string(),
            }
        })
    }

    pub fn login(&mut self, username: &str, password: &str) -> Result<Outcome, LibraryError> {
        if self.session.is_logged_in() {
            return Ok(Outcome::AlreadyLoggedIn);
        }
        if !is_valid_field(username) || !is_valid_field(password) {
            return Ok(Outcome::InvalidCredentials);
        }

        let body = payload::encode(&Credentials { username, password })?;
        let request = Request::post(&self.config.host, LOGIN_PATH, JSON, &body);
        let exchange = exchange(&mut self.connector, &self.config, &request)?;

        if is_refusal(&exchange) {
            return Ok(Outcome::LoginRejected);
        }
        let cookie = exchange
            .response
            .headers("Set-Cookie")
            .find_map(payload::extract_session_cookie)
            .map(str::to_string)
            .or_else(|| payload::extract_session_cookie(&exchange.text()).map(str::to_string));

        Ok(match cookie {
            Some(cookie) => {
                self.session.set_cookie(cookie);
                Outcome::LoggedIn {
                    username: username.to_string(),
                }
            }
            None => Outcome::NoSessionCookie,
        })
    }

    pub fn enter_library(&mut self) -> Result<Outcome, LibraryError> {
        let Some(cookie) = self.session.cookie() else {
            return Ok(Outcome::NotLoggedIn);
        };

        let cookies = [cookie];
        let request = Request::get(&self.config.host, ACCESS_PATH).cookies(&cookies);
        let exchange = exchange(&mut self.connector, &self.config, &request)?;

        if is_refusal(&exchange) {
            return Ok(Outcome::InvalidSession);
        }
        let Some(body) = exchange.response.body_str() else {
            return Ok(Outcome::NoToken);
        };
        Ok(match payload::decode::<TokenReply>(body) {
            Ok(reply) => {
                self.session.set_token(reply.token.to_string());
                Outcome::AccessGranted
            }
            Err(_) => Outcome::NoToken,
        })
    }

    pub fn get_books(&mut self) -> Result<Outcome, LibraryError> {
        let Some(token) = self.session.token() else {
            return Ok(Outcome::NoLibraryAccess);
        };

        let request = Request::get(&self.config.host, BOOKS_PATH).bearer(Some(token));
        let exchange = exchange(&mut self.connector, &self.config, &request)?;

        if is_refusal(&exchange) {
            return Ok(Outcome::NoLibraryAccess);
        }
        if !exchange.response.is_success() {
            return Ok(Outcome::ServerUnavailable);
        }
        let body = exchange.response.body_str().unwrap_or_default();
        let books = payload::decode_list::<BookSummary>(body)?
            .into_iter()
            .map(|b| BookEntry {
                id: b.id,
                title: b.title.to_string(),
            })
            .collect();
        Ok(Outcome::Books(books))
    }

    pub fn get_book(&mut self, id: &str) -> Result<Outcome, LibraryError> {
        if !is_valid_number(id) {
            return Ok(Outcome::InvalidBookId);
        }
        let Some(token) = self.session.token() else {
            return Ok(Outcome::NoLibraryAccess);
        };

        let path = format!("{BOOKS_PATH}/{id}");
        let request = Request::get(&self.config.host, &path).bearer(Some(token));
        let exchange = exchange(&mut self.connector, &self.config, &request)?;

        if exchange.response.status_code == 404 {
            return Ok(Outcome::BookNotFound);
        }
        if is_refusal(&exchange) {
            return Ok(Outcome::NoLibraryAccess);
        }
        if !exchange.response.is_success() {
            return Ok(Outcome::ServerUnavailable);
        }
        let body = exchange.response.body_str().unwrap_or_default();
        let book = payload::decode_book(body)?;
        Ok(Outcome::Book(BookDetails {
            title: book.title.to_string(),
            author: book.author.to_string(),
            genre: book.genre.to_string(),
            page_count: book.page_count,
            publisher: book.publisher.to_string(),
        }))
    }

    pub fn add_book(&mut self, input: &BookInput) -> Result<Outcome, LibraryError> {
        let valid = [input.title, input.author, input.genre, input.publisher]
            .into_iter()
            .all(is_valid_field)
            && is_valid_number(input.page_count);
        let page_count = match input.page_count.parse::<u32>() {
            Ok(count) if valid => count,
            _ => return Ok(Outcome::InvalidBookDetails),
        };
        let Some(token) = self.session.token() else {
            return Ok(Outcome::NoLibraryAccess);
        };

        let body = payload::encode(&NewBook {
            title: input.title,
            author: input.author,
            genre: input.genre,
            page_count,
            publisher: input.publisher,
        })?;
        let request =
            Request::post(&self.config.host, BOOKS_PATH, JSON, &body).bearer(Some(token));
        let exchange = exchange(&mut self.connector, &self.config, &request)?;

        Ok(if is_refusal(&exchange) {
            Outcome::NoLibraryAccess
        } else if !exchange.response.is_success() {
            Outcome::ServerUnavailable
        } else {
            Outcome::BookAdded
        })
    }

    pub fn delete_book(&mut self, id: &str) -> Result<Outcome, LibraryError> {
        if !is_valid_number(id) {
            return Ok(Outcome::InvalidBookId);
        }
        let Some(token) = self.session.token() else {
            return Ok(Outcome::NoLibraryAccess);
        };

        let path = format!("{BOOKS_PATH}/{id}");
        let request = Request::delete(&self.config.host, &path).bearer(Some(token));
        let exchange = exchange(&mut self.connector, &self.config, &request)?;

        Ok(if exchange.response.status_code == 404 {
            Outcome::BookNotFound
        } else if is_refusal(&exchange) {
            Outcome::NoLibraryAccess
        } else if !exchange.response.is_success() {
            Outcome::ServerUnavailable
        } else {
            Outcome::BookDeleted
        })
    }

    /// Log out and forget the session, whatever the server answers.
    pub fn logout(&mut self) -> Result<Outcome, LibraryError> {
        let Some(cookie) = self.session.cookie() else {
            return Ok(Outcome::NotLoggedIn);
        };

        let cookies = [cookie];
        let request = Request::get(&self.config.host, LOGOUT_PATH).cookies(&cookies);
        let result = exchange(&mut self.connector, &self.config, &request);
        self.session.clear();
        let exchange = result?;

        Ok(if is_refusal(&exchange) {
            Outcome::NotAuthenticated
        } else if !exchange.response.is_success() {
            Outcome::ServerUnavailable
        } else {
            Outcome::LoggedOut
        })
    }
}

/// One open → send → receive → close cycle.
fn exchange<N: Connect>(
    connector: &mut N,
    config: &ServerConfig,
    request: &Request,
) -> Result<Exchange, LibraryError> {
    let connection = connector.connect(&config.remote())?;
    let mut client = Client::new(connection).with_limits(config.limits);
    let result = client.request(request);
    if let Err(err) = client.close() {
        tracing::warn!(error = %err, "failed to close connection");
    }
    let exchange = result?;
    if !exchange.raw.is_complete() {
        tracing::warn!(path = request.path, "response body was cut short");
    }
    Ok(exchange)
}

/// The server reports refusals as a JSON object with an `error` field.
fn is_refusal(exchange: &Exchange) -> bool {
    exchange
        .response
        .body_str()
        .is_some_and(|body| payload::decode::<Refusal>(body).is_ok())
}
