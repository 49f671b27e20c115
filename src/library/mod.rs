//! Client for the library-management REST API.
//!
//! This module sits on top of the transport layer in [`crate::network`] and
//! turns user commands into HTTP exchanges:
//!
//! - **[`config`]**: where the server lives and how sockets are configured
//! - **[`session`]**: the session cookie and library token between commands
//! - **[`validate`]**: input checks applied before anything is sent
//! - **[`payload`]**: JSON bodies sent to and received from the server
//! - **[`dispatcher`]**: one method per command, each a single
//!   open → send → receive → close cycle
//! - **[`shell`]**: the interactive prompt loop
//!
//! ```rust,no_run
//! use libshelf::library::config::ServerConfig;
//! use libshelf::library::dispatcher::Library;
//! use libshelf::network::tcp::TcpConnector;
//!
//! # fn main() -> Result<(), libshelf::library::LibraryError> {
//! let config = ServerConfig::default();
//! let connector = TcpConnector::new(config.family, config.socket);
//! let mut library = Library::new(connector, config);
//!
//! println!("{}", library.login("alice", "secret")?);
//! println!("{}", library.enter_library()?);
//! println!("{}", library.get_books()?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatcher;
pub mod payload;
pub mod session;
pub mod shell;
pub mod validate;

use crate::network::error::Error as NetworkError;
use payload::PayloadError;

/// Failures that abort a single command.
///
/// Application-level refusals (wrong password, missing book) are not errors;
/// they come back as [`dispatcher::Outcome`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LibraryError {
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Payload(#[from] PayloadError),
}
