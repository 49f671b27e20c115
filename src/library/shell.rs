//! Interactive prompt loop.
//!
//! The shell reads whitespace-separated tokens, so a command and its answers
//! may arrive on one line or spread over several:
//!
//! ```text
//! login
//! username=alice
//! password=secret
//! User alice logged in!
//! ```
//!
//! Input and output are generic so the loop can be driven by a script in
//! tests as well as by a terminal.

use super::LibraryError;
use super::dispatcher::{BookInput, Library, Outcome};
use crate::network::Connect;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

/// Command metadata shown by `help`.
#[derive(Debug, Clone, Copy)]
pub struct CommandInfo {
    pub name: &'static str,
    pub description: &'static str,
}

pub const COMMANDS: &[CommandInfo] = &[
    CommandInfo { name: "register", description: "Create a new account" },
    CommandInfo { name: "login", description: "Log in and start a session" },
    CommandInfo { name: "enter_library", description: "Request access to the library" },
    CommandInfo { name: "get_books", description: "List every book" },
    CommandInfo { name: "get_book", description: "Show one book by id" },
    CommandInfo { name: "add_book", description: "Add a book" },
    CommandInfo { name: "delete_book", description: "Delete a book by id" },
    CommandInfo { name: "logout", description: "End the session" },
    CommandInfo { name: "help", description: "List available commands" },
    CommandInfo { name: "exit", description: "Quit" },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Register,
    Login,
    EnterLibrary,
    GetBooks,
    GetBook,
    AddBook,
    DeleteBook,
    Logout,
    Help,
    Exit,
}

impl FromStr for Command {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "register" => Command::Register,
            "login" => Command::Login,
            "enter_library" => Command::EnterLibrary,
            "get_books" => Command::GetBooks,
            "get_book" => Command::GetBook,
            "add_book" => Command::AddBook,
            "delete_book" => Command::DeleteBook,
            "logout" => Command::Logout,
            "help" => Command::Help,
            "exit" => Command::Exit,
            _ => return Err(()),
        })
    }
}

/// Splits input into whitespace-separated tokens, one line at a time.
#[derive(Debug)]
struct Tokens<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }

    /// Next token, or `None` at end of input.
    fn next_token(&mut self) -> io::Result<Option<String>> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
        Ok(self.pending.pop_front())
    }
}

#[derive(Debug)]
pub struct Shell<N: Connect, R, W> {
    library: Library<N>,
    input: Tokens<R>,
    output: W,
}

impl<N: Connect, R: BufRead, W: Write> Shell<N, R, W> {
    pub fn new(library: Library<N>, input: R, output: W) -> Self {
        Self {
            library,
            input: Tokens::new(input),
            output,
        }
    }

    pub fn library(&self) -> &Library<N> {
        &self.library
    }

    /// Consume the shell, returning the output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run commands until `exit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        while let Some(word) = self.input.next_token()? {
            let Ok(command) = word.parse::<Command>() else {
                writeln!(self.output, "Invalid command!")?;
                continue;
            };
            if !self.execute(command)? {
                break;
            }
        }
        self.output.flush()
    }

    /// Run one command. Returns `false` on `exit` or when input ran out
    /// mid-command.
    fn execute(&mut self, command: Command) -> io::Result<bool> {
        tracing::debug!(?command, "executing command");
        let result = match command {
            Command::Register | Command::Login => {
                let Some(username) = self.prompt("username=")? else {
                    return Ok(false);
                };
                let Some(password) = self.prompt("password=")? else {
                    return Ok(false);
                };
                if command == Command::Register {
                    self.library.register(&username, &password)
                } else {
                    self.library.login(&username, &password)
                }
            }
            Command::EnterLibrary => self.library.enter_library(),
            Command::GetBooks => self.library.get_books(),
            Command::GetBook | Command::DeleteBook => {
                let Some(id) = self.prompt("Book id: ")? else {
                    return Ok(false);
                };
                if command == Command::GetBook {
                    self.library.get_book(&id)
                } else {
                    self.library.delete_book(&id)
                }
            }
            Command::AddBook => {
                let mut fields: [String; 5] = Default::default();
                let prompts = [
                    "Book title: ",
                    "Book author: ",
                    "Book genre: ",
                    "Book page_count: ",
                    "Book publisher: ",
                ];
                for (field, prompt) in fields.iter_mut().zip(prompts) {
                    let Some(value) = self.prompt(prompt)? else {
                        return Ok(false);
                    };
                    *field = value;
                }
                let [title, author, genre, page_count, publisher] = &fields;
                self.library.add_book(&BookInput {
                    title,
                    author,
                    genre,
                    page_count,
                    publisher,
                })
            }
            Command::Logout => self.library.logout(),
            Command::Help => {
                self.help()?;
                return Ok(true);
            }
            Command::Exit => return Ok(false),
        };
        self.report(result)?;
        Ok(true)
    }

    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        self.input.next_token()
    }

    fn report(&mut self, result: Result<Outcome, LibraryError>) -> io::Result<()> {
        match result {
            Ok(outcome) => writeln!(self.output, "{outcome}"),
            Err(err) => {
                tracing::error!(error = %err, "command failed");
                writeln!(self.output, "Error: {err}")
            }
        }
    }

    fn help(&mut self) -> io::Result<()> {
        writeln!(self.output, "Available commands:")?;
        for cmd in COMMANDS {
            writeln!(self.output, "{}\t\t{}", cmd.name, cmd.description)?;
        }
        Ok(())
    }
}
