use clap::Parser;
use libshelf::library::config::{DEFAULT_HOST, DEFAULT_PORT, ServerConfig};
use libshelf::library::dispatcher::Library;
use libshelf::library::shell::Shell;
use libshelf::network::application::http::FramingLimits;
use libshelf::network::tcp::{AddressFamily, SocketOptions, TcpConnector};
use std::io;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "libshelf", version)]
#[command(about = "Interactive client for the library-management REST API", long_about = None)]
struct Cli {
    /// Literal IP address of the server
    #[arg(long, env = "LIBSHELF_HOST", default_value = DEFAULT_HOST)]
    host: String,

    #[arg(short, long, env = "LIBSHELF_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Treat the host as an IPv6 address
    #[arg(long, env = "LIBSHELF_IPV6")]
    ipv6: bool,

    /// Seconds to wait for the connection to be established
    #[arg(long, env = "LIBSHELF_CONNECT_TIMEOUT")]
    connect_timeout: Option<u64>,

    /// Seconds to wait for each read before giving up
    #[arg(long, env = "LIBSHELF_READ_TIMEOUT")]
    read_timeout: Option<u64>,

    /// Seconds to wait for each write before giving up
    #[arg(long, env = "LIBSHELF_WRITE_TIMEOUT")]
    write_timeout: Option<u64>,

    /// Largest response header block accepted, in bytes
    #[arg(long, env = "LIBSHELF_MAX_HEADER_BYTES")]
    max_header_bytes: Option<usize>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> ServerConfig {
        let defaults = FramingLimits::default();
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            family: if self.ipv6 {
                AddressFamily::Inet6
            } else {
                AddressFamily::Inet
            },
            socket: SocketOptions {
                connect_timeout: self.connect_timeout.map(Duration::from_secs),
                read_timeout: self.read_timeout.map(Duration::from_secs),
                write_timeout: self.write_timeout.map(Duration::from_secs),
            },
            limits: FramingLimits {
                max_header_bytes: self.max_header_bytes.unwrap_or(defaults.max_header_bytes),
                ..defaults
            },
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config();
    tracing::info!(remote = %config.remote(), "libshelf starting");

    let connector = TcpConnector::new(config.family, config.socket);
    let library = Library::new(connector, config);
    let mut shell = Shell::new(library, io::stdin().lock(), io::stdout().lock());

    match shell.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "terminal I/O failed");
            ExitCode::FAILURE
        }
    }
}
