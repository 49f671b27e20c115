use libshelf::network::application::http::reader::receive_from_server;
use libshelf::network::application::http::request::compute_get_request;
use libshelf::network::error::Error;
use libshelf::network::tcp::{AddressFamily, SocketOptions, TcpConnection, TcpConnector};
use libshelf::network::{Close, Connect, SendOutcome, send};
use std::io::{Read as _, Write as _};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

#[test]
fn loopback_exchange_in_pieces() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 512];
        while !request.ends_with(b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            assert!(n > 0);
            request.extend_from_slice(&buf[..n]);
        }
        for piece in [&b"HTTP/1.1 200 OK\r\nConte"[..], b"nt-Length: 5\r\n\r\nHe", b"llo"] {
            stream.write_all(piece).unwrap();
            stream.flush().unwrap();
            thread::sleep(Duration::from_millis(20));
        }
        String::from_utf8(request).unwrap()
    });

    let mut conn =
        TcpConnection::open("127.0.0.1", port, AddressFamily::Inet, SocketOptions::default())
            .unwrap();
    let request = compute_get_request("127.0.0.1", "/books", None, &[], Some("tok"));
    assert_eq!(send(&mut conn, &request), Ok(SendOutcome::Complete));
    let raw = receive_from_server(&mut conn).unwrap();
    conn.close().unwrap();

    assert!(raw.is_complete());
    assert_eq!(raw.bytes(), b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nHello");
    let seen = server.join().unwrap();
    assert!(seen.starts_with("GET /books HTTP/1.1\r\n"));
    assert!(seen.contains("Authorization: Bearer tok\r\n"));
}

#[test]
fn connector_parses_remote() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let mut connector = TcpConnector::default();
    let conn = connector.connect(&addr.to_string()).unwrap();
    assert_eq!(conn.peer(), addr);
    conn.close().unwrap();
}

#[test]
fn refused_connection() {
    // Bind then drop to get a port nobody listens on.
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let result = TcpConnection::open("127.0.0.1", port, AddressFamily::Inet, SocketOptions::default());
    assert!(matches!(result, Err(Error::Connect(_))));
}

#[test]
fn silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        thread::sleep(Duration::from_millis(300));
        drop(stream);
    });

    let options = SocketOptions {
        read_timeout: Some(Duration::from_millis(50)),
        ..SocketOptions::default()
    };
    let mut conn = TcpConnection::open("127.0.0.1", port, AddressFamily::Inet, options).unwrap();
    assert_eq!(receive_from_server(&mut conn).unwrap_err(), Error::Timeout);
    conn.close().unwrap();
    server.join().unwrap();
}
