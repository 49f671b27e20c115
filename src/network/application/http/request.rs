//! HTTP/1.1 request assembly.
//!
//! Builders are pure: they allocate the returned bytes and do nothing else.
//! Inputs are validated by the caller before they get here, so building never
//! fails.
//!
//! Header order on the wire:
//!
//! ```text
//! <METHOD> <path>[?<query>] HTTP/1.1
//! Authorization: Bearer <token>      (when a token is given)
//! HOST: <host>
//! Content-Type: <type>               (POST only)
//! Content-Length: <body bytes>       (POST only)
//! Cookie: <c0>[: <c1>...]            (when cookies are given)
//!
//! <body>                             (POST only, verbatim)
//! ```

const CRLF: &[u8] = b"\r\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

/// A POST payload and its media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Body<'a> {
    pub content_type: &'a str,
    pub data: &'a [u8],
}

/// One request, serialized once with [`to_bytes`](Request::to_bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    pub method: Method,
    pub host: &'a str,
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub token: Option<&'a str>,
    pub cookies: &'a [&'a str],
    pub body: Option<Body<'a>>,
}

impl<'a> Request<'a> {
    fn new(method: Method, host: &'a str, path: &'a str) -> Self {
        Self {
            method,
            host,
            path,
            query: None,
            token: None,
            cookies: &[],
            body: None,
        }
    }

    pub fn get(host: &'a str, path: &'a str) -> Self {
        Self::new(Method::Get, host, path)
    }

    pub fn delete(host: &'a str, path: &'a str) -> Self {
        Self::new(Method::Delete, host, path)
    }

    pub fn post(host: &'a str, path: &'a str, content_type: &'a str, data: &'a [u8]) -> Self {
        Self {
            body: Some(Body { content_type, data }),
            ..Self::new(Method::Post, host, path)
        }
    }

    pub fn query(mut self, query: Option<&'a str>) -> Self {
        self.query = query;
        self
    }

    pub fn bearer(mut self, token: Option<&'a str>) -> Self {
        self.token = token;
        self
    }

    pub fn cookies(mut self, cookies: &'a [&'a str]) -> Self {
        self.cookies = cookies;
        self
    }

    /// Serialize into wire-ready bytes.
    ///
    /// The query string is only emitted for methods without a body.
    /// `Content-Length` is always the byte length of the body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let body_len = self.body.map_or(0, |b| b.data.len());
        let mut out = Vec::with_capacity(128 + self.path.len() + body_len);

        // Request line
        out.extend_from_slice(self.method.as_str().as_bytes());
        out.push(b' ');
        out.extend_from_slice(self.path.as_bytes());
        if let (Some(query), None) = (self.query, self.body) {
            out.push(b'?');
            out.extend_from_slice(query.as_bytes());
        }
        out.extend_from_slice(b" HTTP/1.1");
        out.extend_from_slice(CRLF);

        if let Some(token) = self.token {
            push_header(&mut out, "Authorization", &["Bearer ", token]);
        }

        push_header(&mut out, "HOST", &[self.host]);

        if let Some(body) = self.body {
            push_header(&mut out, "Content-Type", &[body.content_type]);
            push_header(&mut out, "Content-Length", &[&body.data.len().to_string()]);
        }

        if let Some((first, rest)) = self.cookies.split_first() {
            out.extend_from_slice(b"Cookie: ");
            out.extend_from_slice(first.as_bytes());
            for cookie in rest {
                out.extend_from_slice(b": ");
                out.extend_from_slice(cookie.as_bytes());
            }
            out.extend_from_slice(CRLF);
        }

        out.extend_from_slice(CRLF);

        if let Some(body) = self.body {
            out.extend_from_slice(body.data);
        }

        out
    }
}

fn push_header(out: &mut Vec<u8>, name: &str, value: &[&str]) {
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(b": ");
    for part in value {
        out.extend_from_slice(part.as_bytes());
    }
    out.extend_from_slice(CRLF);
}

/// Build a GET request. `query` and `cookies` may be empty.
pub fn compute_get_request(
    host: &str,
    path: &str,
    query: Option<&str>,
    cookies: &[&str],
    token: Option<&str>,
) -> Vec<u8> {
    Request::get(host, path)
        .query(query)
        .cookies(cookies)
        .bearer(token)
        .to_bytes()
}

/// Build a POST request carrying `body` verbatim.
pub fn compute_post_request(
    host: &str,
    path: &str,
    content_type: &str,
    body: &[u8],
    cookies: &[&str],
    token: Option<&str>,
) -> Vec<u8> {
    Request::post(host, path, content_type, body)
        .cookies(cookies)
        .bearer(token)
        .to_bytes()
}

/// Build a DELETE request. Same shape as GET.
pub fn compute_delete_request(
    host: &str,
    path: &str,
    query: Option<&str>,
    cookies: &[&str],
    token: Option<&str>,
) -> Vec<u8> {
    Request::delete(host, path)
        .query(query)
        .cookies(cookies)
        .bearer(token)
        .to_bytes()
}
