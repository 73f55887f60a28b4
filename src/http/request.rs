use std::collections::HashMap;
use std::sync::LazyLock;

use crate::http::parser::split_header_line;

/// HTTP request methods.
///
/// The nine standard tokens. Anything else on the request line cannot match
/// a route and is answered with 404.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// CONNECT - Establish a tunnel
    CONNECT,
    /// OPTIONS - Describe communication options
    OPTIONS,
    /// TRACE - Message loop-back test
    TRACE,
    /// PATCH - Partial modification of a resource
    PATCH,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// # Arguments
    ///
    /// * `s` - String representation of the method (case-sensitive, uppercase)
    ///
    /// # Returns
    ///
    /// `Some(Method)` if the string matches a known method, `None` otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// # use kastle::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "HEAD" => Some(Method::HEAD),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "CONNECT" => Some(Method::CONNECT),
            "OPTIONS" => Some(Method::OPTIONS),
            "TRACE" => Some(Method::TRACE),
            "PATCH" => Some(Method::PATCH),
            _ => None,
        }
    }

    /// Returns the wire token for this method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::CONNECT => "CONNECT",
            Method::OPTIONS => "OPTIONS",
            Method::TRACE => "TRACE",
            Method::PATCH => "PATCH",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

static NO_HEADERS: LazyLock<HashMap<String, String>> = LazyLock::new(HashMap::new);

/// Header storage of a request.
///
/// The parser stores the raw header lines as they arrive. They are split
/// into a name/value map the first time anything reads them, and the raw
/// lines are dropped at that point.
#[derive(Debug, Clone)]
pub enum HeaderBlock {
    /// Header lines as received, CRLF stripped, not yet split.
    Raw(Vec<String>),
    /// Materialized name -> value map, keys as received.
    Parsed(HashMap<String, String>),
}

impl HeaderBlock {
    /// Returns the header map, splitting the raw lines on first use.
    pub fn materialize(&mut self) -> &HashMap<String, String> {
        if let HeaderBlock::Raw(lines) = self {
            *self = HeaderBlock::Parsed(fold_header_lines(lines));
        }

        match self {
            HeaderBlock::Parsed(map) => map,
            // Raw does not survive the branch above.
            HeaderBlock::Raw(_) => &*NO_HEADERS,
        }
    }

    /// Whether the raw lines have been split yet.
    pub fn is_materialized(&self) -> bool {
        matches!(self, HeaderBlock::Parsed(_))
    }
}

/// Splits raw lines into a map.
///
/// Names differing only in case are one header: a later line replaces an
/// earlier one and its spelling becomes the key.
fn fold_header_lines(lines: &[String]) -> HashMap<String, String> {
    let mut map: HashMap<String, String> = HashMap::new();

    for (name, value) in lines.iter().filter_map(|line| split_header_line(line)) {
        map.retain(|key, _| !key.eq_ignore_ascii_case(name));
        map.insert(name.to_string(), value.to_string());
    }

    map
}

impl Default for HeaderBlock {
    fn default() -> Self {
        HeaderBlock::Parsed(HashMap::new())
    }
}

/// Represents a parsed HTTP request from a client.
///
/// Built up incrementally by the connection while it reads the request and
/// handed to the route handler by value once parsing has finished. There are
/// no public setters: after parsing the request only ever gets read.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    version: String,
    headers: HeaderBlock,
    body: Vec<u8>,
}

/// Builder for constructing Request objects.
pub struct RequestBuilder {
    method: Option<Method>,
    path: Option<String>,
    version: Option<String>,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            path: None,
            version: None,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Adds a header, replacing any earlier one whose name matches
    /// case-insensitively.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.headers.retain(|name, _| !name.eq_ignore_ascii_case(&key));
        self.headers.insert(key, value.into());
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            method: self.method.ok_or("method missing")?,
            path: self.path.ok_or("path missing")?,
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            headers: HeaderBlock::Parsed(self.headers),
            body: self.body,
        })
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Request {
    pub(crate) fn new(method: Method, path: String, version: String, headers: HeaderBlock) -> Self {
        Self {
            method,
            path,
            version,
            headers,
            body: Vec::new(),
        }
    }

    pub(crate) fn set_body(&mut self, body: Vec<u8>) {
        self.body = body;
    }

    /// The request method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// The request target, e.g. `/index.html` or `/search?q=rust`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Protocol version token. Always `HTTP/1.1` for parsed requests.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The request body. Empty when no `Content-Length` was sent.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// All headers, keyed exactly as the client sent them.
    ///
    /// The first call splits the raw header lines; later calls return the
    /// same map.
    pub fn headers(&mut self) -> &HashMap<String, String> {
        self.headers.materialize()
    }

    /// Retrieves a header value by name.
    ///
    /// Names compare ASCII case-insensitively against the keys as received.
    /// A repeated header, in any spelling, keeps its last value.
    ///
    /// # Arguments
    ///
    /// * `key` - Header name to look up
    ///
    /// # Returns
    ///
    /// `Some(&str)` with the header value if present, `None` otherwise.
    pub fn header(&mut self, key: &str) -> Option<&str> {
        self.headers
            .materialize()
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    pub fn headers_materialized(&self) -> bool {
        self.headers.is_materialized()
    }
}
