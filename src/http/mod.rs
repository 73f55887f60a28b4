//! HTTP protocol implementation.
//!
//! One request and one response per connection; there is no keep-alive,
//! chunked encoding or streaming body support.
//!
//! # Architecture
//!
//! - **`connection`**: Drives a socket through the request-response state machine
//! - **`parser`**: Request-line, header-line and `Content-Length` framing rules
//! - **`request`**: HTTP request representation with lazily split headers
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes and writes HTTP responses to the client
//! - **`error`**: Parse errors and their mapping to status codes
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← request line, headers, body
//!        └──────┬──────┘
//!               │ Request parsed          │ ParseError
//!               ▼                         │
//!        ┌──────────────────┐             │
//!        │   Processing     │ ← handler   │
//!        └──────┬───────────┘             │
//!               │ Response ready          │ error response
//!               ▼                         │
//!        ┌──────────────────┐             │
//!        │    Writing       │ ◀───────────┘
//!        └──────┬───────────┘
//!               │ Response sent
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │ ← socket shut down on every path
//!        └──────────────────┘
//! ```
//!
//! A peer that closes before sending anything goes straight from `Reading`
//! to `Closed` without a response.

pub mod connection;
pub mod error;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
