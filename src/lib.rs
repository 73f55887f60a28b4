//! Kastle - minimal HTTP/1.1 server framework
//!
//! Parses one request per connection, dispatches it through an exact-match
//! [`Router`](router::Router) and writes the handler's response back before
//! closing the socket.

pub mod config;
pub mod http;
pub mod router;
pub mod server;
