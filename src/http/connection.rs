use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::time::timeout;
use tracing::{debug, error, warn};

use crate::http::error::{ParseError, status_for};
use crate::http::parser::{CRLF, content_length, parse_header_line, parse_request_line};
use crate::http::request::{HeaderBlock, Method, Request};
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::server::Server;

/// One accepted socket, driven through exactly one request/response exchange.
pub struct Connection<R, W> {
    server: Arc<Server>,
    reader: BufReader<R>,
    writer: W,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

impl<R, W> Connection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(server: Arc<Server>, reader: R, writer: W) -> Self {
        Self {
            server,
            reader: BufReader::new(reader),
            writer,
            state: ConnectionState::Reading,
        }
    }

    /// Runs parse → dispatch → respond, then closes the connection.
    ///
    /// The writer is shut down on every path out of here, including when
    /// the exchange itself failed.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let result = self.exchange().await;
        let closed = self.close().await;

        result?;
        closed.context("failed to close connection")
    }

    async fn exchange(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => match self.parse().await {
                    Ok(Some(request)) => {
                        self.state = ConnectionState::Processing(request);
                    }
                    Ok(None) => {
                        debug!("peer closed before sending a request");
                        self.state = ConnectionState::Closed;
                    }
                    Err(e) => {
                        let status = status_for(e.kind());
                        warn!(status = status.as_u16(), error = %e, "rejecting request");
                        let response = Response::error(status, e.to_string());
                        self.state = ConnectionState::Writing(ResponseWriter::new(&response));
                    }
                },

                ConnectionState::Processing(request) => {
                    let response = self.dispatch(request).await;
                    self.state = ConnectionState::Writing(ResponseWriter::new(&response));
                }

                ConnectionState::Writing(mut writer) => {
                    let deadline = self.server.config().timeouts.write();
                    timeout(deadline, writer.write_to_stream(&mut self.writer))
                        .await
                        .context("write timeout")??;
                }

                ConnectionState::Closed => break,
            }
        }

        Ok(())
    }

    /// Reads one request off the connection.
    ///
    /// Returns `Ok(None)` if the peer closed without sending anything.
    pub async fn parse(&mut self) -> Result<Option<Request>, ParseError> {
        let timeouts = self.server.config().timeouts.clone();
        let mut budget = self.server.config().limits.max_header_bytes;

        let line = within(timeouts.request_line(), "request line", self.read_line(&mut budget)).await?;
        if line.is_empty() {
            return Ok(None);
        }

        let request_line = parse_request_line(&line)?;

        let method = Method::from_str(&request_line.method)
            .filter(|_| self.server.can_handle(&request_line.method, &request_line.target));
        let Some(method) = method else {
            return Err(ParseError::NotFound {
                method: request_line.method,
                target: request_line.target,
            });
        };

        let lines = within(timeouts.headers(), "headers", self.read_headers(&mut budget)).await?;
        let length = content_length(&lines)?;
        let mut request = Request::new(
            method,
            request_line.target,
            request_line.version,
            HeaderBlock::Raw(lines),
        );

        if let Some(length) = length {
            let limit = self.server.config().limits.max_body_bytes;
            if length > limit {
                return Err(ParseError::BodyTooLarge { size: length, limit });
            }

            let body = within(timeouts.body(), "body", self.read_body(length)).await?;
            request.set_body(body);
        }

        Ok(Some(request))
    }

    /// Writes `data` and flushes it.
    pub async fn send(&mut self, data: &[u8]) -> anyhow::Result<()> {
        ResponseWriter::from_bytes(data)
            .write_to_stream(&mut self.writer)
            .await
    }

    /// Shuts down the write side. Dropping the connection releases the rest.
    pub async fn close(&mut self) -> std::io::Result<()> {
        self.state = ConnectionState::Closed;
        self.writer.shutdown().await
    }

    async fn dispatch(&self, request: Request) -> Response {
        let method = request.method();
        let path = request.path().to_string();

        let Some(handler) = self.server.router().lookup(method.as_str(), &path) else {
            return Response::not_found();
        };

        // A panicking handler only takes its own task down.
        match tokio::spawn(async move { handler.call(request).await }).await {
            Ok(Ok(response)) => {
                debug!(%method, path = %path, status = response.status.as_u16(), "request handled");
                response
            }
            Ok(Err(e)) => {
                error!(%method, path = %path, error = ?e, "handler failed");
                Response::internal_error()
            }
            Err(e) => {
                error!(%method, path = %path, error = %e, "handler panicked");
                Response::internal_error()
            }
        }
    }

    /// Reads one line including its `\n`, charging it against `budget`.
    async fn read_line(&mut self, budget: &mut usize) -> Result<Vec<u8>, ParseError> {
        let limit = self.server.config().limits.max_header_bytes;
        let mut line = Vec::new();

        let n = (&mut self.reader)
            .take(*budget as u64)
            .read_until(b'\n', &mut line)
            .await?;

        if n == *budget && !line.ends_with(b"\n") {
            return Err(ParseError::HeadersTooLarge(limit));
        }

        *budget -= n;
        Ok(line)
    }

    async fn read_headers(&mut self, budget: &mut usize) -> Result<Vec<String>, ParseError> {
        let mut lines = Vec::new();

        loop {
            let line = self.read_line(budget).await?;

            if line.is_empty() {
                return Err(ParseError::UnterminatedHeaders);
            }

            if line == CRLF {
                return Ok(lines);
            }

            lines.push(parse_header_line(&line)?);
        }
    }

    async fn read_body(&mut self, length: usize) -> Result<Vec<u8>, ParseError> {
        let mut body = vec![0u8; length];
        self.reader.read_exact(&mut body).await?;
        Ok(body)
    }
}

async fn within<T, F>(deadline: Duration, phase: &'static str, fut: F) -> Result<T, ParseError>
where
    F: std::future::Future<Output = Result<T, ParseError>>,
{
    timeout(deadline, fut)
        .await
        .map_err(|_| ParseError::Timeout(phase))?
}
