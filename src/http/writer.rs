use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::parser::HTTP_VERSION;
use crate::http::response::Response;

pub fn serialize_response(resp: &Response) -> BytesMut {
    let mut buf = BytesMut::with_capacity(128 + resp.body.len());

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.put_slice(status_line.as_bytes());

    for (k, v) in &resp.headers {
        buf.put_slice(k.as_bytes());
        buf.put_u8(b':');
        buf.put_slice(v.as_bytes());
        buf.put_slice(b"\r\n");
    }

    // Header/body separator
    buf.put_slice(b"\r\n");

    buf.put_slice(&resp.body);

    buf
}

pub struct ResponseWriter {
    buffer: BytesMut,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            buffer: BytesMut::from(bytes),
        }
    }

    /// Drains the buffer onto `stream` and flushes it.
    ///
    /// Safe to call again after a partial failure: bytes already written are
    /// not sent twice.
    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while !self.buffer.is_empty() {
            let n = stream.write_buf(&mut self.buffer).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }
        }

        stream.flush().await?;
        Ok(())
    }
}
