//! Connection handling
//!
//! Manages a single client connection: reads requests, dispatches them and
//! sends responses, strictly one request at a time.

use crate::dispatch::Dispatcher;
use crate::protocol::{RespEncoder, RespParser, RespValue};
use anyhow::bail;
use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, warn};

/// Connection handler
pub struct Connection {
    /// TCP stream
    stream: TcpStream,

    /// Read buffer
    read_buffer: BytesMut,

    /// Write buffer
    write_buffer: BytesMut,
}

impl Connection {
    /// Create a new connection handler
    pub fn new(stream: TcpStream) -> Self {
        Connection {
            stream,
            read_buffer: BytesMut::with_capacity(4096),
            write_buffer: BytesMut::with_capacity(4096),
        }
    }

    /// Handle the connection
    ///
    /// Reads requests from the client, dispatches them and sends responses
    /// until the peer closes the socket.
    pub async fn handle(&mut self, dispatcher: &Dispatcher) -> anyhow::Result<()> {
        loop {
            let n = self.stream.read_buf(&mut self.read_buffer).await?;

            // Connection closed
            if n == 0 {
                if self.read_buffer.is_empty() {
                    return Ok(());
                }
                bail!("connection reset by peer");
            }

            debug!("read {} bytes", n);

            // Drain every complete request already buffered
            loop {
                match RespParser::parse_request(&mut self.read_buffer) {
                    Ok(Some(request)) => {
                        debug!("parsed request: {}", request);

                        let response = dispatcher.dispatch(request).await;

                        debug!("response: {}", response);
                        self.send_response(response).await?;
                    }
                    Ok(None) => {
                        debug!("awaiting a complete request");
                        break;
                    }
                    Err(e) => {
                        warn!("protocol error: {}", e);

                        // these bytes can never parse; drop them so the
                        // connection can carry on with the next request
                        self.read_buffer.clear();
                        self.send_response(RespValue::error("server error"))
                            .await?;
                        break;
                    }
                }
            }
        }
    }

    /// Send a response to the client
    async fn send_response(&mut self, response: RespValue) -> anyhow::Result<()> {
        self.write_buffer.clear();
        RespEncoder::encode_to(&mut self.write_buffer, &response);

        self.stream.write_all(&self.write_buffer).await?;
        self.stream.flush().await?;

        Ok(())
    }
}
