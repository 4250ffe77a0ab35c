//! Line-oriented TCP transport.
//!
//! Each client gets its own thread. Requests from every client are applied
//! one at a time through the shared processor lock, in the order the lock
//! admits them.

use std::{
    io::{self, BufRead, BufReader, BufWriter, Read, Write},
    net::{TcpListener, TcpStream},
    sync::{Arc, Mutex, PoisonError},
    thread,
};

use anyhow::{Context, Result};
use toy_robot_system_processor::CommandProcessor;
use tracing::{debug, info, warn};

use crate::protocol::{self, RequestError, Response};

/// Longest request line accepted, excluding the line terminator.
pub(crate) const MAX_REQUEST_BYTES: usize = 1024;

/// Processor handle shared between client threads.
pub(crate) type SharedProcessor = Arc<Mutex<CommandProcessor>>;

/// Accepts clients until the listener fails irrecoverably.
pub(crate) fn serve(listener: TcpListener, processor: SharedProcessor) -> Result<()> {
    let local = listener
        .local_addr()
        .context("failed to resolve listener address")?;
    info!(%local, "listening for robot commands");

    for stream in listener.incoming() {
        let stream = match stream {
            Ok(stream) => stream,
            Err(error) => {
                warn!(%error, "failed to accept client");
                continue;
            }
        };
        let processor = Arc::clone(&processor);
        let _handle = thread::Builder::new()
            .name("robot-client".to_owned())
            .spawn(move || {
                if let Err(error) = handle_client(stream, &processor) {
                    warn!("client session ended with an error: {error:#}");
                }
            })
            .context("failed to spawn client thread")?;
    }
    Ok(())
}

/// Serves a single client: one JSON response line per request line.
pub(crate) fn handle_client(stream: TcpStream, processor: &Mutex<CommandProcessor>) -> Result<()> {
    let peer = stream.peer_addr().context("failed to resolve client address")?;
    info!(%peer, "client connected");

    let mut reader = BufReader::new(
        stream
            .try_clone()
            .context("failed to clone client stream")?,
    );
    let mut writer = BufWriter::new(stream);
    let mut buffer = Vec::with_capacity(MAX_REQUEST_BYTES);

    while let Some(request) =
        read_request(&mut reader, &mut buffer).context("failed to read request line")?
    {
        let response = match request {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => {
                debug!(%peer, request = %line, "request received");
                // Transitions are atomic; a poisoned lock still guards a whole robot.
                let mut processor = processor.lock().unwrap_or_else(PoisonError::into_inner);
                protocol::handle_line(&mut processor, &line)
            }
            Err(error) => {
                warn!(%peer, %error, "unreadable request");
                Response::rejected(&error)
            }
        };
        let json = response.to_json().context("failed to encode response")?;
        writeln!(writer, "{json}").context("failed to write response")?;
        writer.flush().context("failed to flush response")?;
    }

    info!(%peer, "client disconnected");
    Ok(())
}

/// Reads the next request line, at most [`MAX_REQUEST_BYTES`] long.
///
/// Returns `None` at end of input. Over-long lines are discarded up to their
/// terminator and undecodable lines are reported, so the session continues.
pub(crate) fn read_request<R: BufRead>(
    reader: &mut R,
    buffer: &mut Vec<u8>,
) -> io::Result<Option<Result<String, RequestError>>> {
    buffer.clear();
    let limit = MAX_REQUEST_BYTES as u64 + 1;
    if reader.by_ref().take(limit).read_until(b'\n', buffer)? == 0 {
        return Ok(None);
    }

    if buffer.last() == Some(&b'\n') {
        let _ = buffer.pop();
    } else if buffer.len() > MAX_REQUEST_BYTES {
        discard_line(reader)?;
        return Ok(Some(Err(RequestError::TooLong {
            limit: MAX_REQUEST_BYTES,
        })));
    }
    if buffer.last() == Some(&b'\r') {
        let _ = buffer.pop();
    }

    Ok(Some(
        std::str::from_utf8(buffer)
            .map(str::to_owned)
            .map_err(|_| RequestError::InvalidEncoding),
    ))
}

fn discard_line<R: BufRead>(reader: &mut R) -> io::Result<()> {
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Ok(());
        }
        match available.iter().position(|&byte| byte == b'\n') {
            Some(end) => {
                reader.consume(end + 1);
                return Ok(());
            }
            None => {
                let consumed = available.len();
                reader.consume(consumed);
            }
        }
    }
}
