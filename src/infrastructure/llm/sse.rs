//! SSE re-framing for streaming responses.
//!
//! Network chunks do not align with event boundaries: one data line may
//! arrive split across two reads, or several lines may share one read. The
//! adapter buffers the unterminated tail so every complete `data:` payload
//! comes out exactly once, in delivery order.

use std::collections::VecDeque;
use std::pin::Pin;

use futures::stream::{self, Stream, StreamExt};

use super::http_client::ByteStream;
use crate::domain::DomainError;

struct Framer {
    bytes: ByteStream,
    buffer: String,
    ready: VecDeque<Result<String, DomainError>>,
    done: bool,
}

/// The payload of every complete `data:` line, in delivery order. Transport
/// errors pass through in place.
pub(super) fn data_lines(
    bytes: ByteStream,
) -> Pin<Box<dyn Stream<Item = Result<String, DomainError>> + Send>> {
    let framer = Framer {
        bytes,
        buffer: String::new(),
        ready: VecDeque::new(),
        done: false,
    };

    Box::pin(stream::unfold(framer, |mut framer| async move {
        loop {
            if let Some(item) = framer.ready.pop_front() {
                return Some((item, framer));
            }
            if framer.done {
                return None;
            }

            match framer.bytes.next().await {
                Some(Ok(chunk)) => {
                    framer.buffer.push_str(&String::from_utf8_lossy(&chunk));
                    while let Some(pos) = framer.buffer.find('\n') {
                        let line: String = framer.buffer.drain(..=pos).collect();
                        if let Some(data) = data_payload(&line) {
                            framer.ready.push_back(Ok(data));
                        }
                    }
                }
                Some(Err(e)) => framer.ready.push_back(Err(e)),
                None => {
                    framer.done = true;
                    // A missing final newline still terminates the last line.
                    let tail = std::mem::take(&mut framer.buffer);
                    if let Some(data) = data_payload(&tail) {
                        framer.ready.push_back(Ok(data));
                    }
                }
            }
        }
    }))
}

fn data_payload(line: &str) -> Option<String> {
    line.trim_end().strip_prefix("data: ").map(str::to_string)
}
