//! Lazy chunk stream and shared line-decoding utilities
//!
//! Every provider response is consumed the same way: read one line, decode it
//! independently, and either yield a text chunk, skip the line, or stop. The
//! wire formats differ only in framing and extraction path, which each
//! provider supplies as a [`LineDecoder`].

use super::CancelToken;
use std::io::{BufRead, BufReader, Read};
use tracing::{debug, warn};

/// Outcome of decoding a single response line.
pub(crate) enum LineEvent {
    /// A non-empty text chunk to yield.
    Chunk(String),

    /// Terminal signal observed (e.g. the OpenAI `[DONE]` sentinel).
    Done,

    /// Line carried no text: blank, malformed, or missing the expected field.
    Skip,
}

/// Per-provider decoding of one response line.
///
/// A line that fails to parse or lacks the expected field must return
/// [`LineEvent::Skip`] so the stream continues; decode failures are never
/// fatal to the stream.
pub(crate) trait LineDecoder: Send {
    fn decode_line(&self, line: &str) -> LineEvent;
}

/// Strip SSE framing: returns the payload of a `data: ` line, `None` for
/// anything else.
pub(crate) fn sse_data(line: &str) -> Option<&str> {
    line.strip_prefix("data: ")
}

type BodyReader = BufReader<Box<dyn Read + Send + Sync + 'static>>;

/// A finite, single-consumer, pull-based stream of response text chunks.
///
/// The consumer drives progress: each `next()` call reads from the transport
/// until a chunk is decoded, the terminal signal is seen, the body ends, or
/// cancellation is observed. Once exhausted it only returns `None`; each
/// provider call produces a fresh stream.
pub struct CompletionStream {
    state: State,
}

enum State {
    /// A single synthetic chunk (configuration, transport, or protocol
    /// errors rendered as text), then end.
    Message(Option<String>),

    /// A live response body decoded line by line.
    Body {
        reader: BodyReader,
        decoder: Box<dyn LineDecoder>,
        cancel: CancelToken,
        finished: bool,
    },
}

impl CompletionStream {
    /// Stream that yields exactly one chunk of pre-rendered text.
    pub(crate) fn message(text: impl Into<String>) -> Self {
        Self {
            state: State::Message(Some(text.into())),
        }
    }

    /// Stream over a response body, decoded with the given line decoder.
    pub(crate) fn body(
        reader: Box<dyn Read + Send + Sync + 'static>,
        decoder: Box<dyn LineDecoder>,
        cancel: CancelToken,
    ) -> Self {
        Self {
            state: State::Body {
                reader: BufReader::new(reader),
                decoder,
                cancel,
                finished: false,
            },
        }
    }
}

impl Iterator for CompletionStream {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        match &mut self.state {
            State::Message(text) => text.take(),
            State::Body {
                reader,
                decoder,
                cancel,
                finished,
            } => {
                if *finished {
                    return None;
                }

                let mut line = String::new();
                loop {
                    // Checked before every read: already-decoded chunks were
                    // delivered, future reads are suppressed.
                    if cancel.is_cancelled() {
                        debug!("completion stream cancelled");
                        *finished = true;
                        return None;
                    }

                    line.clear();
                    match reader.read_line(&mut line) {
                        Ok(0) => {
                            *finished = true;
                            return None;
                        }
                        Ok(_) => {}
                        Err(e) => {
                            warn!(error = %e, "response stream read failed");
                            *finished = true;
                            return Some(format!("Error reading response stream: {}", e));
                        }
                    }

                    let trimmed = line.trim_end_matches(['\r', '\n']);
                    if trimmed.is_empty() {
                        continue;
                    }

                    match decoder.decode_line(trimmed) {
                        LineEvent::Chunk(text) => return Some(text),
                        LineEvent::Done => {
                            *finished = true;
                            return None;
                        }
                        LineEvent::Skip => continue,
                    }
                }
            }
        }
    }
}
