//! SSE frame decoding for streamed chat responses.
//!
//! The wire format is line-oriented: each event is a `data: <json>` line and
//! the literal `data: [DONE]` line terminates the stream. Chunk boundaries
//! from the HTTP body are arbitrary, so lines are reassembled from a byte
//! buffer before decoding.

use super::ByteStream;
use crate::error::ApiError;
use futures_util::StreamExt;
use serde_json::Value;

/// Incremental decoder turning a raw response body into discrete JSON events.
///
/// The decoder is tied to one response body and is exhausted exactly once:
/// after it reports end-of-stream every further call returns `Ok(None)`.
pub struct SseFrameDecoder {
    stream: ByteStream,
    buffer: Vec<u8>,
    done: bool,
}

impl SseFrameDecoder {
    pub fn new(stream: ByteStream) -> Self {
        Self {
            stream,
            buffer: Vec::new(),
            done: false,
        }
    }

    /// Decode the next `data:` event payload.
    ///
    /// Returns `Ok(None)` once the terminal `[DONE]` sentinel is seen or the
    /// body ends. Lines without a `data:` prefix are ignored; a payload that
    /// fails to parse as JSON is logged and skipped, never fatal.
    pub async fn next_event(&mut self) -> Result<Option<Value>, ApiError> {
        loop {
            if self.done {
                return Ok(None);
            }

            while let Some(line) = self.take_buffered_line() {
                match decode_data_line(&line) {
                    DecodedLine::Event(value) => return Ok(Some(value)),
                    DecodedLine::Done => {
                        self.done = true;
                        return Ok(None);
                    }
                    DecodedLine::Skip => {}
                }
            }

            match self.stream.next().await {
                Some(Ok(chunk)) => self.buffer.extend_from_slice(&chunk),
                Some(Err(err)) => {
                    self.done = true;
                    return Err(err);
                }
                None => {
                    // Body ended without the sentinel; flush a trailing
                    // unterminated line before reporting end-of-stream.
                    self.done = true;
                    let line = std::mem::take(&mut self.buffer);
                    if line.is_empty() {
                        return Ok(None);
                    }
                    return match decode_data_line(&line) {
                        DecodedLine::Event(value) => Ok(Some(value)),
                        DecodedLine::Done | DecodedLine::Skip => Ok(None),
                    };
                }
            }
        }
    }

    fn take_buffered_line(&mut self) -> Option<Vec<u8>> {
        let newline = self.buffer.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.buffer.drain(..=newline).collect();
        line.pop();
        Some(line)
    }
}

enum DecodedLine {
    Event(Value),
    Done,
    Skip,
}

fn decode_data_line(line: &[u8]) -> DecodedLine {
    let text = String::from_utf8_lossy(line);
    let text = text.as_ref();
    let text = text.strip_suffix('\r').unwrap_or(text);

    let Some(payload) = text.strip_prefix("data:") else {
        return DecodedLine::Skip;
    };
    let payload = payload.strip_prefix(' ').unwrap_or(payload).trim_end();
    if payload == "[DONE]" {
        return DecodedLine::Done;
    }
    if payload.is_empty() {
        return DecodedLine::Skip;
    }

    match serde_json::from_str(payload) {
        Ok(value) => DecodedLine::Event(value),
        Err(err) => {
            tracing::warn!(error = %err, "dropping malformed SSE event payload");
            DecodedLine::Skip
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::{byte_stream, failing_byte_stream};
    use serde_json::json;

    async fn drain(decoder: &mut SseFrameDecoder) -> Vec<Value> {
        let mut events = Vec::new();
        while let Some(event) = decoder.next_event().await.unwrap() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn yields_one_event_per_data_line_and_stops_at_done() {
        let mut decoder = SseFrameDecoder::new(byte_stream(&[
            "data: {\"n\":1}\n\ndata: {\"n\":2}\n\ndata: [DONE]\n\n",
        ]));
        let events = drain(&mut decoder).await;
        assert_eq!(events, vec![json!({"n":1}), json!({"n":2})]);
    }

    #[tokio::test]
    async fn malformed_event_is_skipped_not_fatal() {
        let mut decoder = SseFrameDecoder::new(byte_stream(&[
            "data: {not json}\n\ndata: {\"ok\":true}\n\ndata: [DONE]\n\n",
        ]));
        let events = drain(&mut decoder).await;
        assert_eq!(events, vec![json!({"ok":true})]);
    }

    #[tokio::test]
    async fn non_data_lines_are_ignored() {
        let mut decoder = SseFrameDecoder::new(byte_stream(&[
            ": keep-alive\nevent: message\nid: 3\ndata: {\"n\":1}\n\ndata: [DONE]\n\n",
        ]));
        let events = drain(&mut decoder).await;
        assert_eq!(events, vec![json!({"n":1})]);
    }

    #[tokio::test]
    async fn lines_split_across_chunks_are_reassembled() {
        let mut decoder = SseFrameDecoder::new(byte_stream(&[
            "data: {\"part",
            "\":\"whole\"}",
            "\n\ndata: [DONE]\n\n",
        ]));
        let events = drain(&mut decoder).await;
        assert_eq!(events, vec![json!({"part":"whole"})]);
    }

    #[tokio::test]
    async fn crlf_line_endings_are_accepted() {
        let mut decoder =
            SseFrameDecoder::new(byte_stream(&["data: {\"n\":1}\r\n\r\ndata: [DONE]\r\n"]));
        let events = drain(&mut decoder).await;
        assert_eq!(events, vec![json!({"n":1})]);
    }

    #[tokio::test]
    async fn events_after_done_are_not_delivered() {
        let mut decoder = SseFrameDecoder::new(byte_stream(&[
            "data: [DONE]\n\ndata: {\"late\":true}\n\n",
        ]));
        assert_eq!(decoder.next_event().await.unwrap(), None);
        assert_eq!(decoder.next_event().await.unwrap(), None);
    }

    #[tokio::test]
    async fn body_ending_without_sentinel_flushes_trailing_line() {
        // no trailing newline on the final event
        let mut decoder = SseFrameDecoder::new(byte_stream(&["data: {\"n\":1}"]));
        assert_eq!(decoder.next_event().await.unwrap(), Some(json!({"n":1})));
        assert_eq!(decoder.next_event().await.unwrap(), None);
        // exhausted for good
        assert_eq!(decoder.next_event().await.unwrap(), None);
    }

    #[tokio::test]
    async fn transport_error_ends_the_sequence() {
        let mut decoder =
            SseFrameDecoder::new(failing_byte_stream("data: {\"n\":1}\n\n", "reset by peer"));
        assert_eq!(decoder.next_event().await.unwrap(), Some(json!({"n":1})));
        let err = decoder.next_event().await.unwrap_err();
        assert!(err.to_string().contains("reset by peer"));
        assert_eq!(decoder.next_event().await.unwrap(), None);
    }

    #[tokio::test]
    async fn multibyte_content_split_mid_character_survives() {
        let full = "data: {\"s\":\"héllo\"}\n\ndata: [DONE]\n\n";
        let bytes = full.as_bytes();
        // split inside the two-byte 'é' sequence
        let split = full.find('é').unwrap() + 1;
        let (a, b) = bytes.split_at(split);
        let mut decoder = SseFrameDecoder::new(crate::testsupport::raw_byte_stream(vec![
            a.to_vec(),
            b.to_vec(),
        ]));
        let events = drain(&mut decoder).await;
        assert_eq!(events, vec![json!({"s":"héllo"})]);
    }

    #[cfg(feature = "fuzz-tests")]
    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn arbitrary_string_payloads_round_trip(
                payloads in proptest::collection::vec(
                    proptest::string::string_regex("[ -~]{0,24}").expect("regex"),
                    0..8
                )
            ) {
                let mut stream = String::new();
                for payload in &payloads {
                    stream.push_str("data: ");
                    stream.push_str(&serde_json::to_string(payload).expect("encode"));
                    stream.push_str("\n\n");
                }
                stream.push_str("data: [DONE]\n\n");

                let runtime = tokio::runtime::Builder::new_current_thread()
                    .build()
                    .expect("runtime");
                let decoded = runtime.block_on(async {
                    let mut decoder = SseFrameDecoder::new(byte_stream(&[stream.as_str()]));
                    let mut events = Vec::new();
                    while let Some(event) = decoder.next_event().await.expect("event") {
                        events.push(event);
                    }
                    events
                });

                let expected: Vec<Value> =
                    payloads.iter().map(|p| Value::String(p.clone())).collect();
                prop_assert_eq!(decoded, expected);
            }
        }
    }
}
