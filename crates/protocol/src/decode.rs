use crate::event::{RawRunEvent, StreamEvent, wire};

/// Classify a raw wire frame into the closed [`StreamEvent`] union.
///
/// Total: malformed payloads degrade to empty text or a fixed message,
/// and unknown event names map to [`StreamEvent::Ignored`], never an error.
pub fn decode(raw: &RawRunEvent) -> StreamEvent {
    match raw.event.as_str() {
        wire::MESSAGE_DELTA => StreamEvent::Delta(delta_text(&raw.data)),
        wire::RUN_FAILED => StreamEvent::RunFailed(run_failure_message(&raw.data)),
        wire::ERROR => StreamEvent::Error(error_message(&raw.data)),
        wire::DONE => StreamEvent::Done,
        _ => StreamEvent::Ignored,
    }
}

/// Concatenate the plain-text parts of a message delta payload.
///
/// A delta carries `delta.content[]`, where each part is tagged with a
/// `type`; only `"text"` parts contribute. Image/file parts are skipped
/// silently.
fn delta_text(data: &serde_json::Value) -> String {
    let mut text = String::new();
    if let Some(parts) = data["delta"]["content"].as_array() {
        for part in parts {
            if part["type"].as_str() == Some("text")
                && let Some(value) = part["text"]["value"].as_str()
            {
                text.push_str(value);
            }
        }
    }
    text
}

fn error_message(data: &serde_json::Value) -> String {
    if let Some(s) = data.as_str() {
        return s.to_string();
    }
    data["message"]
        .as_str()
        .unwrap_or("stream error")
        .to_string()
}

fn run_failure_message(data: &serde_json::Value) -> String {
    data["error"]["message"]
        .as_str()
        .or_else(|| data["last_error"]["message"].as_str())
        .unwrap_or("run failed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    fn raw(event: &str, data: serde_json::Value) -> RawRunEvent {
        RawRunEvent::new(event, data)
    }

    #[test]
    fn delta_concatenates_text_parts() {
        let event = raw(
            wire::MESSAGE_DELTA,
            json!({
                "delta": {
                    "content": [
                        {"type": "text", "text": {"value": "Hello"}},
                        {"type": "text", "text": {"value": ", world"}},
                    ]
                }
            }),
        );
        assert_eq!(decode(&event), StreamEvent::Delta("Hello, world".into()));
    }

    #[test]
    fn delta_skips_non_text_parts() {
        let event = raw(
            wire::MESSAGE_DELTA,
            json!({
                "delta": {
                    "content": [
                        {"type": "image_file", "image_file": {"file_id": "f1"}},
                        {"type": "text", "text": {"value": "caption"}},
                    ]
                }
            }),
        );
        assert_eq!(decode(&event), StreamEvent::Delta("caption".into()));
    }

    #[test]
    fn delta_with_malformed_payload_is_empty() {
        let event = raw(wire::MESSAGE_DELTA, json!({"delta": 42}));
        assert_eq!(decode(&event), StreamEvent::Delta(String::new()));
    }

    #[test]
    fn error_with_string_payload() {
        let event = raw(wire::ERROR, json!("rate limited"));
        assert_eq!(decode(&event), StreamEvent::Error("rate limited".into()));
    }

    #[test]
    fn error_with_object_payload() {
        let event = raw(wire::ERROR, json!({"message": "bad gateway"}));
        assert_eq!(decode(&event), StreamEvent::Error("bad gateway".into()));
    }

    #[test]
    fn error_without_message_uses_fixed_literal() {
        let event = raw(wire::ERROR, json!({"code": 500}));
        assert_eq!(decode(&event), StreamEvent::Error("stream error".into()));
    }

    #[test]
    fn run_failed_prefers_error_message() {
        let event = raw(
            wire::RUN_FAILED,
            json!({"error": {"message": "content filter"}}),
        );
        assert_eq!(
            decode(&event),
            StreamEvent::RunFailed("content filter".into())
        );
    }

    #[test]
    fn run_failed_falls_back_to_last_error() {
        let event = raw(
            wire::RUN_FAILED,
            json!({"last_error": {"message": "server_error"}}),
        );
        assert_eq!(
            decode(&event),
            StreamEvent::RunFailed("server_error".into())
        );
    }

    #[test]
    fn done_is_terminal_marker() {
        assert_eq!(decode(&raw(wire::DONE, json!("[DONE]"))), StreamEvent::Done);
    }

    #[test]
    fn unknown_events_are_ignored() {
        for name in [
            "thread.run.created",
            "thread.run.step.delta",
            "thread.message.completed",
            "",
        ] {
            assert_eq!(decode(&raw(name, json!({}))), StreamEvent::Ignored);
        }
    }
}
