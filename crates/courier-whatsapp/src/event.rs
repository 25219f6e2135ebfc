// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire format of the whatsapp-web bridge.
//!
//! The bridge forwards `message_create` payloads as JSON text frames and
//! accepts `reply` and `typing` frames back. Field names mirror the
//! whatsapp-web.js event shape (`fromMe`, `hasMedia`, `_serialized`).

use courier_core::InboundEvent;
use serde::{Deserialize, Serialize};

/// A parsed frame from the bridge.
#[derive(Debug)]
pub enum ParsedFrame {
    /// An inbound message event.
    Event(InboundEvent),
    /// A bridge state notification (ready, authenticated, disconnected, ...).
    State(String),
    /// A frame Courier does not act on.
    Ignored,
}

/// Identifier bag attached to every bridge message.
///
/// Stored verbatim as the message's opaque metadata; the core never
/// interprets it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IdBag {
    #[serde(default, rename = "fromMe")]
    pub from_me: bool,
    #[serde(default)]
    pub remote: String,
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "_serialized")]
    pub serialized: String,
}

#[derive(Debug, Deserialize)]
struct MessageFrame {
    from: String,
    #[serde(default)]
    body: String,
    #[serde(default, rename = "fromMe")]
    from_me: bool,
    #[serde(default, rename = "hasMedia")]
    has_media: bool,
    #[serde(default)]
    id: Option<IdBag>,
}

#[derive(Debug, Deserialize)]
struct RawFrame {
    #[serde(rename = "type")]
    type_: String,
    #[serde(default)]
    state: Option<String>,
    #[serde(flatten)]
    rest: serde_json::Value,
}

/// Outbound reply frame.
#[derive(Debug, Serialize)]
pub struct ReplyFrame<'a> {
    #[serde(rename = "type")]
    pub type_: &'static str,
    pub id: &'a str,
    pub to: &'a str,
    pub body: &'a str,
}

/// Outbound typing-indicator frame.
#[derive(Debug, Serialize)]
pub struct TypingFrame<'a> {
    #[serde(rename = "type")]
    pub type_: &'static str,
    pub to: &'a str,
}

/// Parses one bridge text frame.
pub fn parse_frame(text: &str) -> Result<ParsedFrame, serde_json::Error> {
    let raw: RawFrame = serde_json::from_str(text)?;
    match raw.type_.as_str() {
        "message" => {
            let frame: MessageFrame = serde_json::from_value(raw.rest)?;
            let bag = frame.id.unwrap_or_default();
            let event_id = if bag.serialized.is_empty() {
                bag.id.clone()
            } else {
                bag.serialized.clone()
            };
            let metadata = serde_json::to_string(&bag).ok();
            Ok(ParsedFrame::Event(InboundEvent {
                id: event_id,
                sender: frame.from,
                body: frame.body,
                from_self: frame.from_me,
                has_media: frame.has_media,
                metadata,
            }))
        }
        "state" => Ok(ParsedFrame::State(raw.state.unwrap_or_default())),
        _ => Ok(ParsedFrame::Ignored),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_frame_parses_to_inbound_event() {
        let text = r#"{
            "type": "message",
            "from": "15551234@c.us",
            "body": "hello there",
            "fromMe": false,
            "hasMedia": false,
            "id": {
                "fromMe": false,
                "remote": "15551234@c.us",
                "id": "3EB0A9",
                "_serialized": "false_15551234@c.us_3EB0A9"
            }
        }"#;

        let parsed = parse_frame(text).unwrap();
        let event = match parsed {
            ParsedFrame::Event(event) => event,
            other => panic!("expected event, got {other:?}"),
        };
        assert_eq!(event.sender, "15551234@c.us");
        assert_eq!(event.body, "hello there");
        assert_eq!(event.id, "false_15551234@c.us_3EB0A9");
        assert!(!event.from_self);
        assert!(!event.has_media);

        let bag: IdBag = serde_json::from_str(event.metadata.as_deref().unwrap()).unwrap();
        assert_eq!(bag.remote, "15551234@c.us");
        assert_eq!(bag.id, "3EB0A9");
    }

    #[test]
    fn media_message_without_body_parses() {
        let text = r#"{"type": "message", "from": "15551234@c.us", "hasMedia": true}"#;
        let parsed = parse_frame(text).unwrap();
        match parsed {
            ParsedFrame::Event(event) => {
                assert!(event.body.is_empty());
                assert!(event.has_media);
            }
            other => panic!("expected event, got {other:?}"),
        }
    }

    #[test]
    fn state_frame_parses() {
        let text = r#"{"type": "state", "state": "ready"}"#;
        match parse_frame(text).unwrap() {
            ParsedFrame::State(state) => assert_eq!(state, "ready"),
            other => panic!("expected state, got {other:?}"),
        }
    }

    #[test]
    fn unknown_frame_type_is_ignored() {
        let text = r#"{"type": "qr", "data": "..."}"#;
        assert!(matches!(parse_frame(text).unwrap(), ParsedFrame::Ignored));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_frame("not json").is_err());
    }

    #[test]
    fn reply_frame_serializes_expected_shape() {
        let frame = ReplyFrame {
            type_: "reply",
            id: "out-1",
            to: "15551234@c.us",
            body: "hi!",
        };
        let value = serde_json::to_value(&frame).unwrap();
        assert_eq!(value["type"], "reply");
        assert_eq!(value["to"], "15551234@c.us");
        assert_eq!(value["body"], "hi!");
    }
}
