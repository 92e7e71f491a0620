//! Decoding of the JSON status document a server returns.

use mcstat_common::status::Status;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ProtocolError;
use crate::packet;

#[derive(Debug, Deserialize)]
struct StatusDocument {
    players: Option<Players>,
    description: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Players {
    max: Option<i64>,
    online: Option<i64>,
}

/// Decodes a full status response frame body into a [`Status`].
pub fn decode_status_frame(frame: &[u8]) -> Result<Status, ProtocolError> {
    let document: &str = packet::parse_status_response(frame)?;
    decode_status_document(document)
}

pub fn decode_status_document(document: &str) -> Result<Status, ProtocolError> {
    let doc: StatusDocument =
        serde_json::from_str(document).map_err(|e| ProtocolError::InvalidJson(e.to_string()))?;

    let players: Players = doc.players.ok_or(ProtocolError::MissingField("players"))?;
    let max_players: i64 = players.max.ok_or(ProtocolError::MissingField("players.max"))?;
    let online_players: i64 = players
        .online
        .ok_or(ProtocolError::MissingField("players.online"))?;

    let description: Value = match doc.description {
        Some(Value::Null) | None => return Err(ProtocolError::MissingField("description")),
        Some(value) => value,
    };

    Ok(Status {
        max_players,
        online_players,
        description: flatten_description(&description)?,
    })
}

/// Collapses a description into plain text.
///
/// Plain strings pass through. Chat components contribute their `text`
/// followed by each of their `extra` children in order; arrays concatenate
/// their elements.
pub fn flatten_description(value: &Value) -> Result<String, ProtocolError> {
    let mut out: String = String::new();
    append_component(value, &mut out)?;
    Ok(out)
}

fn append_component(value: &Value, out: &mut String) -> Result<(), ProtocolError> {
    match value {
        Value::String(text) => out.push_str(text),
        Value::Object(component) => {
            if let Some(Value::String(text)) = component.get("text") {
                out.push_str(text);
            }
            if let Some(Value::Array(extra)) = component.get("extra") {
                for child in extra {
                    append_component(child, out)?;
                }
            }
        }
        Value::Array(parts) => {
            for part in parts {
                append_component(part, out)?;
            }
        }
        Value::Null => return Err(ProtocolError::UnsupportedDescription("null")),
        Value::Bool(_) => return Err(ProtocolError::UnsupportedDescription("bool")),
        Value::Number(_) => return Err(ProtocolError::UnsupportedDescription("number")),
    }
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
