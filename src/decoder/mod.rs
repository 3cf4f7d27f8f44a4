mod parsing;

use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::Value;
use tracing::debug;

use crate::client::ResponseEnvelope;
use crate::config::{ContentEncoding, SchemaMode};
use crate::error::{
    BODY_PREVIEW_CHARS, ForgeError, Result, TEXT_TAIL_CHARS, preview_head, preview_tail,
};

pub(crate) use parsing::extract_json_object;

/// Decoded generator output: relative path to UTF-8 file content.
pub type FileSet = BTreeMap<String, String>;

const COMPLETED: &str = "completed";

/// Text of every `output_text` segment of every `message` item, in emitted order.
pub fn extract_output_text(envelope: &ResponseEnvelope) -> String {
    envelope
        .output
        .iter()
        .filter(|item| item.kind == "message")
        .flat_map(|item| item.content.iter())
        .filter(|segment| segment.kind == "output_text")
        .filter_map(|segment| segment.text.as_deref())
        .collect()
}

pub fn decode(
    envelope: &ResponseEnvelope,
    mode: SchemaMode,
    encoding: ContentEncoding,
) -> Result<FileSet> {
    let status = envelope.status.as_deref().unwrap_or("missing");
    if status != COMPLETED {
        let details = envelope
            .incomplete_details
            .as_ref()
            .map(Value::to_string)
            .unwrap_or_else(|| "{}".to_string());
        return Err(ForgeError::Contract(format!(
            "response not completed: status={status}, details={details}"
        )));
    }

    let text = extract_output_text(envelope);
    debug!(text = preview_head(&text, BODY_PREVIEW_CHARS), "extracted output text");
    if text.trim().is_empty() {
        return Err(ForgeError::Contract("service returned empty output text".into()));
    }

    let document = parse_document(&text, mode)?;
    decode_files(document, encoding)
}

fn parse_document(text: &str, mode: SchemaMode) -> Result<Value> {
    let candidate = match mode {
        SchemaMode::Strict => text,
        SchemaMode::BestEffort => extract_json_object(text).ok_or_else(|| {
            ForgeError::Contract(format!(
                "no JSON object found in output\n--- output tail ---\n{}",
                preview_tail(text, TEXT_TAIL_CHARS)
            ))
        })?,
    };

    serde_json::from_str(candidate).map_err(|err| {
        ForgeError::Contract(format!(
            "JSON parse failed: {err}\n--- output tail ---\n{}",
            preview_tail(text, TEXT_TAIL_CHARS)
        ))
    })
}

fn decode_files(document: Value, encoding: ContentEncoding) -> Result<FileSet> {
    let field = encoding.files_field();
    let Value::Object(mut payload) = document else {
        return Err(ForgeError::Contract(format!(
            "output is not a JSON object; expected a '{field}' map"
        )));
    };

    let entries = match payload.remove(field) {
        Some(Value::Object(entries)) if !entries.is_empty() => entries,
        _ => {
            let keys: Vec<&String> = payload.keys().collect();
            return Err(ForgeError::Contract(format!(
                "no {field} returned; payload keys: {keys:?}"
            )));
        }
    };

    let mut files = FileSet::new();
    for (path, value) in entries {
        let Value::String(raw) = value else {
            return Err(ForgeError::Contract(format!(
                "content for {path} is not a string"
            )));
        };

        let content = match encoding {
            ContentEncoding::Plain => raw,
            ContentEncoding::Base64 => decode_base64(&path, &raw)?,
        };
        files.insert(path, content);
    }

    Ok(files)
}

/// Line breaks and other ASCII whitespace inside the encoded text are ignored.
pub(crate) fn decode_base64(path: &str, encoded: &str) -> Result<String> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = BASE64
        .decode(compact)
        .map_err(|err| ForgeError::Contract(format!("base64 decode failed for {path}: {err}")))?;
    String::from_utf8(bytes).map_err(|err| {
        ForgeError::Contract(format!("decoded content for {path} is not UTF-8: {err}"))
    })
}
