//! `data:` URL and base64 payload helpers.

use crate::error::{ProcessingError, ProcessingResult};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use regex::Regex;
use std::sync::LazyLock;

static CONTENT_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^data:(.*?);base64").expect("valid content type pattern"));

/// Decoded `data:` URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Parse a `data:<type>;base64,<payload>` URL.
///
/// `default_type` is used when the URL carries no content type.
pub fn parse_data_url(input: &str, default_type: &str) -> ProcessingResult<DataUrl> {
    if !input.starts_with("data:") {
        return Err(ProcessingError::InvalidDataUrl(
            "must start with \"data:\"".to_string(),
        ));
    }

    let (meta, payload) = input
        .split_once(',')
        .ok_or_else(|| ProcessingError::InvalidDataUrl("missing payload".to_string()))?;

    let content_type = CONTENT_TYPE_RE
        .captures(meta)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|t| !t.is_empty())
        .unwrap_or(default_type)
        .to_string();

    let bytes = STANDARD.decode(payload.trim())?;
    Ok(DataUrl {
        content_type,
        bytes,
    })
}

/// Decode an image payload sent either as bare base64 or as a full data URL.
pub fn decode_base64_payload(payload: &str) -> ProcessingResult<Vec<u8>> {
    let body = if payload.starts_with("data:") {
        payload
            .split_once(',')
            .map(|(_, b)| b)
            .ok_or_else(|| ProcessingError::InvalidDataUrl("missing payload".to_string()))?
    } else {
        payload
    };
    let cleaned: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(STANDARD.decode(cleaned)?)
}

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_url_reads_content_type() {
        let parsed = parse_data_url("data:image/png;base64,AQID", "image/jpeg").unwrap();
        assert_eq!(parsed.content_type, "image/png");
        assert_eq!(parsed.bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_parse_data_url_falls_back_to_default_type() {
        let parsed = parse_data_url("data:;base64,AQID", "video/webm").unwrap();
        assert_eq!(parsed.content_type, "video/webm");
    }

    #[test]
    fn test_parse_data_url_rejects_plain_urls() {
        assert!(matches!(
            parse_data_url("https://example.com/a.png", "image/jpeg"),
            Err(ProcessingError::InvalidDataUrl(_))
        ));
        assert!(matches!(
            parse_data_url("data:image/png;base64", "image/jpeg"),
            Err(ProcessingError::InvalidDataUrl(_))
        ));
        assert!(matches!(
            parse_data_url("data:image/png;base64,@@@", "image/jpeg"),
            Err(ProcessingError::Base64(_))
        ));
    }

    #[test]
    fn test_decode_accepts_bare_and_prefixed_payloads() {
        let bytes: Vec<u8> = (0..=255).collect();
        let encoded = encode_base64(&bytes);
        assert_eq!(decode_base64_payload(&encoded).unwrap(), bytes);
        let prefixed = format!("data:image/jpeg;base64,{}", encoded);
        assert_eq!(decode_base64_payload(&prefixed).unwrap(), bytes);
    }
}
