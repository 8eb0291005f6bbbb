// Copyright (c) 2025 Hua Dict Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! JSON text codec for messages.
//!
//! One message per line. Parse failures become `error` responses at the
//! caller's edge instead of reaching the worker.

use super::messages::{Request, Response};
use crate::error::protocol::ProtocolError;
use crate::error::ErrorKind;

/// Parses one JSON request.
pub fn decode_request(text: &str) -> Result<Request, ProtocolError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ProtocolError::InvalidRequest("empty message".to_string()));
    }
    Ok(serde_json::from_str(text)?)
}

/// Parses one raw input line.
///
/// Returns `Ok(None)` for a blank line. Bytes that are not UTF-8 are an
/// invalid request like any other malformed line.
pub fn decode_line(bytes: &[u8]) -> Result<Option<Request>, ProtocolError> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        ProtocolError::InvalidRequest(format!("request is not valid UTF-8: {e}"))
    })?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    decode_request(text).map(Some)
}

/// Renders a response as a single JSON line, without the trailing newline.
pub fn encode_response(response: &Response) -> String {
    serde_json::to_string(response).unwrap_or_else(|e| {
        // Responses contain only strings, integers and booleans.
        let fallback = Response::Error {
            kind: ErrorKind::Internal,
            message: format!("failed to encode response: {e}"),
        };
        serde_json::to_string(&fallback).unwrap_or_default()
    })
}
