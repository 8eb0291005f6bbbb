// Copyright (c) 2025 Hua Dict Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Request and response messages.
//!
//! Every message carries a `type` discriminator. Requests flow from the
//! caller to the worker; responses flow back, either as answers to a query
//! (tagged with the caller's correlation id) or as notifications about the
//! load in progress.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ErrorKind, HuaError};
use crate::ingest::Progress;

/// Opaque caller-supplied identifier echoed back in query responses.
///
/// Strings and integers get their own variants for convenience; any other
/// JSON value is carried verbatim in [`CorrelationId::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(untagged)]
pub enum CorrelationId {
    /// String identifier
    String(String),

    /// Integer identifier within `i64`
    Number(i64),

    /// Null or absent identifier
    #[default]
    Null,

    /// Any other JSON value: fractions, large integers, booleans, arrays, objects
    Other(Value),
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrelationId::String(s) => write!(f, "{s}"),
            CorrelationId::Number(n) => write!(f, "{n}"),
            CorrelationId::Null => write!(f, "null"),
            CorrelationId::Other(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for CorrelationId {
    fn from(value: &str) -> Self {
        CorrelationId::String(value.to_string())
    }
}

impl From<String> for CorrelationId {
    fn from(value: String) -> Self {
        CorrelationId::String(value)
    }
}

impl From<Value> for CorrelationId {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => CorrelationId::Null,
            Value::String(s) => CorrelationId::String(s),
            Value::Number(n) => match n.as_i64() {
                Some(i) => CorrelationId::Number(i),
                None => CorrelationId::Other(Value::Number(n)),
            },
            other => CorrelationId::Other(other),
        }
    }
}

impl From<i64> for CorrelationId {
    fn from(value: i64) -> Self {
        CorrelationId::Number(value)
    }
}

/// A request to the dictionary worker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Request {
    /// Stream a word list into the trie.
    #[serde(alias = "loadUrl")]
    Load {
        /// Source locator; the configured default when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,

        /// Estimated line count for progress; the configured default when
        /// absent, zero, negative or not a number
        #[serde(
            default,
            deserialize_with = "lenient_estimate",
            skip_serializing_if = "Option::is_none"
        )]
        estimated: Option<u64>,
    },

    /// Exact membership query.
    Contains {
        /// Correlation identifier
        #[serde(default)]
        id: CorrelationId,

        /// Raw term
        #[serde(default, deserialize_with = "nullable_string")]
        word: String,
    },

    /// Prefix existence query.
    IsPrefix {
        /// Correlation identifier
        #[serde(default)]
        id: CorrelationId,

        /// Raw prefix
        #[serde(default, deserialize_with = "nullable_string")]
        pref: String,
    },
}

impl Request {
    /// Builds a load request.
    pub fn load(url: impl Into<String>, estimated: Option<u64>) -> Self {
        Request::Load {
            url: Some(url.into()),
            estimated,
        }
    }

    /// Builds a membership query.
    pub fn contains(id: impl Into<CorrelationId>, word: impl Into<String>) -> Self {
        Request::Contains {
            id: id.into(),
            word: word.into(),
        }
    }

    /// Builds a prefix query.
    pub fn is_prefix(id: impl Into<CorrelationId>, pref: impl Into<String>) -> Self {
        Request::IsPrefix {
            id: id.into(),
            pref: pref.into(),
        }
    }

    /// Returns the query this request carries, if it is one.
    pub fn into_query(self) -> Option<Query> {
        match self {
            Request::Contains { id, word } => Some(Query {
                kind: QueryKind::Contains,
                term: word,
                id,
            }),
            Request::IsPrefix { id, pref } => Some(Query {
                kind: QueryKind::IsPrefix,
                term: pref,
                id,
            }),
            Request::Load { .. } => None,
        }
    }
}

/// Reads a string field that may be `null`, treating `null` as empty.
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads a line-count estimate from any JSON value.
///
/// Positive numbers, including fractional ones and numeric strings, are
/// accepted and rounded; everything else reads as absent.
fn lenient_estimate<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(estimate_from_value))
}

fn estimate_from_value(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return (n > 0).then_some(n);
    }
    let estimate = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (estimate.is_finite() && estimate >= 1.0).then(|| estimate.round() as u64)
}

/// The two query operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// Exact membership
    Contains,
    /// Prefix existence
    IsPrefix,
}

/// An ephemeral query; nothing about it is retained after answering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Which operation to run
    pub kind: QueryKind,
    /// Raw, unnormalized term
    pub term: String,
    /// Identifier to echo back
    pub id: CorrelationId,
}

/// A message from the dictionary worker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Response {
    /// Periodic load progress.
    Progress {
        /// Lines processed so far
        loaded: u64,
        /// Estimated completion, 1 to 99
        pct: u8,
    },

    /// Terminal notification of a completed load.
    Loaded {
        /// Total lines processed
        count: u64,
    },

    /// A failed load or an unusable request.
    Error {
        /// Failure category
        kind: ErrorKind,
        /// Human-readable description
        message: String,
    },

    /// Answer to a membership query.
    Contains {
        /// Identifier from the request
        id: CorrelationId,
        /// Whether the term is a stored word
        result: bool,
    },

    /// Answer to a prefix query.
    IsPrefix {
        /// Identifier from the request
        id: CorrelationId,
        /// Whether the term prefixes a stored word
        result: bool,
    },
}

impl Response {
    /// Builds the answer to `query`.
    pub fn answer(query: Query, result: bool) -> Self {
        match query.kind {
            QueryKind::Contains => Response::Contains { id: query.id, result },
            QueryKind::IsPrefix => Response::IsPrefix { id: query.id, result },
        }
    }

    /// Builds an error response from any service error.
    pub fn error(err: &HuaError) -> Self {
        Response::Error {
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    /// Returns the correlation id of a query answer.
    pub fn correlation_id(&self) -> Option<&CorrelationId> {
        match self {
            Response::Contains { id, .. } | Response::IsPrefix { id, .. } => Some(id),
            _ => None,
        }
    }
}

impl From<Progress> for Response {
    fn from(progress: Progress) -> Self {
        Response::Progress {
            loaded: progress.loaded,
            pct: progress.pct,
        }
    }
}
