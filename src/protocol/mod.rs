// Copyright (c) 2025 Hua Dict Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Message protocol of the dictionary service.
//!
//! | Request | Response(s) |
//! |---|---|
//! | `load {url?, estimated?}` | `progress {loaded, pct}`*, then `loaded {count}` or `error {kind, message}` |
//! | `contains {id, word}` | `contains {id, result}` |
//! | `isPrefix {id, pref}` | `isPrefix {id, result}` |
//!
//! # Example
//!
//! ```
//! use hua_dict_lib::protocol::{decode_request, encode_response, Request, Response};
//!
//! let request = decode_request(r#"{"type":"contains","id":"q1","word":"Apple"}"#).unwrap();
//! assert_eq!(request, Request::contains("q1", "Apple"));
//!
//! let line = encode_response(&Response::Contains { id: "q1".into(), result: true });
//! assert_eq!(line, r#"{"type":"contains","id":"q1","result":true}"#);
//! ```

pub mod codec;
pub mod dispatcher;
pub mod messages;

pub use codec::{decode_line, decode_request, encode_response};
pub use dispatcher::QueryDispatcher;
pub use messages::{CorrelationId, Query, QueryKind, Request, Response};
