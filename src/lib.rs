//! Hua Dictionary Service Library
//!
//! This library contains the core components of the Hua dictionary service:
//! a grow-only prefix tree, the streaming pipeline that fills it from a
//! newline-delimited word list, and the message-driven worker that answers
//! membership and prefix queries while a load is still running.
//!
//! # Architecture
//!
//! - [`source`] turns a locator into a stream of byte chunks
//! - [`ingest`] decodes chunks, splits lines and feeds the trie
//! - [`normalize`] maps raw lines and query terms to tokens
//! - [`data_structures`] holds the trie itself
//! - [`protocol`] defines the request/response messages and query dispatch
//! - [`service`] runs the single worker task that owns the trie
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use hua_dict_lib::config::HuaConfig;
//! use hua_dict_lib::protocol::{Request, Response};
//! use hua_dict_lib::service::DictionaryService;
//! use hua_dict_lib::source::MemorySource;
//!
//! # tokio_test::block_on(async {
//! let source = MemorySource::new().with_body("mem://words", ["Apple\n", "banana\n"]);
//! let mut dictionary = DictionaryService::spawn(&HuaConfig::default(), Arc::new(source));
//!
//! dictionary.send(Request::load("mem://words", None)).await.unwrap();
//! assert_eq!(dictionary.recv().await, Some(Response::Loaded { count: 2 }));
//!
//! dictionary.send(Request::is_prefix("q1", "BAN")).await.unwrap();
//! assert_eq!(
//!     dictionary.recv().await,
//!     Some(Response::IsPrefix { id: "q1".into(), result: true })
//! );
//! # });
//! ```

pub mod config;
pub mod data_structures;
pub mod error;
pub mod ingest;
pub mod normalize;
pub mod protocol;
pub mod service;
pub mod source;

// Internal modules that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;

/// Version information for the Hua dictionary service.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
