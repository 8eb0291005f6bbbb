// Copyright (c) 2025 Hua Dict Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Query dispatch.
//!
//! The dispatcher is stateless: it normalizes the raw term with the same
//! rules ingestion uses, runs the matching trie operation, and tags the
//! answer with the caller's correlation id. A query never fails; terms that
//! normalize to nothing fall through to the trie's empty-term rules.

use tracing::debug;

use super::messages::{Query, QueryKind, Response};
use crate::data_structures::LauTrie;
use crate::normalize::normalize_term;

/// Routes queries to the trie.
#[derive(Debug, Default, Clone, Copy)]
pub struct QueryDispatcher;

impl QueryDispatcher {
    /// Creates a dispatcher.
    pub fn new() -> Self {
        Self
    }

    /// Answers `query` against `trie`.
    pub fn dispatch(&self, trie: &LauTrie, query: Query) -> Response {
        let term = normalize_term(&query.term);
        let result = match query.kind {
            QueryKind::Contains => trie.contains(&term),
            QueryKind::IsPrefix => trie.has_prefix(&term),
        };
        debug!(kind = ?query.kind, id = %query.id, term = %term, result, "query answered");
        Response::answer(query, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Token;
    use crate::protocol::messages::{CorrelationId, Request};

    fn trie_with(words: &[&str]) -> LauTrie {
        let mut trie = LauTrie::new();
        for word in words {
            trie.insert(&Token::parse(word).unwrap());
        }
        trie
    }

    fn ask(trie: &LauTrie, request: Request) -> Response {
        QueryDispatcher::new().dispatch(trie, request.into_query().unwrap())
    }

    #[test]
    fn test_queries_are_normalized_like_ingestion() {
        let trie = trie_with(&["Apple", "  BANANA!!"]);

        assert_eq!(
            ask(&trie, Request::contains("q1", "APPLE")),
            Response::Contains {
                id: "q1".into(),
                result: true
            }
        );
        assert_eq!(
            ask(&trie, Request::is_prefix("q2", "B-a-N")),
            Response::IsPrefix {
                id: "q2".into(),
                result: true
            }
        );
        assert_eq!(
            ask(&trie, Request::contains("q3", "ban")),
            Response::Contains {
                id: "q3".into(),
                result: false
            }
        );
    }

    #[test]
    fn test_empty_terms_follow_trie_rules() {
        let trie = trie_with(&["cherry"]);

        assert_eq!(
            ask(&trie, Request::contains(1, "!!!")),
            Response::Contains {
                id: CorrelationId::Number(1),
                result: false
            }
        );
        assert_eq!(
            ask(&trie, Request::is_prefix(2, "123")),
            Response::IsPrefix {
                id: CorrelationId::Number(2),
                result: true
            }
        );
    }
}
