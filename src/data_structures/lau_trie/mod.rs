//! Lau Trie Implementation
//!
//! This module provides the prefix tree behind the dictionary service. It
//! stores normalized tokens over the lowercase Latin alphabet and answers
//! exact-membership and prefix-existence queries.
//!
//! The trie only grows: there is no removal, and a node once linked stays
//! linked for the lifetime of the tree. All mutation goes through
//! [`LauTrie::insert`], which takes `&mut self`, so a reader holding `&self`
//! can never observe a half-linked node.

mod node;

use crate::normalize::Token;
use node::{slot, TrieNode};

pub use node::ALPHABET_SIZE;

/// Lau Trie is a grow-only prefix tree over the working alphabet.
///
/// Key features:
/// * Fixed 26-slot child arrays, no hashing on the lookup path
/// * Idempotent insertion
/// * Distinct word and node counters maintained on insert
#[derive(Debug)]
pub struct LauTrie {
    /// The root node of the trie
    root: TrieNode,

    /// Number of distinct tokens inserted
    words: usize,

    /// Number of nodes below the root
    nodes: usize,
}

impl LauTrie {
    /// Creates a new empty `LauTrie`.
    pub fn new() -> Self {
        Self {
            root: TrieNode::new(),
            words: 0,
            nodes: 0,
        }
    }

    /// Inserts a token into the trie.
    ///
    /// Walks from the root, creating a child for every letter not yet
    /// present, and marks the final node as a word.
    ///
    /// # Returns
    ///
    /// `true` if the token was not present before, `false` if the call only
    /// revisited existing nodes.
    pub fn insert(&mut self, token: &Token) -> bool {
        let mut node = &mut self.root;
        let mut created = 0;

        for c in token.as_str().chars() {
            // Token only carries a-z, so every char has a slot.
            let Some(index) = slot(c) else { continue };
            node = node.children[index].get_or_insert_with(|| {
                created += 1;
                Box::new(TrieNode::new())
            });
        }

        self.nodes += created;

        if node.is_word {
            false
        } else {
            node.is_word = true;
            self.words += 1;
            true
        }
    }

    /// Checks whether `word` was inserted as a complete token.
    ///
    /// Returns `false` for the empty string, for any term whose path breaks
    /// early (including characters outside the alphabet), and for terms that
    /// only exist as a strict prefix of inserted tokens.
    pub fn contains(&self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }
        self.walk(word).is_some_and(|node| node.is_word)
    }

    /// Checks whether every character of `prefix` has an edge from the root.
    ///
    /// The empty prefix is always present, even in an empty tree.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.walk(prefix).is_some()
    }

    /// Returns the number of distinct tokens in the trie.
    pub fn len(&self) -> usize {
        self.words
    }

    /// Returns `true` if no token has been inserted.
    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    /// Returns the number of nodes below the root.
    pub fn node_count(&self) -> usize {
        self.nodes
    }

    fn walk(&self, path: &str) -> Option<&TrieNode> {
        path.chars()
            .try_fold(&self.root, |node, c| slot(c).and_then(|index| node.child(index)))
    }
}

impl Default for LauTrie {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn token(raw: &str) -> Token {
        Token::parse(raw).expect("test token must normalize")
    }

    #[test]
    fn test_trie_basic_operations() {
        let mut trie = LauTrie::new();

        assert!(trie.is_empty());
        assert!(trie.insert(&token("hello")));
        assert_eq!(trie.len(), 1);
        assert!(!trie.is_empty());

        assert!(trie.contains("hello"));
        assert!(!trie.contains("hell"));
        assert!(!trie.contains("helloo"));
        assert!(trie.has_prefix("hel"));
        assert!(trie.has_prefix("hello"));
        assert!(!trie.has_prefix("help"));
    }

    #[test]
    fn test_empty_term_edge_cases() {
        let mut trie = LauTrie::new();
        assert!(!trie.contains(""));
        assert!(trie.has_prefix(""));

        trie.insert(&token("a"));
        assert!(!trie.contains(""));
        assert!(trie.has_prefix(""));
    }

    #[test]
    fn test_non_alphabet_terms_never_match() {
        let mut trie = LauTrie::new();
        trie.insert(&token("apple"));

        assert!(!trie.contains("Apple"));
        assert!(!trie.has_prefix("ap-"));
        assert!(!trie.has_prefix("ñ"));
    }

    #[test]
    fn test_duplicate_insert_is_idempotent() {
        let mut trie = LauTrie::new();
        assert!(trie.insert(&token("banana")));
        let nodes = trie.node_count();

        assert!(!trie.insert(&token("banana")));
        assert_eq!(trie.node_count(), nodes);
        assert_eq!(trie.len(), 1);
        assert!(trie.contains("banana"));
    }

    #[test]
    fn test_shared_prefixes_share_nodes() {
        let mut trie = LauTrie::new();
        trie.insert(&token("apple"));
        trie.insert(&token("apply"));
        trie.insert(&token("app"));

        // a-p-p-l then e and y
        assert_eq!(trie.node_count(), 6);
        assert_eq!(trie.len(), 3);
        assert!(trie.contains("app"));
        assert!(!trie.contains("appl"));
        assert!(trie.has_prefix("appl"));
    }

    proptest! {
        #[test]
        fn prop_inserted_tokens_and_prefixes_are_found(words in prop::collection::vec("[a-z]{1,12}", 1..40)) {
            let mut trie = LauTrie::new();
            for word in &words {
                trie.insert(&token(word));
            }

            for word in &words {
                prop_assert!(trie.contains(word));
                for end in 0..word.len() {
                    prop_assert!(trie.has_prefix(&word[..end]));
                }
            }
        }

        #[test]
        fn prop_reinsertion_does_not_grow(words in prop::collection::vec("[a-z]{1,8}", 1..20)) {
            let mut trie = LauTrie::new();
            for word in &words {
                trie.insert(&token(word));
            }
            let (len, nodes) = (trie.len(), trie.node_count());

            for word in &words {
                prop_assert!(!trie.insert(&token(word)));
            }
            prop_assert_eq!(trie.len(), len);
            prop_assert_eq!(trie.node_count(), nodes);
        }
    }
}
