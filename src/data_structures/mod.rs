//! Data structures for the Hua dictionary service.

pub mod lau_trie;

pub use lau_trie::LauTrie;
