//! Node implementation for the Lau Trie.
//!
//! Each node owns up to 26 children, one per letter of the working alphabet,
//! stored in a fixed array indexed by `letter - b'a'`.

/// Number of letters in the working alphabet.
pub const ALPHABET_SIZE: usize = 26;

/// A node in the Lau Trie.
///
/// The path from the root to a node spells a prefix; `is_word` marks that
/// the prefix is itself an inserted token.
#[derive(Debug, Default)]
pub struct TrieNode {
    /// Child nodes indexed by alphabet slot
    pub children: [Option<Box<TrieNode>>; ALPHABET_SIZE],

    /// Whether this node represents the end of an inserted token
    pub is_word: bool,
}

impl TrieNode {
    /// Creates a new empty trie node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the child for `slot`, if one exists.
    pub fn child(&self, slot: usize) -> Option<&TrieNode> {
        self.children[slot].as_deref()
    }
}

/// Maps an alphabet letter to its child slot.
///
/// Returns `None` for anything outside `a`-`z`.
#[inline]
pub fn slot(c: char) -> Option<usize> {
    if c.is_ascii_lowercase() {
        Some((c as u8 - b'a') as usize)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_mapping() {
        assert_eq!(slot('a'), Some(0));
        assert_eq!(slot('z'), Some(25));
        assert_eq!(slot('A'), None);
        assert_eq!(slot('é'), None);
        assert_eq!(slot('1'), None);
    }

    #[test]
    fn test_new_node_is_empty() {
        let node = TrieNode::new();
        assert!(node.children.iter().all(Option::is_none));
        assert!(!node.is_word);
        assert!(node.child(3).is_none());
    }
}
