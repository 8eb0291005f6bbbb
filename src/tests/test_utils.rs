//! Test utilities and fixtures for the Hua dictionary service.
//!
//! Reusable strategies for word lists and chunk boundaries, plus a fixture
//! that owns a temporary directory and the environment variables a test sets.

use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use tempfile::TempDir;

/// Maximum number of words in a generated list.
const MAX_WORDS: usize = 200;

/// Generate a strategy for single dictionary lines.
///
/// Lines mix letters of both cases with the occasional digit, apostrophe,
/// accented letter or surrounding whitespace, so normalization has work to do.
pub fn word_strategy() -> BoxedStrategy<String> {
    r"[ \t]{0,2}[a-zA-Z'0-9éß-]{0,12}[ \t]{0,2}".boxed()
}

/// Generate a strategy for whole word lists.
///
/// # Returns
///
/// A boxed strategy producing the lines and whether the list ends with a
/// line terminator.
pub fn word_list_strategy() -> BoxedStrategy<(Vec<String>, bool)> {
    (
        proptest::collection::vec(word_strategy(), 0..MAX_WORDS),
        any::<bool>(),
    )
        .boxed()
}

/// Joins `lines` with `\n`, optionally terminating the last one.
pub fn render_list(lines: &[String], trailing_newline: bool) -> Vec<u8> {
    let mut text = lines.join("\n");
    if trailing_newline && !lines.is_empty() {
        text.push('\n');
    }
    text.into_bytes()
}

/// Splits `bytes` into chunks at the given cut points.
///
/// Cut points are taken modulo the input length, sorted and deduplicated, so
/// any generated `Vec<usize>` is a valid split. Cuts may land inside a
/// multi-byte character.
pub fn split_at_points(bytes: &[u8], points: &[usize]) -> Vec<Vec<u8>> {
    if bytes.is_empty() {
        return vec![Vec::new()];
    }

    let mut cuts: Vec<usize> = points.iter().map(|p| p % bytes.len()).collect();
    cuts.sort_unstable();
    cuts.dedup();

    let mut chunks = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for cut in cuts {
        chunks.push(bytes[start..cut].to_vec());
        start = cut;
    }
    chunks.push(bytes[start..].to_vec());
    chunks
}

/// Test fixture owning a temporary directory and any environment variables
/// set through it.
pub struct TestFixture {
    /// Temporary directory for test files
    pub temp_dir: TempDir,
    /// Vector of environment variables to cleanup after tests
    env_vars: Vec<String>,
}

impl TestFixture {
    /// Create a new test fixture.
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            temp_dir: tempfile::tempdir()?,
            env_vars: Vec::new(),
        })
    }

    /// Set an environment variable for this test.
    ///
    /// The variable will be cleaned up when the fixture is dropped.
    pub fn set_env<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        std::env::set_var(&key, value.into());
        self.env_vars.push(key);
    }

    /// Writes `contents` to `name` inside the fixture directory.
    pub fn write_file<C: AsRef<[u8]>>(
        &self,
        name: &str,
        contents: C,
    ) -> std::io::Result<std::path::PathBuf> {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }
}

impl Drop for TestFixture {
    fn drop(&mut self) {
        for key in &self.env_vars {
            std::env::remove_var(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_reassembles() {
        let bytes = b"apple\nbanana\n";
        let chunks = split_at_points(bytes, &[3, 3, 20, 0]);
        assert_eq!(chunks.concat(), bytes.to_vec());
        assert_eq!(chunks.len(), 4);
    }

    #[test]
    fn test_render_list() {
        let lines = vec!["a".to_string(), "b".to_string()];
        assert_eq!(render_list(&lines, true), b"a\nb\n".to_vec());
        assert_eq!(render_list(&lines, false), b"a\nb".to_vec());
        assert!(render_list(&[], true).is_empty());
    }
}
