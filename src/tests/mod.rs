//! Test modules for the Hua dictionary service.
//!
//! Unit tests live next to the code they cover. The modules here exercise
//! behavior that spans components: layered configuration loading, the
//! error taxonomy and reporter, and property-based checks of the ingestion
//! pipeline.

pub mod ingest_property_tests;
pub mod test_utils;

// Re-export commonly used testing tools to simplify imports in test modules
pub use test_utils::{render_list, split_at_points, word_list_strategy, word_strategy, TestFixture};
