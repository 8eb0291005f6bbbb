//! Property-based tests for the ingestion pipeline.
//!
//! The trie, the counters and the progress notifications must not depend on
//! where the transport happens to cut the byte stream.

use proptest::prelude::*;

use crate::data_structures::LauTrie;
use crate::ingest::{IngestSettings, IngestionState, LoadSummary, Progress};
use crate::normalize::{normalize, normalize_term};

use super::{render_list, split_at_points, word_list_strategy, word_strategy};

fn settings(progress_interval: u64) -> IngestSettings {
    IngestSettings {
        estimated_total: 50,
        progress_interval,
        count_blank_lines: true,
    }
}

fn ingest(chunks: &[Vec<u8>], settings: IngestSettings) -> (LauTrie, Vec<Progress>, LoadSummary) {
    let mut trie = LauTrie::new();
    let mut state = IngestionState::new(settings);
    let mut events = Vec::new();
    for chunk in chunks {
        events.extend(state.feed(chunk, &mut trie).unwrap());
    }
    let summary = state.finish(&mut trie).unwrap();
    (trie, events, summary)
}

fn expected_lines(lines: &[String], trailing_newline: bool) -> u64 {
    match lines.split_last() {
        None => 0,
        Some(_) if trailing_newline => lines.len() as u64,
        Some((last, rest)) => rest.len() as u64 + u64::from(!last.trim().is_empty()),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_chunking_does_not_change_result(
        (lines, trailing) in word_list_strategy(),
        cuts in proptest::collection::vec(any::<usize>(), 0..16),
        interval in 1u64..8,
    ) {
        let bytes = render_list(&lines, trailing);
        let (whole_trie, whole_events, whole_summary) = ingest(&[bytes.clone()], settings(interval));
        let (split_trie, split_events, split_summary) =
            ingest(&split_at_points(&bytes, &cuts), settings(interval));

        prop_assert_eq!(whole_summary, split_summary);
        prop_assert_eq!(whole_events, split_events);
        prop_assert_eq!(whole_trie.len(), split_trie.len());
        prop_assert_eq!(whole_trie.node_count(), split_trie.node_count());

        for line in &lines {
            let term = normalize_term(line);
            prop_assert_eq!(whole_trie.contains(&term), split_trie.contains(&term));
        }
    }

    #[test]
    fn prop_every_token_is_queryable(
        (lines, trailing) in word_list_strategy(),
        cuts in proptest::collection::vec(any::<usize>(), 0..8),
    ) {
        let bytes = render_list(&lines, trailing);
        let (trie, _, summary) = ingest(&split_at_points(&bytes, &cuts), settings(5));

        prop_assert_eq!(summary.lines, expected_lines(&lines, trailing));

        for token in lines.iter().filter_map(|line| normalize(line)) {
            prop_assert!(trie.contains(token.as_str()));
            for end in 0..=token.as_str().len() {
                prop_assert!(trie.has_prefix(&token.as_str()[..end]));
            }
        }
    }

    #[test]
    fn prop_progress_is_monotonic_and_capped(
        (lines, trailing) in word_list_strategy(),
        interval in 1u64..10,
    ) {
        let bytes = render_list(&lines, trailing);
        let (_, events, summary) = ingest(&[bytes], settings(interval));

        for pair in events.windows(2) {
            prop_assert!(pair[0].loaded < pair[1].loaded);
            prop_assert!(pair[0].pct < pair[1].pct);
        }
        for event in &events {
            prop_assert!(event.pct <= 99);
            prop_assert!(event.pct > 0);
            prop_assert_eq!(event.loaded % interval, 0);
            prop_assert!(event.loaded <= summary.lines);
        }
    }

    #[test]
    fn prop_normalized_lines_are_lowercase_ascii(line in word_strategy()) {
        let term = normalize_term(&line);
        prop_assert!(term.bytes().all(|b| b.is_ascii_lowercase()));
        prop_assert_eq!(normalize(&line).map(|t| t.into_string()).unwrap_or_default(), term);
    }
}
