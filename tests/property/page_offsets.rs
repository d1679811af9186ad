//! Page offsets derived from form feeds agree with counting form feeds.

use folio::types::{check_page_offsets, derive_page_offsets, page_at, PAGE_BREAK};
use proptest::prelude::*;

/// Page contents without page breaks, including multi-byte characters.
fn page_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zéü ]{0,24}").unwrap()
}

fn pages_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(page_strategy(), 1..6)
}

/// Oracle: one plus the number of page breaks before `position`.
fn oracle_page(chars: &[char], position: usize) -> u32 {
    chars[..position].iter().filter(|&&c| c == PAGE_BREAK).count() as u32 + 1
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Derived offsets validate against their own text.
    #[test]
    fn prop_derived_offsets_are_valid(pages in pages_strategy()) {
        let text = pages.join("\x0c");
        let offsets = derive_page_offsets(&text);
        prop_assert_eq!(offsets.len(), pages.len());
        prop_assert_eq!(offsets[0], 0);
        prop_assert!(check_page_offsets(&offsets, text.chars().count()).is_ok());
    }

    /// Every character position maps to the page the form feeds put it on.
    #[test]
    fn prop_page_at_matches_oracle(pages in pages_strategy()) {
        let text = pages.join("\x0c");
        let chars: Vec<char> = text.chars().collect();
        let offsets = derive_page_offsets(&text);
        let page_count = pages.len() as u32;

        for position in 0..chars.len() {
            prop_assert_eq!(
                page_at(&offsets, position, page_count),
                oracle_page(&chars, position),
                "position {} in {:?}", position, text
            );
        }
    }

    /// Lookups stay within `1..=pages` for any sorted table and any position.
    #[test]
    fn prop_page_at_is_clamped(
        mut offsets in prop::collection::vec(0usize..500, 0..8),
        position in 0usize..1000,
        pages in 0u32..10,
    ) {
        offsets.sort_unstable();
        let page = page_at(&offsets, position, pages);
        let last = if pages > 0 { pages } else { (offsets.len() as u32).max(1) };
        prop_assert!(page >= 1);
        prop_assert!(page <= last);
    }

    /// A table that goes backwards is always rejected.
    #[test]
    fn prop_decreasing_offsets_rejected(a in 1usize..100, drop in 1usize..100) {
        let offsets = [0, a + drop, a];
        prop_assert!(check_page_offsets(&offsets, 1000).is_err());
    }
}
