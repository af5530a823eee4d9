//! Proptest strategies

use proptest::prelude::*;
use storefront_core::{CardHandle, Direction};

/// Page sizes of a listing: every page full except possibly the last
pub fn arb_page_sizes(max_pages: usize, max_page_size: usize) -> impl Strategy<Value = Vec<usize>> {
    (1..=max_pages, 1..=max_page_size, 1..=max_page_size).prop_map(
        |(count, size, last)| {
            let mut sizes = vec![size; count];
            if let Some(tail) = sizes.last_mut() {
                *tail = last.min(size);
            }
            sizes
        },
    )
}

/// Rendered slots of up to `max_len` positions with unique live handles
pub fn arb_rendered(max_len: usize) -> impl Strategy<Value = Vec<Option<CardHandle>>> {
    proptest::collection::vec(any::<bool>(), 0..=max_len).prop_map(|live| {
        live.into_iter()
            .enumerate()
            .map(|(i, on)| on.then(|| CardHandle(i as i64 + 1)))
            .collect()
    })
}

/// A navigation direction
pub fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Forward), Just(Direction::Backward)]
}
