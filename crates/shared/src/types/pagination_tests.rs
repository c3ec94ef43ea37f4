use proptest::prelude::*;

use super::*;

fn window(per_page: u64, page: u64, total_filtered: u64) -> PageWindow {
    let mut w = PageWindow::new(&PageRequest { page, per_page });
    w.set_counts(total_filtered, total_filtered);
    w
}

#[test]
fn test_page_request_defaults() {
    let request = PageRequest::default();
    assert_eq!(request.page, 1);
    assert_eq!(request.per_page, 10);
}

#[test]
fn test_offset_and_limit() {
    let w = window(10, 1, 100);
    assert_eq!(w.offset(), 0);
    assert_eq!(w.limit(), 10);

    let w = window(10, 3, 100);
    assert_eq!(w.offset(), 20);
}

#[test]
fn test_zero_inputs_are_lifted() {
    let w = PageWindow::new(&PageRequest {
        page: 0,
        per_page: 0,
    });
    assert_eq!(w.page(), 1);
    assert_eq!(w.per_page(), 1);
}

#[test]
fn test_record_bounds_partial_last_page() {
    // 23 matching records, 10 per page, page 3 -> records 21..=23.
    let w = window(10, 3, 23);
    assert_eq!(w.from_record(), Some(21));
    assert_eq!(w.to_record(), Some(23));
}

#[test]
fn test_record_bounds_empty() {
    let w = window(10, 1, 0);
    assert_eq!(w.from_record(), None);
    assert_eq!(w.to_record(), None);
    assert_eq!(w.total_pages(), 1);
}

#[test]
fn test_next_page_past_end_is_noop() {
    let mut w = window(10, 3, 23);
    assert!(!w.has_next());
    w.next_page();
    assert_eq!(w.page(), 3);
}

#[test]
fn test_previous_page_at_start_is_noop() {
    let mut w = window(10, 1, 23);
    assert!(!w.has_previous());
    w.previous_page();
    assert_eq!(w.page(), 1);
}

#[test]
fn test_navigation_walk() {
    let mut w = window(10, 1, 23);
    assert!(w.has_next());
    w.next_page();
    w.next_page();
    assert_eq!(w.page(), 3);
    assert!(!w.has_next());
    w.previous_page();
    assert_eq!(w.page(), 2);
}

#[test]
fn test_requested_page_clamps_to_last() {
    // A narrower filter shrank the result set below the requested page.
    let w = window(10, 9, 23);
    assert_eq!(w.page(), 3);
    assert_eq!(w.to_record(), Some(23));
}

#[test]
fn test_reset_returns_to_first_page() {
    let mut w = window(10, 3, 100);
    w.reset();
    assert_eq!(w.page(), 1);
    assert_eq!(w.offset(), 0);
}

#[test]
fn test_page_meta_from_window() {
    let mut w = PageWindow::new(&PageRequest {
        page: 2,
        per_page: 10,
    });
    w.set_counts(50, 23);

    let meta = PageMeta::from(&w);
    assert_eq!(meta.page, 2);
    assert_eq!(meta.per_page, 10);
    assert_eq!(meta.total_records, 50);
    assert_eq!(meta.total_filtered, 23);
    assert_eq!(meta.from_record, Some(11));
    assert_eq!(meta.to_record, Some(20));
    assert_eq!(meta.total_pages, 3);
}

#[test]
fn test_page_response_new() {
    let w = window(10, 1, 3);
    let response = PageResponse::new(vec![1, 2, 3], &w);
    assert_eq!(response.data, vec![1, 2, 3]);
    assert_eq!(response.meta.total_filtered, 3);
    assert_eq!(response.meta.total_pages, 1);
}

proptest! {
    /// The visible slice always stays inside the filtered result set.
    #[test]
    fn prop_record_bounds_within_result_set(
        per_page in 1u64..100,
        page in 1u64..1000,
        total in 0u64..10_000,
    ) {
        let w = window(per_page, page, total);

        match (w.from_record(), w.to_record()) {
            (Some(from), Some(to)) => {
                prop_assert!(from >= 1);
                prop_assert!(from <= to);
                prop_assert!(to <= total);
            }
            (None, None) => prop_assert_eq!(total, 0),
            _ => prop_assert!(false, "from/to must be both set or both empty"),
        }
    }

    /// Navigation can never leave the valid page range.
    #[test]
    fn prop_navigation_stays_in_range(
        per_page in 1u64..50,
        page in 1u64..100,
        total in 0u64..2_000,
        steps in proptest::collection::vec(any::<bool>(), 0..20),
    ) {
        let mut w = window(per_page, page, total);
        for forward in steps {
            if forward {
                w.next_page();
            } else {
                w.previous_page();
            }
            prop_assert!(w.page() >= 1);
            prop_assert!(w.page() <= w.total_pages());
        }
    }
}
