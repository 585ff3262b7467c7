//! Pagination stage: fixed-size 1-based page slicing

use crate::pipeline::PageRequest;

/// Return the sub-sequence `[(page_index - 1) * page_size, ..)` of
/// length at most `page_size`, clipped to the input.
///
/// Out-of-range requests never fail: a page index of 0 or past the last
/// page yields an empty result.
pub fn paginate<T: Clone>(items: &[T], page: &PageRequest) -> Vec<T> {
    if page.page_index == 0 || page.page_size == 0 {
        return Vec::new();
    }

    let start = (page.page_index - 1).saturating_mul(page.page_size);
    if start >= items.len() {
        return Vec::new();
    }

    let end = start.saturating_add(page.page_size).min(items.len());
    items[start..end].to_vec()
}

/// `ceil(len / page_size)`; 0 for an empty input
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(page_index: usize, page_size: usize) -> PageRequest {
        PageRequest {
            page_index,
            page_size,
        }
    }

    #[test]
    fn test_first_page() {
        let items: Vec<i32> = (0..10).collect();
        assert_eq!(paginate(&items, &page(1, 4)), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_last_page_is_clipped() {
        let items: Vec<i32> = (0..10).collect();
        assert_eq!(paginate(&items, &page(3, 4)), vec![8, 9]);
    }

    #[test]
    fn test_out_of_range_pages_are_empty() {
        let items: Vec<i32> = (0..10).collect();
        assert!(paginate(&items, &page(0, 4)).is_empty());
        assert!(paginate(&items, &page(4, 4)).is_empty());
        assert!(paginate(&items, &page(usize::MAX, 4)).is_empty());
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 50), 0);
        assert_eq!(total_pages(1, 50), 1);
        assert_eq!(total_pages(50, 50), 1);
        assert_eq!(total_pages(51, 50), 2);
    }

    #[test]
    fn test_pages_cover_input_exactly() {
        let items: Vec<i32> = (0..23).collect();
        let size = 5;

        let mut collected = Vec::new();
        for index in 1..=total_pages(items.len(), size) {
            collected.extend(paginate(&items, &page(index, size)));
        }

        assert_eq!(collected, items);
    }
}
