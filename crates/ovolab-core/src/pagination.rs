//! Page navigation for paginated listings.

/// One entry of a pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    /// A numbered, 1-based page.
    Page(u32),
    /// A gap between numbered pages.
    Ellipsis,
}

const WINDOW: u32 = 5;

/// Pages to show around `current`: a window of at most five pages, plus the
/// first and last page with ellipses where pages are skipped.
///
/// ```
/// use ovolab_core::pagination::{PageItem::*, page_window};
///
/// assert_eq!(
///     page_window(6, 12),
///     vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Page(7), Page(8), Ellipsis, Page(12)]
/// );
/// ```
pub fn page_window(current: u32, total_pages: u32) -> Vec<PageItem> {
    if total_pages == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, total_pages);

    let (start, end) = if total_pages <= WINDOW {
        (1, total_pages)
    } else if current <= 3 {
        (1, WINDOW)
    } else if current >= total_pages - 2 {
        (total_pages - WINDOW + 1, total_pages)
    } else {
        (current - 2, current + 2)
    };

    let mut items = Vec::with_capacity(WINDOW as usize + 4);
    if start > 1 {
        items.push(PageItem::Page(1));
        if start > 2 {
            items.push(PageItem::Ellipsis);
        }
    }
    items.extend((start..=end).map(PageItem::Page));
    if end < total_pages {
        if end < total_pages - 1 {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page(total_pages));
    }
    items
}

/// 1-based inclusive range of items shown on `page`, for "showing X-Y of Z".
///
/// Returns `None` when the page is empty.
pub fn item_range(page: u32, limit: u32, total: u64) -> Option<(u64, u64)> {
    if limit == 0 || total == 0 || page == 0 {
        return None;
    }
    let first = u64::from(page - 1) * u64::from(limit) + 1;
    if first > total {
        return None;
    }
    let last = (first + u64::from(limit) - 1).min(total);
    Some((first, last))
}
