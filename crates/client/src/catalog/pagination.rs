//! Pagination helpers for the product listing.

use url::Url;

/// Read the `page` query parameter from a paging link. Accepts absolute
/// and relative links; anything unparseable is `None`.
#[must_use]
pub fn parse_page_from_url(link: &str) -> Option<u32> {
    if link.is_empty() {
        return None;
    }

    let url = Url::parse(link).ok().or_else(|| {
        // Relative link from the API; any base will do for query parsing.
        Url::parse("http://localhost")
            .ok()
            .and_then(|base| base.join(link).ok())
    })?;

    url.query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}

/// One element of a rendered pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    /// A concrete page number.
    Page(u32),
    /// An elided run of pages, rendered as an ellipsis.
    Gap,
}

/// The windowed pager sequence: first page, up to one page either side
/// of the current page, and the last page, with gaps where pages are
/// elided.
#[must_use]
pub fn page_items(current: u32, total: u32) -> Vec<PageItem> {
    if total <= 1 {
        return vec![PageItem::Page(1)];
    }

    let mut items = vec![PageItem::Page(1)];

    let start = current.saturating_sub(1).max(2);
    let end = current.saturating_add(1).min(total - 1);

    if start > 2 {
        items.push(PageItem::Gap);
    }
    for page in start..=end {
        items.push(PageItem::Page(page));
    }
    if end + 1 < total {
        items.push(PageItem::Gap);
    }

    items.push(PageItem::Page(total));
    items
}
