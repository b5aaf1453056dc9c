//! Page arithmetic for entry lanes

use crate::domain::{Entry, Lane};
use crate::error::{Result, SignwallError};

/// Number of pages a lane of `len` entries spans (never less than one)
pub fn max_pages(len: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    len.div_ceil(page_size).max(1)
}

/// Next index when paging a lane in order, wrapping to the first page
pub fn next_sequential(prev: usize, max_pages: usize) -> usize {
    (prev + 1) % max_pages.max(1)
}

/// Pull an index back into `[0, max_pages)`
pub fn clamp_index(index: usize, max_pages: usize) -> usize {
    index.min(max_pages.max(1) - 1)
}

/// Entries on page `index` of `entries`.
///
/// Fails with `RenderInput` when the index lies past the last page, which
/// happens when the lane shrank under a page index computed earlier.
pub fn page_slice(entries: &[Entry], lane: Lane, index: usize, page_size: usize) -> Result<&[Entry]> {
    let page_size = page_size.max(1);
    let pages = max_pages(entries.len(), page_size);
    if index >= pages {
        return Err(SignwallError::RenderInput {
            lane,
            page_index: index,
            max_pages: pages,
        });
    }

    let start = (index * page_size).min(entries.len());
    let end = (start + page_size).min(entries.len());
    Ok(&entries[start..end])
}
