//! Pagination slicing for the station listing

use super::ListingPage;
use crate::app::models::StationRecord;
use crate::constants::DEFAULT_PAGE_SIZE;

/// Slice one page out of the filtered, sorted station list
///
/// `total_count` reflects the list before slicing and `total_pages` is the
/// ceiling of count over page size. A page number past the last page
/// produces an empty slice; page 0 is treated as page 1.
pub fn paginate(stations: Vec<&StationRecord>, page: usize, page_size: usize) -> ListingPage<'_> {
    let page_size = if page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size
    };
    let page = page.max(1);

    let total_count = stations.len();
    let total_pages = total_count.div_ceil(page_size);

    let start = (page - 1).saturating_mul(page_size);
    let stations = if start >= total_count {
        Vec::new()
    } else {
        let end = (start + page_size).min(total_count);
        stations[start..end].to_vec()
    };

    ListingPage {
        stations,
        total_count,
        total_pages,
        page,
    }
}
