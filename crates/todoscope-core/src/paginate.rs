pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Returns page `page` (1-based) of `items`. Pages past the end, and page 0,
/// are empty.
pub fn paginate<T>(
  items: &[T],
  page: usize,
  page_size: usize
) -> &[T] {
  if page == 0 || page_size == 0 {
    return &[];
  }

  let Some(start) = (page - 1)
    .checked_mul(page_size)
  else {
    return &[];
  };
  if start >= items.len() {
    return &[];
  }

  let end = start
    .saturating_add(page_size)
    .min(items.len());
  &items[start..end]
}

pub fn page_count(
  len: usize,
  page_size: usize
) -> usize {
  if page_size == 0 {
    return 0;
  }
  len.div_ceil(page_size)
}
