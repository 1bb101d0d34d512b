use crate::core::{PaginatedResponse, PaginationMetadata};
use crate::utils::error::AppError;

pub fn validate_page_request(page: usize, page_size: usize) -> Result<(), AppError> {
    if page < 1 {
        return Err(AppError::data(format!("page must be at least 1, got {}", page)));
    }
    if page_size < 1 {
        return Err(AppError::data(format!(
            "page_size must be at least 1, got {}",
            page_size
        )));
    }
    Ok(())
}

/// Slices `items` down to `page`. A page past the end is empty rather than an
/// error, and its metadata still reports the full totals.
pub fn paginate<T>(
    items: Vec<T>,
    page: usize,
    page_size: usize,
) -> Result<PaginatedResponse<T>, AppError> {
    validate_page_request(page, page_size)?;

    let total_items = items.len();
    let meta = PaginationMetadata::new(total_items, page, page_size);

    let start_index = (page - 1).saturating_mul(page_size).min(total_items);
    let end_index = start_index.saturating_add(page_size).min(total_items);

    let items = items
        .into_iter()
        .skip(start_index)
        .take(end_index - start_index)
        .collect();

    Ok(PaginatedResponse { items, meta })
}
