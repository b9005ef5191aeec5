use rocket::FromForm;
use serde::{Deserialize, Serialize};

/// Query parameters selecting one page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromForm)]
pub struct PaginationRequest {
    #[field(default = 1, validate = range(1..))]
    page_num: usize,
    #[field(default = 50, validate = range(1..=500))]
    page_size: usize,
}

impl PaginationRequest {
    pub fn new(page_num: usize, page_size: usize) -> Self {
        Self {
            page_num: page_num.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn skip(&self) -> usize {
        (self.page_num - 1).saturating_mul(self.page_size)
    }

    /// Cut the requested page out of a full listing.
    pub fn paginate<T>(&self, items: Vec<T>) -> Paginated<T> {
        let total = items.len();
        let items = items
            .into_iter()
            .skip(self.skip())
            .take(self.page_size)
            .collect();
        Paginated {
            pagination: PaginationResult {
                page_num: self.page_num,
                page_size: self.page_size,
                total,
            },
            items,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationResult {
    pub page_num: usize,
    pub page_size: usize,
    pub total: usize,
}

/// One page of items plus where it sits in the full listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub pagination: PaginationResult,
    pub items: Vec<T>,
}
