use rocket::http::Status;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The largest page a client may ask for.
pub const MAX_PAGE_SIZE: usize = 100;

/// Query parameters selecting a page of results. Pages are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromForm)]
pub struct PaginationRequest {
    #[field(default = 1)]
    page_num: usize,
    #[field(default = 50)]
    page_size: usize,
}

impl PaginationRequest {
    pub fn new(page_num: usize, page_size: usize) -> Self {
        Self {
            page_num,
            page_size,
        }
    }

    /// Number of items before the start of this page.
    pub fn skip(&self) -> usize {
        self.page_num.saturating_sub(1).saturating_mul(self.page_size)
    }

    fn validate(&self) -> Result<()> {
        if self.page_num == 0 {
            return Err(Error::Status(
                Status::BadRequest,
                "Page numbers start at 1".to_string(),
            ));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(Error::Status(
                Status::BadRequest,
                format!("Page size must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }
        Ok(())
    }

    /// Cut the requested page out of the full, ordered list of items.
    pub fn paginate<T>(&self, items: Vec<T>) -> Result<Paginated<T>> {
        self.validate()?;
        let total = items.len();
        let items = items
            .into_iter()
            .skip(self.skip())
            .take(self.page_size)
            .collect();
        Ok(Paginated {
            items,
            pagination: PaginationResult {
                page_num: self.page_num,
                page_size: self.page_size,
                total,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationResult {
    pub page_num: usize,
    pub page_size: usize,
    pub total: usize,
}

/// One page of items, plus where it sits in the whole list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PaginationResult,
}
