pub mod categories;
pub mod questions;

pub const QUESTIONS_PER_PAGE: i64 = 10;

/// 1-indexed page number as requested by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page(pub i64);

impl Default for Page {
    fn default() -> Self {
        Page(1)
    }
}

impl Page {
    /// Row offset of the first item, `None` for pages below 1.
    pub fn offset(self) -> Option<i64> {
        if self.0 < 1 {
            return None;
        }
        self.0
            .checked_sub(1)
            .and_then(|p| p.checked_mul(QUESTIONS_PER_PAGE))
    }
}

/// One page of rows together with the size of the whole filtered set.
#[derive(Debug)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> Paginated<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
