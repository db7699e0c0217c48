use crate::entity::{SelectLimit, SelectOffset};

/// One slice of a filtered listing together with the size of the whole result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    items: Vec<T>,
    total: i64,
    limit: SelectLimit,
    offset: SelectOffset,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, limit: SelectLimit, offset: SelectOffset) -> Self {
        Self {
            items,
            total,
            limit,
            offset,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn limit(&self) -> &SelectLimit {
        &self.limit
    }

    pub fn offset(&self) -> &SelectOffset {
        &self.offset
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            limit: self.limit,
            offset: self.offset,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}
