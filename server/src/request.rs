mod book;
mod member;
mod validation;

pub use self::{book::*, member::*, validation::*};

use serde::Deserialize;

use kernel::prelude::entity::SelectLimit;

/// `limit`/`offset` pair shared by every listing.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct PageQuery {
    limit: Option<i32>,
    offset: Option<i32>,
}

impl PageQuery {
    pub fn new(limit: Option<i32>, offset: Option<i32>) -> Self {
        Self { limit, offset }
    }

    /// Fills in the defaults and checks the bounds.
    pub fn resolve(self, errors: &mut ValidationErrors) -> (i32, i32) {
        let limit = self
            .limit
            .unwrap_or_else(|| *SelectLimit::default().as_ref());
        if !(1..=SelectLimit::MAX).contains(&limit) {
            errors.add(
                "limit",
                format!("limit must be between 1 and {}", SelectLimit::MAX),
            );
        }
        let offset = self.offset.unwrap_or(0);
        if offset < 0 {
            errors.add("offset", "offset must be zero or positive");
        }
        (limit, offset)
    }
}
