use error_stack::Report;
use vodca::{AsRefln, Fromln};

use crate::KernelError;

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Fromln, AsRefln)]
pub struct StockQuantity(i32);

impl StockQuantity {
    pub fn new(quantity: impl Into<i32>) -> Self {
        Self(quantity.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// `None` when the counter would overflow.
    pub fn checked_add(self, delta: StockDelta) -> Option<Self> {
        self.0.checked_add(delta.0).map(Self)
    }

    /// `None` when fewer than `delta` units are held.
    pub fn checked_sub(self, delta: StockDelta) -> Option<Self> {
        self.0.checked_sub(delta.0).filter(|rest| *rest >= 0).map(Self)
    }
}

/// Number of units moved in a single stock movement. Always positive.
#[derive(Debug, Clone, Copy, Eq, PartialEq, AsRefln)]
pub struct StockDelta(i32);

impl StockDelta {
    pub fn new(quantity: impl Into<i32>) -> error_stack::Result<Self, KernelError> {
        let quantity = quantity.into();
        if quantity <= 0 {
            return Err(Report::new(KernelError::InvalidArgument)
                .attach_printable(format!("Quantity must be positive: {quantity}")));
        }
        Ok(Self(quantity))
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StockMovement {
    Inbound,
    Outbound,
}
