use std::fmt::{Display, Formatter};
use std::str::FromStr;

use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::entity::{StockMovement, StockQuantity};
use crate::KernelError;

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookStatus {
    #[default]
    Available,
    OutOfStock,
    Discontinued,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "AVAILABLE",
            BookStatus::OutOfStock => "OUT_OF_STOCK",
            BookStatus::Discontinued => "DISCONTINUED",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BookStatus::Available => "On sale",
            BookStatus::OutOfStock => "Sold out",
            BookStatus::Discontinued => "Out of print",
        }
    }

    /// Status a book ends up in after a stock movement left `remaining` units.
    ///
    /// Draining the stock always yields [`BookStatus::OutOfStock`], whatever the
    /// previous status was. Restocking only revives an out-of-stock book; a
    /// discontinued one stays discontinued.
    pub fn after(self, movement: StockMovement, remaining: &StockQuantity) -> BookStatus {
        match (movement, self) {
            (StockMovement::Outbound, _) if remaining.is_empty() => BookStatus::OutOfStock,
            (StockMovement::Inbound, BookStatus::OutOfStock) if !remaining.is_empty() => {
                BookStatus::Available
            }
            (_, current) => current,
        }
    }
}

impl Display for BookStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookStatus {
    type Err = Report<KernelError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(BookStatus::Available),
            "OUT_OF_STOCK" => Ok(BookStatus::OutOfStock),
            "DISCONTINUED" => Ok(BookStatus::Discontinued),
            other => Err(Report::new(KernelError::InvalidArgument)
                .attach_printable(format!("Unknown book status: {other}"))),
        }
    }
}
