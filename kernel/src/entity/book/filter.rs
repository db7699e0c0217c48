use crate::entity::{Book, BookCategory, BookPrice, BookStatus, StockQuantity};

/// Selection applied by book listings. Substring matches are case-sensitive.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum BookFilter {
    All,
    TitleContains(String),
    AuthorContains(String),
    /// Title or author contains the keyword.
    Keyword(String),
    Category(BookCategory),
    Status(BookStatus),
    /// Inclusive on both ends.
    PriceBetween { min: BookPrice, max: BookPrice },
    /// At most `threshold` units left while still on sale.
    LowStock { threshold: StockQuantity },
}

impl BookFilter {
    pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;

    pub fn matches(&self, book: &Book) -> bool {
        match self {
            BookFilter::All => true,
            BookFilter::TitleContains(title) => book.title().as_ref().contains(title.as_str()),
            BookFilter::AuthorContains(author) => {
                book.author().as_ref().contains(author.as_str())
            }
            BookFilter::Keyword(keyword) => {
                book.title().as_ref().contains(keyword.as_str())
                    || book.author().as_ref().contains(keyword.as_str())
            }
            BookFilter::Category(category) => book.category().as_ref() == Some(category),
            BookFilter::Status(status) => book.status() == status,
            BookFilter::PriceBetween { min, max } => {
                min.as_ref() <= book.price().as_ref() && book.price().as_ref() <= max.as_ref()
            }
            BookFilter::LowStock { threshold } => {
                book.stock_quantity() <= threshold && book.status() == &BookStatus::Available
            }
        }
    }
}
